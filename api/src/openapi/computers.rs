use super::API_BASE_PATH;
use super::common::{
    check_update_id, query_params, ApiResponse, ApiTags, CountResponse, DeleteResponse,
};
use crate::criteria::parse_computer_criteria;
use crate::database::schema::computer;
use crate::database::{CompanyDto, ComputerDto, ComputerPatch, Database};
use crate::pagination::{link_header, PageRequest};
use crate::validation::{validate_computer, validate_computer_patch};
use poem::web::Data;
use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi};
use std::sync::Arc;

pub struct ComputersApi;

#[derive(poem_openapi::ApiResponse)]
enum ComputerListResponse {
    #[oai(status = 200)]
    Ok(
        Json<ApiResponse<Vec<ComputerDto>>>,
        #[oai(header = "X-Total-Count")] i64,
        #[oai(header = "Link")] String,
    ),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum ComputerResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<ComputerDto>>),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 404)]
    NotFound(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum ComputerCreatedResponse {
    #[oai(status = 201)]
    Created(
        Json<ApiResponse<ComputerDto>>,
        #[oai(header = "Location")] String,
    ),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

/// Returns a rejection message if the referenced company is unusable
async fn company_reference_error(
    db: &Database,
    company: Option<&CompanyDto>,
) -> anyhow::Result<Option<String>> {
    let Some(company) = company else {
        return Ok(None);
    };
    let Some(id) = company.id else {
        return Ok(Some("Company reference must carry an id".to_string()));
    };
    if db.company_exists(id).await? {
        Ok(None)
    } else {
        Ok(Some(format!("Company {} not found", id)))
    }
}

#[OpenApi]
impl ComputersApi {
    /// List computers
    ///
    /// Filters with `field.operation=value` parameters, pages with `page`, `size` and `sort`
    #[oai(path = "/computers", method = "get", tag = "ApiTags::Computers")]
    async fn get_all_computers(
        &self,
        db: Data<&Arc<Database>>,
        req: &Request,
    ) -> ComputerListResponse {
        let params = match query_params(req) {
            Ok(p) => p,
            Err(e) => return ComputerListResponse::BadRequest(ApiResponse::error(e)),
        };
        let criteria = match parse_computer_criteria(&params) {
            Ok(c) => c,
            Err(e) => return ComputerListResponse::BadRequest(ApiResponse::error(e)),
        };
        let page_request =
            match PageRequest::from_params(&params, &computer::ENTITY.sort_properties()) {
                Ok(p) => p,
                Err(e) => return ComputerListResponse::BadRequest(ApiResponse::error(e)),
            };

        match db.find_computers_page(&criteria, &page_request).await {
            Ok(page) => {
                let link = link_header(&format!("{}/computers", API_BASE_PATH), &params, &page);
                let total = page.total_elements;
                ComputerListResponse::Ok(ApiResponse::ok(page.content), total, link)
            }
            Err(e) => {
                tracing::error!("Failed to list computers: {:#}", e);
                ComputerListResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Count computers
    ///
    /// Accepts the same filter parameters as the list endpoint
    #[oai(path = "/computers/count", method = "get", tag = "ApiTags::Computers")]
    async fn count_computers(&self, db: Data<&Arc<Database>>, req: &Request) -> CountResponse {
        let criteria = match query_params(req).and_then(|p| parse_computer_criteria(&p)) {
            Ok(c) => c,
            Err(e) => return CountResponse::BadRequest(ApiResponse::error(e)),
        };

        match db.count_computers_by_criteria(&criteria).await {
            Ok(count) => CountResponse::Ok(ApiResponse::ok(count)),
            Err(e) => {
                tracing::error!("Failed to count computers: {:#}", e);
                CountResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Get computer
    #[oai(path = "/computers/:id", method = "get", tag = "ApiTags::Computers")]
    async fn get_computer(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> ComputerResponse {
        match db.get_computer(id.0).await {
            Ok(Some(computer)) => ComputerResponse::Ok(ApiResponse::ok(computer)),
            Ok(None) => ComputerResponse::NotFound(ApiResponse::error("Computer not found")),
            Err(e) => {
                tracing::error!("Failed to get computer {}: {:#}", id.0, e);
                ComputerResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Create computer
    ///
    /// The body must not carry an id
    #[oai(path = "/computers", method = "post", tag = "ApiTags::Computers")]
    async fn create_computer(
        &self,
        db: Data<&Arc<Database>>,
        body: Json<ComputerDto>,
    ) -> ComputerCreatedResponse {
        if body.id.is_some() {
            return ComputerCreatedResponse::BadRequest(ApiResponse::error(
                "A new computer cannot already have an ID",
            ));
        }
        if let Err(e) = validate_computer(&body) {
            return ComputerCreatedResponse::BadRequest(ApiResponse::error(e.to_string()));
        }
        match company_reference_error(&db, body.company.as_ref()).await {
            Ok(None) => {}
            Ok(Some(msg)) => return ComputerCreatedResponse::BadRequest(ApiResponse::error(msg)),
            Err(e) => {
                tracing::error!("Failed to check company reference: {:#}", e);
                return ComputerCreatedResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }

        match db.create_computer(&body).await {
            Ok(created) => {
                let location = format!(
                    "{}/computers/{}",
                    API_BASE_PATH,
                    created.id.unwrap_or_default()
                );
                ComputerCreatedResponse::Created(ApiResponse::ok(created), location)
            }
            Err(e) => {
                tracing::error!("Failed to create computer: {:#}", e);
                ComputerCreatedResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Update computer
    ///
    /// Replaces every field; the body id must match the path
    #[oai(path = "/computers/:id", method = "put", tag = "ApiTags::Computers")]
    async fn update_computer(
        &self,
        db: Data<&Arc<Database>>,
        id: Path<i64>,
        body: Json<ComputerDto>,
    ) -> ComputerResponse {
        let id = match check_update_id(id.0, body.id) {
            Ok(id) => id,
            Err(e) => return ComputerResponse::BadRequest(ApiResponse::error(e)),
        };
        match db.computer_exists(id).await {
            Ok(true) => {}
            Ok(false) => {
                return ComputerResponse::BadRequest(ApiResponse::error("Entity not found"))
            }
            Err(e) => {
                tracing::error!("Failed to look up computer {}: {:#}", id, e);
                return ComputerResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }
        if let Err(e) = validate_computer(&body) {
            return ComputerResponse::BadRequest(ApiResponse::error(e.to_string()));
        }
        match company_reference_error(&db, body.company.as_ref()).await {
            Ok(None) => {}
            Ok(Some(msg)) => return ComputerResponse::BadRequest(ApiResponse::error(msg)),
            Err(e) => {
                tracing::error!("Failed to check company reference: {:#}", e);
                return ComputerResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }

        match db.update_computer(&body).await {
            Ok(updated) => ComputerResponse::Ok(ApiResponse::ok(updated)),
            Err(e) => {
                tracing::error!("Failed to update computer {}: {:#}", id, e);
                ComputerResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Partially update computer
    ///
    /// Only fields present in the body change
    #[oai(path = "/computers/:id", method = "patch", tag = "ApiTags::Computers")]
    async fn partial_update_computer(
        &self,
        db: Data<&Arc<Database>>,
        id: Path<i64>,
        body: Json<ComputerPatch>,
    ) -> ComputerResponse {
        let id = match check_update_id(id.0, body.id) {
            Ok(id) => id,
            Err(e) => return ComputerResponse::BadRequest(ApiResponse::error(e)),
        };
        match db.computer_exists(id).await {
            Ok(true) => {}
            Ok(false) => {
                return ComputerResponse::BadRequest(ApiResponse::error("Entity not found"))
            }
            Err(e) => {
                tracing::error!("Failed to look up computer {}: {:#}", id, e);
                return ComputerResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }
        if let Err(e) = validate_computer_patch(&body) {
            return ComputerResponse::BadRequest(ApiResponse::error(e.to_string()));
        }
        match company_reference_error(&db, body.company.as_ref()).await {
            Ok(None) => {}
            Ok(Some(msg)) => return ComputerResponse::BadRequest(ApiResponse::error(msg)),
            Err(e) => {
                tracing::error!("Failed to check company reference: {:#}", e);
                return ComputerResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }

        match db.partial_update_computer(&body).await {
            Ok(Some(updated)) => ComputerResponse::Ok(ApiResponse::ok(updated)),
            Ok(None) => ComputerResponse::NotFound(ApiResponse::error("Computer not found")),
            Err(e) => {
                tracing::error!("Failed to patch computer {}: {:#}", id, e);
                ComputerResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Delete computer
    #[oai(path = "/computers/:id", method = "delete", tag = "ApiTags::Computers")]
    async fn delete_computer(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> DeleteResponse {
        match db.delete_computer(id.0).await {
            Ok(_) => DeleteResponse::NoContent,
            Err(e) => {
                tracing::error!("Failed to delete computer {}: {:#}", id.0, e);
                DeleteResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }
}
