use super::API_BASE_PATH;
use super::common::{
    check_update_id, query_params, ApiResponse, ApiTags, CountResponse, DeleteResponse,
};
use crate::criteria::parse_company_criteria;
use crate::database::schema::company;
use crate::database::{CompanyDto, CompanyPatch, Database};
use crate::pagination::{link_header, PageRequest};
use crate::validation::{validate_company, validate_name};
use poem::web::Data;
use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi};
use std::sync::Arc;

pub struct CompaniesApi;

#[derive(poem_openapi::ApiResponse)]
enum CompanyListResponse {
    #[oai(status = 200)]
    Ok(
        Json<ApiResponse<Vec<CompanyDto>>>,
        #[oai(header = "X-Total-Count")] i64,
        #[oai(header = "Link")] String,
    ),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum CompanyResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<CompanyDto>>),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 404)]
    NotFound(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum CompanyCreatedResponse {
    #[oai(status = 201)]
    Created(
        Json<ApiResponse<CompanyDto>>,
        #[oai(header = "Location")] String,
    ),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[OpenApi]
impl CompaniesApi {
    /// List companies
    ///
    /// Filters with `field.operation=value` parameters, pages with `page`, `size` and `sort`
    #[oai(path = "/companies", method = "get", tag = "ApiTags::Companies")]
    async fn get_all_companies(
        &self,
        db: Data<&Arc<Database>>,
        req: &Request,
    ) -> CompanyListResponse {
        let params = match query_params(req) {
            Ok(p) => p,
            Err(e) => return CompanyListResponse::BadRequest(ApiResponse::error(e)),
        };
        let criteria = match parse_company_criteria(&params) {
            Ok(c) => c,
            Err(e) => return CompanyListResponse::BadRequest(ApiResponse::error(e)),
        };
        let page_request =
            match PageRequest::from_params(&params, &company::ENTITY.sort_properties()) {
                Ok(p) => p,
                Err(e) => return CompanyListResponse::BadRequest(ApiResponse::error(e)),
            };

        match db.find_companies_page(&criteria, &page_request).await {
            Ok(page) => {
                let link = link_header(&format!("{}/companies", API_BASE_PATH), &params, &page);
                let total = page.total_elements;
                CompanyListResponse::Ok(ApiResponse::ok(page.content), total, link)
            }
            Err(e) => {
                tracing::error!("Failed to list companies: {:#}", e);
                CompanyListResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Count companies
    #[oai(path = "/companies/count", method = "get", tag = "ApiTags::Companies")]
    async fn count_companies(&self, db: Data<&Arc<Database>>, req: &Request) -> CountResponse {
        let criteria = match query_params(req).and_then(|p| parse_company_criteria(&p)) {
            Ok(c) => c,
            Err(e) => return CountResponse::BadRequest(ApiResponse::error(e)),
        };

        match db.count_companies_by_criteria(&criteria).await {
            Ok(count) => CountResponse::Ok(ApiResponse::ok(count)),
            Err(e) => {
                tracing::error!("Failed to count companies: {:#}", e);
                CountResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Get company
    #[oai(path = "/companies/:id", method = "get", tag = "ApiTags::Companies")]
    async fn get_company(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> CompanyResponse {
        match db.get_company(id.0).await {
            Ok(Some(company)) => CompanyResponse::Ok(ApiResponse::ok(company)),
            Ok(None) => CompanyResponse::NotFound(ApiResponse::error("Company not found")),
            Err(e) => {
                tracing::error!("Failed to get company {}: {:#}", id.0, e);
                CompanyResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Create company
    #[oai(path = "/companies", method = "post", tag = "ApiTags::Companies")]
    async fn create_company(
        &self,
        db: Data<&Arc<Database>>,
        body: Json<CompanyDto>,
    ) -> CompanyCreatedResponse {
        if body.id.is_some() {
            return CompanyCreatedResponse::BadRequest(ApiResponse::error(
                "A new company cannot already have an ID",
            ));
        }
        if let Err(e) = validate_company(&body) {
            return CompanyCreatedResponse::BadRequest(ApiResponse::error(e.to_string()));
        }

        match db.create_company(&body).await {
            Ok(created) => {
                let location = format!(
                    "{}/companies/{}",
                    API_BASE_PATH,
                    created.id.unwrap_or_default()
                );
                CompanyCreatedResponse::Created(ApiResponse::ok(created), location)
            }
            Err(e) => {
                tracing::error!("Failed to create company: {:#}", e);
                CompanyCreatedResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Update company
    #[oai(path = "/companies/:id", method = "put", tag = "ApiTags::Companies")]
    async fn update_company(
        &self,
        db: Data<&Arc<Database>>,
        id: Path<i64>,
        body: Json<CompanyDto>,
    ) -> CompanyResponse {
        let id = match check_update_id(id.0, body.id) {
            Ok(id) => id,
            Err(e) => return CompanyResponse::BadRequest(ApiResponse::error(e)),
        };
        match db.company_exists(id).await {
            Ok(true) => {}
            Ok(false) => return CompanyResponse::BadRequest(ApiResponse::error("Entity not found")),
            Err(e) => {
                tracing::error!("Failed to look up company {}: {:#}", id, e);
                return CompanyResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }
        if let Err(e) = validate_company(&body) {
            return CompanyResponse::BadRequest(ApiResponse::error(e.to_string()));
        }

        match db.update_company(&body).await {
            Ok(updated) => CompanyResponse::Ok(ApiResponse::ok(updated)),
            Err(e) => {
                tracing::error!("Failed to update company {}: {:#}", id, e);
                CompanyResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Partially update company
    #[oai(path = "/companies/:id", method = "patch", tag = "ApiTags::Companies")]
    async fn partial_update_company(
        &self,
        db: Data<&Arc<Database>>,
        id: Path<i64>,
        body: Json<CompanyPatch>,
    ) -> CompanyResponse {
        let id = match check_update_id(id.0, body.id) {
            Ok(id) => id,
            Err(e) => return CompanyResponse::BadRequest(ApiResponse::error(e)),
        };
        match db.company_exists(id).await {
            Ok(true) => {}
            Ok(false) => return CompanyResponse::BadRequest(ApiResponse::error("Entity not found")),
            Err(e) => {
                tracing::error!("Failed to look up company {}: {:#}", id, e);
                return CompanyResponse::InternalError(ApiResponse::error(e.to_string()));
            }
        }
        if let Some(name) = &body.name {
            if let Err(e) = validate_name(name) {
                return CompanyResponse::BadRequest(ApiResponse::error(e.to_string()));
            }
        }

        match db.partial_update_company(&body).await {
            Ok(Some(updated)) => CompanyResponse::Ok(ApiResponse::ok(updated)),
            Ok(None) => CompanyResponse::NotFound(ApiResponse::error("Company not found")),
            Err(e) => {
                tracing::error!("Failed to patch company {}: {:#}", id, e);
                CompanyResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }

    /// Delete company
    ///
    /// Computers made by the company are kept and lose their company
    #[oai(path = "/companies/:id", method = "delete", tag = "ApiTags::Companies")]
    async fn delete_company(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> DeleteResponse {
        match db.delete_company(id.0).await {
            Ok(_) => DeleteResponse::NoContent,
            Err(e) => {
                tracing::error!("Failed to delete company {}: {:#}", id.0, e);
                DeleteResponse::InternalError(ApiResponse::error(e.to_string()))
            }
        }
    }
}
