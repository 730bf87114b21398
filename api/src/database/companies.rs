use super::schema::company;
use super::types::Database;
use crate::criteria::{CompanyCriteria, Criteria, LongFilter};
use crate::pagination::{Page, PageRequest};
use anyhow::{anyhow, Result};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Object)]
#[oai(skip_serializing_if_is_none)]
pub struct CompanyDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// May be omitted when the company is only referenced by id
    #[oai(default)]
    #[serde(default)]
    pub name: String,
}

/// Partial update body: absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Object)]
pub struct CompanyPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Database {
    pub async fn create_company(&self, company: &CompanyDto) -> Result<CompanyDto> {
        tracing::debug!("Request to save Company: {:?}", company);
        let id: i64 = sqlx::query_scalar("INSERT INTO company (name) VALUES (?) RETURNING id")
            .bind(&company.name)
            .fetch_one(&self.pool)
            .await?;

        Ok(CompanyDto {
            id: Some(id),
            name: company.name.clone(),
        })
    }

    pub async fn update_company(&self, company: &CompanyDto) -> Result<CompanyDto> {
        tracing::debug!("Request to update Company: {:?}", company);
        let id = company
            .id
            .ok_or_else(|| anyhow!("Cannot update a company without an id"))?;

        let result = sqlx::query("UPDATE company SET name = ? WHERE id = ?")
            .bind(&company.name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(anyhow!("Company {} not found", id));
        }

        Ok(company.clone())
    }

    /// Apply the fields present in `patch`. Returns None if the company does not exist.
    pub async fn partial_update_company(&self, patch: &CompanyPatch) -> Result<Option<CompanyDto>> {
        tracing::debug!("Request to partially update Company: {:?}", patch);
        let id = patch
            .id
            .ok_or_else(|| anyhow!("Cannot update a company without an id"))?;

        let Some(mut existing) = self.get_company(id).await? else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            existing.name = name.clone();
        }

        self.update_company(&existing).await.map(Some)
    }

    pub async fn get_company(&self, id: i64) -> Result<Option<CompanyDto>> {
        tracing::debug!("Request to get Company: {}", id);
        let criteria = CompanyCriteria {
            id: Some(LongFilter::new().equals(id)),
            ..Default::default()
        };
        let mut found = self.find_companies_by_criteria(&criteria).await?;
        Ok(found.pop())
    }

    pub async fn company_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Returns whether a row was deleted. Computers referencing it lose their company.
    pub async fn delete_company(&self, id: i64) -> Result<bool> {
        tracing::debug!("Request to delete Company: {}", id);
        let result = sqlx::query("DELETE FROM company WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_companies_by_criteria(
        &self,
        criteria: &CompanyCriteria,
    ) -> Result<Vec<CompanyDto>> {
        tracing::debug!("find by criteria: {:?}", criteria);
        let spec = criteria.build_specification();
        self.find_by_specification(&company::ENTITY, &spec).await
    }

    pub async fn find_companies_page(
        &self,
        criteria: &CompanyCriteria,
        page: &PageRequest,
    ) -> Result<Page<CompanyDto>> {
        tracing::debug!("find by criteria: {:?}, page: {:?}", criteria, page);
        let spec = criteria.build_specification();
        self.find_page_by_specification(&company::ENTITY, &spec, page)
            .await
    }

    pub async fn count_companies_by_criteria(&self, criteria: &CompanyCriteria) -> Result<i64> {
        tracing::debug!("count by criteria: {:?}", criteria);
        let spec = criteria.build_specification();
        self.count_by_specification(&company::ENTITY, &spec).await
    }
}

#[cfg(test)]
mod tests;
