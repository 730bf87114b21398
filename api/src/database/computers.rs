use super::companies::CompanyDto;
use super::schema::computer;
use super::types::Database;
use crate::criteria::{ComputerCriteria, Criteria, LongFilter};
use crate::pagination::{Page, PageRequest};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Computer row joined with its company's name
#[derive(Debug, Clone, sqlx::FromRow)]
struct ComputerRow {
    id: i64,
    name: String,
    introduced: Option<NaiveDate>,
    removed: Option<NaiveDate>,
    hardware: Option<i32>,
    software: Option<i32>,
    company_id: Option<i64>,
    company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Object)]
#[oai(skip_serializing_if_is_none)]
pub struct ComputerDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<i32>,
    /// Only `company.id` is read on writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyDto>,
}

/// Partial update body: absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Object)]
pub struct ComputerPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub introduced: Option<NaiveDate>,
    pub removed: Option<NaiveDate>,
    pub hardware: Option<i32>,
    pub software: Option<i32>,
    pub company: Option<CompanyDto>,
}

impl From<ComputerRow> for ComputerDto {
    fn from(row: ComputerRow) -> Self {
        let company = row.company_id.map(|id| CompanyDto {
            id: Some(id),
            name: row.company_name.unwrap_or_default(),
        });
        ComputerDto {
            id: Some(row.id),
            name: row.name,
            introduced: row.introduced,
            removed: row.removed,
            hardware: row.hardware,
            software: row.software,
            company,
        }
    }
}

impl ComputerDto {
    pub fn company_id(&self) -> Option<i64> {
        self.company.as_ref().and_then(|c| c.id)
    }

    /// Overlay the fields present in `patch`
    pub fn apply_patch(&mut self, patch: &ComputerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(introduced) = patch.introduced {
            self.introduced = Some(introduced);
        }
        if let Some(removed) = patch.removed {
            self.removed = Some(removed);
        }
        if let Some(hardware) = patch.hardware {
            self.hardware = Some(hardware);
        }
        if let Some(software) = patch.software {
            self.software = Some(software);
        }
        if let Some(company) = &patch.company {
            self.company = Some(company.clone());
        }
    }
}

impl Database {
    pub async fn create_computer(&self, computer: &ComputerDto) -> Result<ComputerDto> {
        tracing::debug!("Request to save Computer: {:?}", computer);
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO computer (name, introduced, removed, hardware, software, company_id)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(&computer.name)
        .bind(computer.introduced)
        .bind(computer.removed)
        .bind(computer.hardware)
        .bind(computer.software)
        .bind(computer.company_id())
        .fetch_one(&self.pool)
        .await?;

        self.get_computer(id)
            .await?
            .ok_or_else(|| anyhow!("Computer {} vanished after insert", id))
    }

    pub async fn update_computer(&self, computer: &ComputerDto) -> Result<ComputerDto> {
        tracing::debug!("Request to update Computer: {:?}", computer);
        let id = computer
            .id
            .ok_or_else(|| anyhow!("Cannot update a computer without an id"))?;

        let result = sqlx::query(
            r#"UPDATE computer SET
                name = ?, introduced = ?, removed = ?, hardware = ?, software = ?, company_id = ?
               WHERE id = ?"#,
        )
        .bind(&computer.name)
        .bind(computer.introduced)
        .bind(computer.removed)
        .bind(computer.hardware)
        .bind(computer.software)
        .bind(computer.company_id())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(anyhow!("Computer {} not found", id));
        }

        self.get_computer(id)
            .await?
            .ok_or_else(|| anyhow!("Computer {} not found", id))
    }

    /// Apply the fields present in `patch`. Returns None if the computer does not exist.
    pub async fn partial_update_computer(
        &self,
        patch: &ComputerPatch,
    ) -> Result<Option<ComputerDto>> {
        tracing::debug!("Request to partially update Computer: {:?}", patch);
        let id = patch
            .id
            .ok_or_else(|| anyhow!("Cannot update a computer without an id"))?;

        let Some(mut existing) = self.get_computer(id).await? else {
            return Ok(None);
        };
        existing.apply_patch(patch);

        self.update_computer(&existing).await.map(Some)
    }

    pub async fn get_computer(&self, id: i64) -> Result<Option<ComputerDto>> {
        tracing::debug!("Request to get Computer: {}", id);
        let criteria = ComputerCriteria {
            id: Some(LongFilter::new().equals(id)),
            ..Default::default()
        };
        let mut found = self.find_computers_by_criteria(&criteria).await?;
        Ok(found.pop())
    }

    pub async fn computer_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM computer WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Returns whether a row was deleted
    pub async fn delete_computer(&self, id: i64) -> Result<bool> {
        tracing::debug!("Request to delete Computer: {}", id);
        let result = sqlx::query("DELETE FROM computer WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_computers_by_criteria(
        &self,
        criteria: &ComputerCriteria,
    ) -> Result<Vec<ComputerDto>> {
        tracing::debug!("find by criteria: {:?}", criteria);
        let spec = criteria.build_specification();
        let rows: Vec<ComputerRow> = self.find_by_specification(&computer::ENTITY, &spec).await?;
        Ok(rows.into_iter().map(ComputerDto::from).collect())
    }

    pub async fn find_computers_page(
        &self,
        criteria: &ComputerCriteria,
        page: &PageRequest,
    ) -> Result<Page<ComputerDto>> {
        tracing::debug!("find by criteria: {:?}, page: {:?}", criteria, page);
        let spec = criteria.build_specification();
        let rows: Page<ComputerRow> = self
            .find_page_by_specification(&computer::ENTITY, &spec, page)
            .await?;
        Ok(rows.map(ComputerDto::from))
    }

    pub async fn count_computers_by_criteria(&self, criteria: &ComputerCriteria) -> Result<i64> {
        tracing::debug!("count by criteria: {:?}", criteria);
        let spec = criteria.build_specification();
        self.count_by_specification(&computer::ENTITY, &spec).await
    }
}
