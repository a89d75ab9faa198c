use std::sync::Arc;

use tracing::info;

use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::competences::{
    entities::{Competence, CompetenceWithCategory},
    requests::{CreateCompetenceRequest, UpdateCompetenceRequest},
};
use crate::storage::Storage;
use crate::utils::validate::validate_required;

pub struct CompetenceService {
    storage: Arc<dyn Storage>,
}

impl CompetenceService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn ensure_category(&self, category_id: i64) -> Result<()> {
        match self.storage.get_category_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Category not found")),
        }
    }

    pub async fn list_competences(&self) -> Result<Vec<CompetenceWithCategory>> {
        self.storage.list_competences().await
    }

    pub async fn get_competence(&self, competence_id: i64) -> Result<CompetenceWithCategory> {
        self.storage
            .get_competence_by_id(competence_id)
            .await?
            .ok_or_else(|| AppError::not_found("Competence not found"))
    }

    // 创建能力项，所属分类必须存在
    pub async fn create_competence(
        &self,
        identity: &Identity,
        req: CreateCompetenceRequest,
    ) -> Result<Competence> {
        validate_required(&req.name, "name").map_err(AppError::validation)?;
        self.ensure_category(req.category_id).await?;

        let req = CreateCompetenceRequest {
            name: req.name.trim().to_string(),
            ..req
        };
        let competence = self.storage.create_competence(identity.id, req).await?;

        info!(
            "Competence {} created in category {} by user {}",
            competence.id, competence.category_id, identity.id
        );
        Ok(competence)
    }

    pub async fn update_competence(
        &self,
        competence_id: i64,
        mut req: UpdateCompetenceRequest,
    ) -> Result<Competence> {
        if let Some(name) = req.name.as_deref() {
            validate_required(name, "name").map_err(AppError::validation)?;
            req.name = Some(name.trim().to_string());
        }
        if let Some(category_id) = req.category_id {
            self.ensure_category(category_id).await?;
        }

        self.storage
            .update_competence(competence_id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Competence not found"))
    }

    pub async fn delete_competence(&self, competence_id: i64) -> Result<()> {
        if !self.storage.delete_competence(competence_id).await? {
            return Err(AppError::not_found("Competence not found"));
        }

        info!("Competence {} deleted", competence_id);
        Ok(())
    }
}
