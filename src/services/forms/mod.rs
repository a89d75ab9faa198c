//! 评估表单服务
//!
//! 表单按创建者隔离：其他用户的表单一律视为不存在。

use std::sync::Arc;

use tracing::info;

use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::forms::{
    entities::{Form, FormWithCompetences},
    requests::{CreateFormRequest, UpdateFormRequest},
};
use crate::storage::Storage;
use crate::utils::validate::validate_required;

pub struct FormService {
    storage: Arc<dyn Storage>,
}

impl FormService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn owned_form(&self, form_id: i64, identity: &Identity) -> Result<Form> {
        match self.storage.get_form_by_id(form_id).await? {
            Some(form) if form.created_by == identity.id => Ok(form),
            _ => Err(AppError::not_found("Form not found")),
        }
    }

    /// 所有能力项ID都必须存在
    async fn ensure_competences(&self, competence_ids: &[i64]) -> Result<()> {
        let found = self.storage.list_competences_by_ids(competence_ids).await?;
        let missing: Vec<String> = competence_ids
            .iter()
            .filter(|id| !found.iter().any(|c| c.id == **id))
            .map(|id| id.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Unknown competence id(s): {}",
                missing.join(", ")
            )));
        }

        let mut unique = competence_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != competence_ids.len() {
            return Err(AppError::validation("Competence ids must not repeat"));
        }
        Ok(())
    }

    async fn populate(&self, form: Form) -> Result<FormWithCompetences> {
        let catalog = self.storage.list_competences_by_ids(&form.competences).await?;
        Ok(FormWithCompetences::from_form(form, &catalog))
    }

    // 列出调用者创建的表单（能力项已展开）
    pub async fn list_forms(&self, identity: &Identity) -> Result<Vec<FormWithCompetences>> {
        let forms = self.storage.list_forms_by_creator(identity.id).await?;

        let mut ids: Vec<i64> = forms
            .iter()
            .flat_map(|f| f.competences.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let catalog = self.storage.list_competences_by_ids(&ids).await?;

        Ok(forms
            .into_iter()
            .map(|form| FormWithCompetences::from_form(form, &catalog))
            .collect())
    }

    pub async fn get_form(&self, form_id: i64, identity: &Identity) -> Result<FormWithCompetences> {
        let form = self.owned_form(form_id, identity).await?;
        self.populate(form).await
    }

    pub async fn create_form(
        &self,
        identity: &Identity,
        req: CreateFormRequest,
    ) -> Result<FormWithCompetences> {
        validate_required(&req.title, "title").map_err(AppError::validation)?;
        self.ensure_competences(&req.competences).await?;

        let req = CreateFormRequest {
            title: req.title.trim().to_string(),
            ..req
        };
        let form = self.storage.create_form(identity.id, req).await?;

        info!("Form {} created by user {}", form.id, identity.id);
        self.populate(form).await
    }

    pub async fn update_form(
        &self,
        form_id: i64,
        identity: &Identity,
        mut req: UpdateFormRequest,
    ) -> Result<FormWithCompetences> {
        self.owned_form(form_id, identity).await?;

        if let Some(title) = req.title.as_deref() {
            validate_required(title, "title").map_err(AppError::validation)?;
            req.title = Some(title.trim().to_string());
        }
        if let Some(competences) = req.competences.as_deref() {
            self.ensure_competences(competences).await?;
        }

        let form = self
            .storage
            .update_form(form_id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Form not found"))?;
        self.populate(form).await
    }

    pub async fn delete_form(&self, form_id: i64, identity: &Identity) -> Result<()> {
        self.owned_form(form_id, identity).await?;

        if !self.storage.delete_form(form_id).await? {
            return Err(AppError::not_found("Form not found"));
        }

        info!("Form {} deleted by user {}", form_id, identity.id);
        Ok(())
    }
}
