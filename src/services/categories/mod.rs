pub mod manage;
pub mod query;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::entities::Identity;
use crate::models::categories::{
    entities::Category,
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use crate::models::competences::entities::Competence;
use crate::storage::Storage;

pub struct CategoryService {
    storage: Arc<dyn Storage>,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        query::list_categories(self).await
    }

    pub async fn get_category(&self, category_id: i64) -> Result<Category> {
        query::get_category(self, category_id).await
    }

    // 列出分类下的能力项
    pub async fn list_category_competences(&self, category_id: i64) -> Result<Vec<Competence>> {
        query::list_category_competences(self, category_id).await
    }

    pub async fn create_category(
        &self,
        identity: &Identity,
        req: CreateCategoryRequest,
    ) -> Result<Category> {
        manage::create_category(self, identity, req).await
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        req: UpdateCategoryRequest,
    ) -> Result<Category> {
        manage::update_category(self, category_id, req).await
    }

    // 仍被能力项引用时返回 Conflict
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        manage::delete_category(self, category_id).await
    }
}
