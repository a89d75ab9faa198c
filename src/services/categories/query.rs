use super::CategoryService;
use crate::errors::{AppError, Result};
use crate::models::categories::entities::Category;
use crate::models::competences::entities::Competence;

pub async fn list_categories(service: &CategoryService) -> Result<Vec<Category>> {
    service.storage().list_categories().await
}

pub async fn get_category(service: &CategoryService, category_id: i64) -> Result<Category> {
    service
        .storage()
        .get_category_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

pub async fn list_category_competences(
    service: &CategoryService,
    category_id: i64,
) -> Result<Vec<Competence>> {
    get_category(service, category_id).await?;
    service
        .storage()
        .list_competences_by_category(category_id)
        .await
}
