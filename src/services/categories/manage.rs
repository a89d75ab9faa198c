use tracing::info;

use super::CategoryService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::categories::{
    entities::Category,
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use crate::utils::validate::validate_required;

pub async fn create_category(
    service: &CategoryService,
    identity: &Identity,
    req: CreateCategoryRequest,
) -> Result<Category> {
    validate_required(&req.name, "name").map_err(AppError::validation)?;

    let req = CreateCategoryRequest {
        name: req.name.trim().to_string(),
        description: req.description,
    };
    let category = service.storage().create_category(identity.id, req).await?;

    info!("Category {} created by user {}", category.id, identity.id);
    Ok(category)
}

pub async fn update_category(
    service: &CategoryService,
    category_id: i64,
    mut req: UpdateCategoryRequest,
) -> Result<Category> {
    if let Some(name) = req.name.as_deref() {
        validate_required(name, "name").map_err(AppError::validation)?;
        req.name = Some(name.trim().to_string());
    }

    service
        .storage()
        .update_category(category_id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

pub async fn delete_category(service: &CategoryService, category_id: i64) -> Result<()> {
    if !service.storage().delete_category(category_id).await? {
        return Err(AppError::not_found("Category not found"));
    }

    info!("Category {} deleted", category_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::auth::entities::{Identity, UserRole};
    use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
    use crate::models::competences::requests::CreateCompetenceRequest;
    use crate::services::{CategoryService, CompetenceService};
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_category_crud_and_dependents() {
        let storage = memory_storage().await;
        let categories = CategoryService::new(storage.clone());
        let competences = CompetenceService::new(storage);
        let teacher = Identity::new(1, UserRole::Teacher);

        let err = categories
            .create_category(
                &teacher,
                CreateCategoryRequest {
                    name: " ".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let category = categories
            .create_category(
                &teacher,
                CreateCategoryRequest {
                    name: "Lecture".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(category.created_by, 1);

        let competence = competences
            .create_competence(
                &teacher,
                CreateCompetenceRequest {
                    name: "Lire".to_string(),
                    description: None,
                    category_id: category.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            categories
                .list_category_competences(category.id)
                .await
                .unwrap(),
            vec![competence.clone()]
        );

        let err = categories.delete_category(category.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        competences.delete_competence(competence.id).await.unwrap();
        categories.delete_category(category.id).await.unwrap();

        let err = categories.get_category(category.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = categories
            .update_category(category.id, UpdateCategoryRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = categories
            .list_category_competences(category.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
