//! 能力分类存储操作

use super::SeaOrmStorage;
use crate::entity::categories::{ActiveModel, Column, Entity as Categories};
use crate::entity::competences::Column as CompetenceColumn;
use crate::entity::prelude::Competences;
use crate::errors::{AppError, Result};
use crate::models::categories::{
    entities::Category,
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建分类
    pub async fn create_category_impl(
        &self,
        created_by: i64,
        req: CreateCategoryRequest,
    ) -> Result<Category> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to create category", e))?;

        Ok(result.into_category())
    }

    /// 通过 ID 获取分类
    pub async fn get_category_by_id_impl(&self, category_id: i64) -> Result<Option<Category>> {
        let result = Categories::find_by_id(category_id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query category: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    /// 列出所有分类
    pub async fn list_categories_impl(&self) -> Result<Vec<Category>> {
        let models = Categories::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list categories: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_category()).collect())
    }

    /// 更新分类，未提供的字段保持不变
    pub async fn update_category_impl(
        &self,
        category_id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        let Some(existing) = Categories::find_by_id(category_id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query category: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to update category", e))?;

        Ok(Some(result.into_category()))
    }

    /// 删除分类
    ///
    /// 引用计数与删除在同一事务中完成；外键 RESTRICT 兜底并发插入的能力项。
    pub async fn delete_category_impl(&self, category_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let dependents = Competences::find()
            .filter(CompetenceColumn::CategoryId.eq(category_id))
            .count(&txn)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to count competences: {e}")))?;

        if dependents > 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::database_operation(format!("Failed to roll back: {e}")))?;
            return Err(AppError::conflict(format!(
                "Category is still referenced by {dependents} competence(s)"
            )));
        }

        let result = Categories::delete_by_id(category_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::from_db("Failed to delete category", e))?;

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to commit deletion: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
    use crate::models::competences::requests::CreateCompetenceRequest;
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_delete_category_with_competence_conflicts() {
        let storage = memory_storage().await;
        let category = storage
            .create_category(
                1,
                CreateCategoryRequest {
                    name: "Lecture".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let competence = storage
            .create_competence(
                1,
                CreateCompetenceRequest {
                    name: "Lire un texte".to_string(),
                    description: None,
                    category_id: category.id,
                },
            )
            .await
            .unwrap();

        let err = storage.delete_category(category.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(storage.get_category_by_id(category.id).await.unwrap().is_some());

        assert!(storage.delete_competence(competence.id).await.unwrap());
        assert!(storage.delete_category(category.id).await.unwrap());
        assert!(storage.get_category_by_id(category.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_fields() {
        let storage = memory_storage().await;
        let category = storage
            .create_category(
                1,
                CreateCategoryRequest {
                    name: "Calcul".to_string(),
                    description: Some("Nombres".to_string()),
                },
            )
            .await
            .unwrap();

        let updated = storage
            .update_category(
                category.id,
                UpdateCategoryRequest {
                    name: Some("Calcul mental".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Calcul mental");
        assert_eq!(updated.description.as_deref(), Some("Nombres"));

        assert!(
            storage
                .update_category(999, UpdateCategoryRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
