//! 能力项存储操作

use super::SeaOrmStorage;
use crate::entity::competences::{ActiveModel, Column, Entity as Competences, Model};
use crate::entity::prelude::{Categories, CategoryModel};
use crate::errors::{AppError, Result};
use crate::models::competences::{
    entities::{Competence, CompetenceWithCategory},
    requests::{CreateCompetenceRequest, UpdateCompetenceRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::warn;

fn with_category(
    competence: Model,
    category: Option<CategoryModel>,
) -> Option<CompetenceWithCategory> {
    match category {
        Some(category) => Some(CompetenceWithCategory {
            competence: competence.into_competence(),
            category: category.into_category(),
        }),
        None => {
            // 外键保证分类存在，这里只记录异常数据
            warn!(
                "Competence {} references missing category {}",
                competence.id, competence.category_id
            );
            None
        }
    }
}

impl SeaOrmStorage {
    /// 创建能力项
    pub async fn create_competence_impl(
        &self,
        created_by: i64,
        req: CreateCompetenceRequest,
    ) -> Result<Competence> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            category_id: Set(req.category_id),
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
            .map_err(|e| AppError::from_db("Failed to create competence", e))?;

        Ok(result.into_competence())
    }

    /// 通过 ID 获取能力项（附带分类）
    pub async fn get_competence_by_id_impl(
        &self,
        competence_id: i64,
    ) -> Result<Option<CompetenceWithCategory>> {
        let result = Competences::find_by_id(competence_id)
            .find_also_related(Categories)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query competence: {e}")))?;

        Ok(result.and_then(|(competence, category)| with_category(competence, category)))
    }

    /// 列出所有能力项（附带分类）
    pub async fn list_competences_impl(&self) -> Result<Vec<CompetenceWithCategory>> {
        let rows = Competences::find()
            .find_also_related(Categories)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list competences: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(competence, category)| with_category(competence, category))
            .collect())
    }

    /// 列出分类下的能力项
    pub async fn list_competences_by_category_impl(
        &self,
        category_id: i64,
    ) -> Result<Vec<Competence>> {
        let models = Competences::find()
            .filter(Column::CategoryId.eq(category_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list competences: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_competence()).collect())
    }

    /// 按 ID 批量获取能力项
    pub async fn list_competences_by_ids_impl(
        &self,
        competence_ids: &[i64],
    ) -> Result<Vec<Competence>> {
        if competence_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Competences::find()
            .filter(Column::Id.is_in(competence_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list competences: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_competence()).collect())
    }

    /// 更新能力项，未提供的字段保持不变
    pub async fn update_competence_impl(
        &self,
        competence_id: i64,
        update: UpdateCompetenceRequest,
    ) -> Result<Option<Competence>> {
        let Some(existing) = Competences::find_by_id(competence_id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query competence: {e}")))?
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
        if let Some(category_id) = update.category_id {
            model.category_id = Set(category_id);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to update competence", e))?;

        Ok(Some(result.into_competence()))
    }

    /// 删除能力项（表单中的引用随之级联删除）
    pub async fn delete_competence_impl(&self, competence_id: i64) -> Result<bool> {
        let result = Competences::delete_by_id(competence_id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to delete competence", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::categories::requests::CreateCategoryRequest;
    use crate::models::competences::requests::{CreateCompetenceRequest, UpdateCompetenceRequest};
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_competence_carries_category() {
        let storage = memory_storage().await;
        let category = storage
            .create_category(
                7,
                CreateCategoryRequest {
                    name: "Ecriture".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let competence = storage
            .create_competence(
                7,
                CreateCompetenceRequest {
                    name: "Rediger une phrase".to_string(),
                    description: Some("Majuscule et point".to_string()),
                    category_id: category.id,
                },
            )
            .await
            .unwrap();

        let loaded = storage
            .get_competence_by_id(competence.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.competence, competence);
        assert_eq!(loaded.category, category);

        let all = storage.list_competences().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            storage
                .list_competences_by_category(category.id)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(storage.get_competence_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let storage = memory_storage().await;
        let err = storage
            .create_competence(
                1,
                CreateCompetenceRequest {
                    name: "Orpheline".to_string(),
                    description: None,
                    category_id: 404,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

        assert!(
            storage
                .update_competence(404, UpdateCompetenceRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
