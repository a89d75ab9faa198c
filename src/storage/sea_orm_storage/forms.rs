//! 评估表单存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::form_competences::{
    ActiveModel as FormCompetenceActiveModel, Column as FormCompetenceColumn,
    Entity as FormCompetences,
};
use crate::entity::forms::{ActiveModel, Column, Entity as Forms, Model};
use crate::errors::{AppError, Result};
use crate::models::forms::{
    entities::Form,
    requests::{CreateFormRequest, UpdateFormRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;

/// 批量加载表单的能力项ID（按 position 排序）
async fn load_competence_ids<C: ConnectionTrait>(
    db: &C,
    form_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
    if form_ids.is_empty() {
        return Ok(links);
    }

    let rows: Vec<(i64, i64)> = FormCompetences::find()
        .select_only()
        .column(FormCompetenceColumn::FormId)
        .column(FormCompetenceColumn::CompetenceId)
        .filter(FormCompetenceColumn::FormId.is_in(form_ids.to_vec()))
        .order_by_asc(FormCompetenceColumn::FormId)
        .order_by_asc(FormCompetenceColumn::Position)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| AppError::from_db("Failed to load form competences", e))?;

    for (form_id, competence_id) in rows {
        links.entry(form_id).or_default().push(competence_id);
    }
    Ok(links)
}

/// 用给定顺序替换表单的能力项
async fn replace_competences(
    txn: &DatabaseTransaction,
    form_id: i64,
    competence_ids: &[i64],
) -> std::result::Result<(), sea_orm::DbErr> {
    FormCompetences::delete_many()
        .filter(FormCompetenceColumn::FormId.eq(form_id))
        .exec(txn)
        .await?;

    for (position, competence_id) in competence_ids.iter().enumerate() {
        FormCompetenceActiveModel {
            form_id: Set(form_id),
            competence_id: Set(*competence_id),
            position: Set(position as i32),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!("Failed to roll back form transaction: {}", e);
    }
}

impl SeaOrmStorage {
    async fn attach_competences(&self, models: Vec<Model>) -> Result<Vec<Form>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut links = load_competence_ids(&self.db, &ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let competences = links.remove(&m.id).unwrap_or_default();
                m.into_form(competences)
            })
            .collect())
    }

    /// 创建表单及其能力项关联
    pub async fn create_form_impl(&self, created_by: i64, req: CreateFormRequest) -> Result<Form> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let model = ActiveModel {
            title: Set(req.title),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = match model.insert(&txn).await {
            Ok(inserted) => inserted,
            Err(e) => {
                rollback(txn).await;
                return Err(AppError::from_db("Failed to create form", e));
            }
        };

        if let Err(e) = replace_competences(&txn, inserted.id, &req.competences).await {
            rollback(txn).await;
            return Err(AppError::from_db("Failed to link form competences", e));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to commit form: {e}")))?;

        Ok(inserted.into_form(req.competences))
    }

    /// 通过 ID 获取表单
    pub async fn get_form_by_id_impl(&self, form_id: i64) -> Result<Option<Form>> {
        let result = Forms::find_by_id(form_id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query form: {e}")))?;

        match result {
            Some(model) => Ok(self.attach_competences(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 列出用户创建的表单
    pub async fn list_forms_by_creator_impl(&self, created_by: i64) -> Result<Vec<Form>> {
        let models = Forms::find()
            .filter(Column::CreatedBy.eq(created_by))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list forms: {e}")))?;

        self.attach_competences(models).await
    }

    /// 更新表单；提供 competences 时整体替换
    pub async fn update_form_impl(
        &self,
        form_id: i64,
        update: UpdateFormRequest,
    ) -> Result<Option<Form>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let existing = match Forms::find_by_id(form_id).one(&txn).await {
            Ok(Some(existing)) => existing,
            Ok(None) => {
                rollback(txn).await;
                return Ok(None);
            }
            Err(e) => {
                rollback(txn).await;
                return Err(AppError::database_operation(format!(
                    "Failed to query form: {e}"
                )));
            }
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Err(e) = model.update(&txn).await {
            rollback(txn).await;
            return Err(AppError::from_db("Failed to update form", e));
        }

        if let Some(competences) = update.competences.as_deref() {
            if let Err(e) = replace_competences(&txn, form_id, competences).await {
                rollback(txn).await;
                return Err(AppError::from_db("Failed to link form competences", e));
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to commit form: {e}")))?;

        self.get_form_by_id_impl(form_id).await
    }

    /// 删除表单（关联随之级联删除）
    pub async fn delete_form_impl(&self, form_id: i64) -> Result<bool> {
        let result = Forms::delete_by_id(form_id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to delete form: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::categories::requests::CreateCategoryRequest;
    use crate::models::competences::requests::CreateCompetenceRequest;
    use crate::models::forms::requests::{CreateFormRequest, UpdateFormRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;
    use std::sync::Arc;

    async fn seed_competences(storage: &Arc<dyn Storage>, count: usize) -> Vec<i64> {
        let category = storage
            .create_category(
                1,
                CreateCategoryRequest {
                    name: "Sciences".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        let mut ids = Vec::new();
        for i in 0..count {
            let competence = storage
                .create_competence(
                    1,
                    CreateCompetenceRequest {
                        name: format!("Competence {i}"),
                        description: None,
                        category_id: category.id,
                    },
                )
                .await
                .unwrap();
            ids.push(competence.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_form_keeps_competence_order() {
        let storage = memory_storage().await;
        let ids = seed_competences(&storage, 3).await;
        let order = vec![ids[2], ids[0], ids[1]];

        let form = storage
            .create_form(
                1,
                CreateFormRequest {
                    title: "Bilan".to_string(),
                    competences: order.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(form.competences, order);

        let loaded = storage.get_form_by_id(form.id).await.unwrap().unwrap();
        assert_eq!(loaded.competences, order);
        assert_eq!(storage.list_forms_by_creator(1).await.unwrap().len(), 1);
        assert!(storage.list_forms_by_creator(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_competences() {
        let storage = memory_storage().await;
        let ids = seed_competences(&storage, 3).await;
        let form = storage
            .create_form(
                1,
                CreateFormRequest {
                    title: "Bilan".to_string(),
                    competences: ids.clone(),
                },
            )
            .await
            .unwrap();

        // 只改标题时保留能力项
        let renamed = storage
            .update_form(
                form.id,
                UpdateFormRequest {
                    title: Some("Bilan final".to_string()),
                    competences: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "Bilan final");
        assert_eq!(renamed.competences, ids);

        let replaced = storage
            .update_form(
                form.id,
                UpdateFormRequest {
                    title: None,
                    competences: Some(vec![ids[1]]),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.competences, vec![ids[1]]);

        // 删除能力项后表单中的引用随之消失
        storage.delete_competence(ids[1]).await.unwrap();
        let loaded = storage.get_form_by_id(form.id).await.unwrap().unwrap();
        assert!(loaded.competences.is_empty());

        assert!(storage.delete_form(form.id).await.unwrap());
        assert!(
            storage
                .update_form(form.id, UpdateFormRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unknown_competence_rolls_back_form() {
        let storage = memory_storage().await;
        let result = storage
            .create_form(
                1,
                CreateFormRequest {
                    title: "Cassé".to_string(),
                    competences: vec![404],
                },
            )
            .await;
        assert!(result.is_err());
        assert!(storage.list_forms_by_creator(1).await.unwrap().is_empty());
    }
}
