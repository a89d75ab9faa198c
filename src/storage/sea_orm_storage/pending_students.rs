//! 待注册学生存储操作

use super::SeaOrmStorage;
use crate::entity::pending_students::{ActiveModel, Column, Entity as PendingStudents};
use crate::errors::{AppError, Result};
use crate::models::students::entities::PendingStudent;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 添加待注册学生
    pub async fn add_pending_student_impl(
        &self,
        class_id: i64,
        name: &str,
        email: &str,
    ) -> Result<PendingStudent> {
        let model = ActiveModel {
            class_id: Set(class_id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to add pending student", e))?;

        Ok(result.into_pending_student())
    }

    /// 列出班级的待注册学生
    pub async fn list_pending_students_impl(&self, class_id: i64) -> Result<Vec<PendingStudent>> {
        let models = PendingStudents::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AppError::database_operation(format!("Failed to list pending students: {e}"))
            })?;

        Ok(models.into_iter().map(|m| m.into_pending_student()).collect())
    }
}
