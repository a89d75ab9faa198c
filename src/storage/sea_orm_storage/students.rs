//! 学生名册存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{AppError, Result};
use crate::models::students::{entities::Student, requests::StudentEntry};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 在单个事务中批量创建学生，任一失败则全部回滚
    pub async fn create_students_impl(
        &self,
        class_id: i64,
        entries: Vec<StudentEntry>,
    ) -> Result<Vec<Student>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            let model = ActiveModel {
                class_id: Set(class_id),
                first_name: Set(entry.first_name),
                last_name: Set(entry.last_name),
                user_id: Set(None),
                created_at: Set(now),
                ..Default::default()
            };

            let inserted = match model.insert(&txn).await {
                Ok(inserted) => inserted,
                Err(e) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!("Failed to roll back student creation: {}", rollback_err);
                    }
                    return Err(AppError::from_db("Failed to create student", e));
                }
            };
            created.push(inserted.into_student());
        }

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to commit students: {e}")))?;

        Ok(created)
    }

    /// 列出班级名册
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let models = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list students: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_student()).collect())
    }

    /// 列出账号认领的学生
    pub async fn list_students_by_user_impl(&self, user_id: i64) -> Result<Vec<Student>> {
        let models = Students::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list students: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_student()).collect())
    }

    /// 按姓名查找学生
    pub async fn find_students_by_name_impl(
        &self,
        class_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Student>> {
        let models = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::FirstName.eq(first_name))
            .filter(Column::LastName.eq(last_name))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to find students: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_student()).collect())
    }

    /// 条件更新：仅当 user_id 为空时写入
    ///
    /// 同一账号在同一班级重复认领会触发 (class_id, user_id) 唯一约束，归类为 Conflict。
    pub async fn claim_student_impl(&self, student_id: i64, user_id: i64) -> Result<bool> {
        let result = Students::update_many()
            .col_expr(Column::UserId, sea_orm::sea_query::Expr::value(user_id))
            .filter(Column::Id.eq(student_id))
            .filter(Column::UserId.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to claim student", e))?;

        Ok(result.rows_affected > 0)
    }
}
