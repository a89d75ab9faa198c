//! 班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes, Model};
use crate::entity::prelude::Students;
use crate::entity::students::Column as StudentColumn;
use crate::errors::{AppError, Result};
use crate::models::classes::{entities::Class, requests::NewClass};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// 批量加载班级名册（学生ID按插入顺序）
pub(super) async fn load_rosters<C: ConnectionTrait>(
    db: &C,
    class_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut rosters: HashMap<i64, Vec<i64>> = HashMap::new();
    if class_ids.is_empty() {
        return Ok(rosters);
    }

    let rows: Vec<(i64, i64)> = Students::find()
        .select_only()
        .column(StudentColumn::ClassId)
        .column(StudentColumn::Id)
        .filter(StudentColumn::ClassId.is_in(class_ids.to_vec()))
        .order_by_asc(StudentColumn::Id)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| AppError::from_db("Failed to load class rosters", e))?;

    for (class_id, student_id) in rows {
        rosters.entry(class_id).or_default().push(student_id);
    }
    Ok(rosters)
}

impl SeaOrmStorage {
    /// 附加名册后转换为业务模型
    async fn attach_rosters(&self, models: Vec<Model>) -> Result<Vec<Class>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut rosters = load_rosters(&self.db, &ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let roster = rosters.remove(&m.id).unwrap_or_default();
                m.into_class(roster)
            })
            .collect())
    }

    async fn attach_roster(&self, model: Option<Model>) -> Result<Option<Class>> {
        match model {
            Some(model) => Ok(self.attach_rosters(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 创建班级
    pub async fn create_class_impl(&self, req: NewClass) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            name: Set(req.name),
            year: Set(req.year),
            code: Set(req.code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 加入码唯一约束冲突会被归类为 Conflict，由服务层重试
        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to create class", e))?;

        Ok(result.into_class(Vec::new()))
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query class: {e}")))?;

        self.attach_roster(result).await
    }

    /// 通过加入码获取班级
    pub async fn get_class_by_code_impl(&self, code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to query class: {e}")))?;

        self.attach_roster(result).await
    }

    /// 检查加入码是否已被占用
    pub async fn class_code_exists_impl(&self, code: &str) -> Result<bool> {
        let count = Classes::find()
            .filter(Column::Code.eq(code))
            .count(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to check class code: {e}")))?;

        Ok(count > 0)
    }

    /// 列出教师拥有的班级
    pub async fn list_classes_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Class>> {
        let models = Classes::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list classes: {e}")))?;

        self.attach_rosters(models).await
    }

    /// 按 ID 批量获取班级
    pub async fn list_classes_by_ids_impl(&self, class_ids: &[i64]) -> Result<Vec<Class>> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Classes::find()
            .filter(Column::Id.is_in(class_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to list classes: {e}")))?;

        self.attach_rosters(models).await
    }

    /// 替换加入码
    pub async fn update_class_code_impl(&self, class_id: i64, code: &str) -> Result<Option<Class>> {
        let now = chrono::Utc::now().timestamp();

        let result = Classes::update_many()
            .col_expr(
                Column::Code,
                sea_orm::sea_query::Expr::value(code.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(class_id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_db("Failed to update class code", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("Failed to delete class: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
