//! 评估表单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::form_competences::Entity")]
    FormCompetences,
}

impl Related<super::form_competences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormCompetences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_form(self, competences: Vec<i64>) -> crate::models::forms::entities::Form {
        use crate::models::forms::entities::Form;

        Form {
            id: self.id,
            title: self.title,
            created_by: self.created_by,
            competences,
            created_at: super::timestamp_to_datetime(self.created_at),
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
