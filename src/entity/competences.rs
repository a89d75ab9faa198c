//! 能力项实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "competences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::form_competences::Entity")]
    FormCompetences,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::form_competences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormCompetences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_competence(self) -> crate::models::competences::entities::Competence {
        use crate::models::competences::entities::Competence;

        Competence {
            id: self.id,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            created_by: self.created_by,
            created_at: super::timestamp_to_datetime(self.created_at),
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
