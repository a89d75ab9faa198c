use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 能力分类表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(ColumnDef::new(Categories::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Categories::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Categories::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 能力项表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Competences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Competences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Competences::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Competences::Name).string().not_null())
                    .col(ColumnDef::new(Competences::Description).text().null())
                    .col(
                        ColumnDef::new(Competences::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Competences::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Competences::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    // 分类下仍有能力项时禁止删除分类
                    .foreign_key(
                        ForeignKey::create()
                            .from(Competences::Table, Competences::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 评估表单表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Forms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forms::Title).string().not_null())
                    .col(ColumnDef::new(Forms::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Forms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Forms::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 表单能力项关联表 ====================
        manager
            .create_table(
                Table::create()
                    .table(FormCompetences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormCompetences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormCompetences::FormId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormCompetences::CompetenceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormCompetences::Position)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormCompetences::Table, FormCompetences::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormCompetences::Table, FormCompetences::CompetenceId)
                            .to(Competences::Table, Competences::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_competences_category_id")
                    .table(Competences::Table)
                    .col(Competences::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forms_created_by")
                    .table(Forms::Table)
                    .col(Forms::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_form_competences_form_id")
                    .table(FormCompetences::Table)
                    .col(FormCompetences::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormCompetences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Competences {
    #[sea_orm(iden = "competences")]
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Forms {
    #[sea_orm(iden = "forms")]
    Table,
    Id,
    Title,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormCompetences {
    #[sea_orm(iden = "form_competences")]
    Table,
    Id,
    FormId,
    CompetenceId,
    Position,
}
