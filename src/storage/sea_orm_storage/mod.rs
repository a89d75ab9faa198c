//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod categories;
mod classes;
mod competences;
mod forms;
mod pending_students;
mod students;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{AppError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AppError::database_operation(format!("Database migration failed: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AppError::database_connection(format!("SQLite connection failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AppError::database_connection(format!("Unable to connect to database: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AppError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite file path"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    categories::{
        entities::Category,
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    classes::{entities::Class, requests::NewClass},
    competences::{
        entities::{Competence, CompetenceWithCategory},
        requests::{CreateCompetenceRequest, UpdateCompetenceRequest},
    },
    forms::{
        entities::Form,
        requests::{CreateFormRequest, UpdateFormRequest},
    },
    students::{
        entities::{PendingStudent, Student},
        requests::StudentEntry,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 班级模块
    async fn create_class(&self, class: NewClass) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(code).await
    }

    async fn class_code_exists(&self, code: &str) -> Result<bool> {
        self.class_code_exists_impl(code).await
    }

    async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<Class>> {
        self.list_classes_by_teacher_impl(teacher_id).await
    }

    async fn list_classes_by_ids(&self, class_ids: &[i64]) -> Result<Vec<Class>> {
        self.list_classes_by_ids_impl(class_ids).await
    }

    async fn update_class_code(&self, class_id: i64, code: &str) -> Result<Option<Class>> {
        self.update_class_code_impl(class_id, code).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 名册模块
    async fn create_students(
        &self,
        class_id: i64,
        entries: Vec<StudentEntry>,
    ) -> Result<Vec<Student>> {
        self.create_students_impl(class_id, entries).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn list_students_by_user(&self, user_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_user_impl(user_id).await
    }

    async fn find_students_by_name(
        &self,
        class_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Student>> {
        self.find_students_by_name_impl(class_id, first_name, last_name)
            .await
    }

    async fn claim_student(&self, student_id: i64, user_id: i64) -> Result<bool> {
        self.claim_student_impl(student_id, user_id).await
    }

    // 待注册学生模块
    async fn add_pending_student(
        &self,
        class_id: i64,
        name: &str,
        email: &str,
    ) -> Result<PendingStudent> {
        self.add_pending_student_impl(class_id, name, email).await
    }

    async fn list_pending_students(&self, class_id: i64) -> Result<Vec<PendingStudent>> {
        self.list_pending_students_impl(class_id).await
    }

    // 能力分类模块
    async fn create_category(
        &self,
        created_by: i64,
        category: CreateCategoryRequest,
    ) -> Result<Category> {
        self.create_category_impl(created_by, category).await
    }

    async fn get_category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        self.get_category_by_id_impl(category_id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.list_categories_impl().await
    }

    async fn update_category(
        &self,
        category_id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        self.update_category_impl(category_id, update).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<bool> {
        self.delete_category_impl(category_id).await
    }

    // 能力项模块
    async fn create_competence(
        &self,
        created_by: i64,
        competence: CreateCompetenceRequest,
    ) -> Result<Competence> {
        self.create_competence_impl(created_by, competence).await
    }

    async fn get_competence_by_id(
        &self,
        competence_id: i64,
    ) -> Result<Option<CompetenceWithCategory>> {
        self.get_competence_by_id_impl(competence_id).await
    }

    async fn list_competences(&self) -> Result<Vec<CompetenceWithCategory>> {
        self.list_competences_impl().await
    }

    async fn list_competences_by_category(&self, category_id: i64) -> Result<Vec<Competence>> {
        self.list_competences_by_category_impl(category_id).await
    }

    async fn list_competences_by_ids(&self, competence_ids: &[i64]) -> Result<Vec<Competence>> {
        self.list_competences_by_ids_impl(competence_ids).await
    }

    async fn update_competence(
        &self,
        competence_id: i64,
        update: UpdateCompetenceRequest,
    ) -> Result<Option<Competence>> {
        self.update_competence_impl(competence_id, update).await
    }

    async fn delete_competence(&self, competence_id: i64) -> Result<bool> {
        self.delete_competence_impl(competence_id).await
    }

    // 评估表单模块
    async fn create_form(&self, created_by: i64, form: CreateFormRequest) -> Result<Form> {
        self.create_form_impl(created_by, form).await
    }

    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>> {
        self.get_form_by_id_impl(form_id).await
    }

    async fn list_forms_by_creator(&self, created_by: i64) -> Result<Vec<Form>> {
        self.list_forms_by_creator_impl(created_by).await
    }

    async fn update_form(&self, form_id: i64, update: UpdateFormRequest) -> Result<Option<Form>> {
        self.update_form_impl(form_id, update).await
    }

    async fn delete_form(&self, form_id: i64) -> Result<bool> {
        self.delete_form_impl(form_id).await
    }
}

/// 测试用的内存 SQLite 存储
#[cfg(test)]
pub(crate) async fn memory_storage() -> std::sync::Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    std::sync::Arc::new(
        SeaOrmStorage::connect(&config)
            .await
            .expect("in-memory storage"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("classroom.db").unwrap(),
            "sqlite://classroom.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite://:memory:?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(matches!(
            SeaOrmStorage::build_database_url("ftp://nope"),
            Err(AppError::DatabaseConfig(_))
        ));
    }
}
