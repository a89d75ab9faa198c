use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{CategoryService, ClassService, CompetenceService, FormService};
use crate::storage::Storage;
use crate::utils::{CodeGenerator, JwtUtils};
use actix_web::web;
use std::sync::Arc;
use tracing::{debug, warn};

/// 服务器运行所需的共享状态，注册到 actix 的 app_data
#[derive(Clone)]
pub struct StartupContext {
    pub jwt: web::Data<JwtUtils>,
    pub classes: web::Data<ClassService>,
    pub categories: web::Data<CategoryService>,
    pub competences: web::Data<CompetenceService>,
    pub forms: web::Data<FormService>,
}

impl StartupContext {
    /// 基于已就绪的存储构建服务
    pub fn from_storage(storage: Arc<dyn Storage>, config: &AppConfig) -> Self {
        let codes = CodeGenerator::from_config(&config.class_code);
        debug!(
            "Class code strategy: {:?}, max attempts: {}",
            codes.strategy(),
            codes.max_attempts()
        );

        Self {
            jwt: web::Data::new(JwtUtils::new(&config.jwt)),
            classes: web::Data::new(ClassService::new(storage.clone(), codes)),
            categories: web::Data::new(CategoryService::new(storage.clone())),
            competences: web::Data::new(CompetenceService::new(storage.clone())),
            forms: web::Data::new(FormService::new(storage)),
        }
    }

    /// 注册共享状态
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.jwt.clone())
            .app_data(self.classes.clone())
            .app_data(self.categories.clone())
            .app_data(self.competences.clone())
            .app_data(self.forms.clone());
    }
}

/// 准备服务器启动的上下文
/// 包括存储连接、数据库迁移和服务实例
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    Ok(StartupContext::from_storage(storage, config))
}
