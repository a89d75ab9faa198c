use tracing::{info, warn};

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::middlewares::authorize;
use crate::models::auth::entities::{Identity, UserRole};
use crate::models::classes::{
    entities::Class,
    requests::{CreateClassRequest, NewClass},
};
use crate::utils::validate::validate_required;

pub async fn create_class(
    service: &ClassService,
    identity: &Identity,
    req: CreateClassRequest,
) -> Result<Class> {
    authorize(Some(identity), &UserRole::Teacher)?;

    validate_required(&req.name, "name").map_err(AppError::validation)?;
    validate_required(&req.year, "year").map_err(AppError::validation)?;

    let storage = service.storage();
    let codes = service.codes();

    // 预检查之后仍可能与并发请求撞码，唯一索引冲突时重新生成
    for attempt in 1..=codes.max_attempts() {
        let code = codes
            .generate_unique(|candidate| {
                let storage = storage.clone();
                async move { storage.class_code_exists(&candidate).await }
            })
            .await?;

        let new_class = NewClass {
            teacher_id: identity.id,
            name: req.name.trim().to_string(),
            year: req.year.trim().to_string(),
            code,
        };

        match storage.create_class(new_class).await {
            Ok(class) => {
                info!(
                    "Class {} ({}) created by teacher {}",
                    class.id, class.name, identity.id
                );
                return Ok(class);
            }
            Err(AppError::Conflict(msg)) => {
                warn!("Class code collision on attempt {}: {}", attempt, msg);
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::code_space_exhausted(
        "Unable to allocate a unique class code",
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::errors::AppError;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::services::classes::test_support::*;

    fn math() -> CreateClassRequest {
        CreateClassRequest {
            name: "Math".to_string(),
            year: "2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_teacher_creates_class_with_code() {
        let service = service().await;
        let class = service.create_class(&teacher(TEACHER_A), math()).await.unwrap();

        assert_eq!(class.teacher_id, TEACHER_A);
        assert_eq!(class.name, "Math");
        assert_eq!(class.code.len(), 6);
        assert!(class.students.is_empty());
    }

    #[tokio::test]
    async fn test_codes_are_unique_across_classes() {
        let service = service().await;
        let mut codes = HashSet::new();
        for _ in 0..50 {
            let class = service.create_class(&teacher(TEACHER_A), math()).await.unwrap();
            assert!(codes.insert(class.code));
        }
    }

    #[tokio::test]
    async fn test_student_cannot_create_class() {
        let service = service().await;
        let err = service.create_class(&student(10), math()).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let service = service().await;
        let err = service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "  ".to_string(),
                    year: "2024".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "Math".to_string(),
                    year: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_collision_triggers_retry() {
        let storage = CollidingStorage::new(2).await;
        let service = service_with(storage.clone(), 3);

        let class = service.create_class(&teacher(TEACHER_A), math()).await.unwrap();
        assert_eq!(storage.code_writes(), 3);
        assert_eq!(
            service
                .list_classes_for_identity(&teacher(TEACHER_A))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(class.code.len(), 6);
    }

    #[tokio::test]
    async fn test_persistent_collisions_exhaust_code_space() {
        let storage = CollidingStorage::new(2).await;
        let service = service_with(storage.clone(), 2);

        let err = service.create_class(&teacher(TEACHER_A), math()).await.unwrap_err();
        assert!(matches!(err, AppError::CodeSpaceExhausted(_)), "got {err:?}");
        assert_eq!(storage.code_writes(), 2);
        assert!(
            service
                .list_classes_for_identity(&teacher(TEACHER_A))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
