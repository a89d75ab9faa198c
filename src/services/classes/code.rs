use tracing::{info, warn};

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::classes::responses::ClassCodeResponse;

pub async fn regenerate_code(
    service: &ClassService,
    class_id: i64,
    identity: &Identity,
) -> Result<ClassCodeResponse> {
    service.owned_class(class_id, identity).await?;

    let storage = service.storage();
    let codes = service.codes();

    for attempt in 1..=codes.max_attempts() {
        let code = codes
            .generate_unique(|candidate| {
                let storage = storage.clone();
                async move { storage.class_code_exists(&candidate).await }
            })
            .await?;

        match storage.update_class_code(class_id, &code).await {
            Ok(Some(class)) => {
                info!("Class {} code regenerated by teacher {}", class.id, identity.id);
                return Ok(ClassCodeResponse { code: class.code });
            }
            // 所有权校验之后班级被并发删除
            Ok(None) => return Err(AppError::not_found("Class not found")),
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
    use crate::errors::AppError;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::services::classes::test_support::*;

    #[tokio::test]
    async fn test_owner_regenerates_code() {
        let service = service().await;
        let class = service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "Math".to_string(),
                    year: "2024".to_string(),
                },
            )
            .await
            .unwrap();

        let response = service
            .regenerate_code(class.id, &teacher(TEACHER_A))
            .await
            .unwrap();
        assert_ne!(response.code, class.code);

        // 旧码失效，新码可用
        assert!(service.list_students_by_code(&class.code).await.is_err());
        assert!(service.list_students_by_code(&response.code).await.is_ok());
    }

    #[tokio::test]
    async fn test_regenerate_requires_owner() {
        let service = service().await;
        let class = service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "Math".to_string(),
                    year: "2024".to_string(),
                },
            )
            .await
            .unwrap();

        let err = service
            .regenerate_code(class.id, &teacher(TEACHER_B))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        let err = service
            .regenerate_code(999, &teacher(TEACHER_A))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_regenerate_retries_on_store_collision() {
        // 创建班级消耗的写入不冲突，之后的两次改码冲突
        let storage = CollidingStorage::new(0).await;
        let service = service_with(storage.clone(), 3);
        let class = service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "Math".to_string(),
                    year: "2024".to_string(),
                },
            )
            .await
            .unwrap();

        storage.inject_collisions(2);
        let response = service
            .regenerate_code(class.id, &teacher(TEACHER_A))
            .await
            .unwrap();
        assert_eq!(storage.code_writes(), 4);
        assert!(service.list_students_by_code(&response.code).await.is_ok());

        storage.inject_collisions(3);
        let err = service
            .regenerate_code(class.id, &teacher(TEACHER_A))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeSpaceExhausted(_)), "got {err:?}");
        // 加入码保持上一次成功写入的值
        assert!(service.list_students_by_code(&response.code).await.is_ok());
    }
}
