use tracing::info;

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;

pub async fn delete_class(service: &ClassService, class_id: i64, identity: &Identity) -> Result<()> {
    service.owned_class(class_id, identity).await?;

    if !service.storage().delete_class(class_id).await? {
        return Err(AppError::not_found("Class not found"));
    }

    info!("Class {} deleted by teacher {}", class_id, identity.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::classes::requests::{AddStudentsRequest, CreateClassRequest};
    use crate::models::students::requests::StudentEntry;
    use crate::services::classes::test_support::*;

    #[tokio::test]
    async fn test_only_owner_deletes() {
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
        service
            .add_students(
                class.id,
                &teacher(TEACHER_A),
                AddStudentsRequest {
                    students: vec![StudentEntry::new("Alice", "Dupont")],
                },
            )
            .await
            .unwrap();

        let err = service
            .delete_class(class.id, &teacher(TEACHER_B))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
        assert_eq!(service.list_students(class.id).await.unwrap().len(), 1);

        service.delete_class(class.id, &teacher(TEACHER_A)).await.unwrap();
        let err = service.list_students(class.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .delete_class(class.id, &teacher(TEACHER_A))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
