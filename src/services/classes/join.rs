use tracing::{info, warn};

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::classes::{entities::Class, requests::JoinClassRequest};

/// 通过加入码认领名册中的学生
///
/// 同名学生中按插入顺序选择第一个未认领者；认领只写入一次，不会转移给其他账号。
pub async fn join_class(
    service: &ClassService,
    identity: &Identity,
    req: JoinClassRequest,
) -> Result<Class> {
    let storage = service.storage();
    let class = service.class_by_code(req.class_code.trim()).await?;

    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();

    let candidates = storage
        .find_students_by_name(class.id, first_name, last_name)
        .await?;

    if candidates.iter().any(|s| s.user_id == Some(identity.id)) {
        return Err(AppError::conflict("You have already joined this class"));
    }

    let Some(student) = candidates.iter().find(|s| !s.is_claimed()) else {
        return if candidates.is_empty() {
            Err(AppError::not_found("Student not found in class"))
        } else {
            Err(AppError::conflict("Student already claimed"))
        };
    };

    // 条件更新失败说明被并发请求抢先认领；唯一索引拦截同一账号的第二条认领
    if !storage.claim_student(student.id, identity.id).await? {
        warn!(
            "Student {} in class {} was claimed concurrently",
            student.id, class.id
        );
        return Err(AppError::conflict("Student already claimed"));
    }

    info!(
        "User {} joined class {} as student {}",
        identity.id, class.id, student.id
    );
    Ok(class)
}

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::classes::{
        entities::Class,
        requests::{AddStudentsRequest, CreateClassRequest, JoinClassRequest},
    };
    use crate::models::students::requests::StudentEntry;
    use crate::services::classes::{ClassService, test_support::*};

    async fn class_with(service: &ClassService, roster: Vec<StudentEntry>) -> Class {
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
                AddStudentsRequest { students: roster },
            )
            .await
            .unwrap();
        class
    }

    fn join(code: &str, first_name: &str, last_name: &str) -> JoinClassRequest {
        JoinClassRequest {
            class_code: code.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_join_is_one_way() {
        let service = service().await;
        let class = class_with(&service, vec![StudentEntry::new("Alice", "Dupont")]).await;

        let joined = service
            .join_class(&student(10), join(&class.code, "Alice", "Dupont"))
            .await
            .unwrap();
        assert_eq!(joined.id, class.id);

        // 另一个账号用同名加入失败，认领不变
        let err = service
            .join_class(&student(11), join(&class.code, "Alice", "Dupont"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

        let roster = service.list_students(class.id).await.unwrap();
        assert_eq!(roster[0].user_id, Some(10));
    }

    #[tokio::test]
    async fn test_double_submission_is_conflict() {
        let service = service().await;
        let class = class_with(
            &service,
            vec![
                StudentEntry::new("Alice", "Dupont"),
                StudentEntry::new("Alice", "Dupont"),
            ],
        )
        .await;

        service
            .join_class(&student(10), join(&class.code, "Alice", "Dupont"))
            .await
            .unwrap();
        let err = service
            .join_class(&student(10), join(&class.code, "Alice", "Dupont"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // 同名时最早创建的学生被认领
        let roster = service.list_students(class.id).await.unwrap();
        assert_eq!(roster[0].user_id, Some(10));
        assert_eq!(roster[1].user_id, None);

        service
            .join_class(&student(11), join(&class.code, "Alice", "Dupont"))
            .await
            .unwrap();
        let roster = service.list_students(class.id).await.unwrap();
        assert_eq!(roster[1].user_id, Some(11));
    }

    #[tokio::test]
    async fn test_unknown_code_and_name() {
        let service = service().await;
        let class = class_with(&service, vec![StudentEntry::new("Alice", "Dupont")]).await;

        let err = service
            .join_class(&student(10), join("ZZZZZZ", "Alice", "Dupont"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .join_class(&student(10), join(&class.code, "Bob", "Martin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
