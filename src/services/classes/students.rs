use tracing::info;

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::classes::{requests::AddStudentsRequest, responses::AddStudentsResponse};
use crate::models::students::{
    entities::{Student, StudentName, StudentSummary},
    requests::StudentEntry,
};
use crate::utils::validate::validate_required;

/// 批量添加学生：先校验全部条目，再在单个事务中写入
pub async fn add_students(
    service: &ClassService,
    class_id: i64,
    identity: &Identity,
    req: AddStudentsRequest,
) -> Result<AddStudentsResponse> {
    service.owned_class(class_id, identity).await?;

    if req.students.is_empty() {
        return Err(AppError::validation("students must not be empty"));
    }

    let mut entries = Vec::with_capacity(req.students.len());
    for (index, entry) in req.students.into_iter().enumerate() {
        validate_required(&entry.first_name, "firstName")
            .and_then(|_| validate_required(&entry.last_name, "lastName"))
            .map_err(|msg| AppError::validation(format!("students[{index}]: {msg}")))?;
        entries.push(StudentEntry::new(entry.first_name.trim(), entry.last_name.trim()));
    }

    let storage = service.storage();
    let students = storage.create_students(class_id, entries).await?;
    let class = service.existing_class(class_id).await?;

    info!(
        "{} student(s) added to class {} by teacher {}",
        students.len(),
        class_id,
        identity.id
    );
    Ok(AddStudentsResponse { class, students })
}

pub async fn list_students(service: &ClassService, class_id: i64) -> Result<Vec<Student>> {
    service.existing_class(class_id).await?;
    service.storage().list_students_by_class(class_id).await
}

/// 匿名查询：只返回尚未认领的学生姓名
pub async fn list_students_by_code(service: &ClassService, code: &str) -> Result<Vec<StudentName>> {
    let class = service.class_by_code(code).await?;

    Ok(service
        .storage()
        .list_students_by_class(class.id)
        .await?
        .into_iter()
        .filter(|s| !s.is_claimed())
        .map(StudentName::from)
        .collect())
}

/// 姓氏前缀搜索，忽略大小写；空前缀返回整个名册
pub async fn search_students(
    service: &ClassService,
    code: &str,
    last_name_prefix: &str,
) -> Result<Vec<StudentSummary>> {
    let class = service.class_by_code(code).await?;
    let prefix = last_name_prefix.trim().to_lowercase();

    Ok(service
        .storage()
        .list_students_by_class(class.id)
        .await?
        .into_iter()
        .filter(|s| s.last_name.to_lowercase().starts_with(&prefix))
        .map(StudentSummary::from)
        .collect())
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

    async fn math(service: &ClassService) -> Class {
        service
            .create_class(
                &teacher(TEACHER_A),
                CreateClassRequest {
                    name: "Math".to_string(),
                    year: "2024".to_string(),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_students_returns_roster() {
        let service = service().await;
        let class = math(&service).await;

        let response = service
            .add_students(
                class.id,
                &teacher(TEACHER_A),
                AddStudentsRequest {
                    students: vec![
                        StudentEntry::new(" Alice ", "Dupont"),
                        StudentEntry::new("Bob", "Martin"),
                    ],
                },
            )
            .await
            .unwrap();

        assert_eq!(response.students.len(), 2);
        assert_eq!(response.students[0].first_name, "Alice");
        assert_eq!(
            response.class.students,
            response.students.iter().map(|s| s.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_invalid_entry_writes_nothing() {
        let service = service().await;
        let class = math(&service).await;

        let err = service
            .add_students(
                class.id,
                &teacher(TEACHER_A),
                AddStudentsRequest {
                    students: vec![
                        StudentEntry::new("Alice", "Dupont"),
                        StudentEntry::new("", "Martin"),
                    ],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list_students(class.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_cannot_add_students() {
        let service = service().await;
        let class = math(&service).await;

        let err = service
            .add_students(
                class.id,
                &teacher(TEACHER_B),
                AddStudentsRequest {
                    students: vec![StudentEntry::new("Alice", "Dupont")],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_lookups_by_code() {
        let service = service().await;
        let class = math(&service).await;
        service
            .add_students(
                class.id,
                &teacher(TEACHER_A),
                AddStudentsRequest {
                    students: vec![
                        StudentEntry::new("Alice", "Dupont"),
                        StudentEntry::new("Bob", "Durand"),
                        StudentEntry::new("Chloe", "Martin"),
                    ],
                },
            )
            .await
            .unwrap();
        service
            .join_class(
                &student(10),
                JoinClassRequest {
                    class_code: class.code.clone(),
                    first_name: "Alice".to_string(),
                    last_name: "Dupont".to_string(),
                },
            )
            .await
            .unwrap();

        let unclaimed = service.list_students_by_code(&class.code).await.unwrap();
        assert_eq!(unclaimed.len(), 2);
        assert!(unclaimed.iter().all(|s| s.first_name != "Alice"));

        let found = service.search_students(&class.code, "du").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].last_name, "Dupont");
        assert_eq!(service.search_students(&class.code, "").await.unwrap().len(), 3);

        let err = service.search_students("NOPE00", "du").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
