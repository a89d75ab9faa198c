use super::ClassService;
use crate::errors::Result;
use crate::models::auth::entities::{Identity, UserRole};
use crate::models::classes::entities::Class;

/// 教师看到自己拥有的班级；学生看到名册中有自己认领记录的班级
pub async fn list_classes_for_identity(
    service: &ClassService,
    identity: &Identity,
) -> Result<Vec<Class>> {
    let storage = service.storage();

    match identity.role {
        UserRole::Teacher => storage.list_classes_by_teacher(identity.id).await,
        UserRole::Student => {
            let mut class_ids: Vec<i64> = storage
                .list_students_by_user(identity.id)
                .await?
                .into_iter()
                .map(|s| s.class_id)
                .collect();
            class_ids.sort_unstable();
            class_ids.dedup();

            storage.list_classes_by_ids(&class_ids).await
        }
    }
}
