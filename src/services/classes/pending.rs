use tracing::info;

use super::ClassService;
use crate::errors::{AppError, Result};
use crate::models::auth::entities::Identity;
use crate::models::classes::requests::AddPendingStudentRequest;
use crate::models::students::entities::PendingStudent;
use crate::utils::validate::{validate_email, validate_required};

pub async fn add_pending_student(
    service: &ClassService,
    class_id: i64,
    identity: &Identity,
    req: AddPendingStudentRequest,
) -> Result<PendingStudent> {
    service.owned_class(class_id, identity).await?;

    validate_required(&req.name, "name").map_err(AppError::validation)?;
    let email = req.email.trim();
    validate_email(email).map_err(AppError::validation)?;

    let pending = service
        .storage()
        .add_pending_student(class_id, req.name.trim(), email)
        .await?;

    info!("Pending student {} added to class {}", pending.id, class_id);
    Ok(pending)
}

pub async fn list_pending_students(
    service: &ClassService,
    class_id: i64,
) -> Result<Vec<PendingStudent>> {
    service.existing_class(class_id).await?;
    service.storage().list_pending_students(class_id).await
}
