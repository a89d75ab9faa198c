use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::ApiResponse;
use crate::models::auth::entities::Identity;
use crate::models::forms::requests::{CreateFormRequest, UpdateFormRequest};
use crate::services::FormService;
use crate::utils::SafeFormIdI64;

pub async fn list_forms(
    service: web::Data<FormService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let forms = service.list_forms(&identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(forms, "Forms retrieved successfully")))
}

pub async fn create_form(
    service: web::Data<FormService>,
    identity: Identity,
    form: web::Json<CreateFormRequest>,
) -> ActixResult<HttpResponse> {
    let form = service.create_form(&identity, form.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(form, "Form created successfully")))
}

pub async fn get_form(
    service: web::Data<FormService>,
    identity: Identity,
    form_id: SafeFormIdI64,
) -> ActixResult<HttpResponse> {
    let form = service.get_form(form_id.0, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(form, "Form retrieved successfully")))
}

pub async fn update_form(
    service: web::Data<FormService>,
    identity: Identity,
    form_id: SafeFormIdI64,
    update: web::Json<UpdateFormRequest>,
) -> ActixResult<HttpResponse> {
    let form = service
        .update_form(form_id.0, &identity, update.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(form, "Form updated successfully")))
}

pub async fn delete_form(
    service: web::Data<FormService>,
    identity: Identity,
    form_id: SafeFormIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_form(form_id.0, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Form deleted successfully")))
}

// 配置路由（表单按创建者隔离）
pub fn configure_forms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/formulaires")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_forms))
                    .route(web::post().to(create_form)),
            )
            .service(
                web::resource("/{form_id}")
                    .route(web::get().to(get_form))
                    .route(web::put().to(update_form))
                    .route(web::delete().to(delete_form)),
            ),
    );
}
