use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::ApiResponse;
use crate::models::auth::entities::Identity;
use crate::models::competences::requests::{CreateCompetenceRequest, UpdateCompetenceRequest};
use crate::services::CompetenceService;
use crate::utils::SafeCompetenceIdI64;

pub async fn list_competences(
    service: web::Data<CompetenceService>,
) -> ActixResult<HttpResponse> {
    let competences = service.list_competences().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        competences,
        "Competences retrieved successfully",
    )))
}

pub async fn create_competence(
    service: web::Data<CompetenceService>,
    identity: Identity,
    competence: web::Json<CreateCompetenceRequest>,
) -> ActixResult<HttpResponse> {
    let competence = service
        .create_competence(&identity, competence.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        competence,
        "Competence created successfully",
    )))
}

pub async fn get_competence(
    service: web::Data<CompetenceService>,
    competence_id: SafeCompetenceIdI64,
) -> ActixResult<HttpResponse> {
    let competence = service.get_competence(competence_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        competence,
        "Competence retrieved successfully",
    )))
}

pub async fn update_competence(
    service: web::Data<CompetenceService>,
    competence_id: SafeCompetenceIdI64,
    update: web::Json<UpdateCompetenceRequest>,
) -> ActixResult<HttpResponse> {
    let competence = service
        .update_competence(competence_id.0, update.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        competence,
        "Competence updated successfully",
    )))
}

pub async fn delete_competence(
    service: web::Data<CompetenceService>,
    competence_id: SafeCompetenceIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_competence(competence_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Competence deleted successfully")))
}

// 配置路由
pub fn configure_competences_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/competences")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_competences))
                    .route(web::post().to(create_competence)),
            )
            .service(
                web::resource("/{competence_id}")
                    .route(web::get().to(get_competence))
                    .route(web::put().to(update_competence))
                    .route(web::delete().to(delete_competence)),
            ),
    );
}
