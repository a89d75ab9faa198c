use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::ApiResponse;
use crate::models::auth::entities::Identity;
use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::services::CategoryService;
use crate::utils::SafeCategoryIdI64;

pub async fn list_categories(service: web::Data<CategoryService>) -> ActixResult<HttpResponse> {
    let categories = service.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        categories,
        "Categories retrieved successfully",
    )))
}

pub async fn create_category(
    service: web::Data<CategoryService>,
    identity: Identity,
    category: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    let category = service
        .create_category(&identity, category.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        category,
        "Category created successfully",
    )))
}

pub async fn get_category(
    service: web::Data<CategoryService>,
    category_id: SafeCategoryIdI64,
) -> ActixResult<HttpResponse> {
    let category = service.get_category(category_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        category,
        "Category retrieved successfully",
    )))
}

pub async fn update_category(
    service: web::Data<CategoryService>,
    category_id: SafeCategoryIdI64,
    update: web::Json<UpdateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    let category = service
        .update_category(category_id.0, update.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        category,
        "Category updated successfully",
    )))
}

pub async fn delete_category(
    service: web::Data<CategoryService>,
    category_id: SafeCategoryIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_category(category_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Category deleted successfully")))
}

pub async fn list_category_competences(
    service: web::Data<CategoryService>,
    category_id: SafeCategoryIdI64,
) -> ActixResult<HttpResponse> {
    let competences = service.list_category_competences(category_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        competences,
        "Competences retrieved successfully",
    )))
}

// 配置路由
pub fn configure_categories_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/categories")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_categories))
                    .route(web::post().to(create_category)),
            )
            .service(
                web::resource("/{category_id}")
                    .route(web::get().to(get_category))
                    .route(web::put().to(update_category))
                    .route(web::delete().to(delete_category)),
            )
            .service(
                web::resource("/{category_id}/competences")
                    .route(web::get().to(list_category_competences)),
            ),
    );
}
