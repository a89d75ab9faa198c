use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::middlewares::{self, RateLimit};
use crate::models::ApiResponse;
use crate::models::auth::entities::{Identity, UserRole};
use crate::models::classes::requests::{
    AddPendingStudentRequest, AddStudentsRequest, CreateClassRequest, JoinClassRequest,
    SearchStudentsQuery,
};
use crate::services::ClassService;
use crate::utils::{SafeClassCode, SafeClassIdI64};

// HTTP处理程序
pub async fn list_classes(
    service: web::Data<ClassService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let classes = service.list_classes_for_identity(&identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "Classes retrieved successfully")))
}

pub async fn create_class(
    service: web::Data<ClassService>,
    identity: Identity,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    let class = service
        .create_class(&identity, class_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}

pub async fn delete_class(
    service: web::Data<ClassService>,
    identity: Identity,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_class(class_id.0, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
}

pub async fn generate_code(
    service: web::Data<ClassService>,
    identity: Identity,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    let code = service.regenerate_code(class_id.0, &identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(code, "Class code regenerated successfully")))
}

pub async fn add_students(
    service: web::Data<ClassService>,
    identity: Identity,
    class_id: SafeClassIdI64,
    roster: web::Json<AddStudentsRequest>,
) -> ActixResult<HttpResponse> {
    let added = service
        .add_students(class_id.0, &identity, roster.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(added, "Students added successfully")))
}

pub async fn list_students(
    service: web::Data<ClassService>,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    let students = service.list_students(class_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Students retrieved successfully")))
}

pub async fn list_students_by_code(
    service: web::Data<ClassService>,
    code: SafeClassCode,
) -> ActixResult<HttpResponse> {
    let students = service.list_students_by_code(&code.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Students retrieved successfully")))
}

pub async fn search_students(
    service: web::Data<ClassService>,
    query: web::Query<SearchStudentsQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let students = service
        .search_students(query.class_code.trim(), &query.last_name_prefix)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Students retrieved successfully")))
}

pub async fn join_class(
    service: web::Data<ClassService>,
    identity: Identity,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    let class = service.join_class(&identity, join_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class joined successfully")))
}

pub async fn add_pending_student(
    service: web::Data<ClassService>,
    identity: Identity,
    class_id: SafeClassIdI64,
    pending: web::Json<AddPendingStudentRequest>,
) -> ActixResult<HttpResponse> {
    let pending = service
        .add_pending_student(class_id.0, &identity, pending.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        pending,
        "Pending student added successfully",
    )))
}

pub async fn list_pending_students(
    service: web::Data<ClassService>,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    let pending = service.list_pending_students(class_id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        pending,
        "Pending students retrieved successfully",
    )))
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    let rate_limit = &AppConfig::get().rate_limit;

    // 固定路径必须注册在 /{class_id} 之前
    cfg.service(
        web::scope("/api/classes")
            .service(
                // 教师查看自己的班级，学生查看已加入的班级
                web::resource("")
                    .route(web::get().to(list_classes).wrap(middlewares::RequireJWT))
                    .route(
                        web::post()
                            .to(create_class)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                // 教师与学生均可认领名册条目
                web::resource("/join").route(
                    web::post()
                        .to(join_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::all_roles()))
                        .wrap(middlewares::RequireJWT),
                ),
            )
            .service(
                // 匿名访问，按客户端限流
                web::resource("/students-by-code/{class_code}")
                    .wrap(RateLimit::class_code_lookup(rate_limit))
                    .route(web::get().to(list_students_by_code)),
            )
            .service(
                web::resource("/search-students")
                    .wrap(RateLimit::student_search(rate_limit))
                    .route(web::get().to(search_students)),
            )
            .service(
                web::resource("/{class_id}").route(
                    web::delete()
                        .to(delete_class)
                        .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
                        .wrap(middlewares::RequireJWT),
                ),
            )
            .service(
                web::resource("/{class_id}/generate-code").route(
                    web::post()
                        .to(generate_code)
                        .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
                        .wrap(middlewares::RequireJWT),
                ),
            )
            .service(
                web::resource("/{class_id}/students")
                    .route(web::get().to(list_students))
                    .route(
                        web::post()
                            .to(add_students)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/{class_id}/add-pending-student").route(
                    web::post()
                        .to(add_pending_student)
                        .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
                        .wrap(middlewares::RequireJWT),
                ),
            )
            .service(
                web::resource("/{class_id}/pending-students").route(
                    web::get()
                        .to(list_pending_students)
                        .wrap(middlewares::RequireRole::new_any(UserRole::all_roles()))
                        .wrap(middlewares::RequireJWT),
                ),
            ),
    );
}
