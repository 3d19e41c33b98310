use actix_web::{HttpRequest, HttpResponse, web};

use super::{require_caller, respond};
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::services::PeerReviewService;

// 获取提交详情
pub async fn get_submission(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.get_submission(&caller, path.into_inner()).await,
        "获取成功",
    )
}

// 教师评分
pub async fn grade_submission(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service
            .grade_submission(&caller, path.into_inner(), body.into_inner())
            .await,
        "评分成功",
    )
}

// 提交收到的评审
pub async fn received_reviews(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.received_reviews(&caller, path.into_inner()).await,
        "获取成功",
    )
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(RequireJWT::default())
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}/grade", web::post().to(grade_submission))
            .route("/{id}/reviews", web::get().to(received_reviews)),
    );
}
