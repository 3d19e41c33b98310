use actix_web::{HttpRequest, HttpResponse, web};

use super::{require_caller, respond};
use crate::middlewares::RequireJWT;
use crate::models::peer_reviews::requests::{RateHelpfulnessRequest, SubmitReviewRequest};
use crate::services::PeerReviewService;

// 提交评审
pub async fn submit_review(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
    body: web::Json<SubmitReviewRequest>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service
            .submit_review(&caller, path.into_inner(), body.into_inner())
            .await,
        "评审提交成功",
    )
}

// 评价评审质量
pub async fn rate_helpfulness(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
    body: web::Json<RateHelpfulnessRequest>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service
            .rate_helpfulness(&caller, path.into_inner(), body.rating)
            .await,
        "评价已保存",
    )
}

// 配置路由
pub fn configure_reviews_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reviews")
            .wrap(RequireJWT::default())
            .route("/{id}/submit", web::post().to(submit_review))
            .route("/{id}/helpfulness", web::put().to(rate_helpfulness)),
    );
}
