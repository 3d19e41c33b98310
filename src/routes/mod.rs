pub mod assignments;

pub mod reviews;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use reviews::configure_reviews_routes;
pub use submissions::configure_submissions_routes;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use ts_rs::TS;

use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::Caller;
use crate::models::{ApiResponse, ErrorCode};

/// 注册全部互评路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    configure_assignments_routes(cfg);
    configure_submissions_routes(cfg);
    configure_reviews_routes(cfg);
}

// 从请求扩展中取出调用者
pub(crate) fn require_caller(req: &HttpRequest) -> std::result::Result<Caller, HttpResponse> {
    RequireJWT::extract_caller(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

// 将服务结果转换为统一响应
pub(crate) fn respond<T>(result: Result<T>, message: &str) -> HttpResponse
where
    T: Serialize + TS,
{
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => ApiResponse::from_error(&e),
    }
}
