use actix_web::{HttpRequest, HttpResponse, web};

use super::{require_caller, respond};
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::submissions::{requests::SubmitWorkRequest, responses::SubmitWorkResponse};
use crate::services::PeerReviewService;

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    body: web::Json<CreateAssignmentRequest>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.create_assignment(&caller, body.into_inner()).await,
        "作业创建成功",
    )
}

// 获取作业详情
pub async fn get_assignment(
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    respond(service.get_assignment(path.into_inner()).await, "获取成功")
}

// 发布作业
pub async fn publish_assignment(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.publish_assignment(&caller, path.into_inner()).await,
        "作业已发布",
    )
}

// 关闭作业
pub async fn close_assignment(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.close_assignment(&caller, path.into_inner()).await,
        "作业已关闭",
    )
}

// 保存草稿或提交作业
pub async fn submit_work(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
    body: web::Json<SubmitWorkRequest>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let assignment_id = path.into_inner();
    let body = body.into_inner();

    if body.draft {
        let result = service
            .save_draft(&caller, assignment_id, body.content)
            .await
            .map(|submission| SubmitWorkResponse {
                submission,
                allocation: None,
            });
        return respond(result, "草稿已保存");
    }

    respond(
        service.submit_work(&caller, assignment_id, body.content).await,
        "提交成功",
    )
}

// 手动触发评审分配
pub async fn trigger_allocation(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.trigger_allocation(&caller, path.into_inner()).await,
        "分配完成",
    )
}

// 查看分配进度
pub async fn allocation_status(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service.allocation_status(&caller, path.into_inner()).await,
        "获取成功",
    )
}

// 我的评审任务
pub async fn my_review_assignments(
    req: HttpRequest,
    service: web::Data<PeerReviewService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let caller = match require_caller(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    respond(
        service
            .my_review_assignments(&caller, path.into_inner())
            .await,
        "获取成功",
    )
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RequireJWT::default())
            .route("", web::post().to(create_assignment))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}/publish", web::post().to(publish_assignment))
            .route("/{id}/close", web::post().to(close_assignment))
            .route("/{id}/submission", web::post().to(submit_work))
            .route("/{id}/allocate", web::post().to(trigger_allocation))
            .route("/{id}/allocation", web::get().to(allocation_status))
            .route("/{id}/reviews/mine", web::get().to(my_review_assignments)),
    );
}
