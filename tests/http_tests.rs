mod common;

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use common::*;
use rust_peer_review::config::AppConfig;
use rust_peer_review::routes;
use rust_peer_review::services::PeerReviewService;
use rust_peer_review::utils::jwt::{ACCESS_TOKEN_TYPE, JwtUtils};

fn bearer(user_id: i64, role: &str) -> (&'static str, String) {
    let token = JwtUtils::generate_token_with_secret(
        user_id,
        role,
        ACCESS_TOKEN_TYPE,
        chrono::Duration::minutes(5),
        &AppConfig::get().jwt.secret,
    )
    .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

async fn service() -> web::Data<PeerReviewService> {
    let storage = memory_storage().await;
    web::Data::new(PeerReviewService::new(
        storage,
        Arc::new(RecordingNotifier::default()),
        &peer_review_config(true),
    ))
}

fn assignment_body() -> Value {
    json!({
        "title": "Lab report",
        "reviews_required": 1,
        "reviews_per_student": 1,
        "criteria": [
            { "name": "Method", "max_score": 10.0, "weight": 1.0 },
            { "name": "Results", "max_score": 10.0, "weight": 2.0 }
        ]
    })
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = test::init_service(App::new().app_data(service().await).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .set_json(assignment_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_student_cannot_create_assignment() {
    let app = test::init_service(App::new().app_data(service().await).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(bearer(1, "user"))
        .set_json(assignment_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_full_flow_over_http() {
    let app = test::init_service(App::new().app_data(service().await).configure(routes::configure)).await;
    let teacher = bearer(INSTRUCTOR_ID, "teacher");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(teacher.clone())
        .set_json(assignment_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    let assignment_id = body["data"]["id"].as_i64().unwrap();
    let criteria: Vec<i64> = body["data"]["criteria"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/publish"))
        .insert_header(teacher.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "published");

    for student_id in [1, 2] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submission"))
            .insert_header(bearer(student_id, "user"))
            .set_json(json!({ "content": format!("report {student_id}") }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{assignment_id}/reviews/mine"))
        .insert_header(bearer(2, "user"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let task = &body["data"][0];
    let review_id = task["review_id"].as_i64().unwrap();
    let submission_id = task["submission_id"].as_i64().unwrap();
    assert!(task["author_id"].is_null());

    let review = json!({
        "scores": [
            { "criterion_id": criteria[0], "score": 8.0 },
            { "criterion_id": criteria[1], "score": 6.0 }
        ],
        "feedback": { "comment": "clear methodology" }
    });
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/reviews/{review_id}/submit"))
        .insert_header(bearer(2, "user"))
        .set_json(&review)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_score"], 66.67);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/reviews/{review_id}/submit"))
        .insert_header(bearer(2, "user"))
        .set_json(&review)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
        .insert_header(teacher.clone())
        .set_json(json!({ "score": 90.0 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["final_score"], 83.0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{submission_id}/reviews"))
        .insert_header(bearer(1, "user"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(body["data"][0]["reviewer_id"].is_null());
}

#[actix_web::test]
async fn test_unknown_resources_return_not_found() {
    let app = test::init_service(App::new().app_data(service().await).configure(routes::configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/submissions/4242")
        .insert_header(bearer(1, "user"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_submit_response_does_not_reveal_reviewers() {
    let app = test::init_service(App::new().app_data(service().await).configure(routes::configure)).await;
    let teacher = bearer(INSTRUCTOR_ID, "teacher");

    let mut body = assignment_body();
    body["anonymous_reviews"] = json!(true);
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(teacher.clone())
        .set_json(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/publish"))
        .insert_header(teacher.clone())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/submission"))
        .insert_header(bearer(1, "user"))
        .set_json(json!({ "content": "report 1" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["allocation"]["skipped"], "not_enough_submissions");

    // 第二份提交触发分配：学生 1 与学生 2 互评
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/submission"))
        .insert_header(bearer(2, "user"))
        .set_json(json!({ "content": "report 2" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["submission"]["status"], "in_review");
    assert_eq!(body["data"]["allocation"]["created"], 2);
    assert_eq!(body["data"]["allocation"]["under_reviewed"], 0);

    let raw = body.to_string();
    assert!(!raw.contains("reviewer_id"));
    assert!(!raw.contains("\"created\":["));

    // 教师触发分配仍能拿到完整配对
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/allocate"))
        .insert_header(teacher)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["created"].as_array().unwrap().is_empty());
}
