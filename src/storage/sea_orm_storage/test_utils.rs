//! 存储层单元测试共用的内存库与数据准备

use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::domain::lifecycle::SubmitAction;
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::{CreateAssignmentRequest, CriterionInput},
};
use crate::models::submissions::entities::{Submission, SubmissionStatus};

pub(super) async fn memory_storage() -> SeaOrmStorage {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    SeaOrmStorage::connect(&config)
        .await
        .expect("in-memory storage")
}

/// 已发布的作业，学生 1..=students 均已正式提交
pub(super) async fn published_with_submissions(
    storage: &SeaOrmStorage,
    students: i64,
    reviews_required: i32,
    reviews_per_student: i32,
) -> (Assignment, Vec<Submission>) {
    let req = CreateAssignmentRequest {
        title: "Storage fixture".to_string(),
        description: None,
        max_points: Some(100.0),
        reviews_required: Some(reviews_required),
        reviews_per_student: Some(reviews_per_student),
        anonymous_reviews: Some(true),
        peer_review_enabled: Some(true),
        criteria: vec![CriterionInput {
            name: "Overall".to_string(),
            description: None,
            max_score: 10.0,
            weight: Some(1.0),
        }],
    };
    let created = storage.create_assignment_impl(100, req).await.unwrap();
    let assignment = storage
        .update_assignment_status_impl(
            created.id,
            AssignmentStatus::Draft,
            AssignmentStatus::Published,
        )
        .await
        .unwrap()
        .unwrap();

    let mut submissions = Vec::new();
    for student_id in 1..=students {
        let submission = storage
            .write_submission_impl(
                assignment.id,
                student_id,
                format!("work {student_id}"),
                SubmitAction::Create {
                    status: SubmissionStatus::Submitted,
                },
            )
            .await
            .unwrap()
            .unwrap();
        submissions.push(submission);
    }
    (assignment, submissions)
}
