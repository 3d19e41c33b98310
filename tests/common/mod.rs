#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rust_peer_review::config::{DatabaseConfig, PeerReviewConfig};
use rust_peer_review::errors::{PeerReviewError, Result};
use rust_peer_review::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, CriterionInput},
};
use rust_peer_review::models::peer_reviews::{
    entities::ReviewFeedback,
    requests::{CriteriaScoreInput, SubmitReviewRequest},
};
use rust_peer_review::models::submissions::entities::Submission;
use rust_peer_review::models::users::entities::{Caller, UserRole};
use rust_peer_review::services::{Notifier, PeerReviewService};
use rust_peer_review::storage::{Storage, sea_orm_storage::SeaOrmStorage};

pub const INSTRUCTOR_ID: i64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    ReviewerAssigned { reviewer_id: i64, submission_id: i64 },
    ReviewReceived { student_id: i64, submission_id: i64 },
    Graded { student_id: i64, submission_id: i64, final_score: f64 },
}

/// 记录所有通知
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, event: Sent) {
        self.sent.lock().unwrap().push(event);
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_reviewer_assigned(&self, reviewer_id: i64, submission_id: i64) -> Result<()> {
        self.push(Sent::ReviewerAssigned {
            reviewer_id,
            submission_id,
        });
        Ok(())
    }

    async fn notify_review_received(&self, student_id: i64, submission_id: i64) -> Result<()> {
        self.push(Sent::ReviewReceived {
            student_id,
            submission_id,
        });
        Ok(())
    }

    async fn notify_graded(&self, student_id: i64, submission_id: i64, final_score: f64) -> Result<()> {
        self.push(Sent::Graded {
            student_id,
            submission_id,
            final_score,
        });
        Ok(())
    }
}

/// 每次投递都失败
pub struct FailingNotifier;

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn notify_reviewer_assigned(&self, _reviewer_id: i64, _submission_id: i64) -> Result<()> {
        Err(PeerReviewError::database_connection("mail relay unreachable"))
    }

    async fn notify_review_received(&self, _student_id: i64, _submission_id: i64) -> Result<()> {
        Err(PeerReviewError::database_connection("mail relay unreachable"))
    }

    async fn notify_graded(
        &self,
        _student_id: i64,
        _submission_id: i64,
        _final_score: f64,
    ) -> Result<()> {
        Err(PeerReviewError::database_connection("mail relay unreachable"))
    }
}

pub struct Harness {
    pub service: PeerReviewService,
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn memory_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    Arc::new(
        SeaOrmStorage::connect(&config)
            .await
            .expect("in-memory storage"),
    )
}

pub fn peer_review_config(auto_allocate: bool) -> PeerReviewConfig {
    PeerReviewConfig {
        auto_allocate_on_submit: auto_allocate,
        lock_registry_capacity: 4,
    }
}

pub async fn harness(auto_allocate: bool) -> Harness {
    let storage = memory_storage().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let service = PeerReviewService::new(
        storage.clone(),
        notifier.clone(),
        &peer_review_config(auto_allocate),
    );
    Harness {
        service,
        storage,
        notifier,
    }
}

pub fn instructor() -> Caller {
    Caller::new(INSTRUCTOR_ID, UserRole::Teacher)
}

pub fn student(user_id: i64) -> Caller {
    Caller::new(user_id, UserRole::User)
}

pub fn criterion(name: &str, max_score: f64, weight: f64) -> CriterionInput {
    CriterionInput {
        name: name.to_string(),
        description: None,
        max_score,
        weight: Some(weight),
    }
}

pub fn assignment_request(
    reviews_required: i32,
    reviews_per_student: i32,
    anonymous: bool,
    criteria: Vec<CriterionInput>,
) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: "Essay on distributed consensus".to_string(),
        description: None,
        max_points: Some(100.0),
        reviews_required: Some(reviews_required),
        reviews_per_student: Some(reviews_per_student),
        anonymous_reviews: Some(anonymous),
        peer_review_enabled: Some(true),
        criteria,
    }
}

/// 创建并发布作业
pub async fn published(service: &PeerReviewService, req: CreateAssignmentRequest) -> Assignment {
    let created = service
        .create_assignment(&instructor(), req)
        .await
        .expect("create assignment");
    service
        .publish_assignment(&instructor(), created.id)
        .await
        .expect("publish assignment")
}

/// 两个维度：A 满分 10 权重 1，B 满分 10 权重 2
pub fn two_criteria() -> Vec<CriterionInput> {
    vec![criterion("Clarity", 10.0, 1.0), criterion("Rigor", 10.0, 2.0)]
}

pub async fn submit(service: &PeerReviewService, assignment_id: i64, user_id: i64) -> Submission {
    service
        .submit_work(
            &student(user_id),
            assignment_id,
            format!("work of student {user_id}"),
        )
        .await
        .expect("submit work")
        .submission
}

pub fn review_request(assignment: &Assignment, scores: &[f64]) -> SubmitReviewRequest {
    SubmitReviewRequest {
        scores: assignment
            .criteria
            .iter()
            .zip(scores)
            .map(|(c, score)| CriteriaScoreInput {
                criterion_id: c.id,
                score: *score,
                comment: None,
            })
            .collect(),
        feedback: ReviewFeedback {
            comment: Some("solid argument".to_string()),
            strengths: None,
            improvements: None,
        },
    }
}
