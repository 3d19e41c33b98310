use serde::Serialize;
use ts_rs::TS;

use super::entities::{CriteriaScore, PeerReview, ReviewFeedback};
use crate::models::assignments::entities::Criterion;
use crate::models::submissions::entities::SubmissionStatus;

/// 本轮未执行分配的原因
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub enum AllocationSkipReason {
    AssignmentNotPublished,
    PeerReviewDisabled,
    NotEnoughSubmissions,
}

/// 候选评审人不足、未达到目标评审数的提交
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct UnderReviewed {
    pub submission_id: i64,
    pub existing: i32,
    pub required: i32,
}

/// 一轮分配的结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct AllocationOutcome {
    pub created: Vec<PeerReview>,
    pub under_reviewed: Vec<UnderReviewed>,
    pub skipped: Option<AllocationSkipReason>,
}

impl AllocationOutcome {
    pub fn skipped(reason: AllocationSkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Default::default()
        }
    }
}

/// 学生提交后看到的分配摘要，只含数量，不暴露任何配对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct AllocationSummary {
    pub created: usize,
    pub under_reviewed: usize,
    pub skipped: Option<AllocationSkipReason>,
}

impl From<&AllocationOutcome> for AllocationSummary {
    fn from(outcome: &AllocationOutcome) -> Self {
        Self {
            created: outcome.created.len(),
            under_reviewed: outcome.under_reviewed.len(),
            skipped: outcome.skipped,
        }
    }
}

/// 分配进度（教师视角）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct AllocationStatusItem {
    pub submission_id: i64,
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub assigned: i32,
    pub completed: i32,
    pub required: i32,
    pub under_reviewed: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct AllocationStatusResponse {
    pub assignment_id: i64,
    pub reviews_required: i32,
    pub reviews_per_student: i32,
    pub items: Vec<AllocationStatusItem>,
}

/// 分配给我的评审任务（匿名作业不暴露作者）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct AssignedReview {
    pub review_id: i64,
    pub submission_id: i64,
    pub author_id: Option<i64>,
    pub content: String,
    pub is_completed: bool,
    pub total_score: Option<f64>,
    pub criteria: Vec<Criterion>,
}

/// 我收到的评审（匿名作业对作者隐藏评审人）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct ReceivedReview {
    pub review_id: i64,
    pub reviewer_id: Option<i64>,
    pub total_score: Option<f64>,
    pub feedback: ReviewFeedback,
    pub criteria_scores: Vec<CriteriaScore>,
    pub helpfulness_rating: Option<i32>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReceivedReview {
    pub fn from_review(review: PeerReview, reveal_reviewer: bool) -> Self {
        Self {
            review_id: review.id,
            reviewer_id: reveal_reviewer.then_some(review.reviewer_id),
            total_score: review.total_score,
            feedback: review.feedback,
            criteria_scores: review.criteria_scores,
            helpfulness_rating: review.helpfulness_rating,
            completed_at: review.completed_at,
        }
    }
}
