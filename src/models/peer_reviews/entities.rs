use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评审状态：pending → completed（终态）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub enum ReviewState {
    Pending,
    Completed,
}

/// 评审人填写的文字反馈
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct ReviewFeedback {
    pub comment: Option<String>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
}

/// 单个评分维度的得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct CriteriaScore {
    pub criterion_id: i64,
    pub score: f64,
    pub comment: Option<String>,
}

/// 一位评审人对一份提交的评审
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct PeerReview {
    pub id: i64,
    pub assignment_id: i64,
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub is_completed: bool,
    // 加权归一化总分 (0-100)
    pub total_score: Option<f64>,
    pub feedback: ReviewFeedback,
    pub criteria_scores: Vec<CriteriaScore>,
    // 作者对评审质量的反馈 (1-5)，不参与成绩计算
    pub helpfulness_rating: Option<i32>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PeerReview {
    pub fn state(&self) -> ReviewState {
        if self.is_completed {
            ReviewState::Completed
        } else {
            ReviewState::Pending
        }
    }
}
