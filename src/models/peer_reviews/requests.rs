use serde::Deserialize;
use ts_rs::TS;

use super::entities::ReviewFeedback;

/// 单个评分维度的打分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct CriteriaScoreInput {
    pub criterion_id: i64,
    pub score: f64,
    pub comment: Option<String>,
}

/// 提交评审请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct SubmitReviewRequest {
    pub scores: Vec<CriteriaScoreInput>,
    #[serde(default)]
    pub feedback: ReviewFeedback,
}

/// 作者对评审质量打分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/peer_review.ts")]
pub struct RateHelpfulnessRequest {
    pub rating: i32,
}

impl RateHelpfulnessRequest {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;
}
