use serde::Deserialize;
use ts_rs::TS;

/// 评分维度定义
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CriterionInput {
    pub name: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub weight: Option<f64>,
}

/// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub max_points: Option<f64>,
    pub reviews_required: Option<i32>,
    pub reviews_per_student: Option<i32>,
    pub anonymous_reviews: Option<bool>,
    pub peer_review_enabled: Option<bool>,
    pub criteria: Vec<CriterionInput>,
}

impl CreateAssignmentRequest {
    pub const DEFAULT_MAX_POINTS: f64 = 100.0;
    pub const DEFAULT_REVIEWS_REQUIRED: i32 = 3;
    pub const DEFAULT_REVIEWS_PER_STUDENT: i32 = 3;
    pub const DEFAULT_CRITERION_WEIGHT: f64 = 1.0;
}
