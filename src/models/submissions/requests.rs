use serde::Deserialize;
use ts_rs::TS;

/// 保存或提交作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitWorkRequest {
    pub content: String,
    // true 表示仅保存草稿
    #[serde(default)]
    pub draft: bool,
}

/// 教师评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
