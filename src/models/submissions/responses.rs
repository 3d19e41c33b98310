use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::peer_reviews::responses::AllocationSummary;

/// 提交作业响应（附带本次触发的分配摘要）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitWorkResponse {
    pub submission: Submission,
    pub allocation: Option<AllocationSummary>,
}
