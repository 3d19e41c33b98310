use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
//
// 只能向前推进：draft → submitted → in_review → reviewed → approved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Draft,     // 草稿
    Submitted, // 已提交，等待分配评审
    InReview,  // 已分配评审
    Reviewed,  // 至少收到一份完成的互评
    Approved,  // 教师已评分
}

impl SubmissionStatus {
    /// 评审数不足时仍可补充评审人；教师评分后不再补充
    pub fn awaits_reviewers(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Submitted | SubmissionStatus::InReview | SubmissionStatus::Reviewed
        )
    }

    /// 已正式提交（可以作为评审人）
    pub fn is_submitted(&self) -> bool {
        *self >= SubmissionStatus::Submitted
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Draft => write!(f, "draft"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::InReview => write!(f, "in_review"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
            SubmissionStatus::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "in_review" => Ok(SubmissionStatus::InReview),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            "approved" => Ok(SubmissionStatus::Approved),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 学生的作业提交（每个学生每个作业一份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub status: SubmissionStatus,
    // 互评均分 (0-100)
    pub peer_score: Option<f64>,
    // 教师评分 (0-max_points)
    pub instructor_score: Option<f64>,
    pub instructor_feedback: Option<String>,
    pub final_score: Option<f64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
