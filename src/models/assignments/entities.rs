use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    Draft,     // 草稿
    Published, // 已发布，互评进行中
    Closed,    // 已关闭
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Draft => write!(f, "draft"),
            AssignmentStatus::Published => write!(f, "published"),
            AssignmentStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AssignmentStatus::Draft),
            "published" => Ok(AssignmentStatus::Published),
            "closed" => Ok(AssignmentStatus::Closed),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

/// 评分维度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Criterion {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub weight: f64,
    // 仅用于展示顺序
    pub position: i32,
}

/// 支持互评的作业
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 教师评分上限
    pub max_points: f64,
    // 每份提交需要的评审数
    pub reviews_required: i32,
    // 每个学生最多承担的评审数
    pub reviews_per_student: i32,
    pub anonymous_reviews: bool,
    pub peer_review_enabled: bool,
    pub status: AssignmentStatus,
    pub criteria: Vec<Criterion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn criterion(&self, criterion_id: i64) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == criterion_id)
    }

    /// 教师本人或管理员
    pub fn is_instructor(&self, caller: &crate::models::users::entities::Caller) -> bool {
        caller.is_admin() || caller.user_id == self.instructor_id
    }

    /// 互评是否处于可运行状态
    pub fn accepts_peer_review(&self) -> bool {
        self.status == AssignmentStatus::Published && self.peer_review_enabled
    }
}
