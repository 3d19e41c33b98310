use std::sync::Arc;

use crate::domain::lifecycle::SubmitAction;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::CreateAssignmentRequest,
    },
    peer_reviews::{
        entities::{PeerReview, ReviewFeedback},
        requests::CriteriaScoreInput,
        responses::AllocationOutcome,
    },
    submissions::entities::Submission,
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 完成一份评审时写入的数据（已通过校验）
#[derive(Debug, Clone)]
pub struct ReviewCompletion {
    pub scores: Vec<CriteriaScoreInput>,
    pub total_score: f64,
    pub feedback: ReviewFeedback,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业（含评分维度）
    async fn create_assignment(
        &self,
        instructor_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业（含评分维度）
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 变更作业状态，当前状态不是 expected 时返回 None
    async fn update_assignment_status(
        &self,
        assignment_id: i64,
        expected: AssignmentStatus,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>>;

    /// 提交管理方法
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取学生在某作业下的提交
    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出作业的全部提交（按创建顺序）
    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 保存/提交作业内容，并发冲突时返回 None
    async fn write_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: String,
        action: SubmitAction,
    ) -> Result<Option<Submission>>;
    // 统计提交已完成的评审数
    async fn count_completed_reviews(&self, submission_id: i64) -> Result<u64>;

    /// 评审分配
    // 在单个事务内读取快照、计算并写入新配对
    async fn allocate_reviewers(&self, assignment_id: i64) -> Result<AllocationOutcome>;

    /// 评审管理方法
    // 通过ID获取评审（含各维度得分）
    async fn get_peer_review_by_id(&self, review_id: i64) -> Result<Option<PeerReview>>;
    // 列出提交收到的评审
    async fn list_submission_reviews(&self, submission_id: i64) -> Result<Vec<PeerReview>>;
    // 列出评审人在某作业下承担的评审
    async fn list_reviewer_reviews(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Vec<PeerReview>>;
    // 列出作业下的全部评审
    async fn list_assignment_reviews(&self, assignment_id: i64) -> Result<Vec<PeerReview>>;
    // 完成评审并重新汇总提交成绩
    async fn complete_review(
        &self,
        review_id: i64,
        completion: ReviewCompletion,
    ) -> Result<(PeerReview, Submission)>;
    // 作者对评审质量打分
    async fn set_helpfulness_rating(
        &self,
        review_id: i64,
        rating: i32,
    ) -> Result<Option<PeerReview>>;

    /// 教师评分
    async fn record_instructor_grade(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
