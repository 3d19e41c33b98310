pub mod allocate;
pub mod assignments;
pub mod grade;
pub mod locks;
pub mod review;
pub mod submit;
pub mod views;

use std::sync::Arc;

use crate::config::PeerReviewConfig;
use crate::errors::{PeerReviewError, Result};
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    peer_reviews::{
        entities::PeerReview,
        requests::SubmitReviewRequest,
        responses::{AllocationOutcome, AllocationStatusResponse, AssignedReview, ReceivedReview},
    },
    submissions::{
        entities::Submission, requests::GradeSubmissionRequest, responses::SubmitWorkResponse,
    },
    users::entities::Caller,
};
use crate::services::notifications::{Notifier, TracingNotifier};
use crate::storage::Storage;

pub use locks::AllocationLocks;

/// 互评服务
///
/// 负责权限检查、按作业串行的评审分配，以及存储与通知的编排。
pub struct PeerReviewService {
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    locks: AllocationLocks,
    auto_allocate: bool,
}

impl PeerReviewService {
    pub fn new(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        config: &PeerReviewConfig,
    ) -> Self {
        Self {
            storage,
            notifier,
            locks: AllocationLocks::with_capacity(config.lock_registry_capacity),
            auto_allocate: config.auto_allocate_on_submit,
        }
    }

    /// 使用默认配置与日志通知
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self::new(
            storage,
            Arc::new(TracingNotifier),
            &PeerReviewConfig::default(),
        )
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub(crate) fn locks(&self) -> &AllocationLocks {
        &self.locks
    }

    pub(crate) fn auto_allocate(&self) -> bool {
        self.auto_allocate
    }

    pub(crate) async fn require_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| PeerReviewError::not_found(format!("作业 {assignment_id} 不存在")))
    }

    pub(crate) async fn require_submission(&self, submission_id: i64) -> Result<Submission> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| PeerReviewError::not_found(format!("提交 {submission_id} 不存在")))
    }

    pub(crate) async fn require_review(&self, review_id: i64) -> Result<PeerReview> {
        self.storage
            .get_peer_review_by_id(review_id)
            .await?
            .ok_or_else(|| PeerReviewError::not_found(format!("评审 {review_id} 不存在")))
    }

    /// 创建作业
    pub async fn create_assignment(
        &self,
        caller: &Caller,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        assignments::create_assignment(self, caller, req).await
    }

    /// 获取作业
    pub async fn get_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.require_assignment(assignment_id).await
    }

    /// 发布作业
    pub async fn publish_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        assignments::publish_assignment(self, caller, assignment_id).await
    }

    /// 关闭作业
    pub async fn close_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        assignments::close_assignment(self, caller, assignment_id).await
    }

    /// 保存草稿
    pub async fn save_draft(
        &self,
        caller: &Caller,
        assignment_id: i64,
        content: String,
    ) -> Result<Submission> {
        submit::save_draft(self, caller, assignment_id, content).await
    }

    /// 提交作业，成功后触发一轮分配
    pub async fn submit_work(
        &self,
        caller: &Caller,
        assignment_id: i64,
        content: String,
    ) -> Result<SubmitWorkResponse> {
        submit::submit_work(self, caller, assignment_id, content).await
    }

    /// 获取提交（作者或教师）
    pub async fn get_submission(&self, caller: &Caller, submission_id: i64) -> Result<Submission> {
        views::get_submission(self, caller, submission_id).await
    }

    /// 执行一轮评审分配
    pub async fn allocate(&self, assignment_id: i64) -> Result<AllocationOutcome> {
        allocate::allocate(self, assignment_id).await
    }

    /// 教师手动触发分配
    pub async fn trigger_allocation(
        &self,
        caller: &Caller,
        assignment_id: i64,
    ) -> Result<AllocationOutcome> {
        allocate::trigger_allocation(self, caller, assignment_id).await
    }

    /// 分配进度
    pub async fn allocation_status(
        &self,
        caller: &Caller,
        assignment_id: i64,
    ) -> Result<AllocationStatusResponse> {
        views::allocation_status(self, caller, assignment_id).await
    }

    /// 提交评审
    pub async fn submit_review(
        &self,
        caller: &Caller,
        review_id: i64,
        req: SubmitReviewRequest,
    ) -> Result<PeerReview> {
        review::submit_review(self, caller, review_id, req).await
    }

    /// 作者对评审质量打分
    pub async fn rate_helpfulness(
        &self,
        caller: &Caller,
        review_id: i64,
        rating: i32,
    ) -> Result<ReceivedReview> {
        review::rate_helpfulness(self, caller, review_id, rating).await
    }

    /// 我的评审任务
    pub async fn my_review_assignments(
        &self,
        caller: &Caller,
        assignment_id: i64,
    ) -> Result<Vec<AssignedReview>> {
        views::my_review_assignments(self, caller, assignment_id).await
    }

    /// 提交收到的评审
    pub async fn received_reviews(
        &self,
        caller: &Caller,
        submission_id: i64,
    ) -> Result<Vec<ReceivedReview>> {
        views::received_reviews(self, caller, submission_id).await
    }

    /// 教师评分
    pub async fn grade_submission(
        &self,
        caller: &Caller,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Submission> {
        grade::grade_submission(self, caller, submission_id, req).await
    }
}
