use tracing::{error, info};

use super::PeerReviewService;
use super::allocate::allocate;
use crate::domain::lifecycle;
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::peer_reviews::responses::AllocationSummary;
use crate::models::submissions::{entities::Submission, responses::SubmitWorkResponse};
use crate::models::users::entities::Caller;

pub async fn save_draft(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
    content: String,
) -> Result<Submission> {
    let assignment = open_assignment(service, caller, assignment_id).await?;
    write(service, caller, &assignment, content, true).await
}

pub async fn submit_work(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
    content: String,
) -> Result<SubmitWorkResponse> {
    let assignment = open_assignment(service, caller, assignment_id).await?;
    let submission = write(service, caller, &assignment, content, false).await?;

    info!(
        "学生 {} 提交作业 {}: submission={}",
        caller.user_id, assignment_id, submission.id
    );

    if !service.auto_allocate() {
        return Ok(SubmitWorkResponse {
            submission,
            allocation: None,
        });
    }

    // 提交已经落库，分配失败只记录日志；学生只拿到数量，配对明细不外露
    let allocation = match allocate(service, assignment_id).await {
        Ok(outcome) => Some(AllocationSummary::from(&outcome)),
        Err(e) => {
            error!("作业 {} 提交后分配失败: {}", assignment_id, e);
            None
        }
    };

    // 分配可能把状态推进到 in_review
    let submission = service
        .storage()
        .get_submission_by_id(submission.id)
        .await?
        .unwrap_or(submission);

    Ok(SubmitWorkResponse {
        submission,
        allocation,
    })
}

/// 作业存在、已发布，且调用者不是该作业的教师
async fn open_assignment(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    let assignment = service.require_assignment(assignment_id).await?;
    if assignment.instructor_id == caller.user_id {
        return Err(PeerReviewError::forbidden("教师不能提交自己布置的作业"));
    }
    if assignment.status != AssignmentStatus::Published {
        return Err(PeerReviewError::invalid_state(format!(
            "作业状态为 {}，当前不接受提交",
            assignment.status
        )));
    }
    Ok(assignment)
}

async fn write(
    service: &PeerReviewService,
    caller: &Caller,
    assignment: &Assignment,
    content: String,
    draft: bool,
) -> Result<Submission> {
    let storage = service.storage();
    let current = storage
        .get_submission_by_student(assignment.id, caller.user_id)
        .await?;
    let completed = match &current {
        Some(submission) if !draft => storage.count_completed_reviews(submission.id).await?,
        _ => 0,
    };

    let action = lifecycle::plan_submit(current.as_ref(), completed, draft)?;
    storage
        .write_submission(assignment.id, caller.user_id, content, action)
        .await?
        .ok_or_else(|| PeerReviewError::invalid_state("提交状态已变化，请刷新后重试"))
}
