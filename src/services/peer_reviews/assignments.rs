use tracing::info;

use super::PeerReviewService;
use crate::domain::{criteria, lifecycle};
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::CreateAssignmentRequest,
};
use crate::models::users::entities::Caller;

pub async fn create_assignment(
    service: &PeerReviewService,
    caller: &Caller,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    if !caller.role.can_author_assignments() {
        return Err(PeerReviewError::forbidden("只有教师或管理员可以创建作业"));
    }
    criteria::validate_assignment_request(&req)?;

    let assignment = service
        .storage()
        .create_assignment(caller.user_id, req)
        .await?;

    info!(
        "作业已创建: id={} instructor={} criteria={}",
        assignment.id,
        assignment.instructor_id,
        assignment.criteria.len()
    );
    Ok(assignment)
}

pub async fn publish_assignment(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    transition(service, caller, assignment_id, AssignmentStatus::Published).await
}

pub async fn close_assignment(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    transition(service, caller, assignment_id, AssignmentStatus::Closed).await
}

async fn transition(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
    to: AssignmentStatus,
) -> Result<Assignment> {
    let assignment = service.require_assignment(assignment_id).await?;
    if !assignment.is_instructor(caller) {
        return Err(PeerReviewError::forbidden("只有作业的教师可以变更作业状态"));
    }

    let from = assignment.status;
    lifecycle::ensure_assignment_transition(from, to)?;

    let updated = service
        .storage()
        .update_assignment_status(assignment_id, from, to)
        .await?
        .ok_or_else(|| PeerReviewError::invalid_state("作业状态已被修改，请刷新后重试"))?;

    info!("作业 {} 状态变更: {} -> {}", assignment_id, from, to);
    Ok(updated)
}
