use tracing::{debug, info, warn};

use super::PeerReviewService;
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::peer_reviews::responses::AllocationOutcome;
use crate::models::users::entities::Caller;
use crate::services::notifications::deliver;

/// 执行一轮分配
///
/// 同一作业的分配轮次持锁串行执行；锁释放后再逐个发送评审人通知。
pub async fn allocate(service: &PeerReviewService, assignment_id: i64) -> Result<AllocationOutcome> {
    let outcome = {
        let _guard = service.locks().acquire(assignment_id).await;
        service.storage().allocate_reviewers(assignment_id).await?
    };

    if let Some(reason) = outcome.skipped {
        debug!("作业 {} 本轮不分配: {:?}", assignment_id, reason);
        return Ok(outcome);
    }

    info!(
        "作业 {} 分配完成: 新增评审 {} 份，未达标提交 {} 份",
        assignment_id,
        outcome.created.len(),
        outcome.under_reviewed.len()
    );
    for item in &outcome.under_reviewed {
        warn!(
            "提交 {} 候选评审人不足: {}/{}",
            item.submission_id, item.existing, item.required
        );
    }

    for review in &outcome.created {
        deliver(
            "reviewer_assigned",
            service
                .notifier()
                .notify_reviewer_assigned(review.reviewer_id, review.submission_id),
        )
        .await;
    }

    Ok(outcome)
}

/// 教师手动触发分配，作业未发布时返回 InvalidState
pub async fn trigger_allocation(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<AllocationOutcome> {
    let assignment = service.require_assignment(assignment_id).await?;
    if !assignment.is_instructor(caller) {
        return Err(PeerReviewError::forbidden("只有作业的教师可以触发分配"));
    }
    if assignment.status != AssignmentStatus::Published {
        return Err(PeerReviewError::invalid_state(format!(
            "作业状态为 {}，只有已发布的作业可以分配评审",
            assignment.status
        )));
    }

    allocate(service, assignment_id).await
}
