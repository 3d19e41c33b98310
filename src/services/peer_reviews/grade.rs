use tracing::info;

use super::PeerReviewService;
use crate::domain::{aggregate, lifecycle};
use crate::errors::{PeerReviewError, Result};
use crate::models::submissions::{entities::Submission, requests::GradeSubmissionRequest};
use crate::models::users::entities::Caller;
use crate::services::notifications::deliver;

/// 教师评分
///
/// 最终成绩 = 教师评分 * 0.7 + 互评分 * 0.3；没有互评分时取教师评分。
/// 已评分的提交可以重新评分，状态保持 approved。
pub async fn grade_submission(
    service: &PeerReviewService,
    caller: &Caller,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let submission = service.require_submission(submission_id).await?;
    let assignment = service.require_assignment(submission.assignment_id).await?;

    if !assignment.is_instructor(caller) {
        return Err(PeerReviewError::forbidden("只有作业的教师可以评分"));
    }
    aggregate::validate_instructor_score(req.score, assignment.max_points)?;
    lifecycle::ensure_gradable(submission.status)?;

    let graded = service
        .storage()
        .record_instructor_grade(submission_id, req.score, req.feedback)
        .await?;

    info!(
        "提交 {} 已评分: instructor={} peer={:?} final={:?}",
        graded.id, req.score, graded.peer_score, graded.final_score
    );

    deliver(
        "graded",
        service.notifier().notify_graded(
            graded.student_id,
            graded.id,
            graded.final_score.unwrap_or(req.score),
        ),
    )
    .await;

    Ok(graded)
}
