use tracing::info;

use super::PeerReviewService;
use crate::domain::scoring;
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::peer_reviews::{
    entities::{PeerReview, ReviewState},
    requests::{RateHelpfulnessRequest, SubmitReviewRequest},
    responses::ReceivedReview,
};
use crate::models::users::entities::Caller;
use crate::services::notifications::deliver;
use crate::storage::ReviewCompletion;

/// 提交评审
///
/// 检查顺序：评审存在 → 调用者是评审人 → 尚未完成 → 作业未关闭 → 分数校验。
pub async fn submit_review(
    service: &PeerReviewService,
    caller: &Caller,
    review_id: i64,
    req: SubmitReviewRequest,
) -> Result<PeerReview> {
    let review = service.require_review(review_id).await?;
    if review.reviewer_id != caller.user_id {
        return Err(PeerReviewError::forbidden("只有被分配的评审人可以提交该评审"));
    }
    if review.state() == ReviewState::Completed {
        return Err(PeerReviewError::already_completed(format!("评审 {review_id} 已完成")));
    }

    let assignment = service.require_assignment(review.assignment_id).await?;
    if assignment.status == AssignmentStatus::Closed {
        return Err(PeerReviewError::invalid_state("作业已关闭，不能再提交评审"));
    }

    let total_score = scoring::score_review(&assignment.criteria, &req.scores)?;

    let (review, submission) = service
        .storage()
        .complete_review(
            review_id,
            ReviewCompletion {
                scores: req.scores,
                total_score,
                feedback: req.feedback,
            },
        )
        .await?;

    info!(
        "评审 {} 已完成: submission={} total={} peer_score={:?}",
        review.id, submission.id, total_score, submission.peer_score
    );

    deliver(
        "review_received",
        service
            .notifier()
            .notify_review_received(submission.student_id, submission.id),
    )
    .await;

    Ok(review)
}

/// 作者对已完成评审的质量打分，可重复修改，不参与成绩计算
pub async fn rate_helpfulness(
    service: &PeerReviewService,
    caller: &Caller,
    review_id: i64,
    rating: i32,
) -> Result<ReceivedReview> {
    let review = service.require_review(review_id).await?;
    let submission = service.require_submission(review.submission_id).await?;
    if submission.student_id != caller.user_id {
        return Err(PeerReviewError::forbidden("只有作品作者可以评价评审"));
    }
    if !review.is_completed {
        return Err(PeerReviewError::invalid_state("评审尚未完成，不能评价"));
    }
    if !(RateHelpfulnessRequest::MIN_RATING..=RateHelpfulnessRequest::MAX_RATING).contains(&rating)
    {
        return Err(PeerReviewError::validation(format!(
            "评价分必须在 {} 到 {} 之间，当前值: {rating}",
            RateHelpfulnessRequest::MIN_RATING,
            RateHelpfulnessRequest::MAX_RATING
        )));
    }

    let assignment = service.require_assignment(review.assignment_id).await?;
    let updated = service
        .storage()
        .set_helpfulness_rating(review_id, rating)
        .await?
        .ok_or_else(|| PeerReviewError::not_found(format!("评审 {review_id} 不存在")))?;

    Ok(ReceivedReview::from_review(updated, !assignment.anonymous_reviews))
}
