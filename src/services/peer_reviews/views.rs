//! 只读视图：提交详情、分配进度、评审任务与收到的评审

use std::collections::HashMap;

use super::PeerReviewService;
use crate::errors::{PeerReviewError, Result};
use crate::models::peer_reviews::responses::{
    AllocationStatusItem, AllocationStatusResponse, AssignedReview, ReceivedReview,
};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::Caller;

pub async fn get_submission(
    service: &PeerReviewService,
    caller: &Caller,
    submission_id: i64,
) -> Result<Submission> {
    let submission = service.require_submission(submission_id).await?;
    if submission.student_id == caller.user_id {
        return Ok(submission);
    }

    let assignment = service.require_assignment(submission.assignment_id).await?;
    if !assignment.is_instructor(caller) {
        return Err(PeerReviewError::forbidden("无权查看该提交"));
    }
    Ok(submission)
}

pub async fn allocation_status(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<AllocationStatusResponse> {
    let assignment = service.require_assignment(assignment_id).await?;
    if !assignment.is_instructor(caller) {
        return Err(PeerReviewError::forbidden("只有作业的教师可以查看分配进度"));
    }

    let storage = service.storage();
    let submissions = storage.list_assignment_submissions(assignment_id).await?;
    let reviews = storage.list_assignment_reviews(assignment_id).await?;

    // submission_id -> (已分配, 已完成)
    let mut counts: HashMap<i64, (i32, i32)> = HashMap::new();
    for review in &reviews {
        let entry = counts.entry(review.submission_id).or_default();
        entry.0 += 1;
        if review.is_completed {
            entry.1 += 1;
        }
    }

    let required = assignment.reviews_required;
    let items = submissions
        .into_iter()
        .filter(|s| s.status.is_submitted())
        .map(|s| {
            let (assigned, completed) = counts.get(&s.id).copied().unwrap_or_default();
            AllocationStatusItem {
                submission_id: s.id,
                student_id: s.student_id,
                status: s.status,
                assigned,
                completed,
                required,
                under_reviewed: s.status.awaits_reviewers() && assigned < required,
            }
        })
        .collect();

    Ok(AllocationStatusResponse {
        assignment_id,
        reviews_required: required,
        reviews_per_student: assignment.reviews_per_student,
        items,
    })
}

/// 分配给调用者的评审任务；匿名作业不返回作者
pub async fn my_review_assignments(
    service: &PeerReviewService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Vec<AssignedReview>> {
    let assignment = service.require_assignment(assignment_id).await?;
    let storage = service.storage();

    let reviews = storage
        .list_reviewer_reviews(assignment_id, caller.user_id)
        .await?;
    if reviews.is_empty() {
        return Ok(Vec::new());
    }

    let submissions: HashMap<i64, Submission> = storage
        .list_assignment_submissions(assignment_id)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let reveal_author = !assignment.anonymous_reviews;
    Ok(reviews
        .into_iter()
        .filter_map(|review| {
            let submission = submissions.get(&review.submission_id)?;
            Some(AssignedReview {
                review_id: review.id,
                submission_id: submission.id,
                author_id: reveal_author.then_some(submission.student_id),
                content: submission.content.clone(),
                is_completed: review.is_completed,
                total_score: review.total_score,
                criteria: assignment.criteria.clone(),
            })
        })
        .collect())
}

/// 提交收到的已完成评审
///
/// 作者在匿名作业中看不到评审人；教师总能看到。
pub async fn received_reviews(
    service: &PeerReviewService,
    caller: &Caller,
    submission_id: i64,
) -> Result<Vec<ReceivedReview>> {
    let submission = service.require_submission(submission_id).await?;
    let assignment = service.require_assignment(submission.assignment_id).await?;

    let reveal_reviewer = if assignment.is_instructor(caller) {
        true
    } else if submission.student_id == caller.user_id {
        !assignment.anonymous_reviews
    } else {
        return Err(PeerReviewError::forbidden("无权查看该提交的评审"));
    };

    let reviews = service
        .storage()
        .list_submission_reviews(submission_id)
        .await?;

    Ok(reviews
        .into_iter()
        .filter(|r| r.is_completed)
        .map(|r| ReceivedReview::from_review(r, reveal_reviewer))
        .collect())
}
