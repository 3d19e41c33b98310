//! 提交与评审的状态机
//!
//! 提交：draft → submitted → in_review → reviewed → approved，不允许回退。
//! 评审：pending → completed，完成后不可再修改。

use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::submissions::entities::{Submission, SubmissionStatus};

/// 作业状态只能 draft → published → closed
pub fn ensure_assignment_transition(from: AssignmentStatus, to: AssignmentStatus) -> Result<()> {
    match (from, to) {
        (AssignmentStatus::Draft, AssignmentStatus::Published)
        | (AssignmentStatus::Published, AssignmentStatus::Closed) => Ok(()),
        _ => Err(PeerReviewError::invalid_state(format!(
            "作业状态不能从 {from} 变更为 {to}"
        ))),
    }
}

/// 保存/提交作业时需要执行的写操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// 首次保存
    Create { status: SubmissionStatus },
    /// 覆盖已有内容；`expected` 用于写入时的并发校验
    Update {
        expected: SubmissionStatus,
        status: SubmissionStatus,
        restamp: bool,
    },
}

/// 根据当前提交状态决定保存/提交的行为
///
/// 在任何评审完成之前重复提交只覆盖内容并刷新提交时间，状态保持不变。
pub fn plan_submit(
    current: Option<&Submission>,
    completed_reviews: u64,
    draft: bool,
) -> Result<SubmitAction> {
    let Some(current) = current else {
        let status = if draft {
            SubmissionStatus::Draft
        } else {
            SubmissionStatus::Submitted
        };
        return Ok(SubmitAction::Create { status });
    };

    match (current.status, draft) {
        (SubmissionStatus::Draft, true) => Ok(SubmitAction::Update {
            expected: SubmissionStatus::Draft,
            status: SubmissionStatus::Draft,
            restamp: false,
        }),
        (SubmissionStatus::Draft, false) => Ok(SubmitAction::Update {
            expected: SubmissionStatus::Draft,
            status: SubmissionStatus::Submitted,
            restamp: true,
        }),
        (_, true) => Err(PeerReviewError::invalid_state(
            "作业已提交，不能再保存为草稿",
        )),
        (status @ (SubmissionStatus::Submitted | SubmissionStatus::InReview), false)
            if completed_reviews == 0 =>
        {
            Ok(SubmitAction::Update {
                expected: status,
                status,
                restamp: true,
            })
        }
        _ => Err(PeerReviewError::invalid_state(
            "已有评审完成，不能再重新提交",
        )),
    }
}

/// 分配到评审人之后的状态
pub fn after_reviewer_assigned(status: SubmissionStatus) -> SubmissionStatus {
    if status == SubmissionStatus::Submitted {
        SubmissionStatus::InReview
    } else {
        status
    }
}

/// 收到一份完成的评审之后的状态
pub fn after_review_completed(status: SubmissionStatus) -> SubmissionStatus {
    status.max(SubmissionStatus::Reviewed)
}

/// 教师评分前的状态检查
pub fn ensure_gradable(status: SubmissionStatus) -> Result<()> {
    if status == SubmissionStatus::Draft {
        return Err(PeerReviewError::invalid_state("草稿状态的提交不能评分"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(status: SubmissionStatus) -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id: 1,
            assignment_id: 1,
            student_id: 10,
            content: "v1".to_string(),
            status,
            peer_score: None,
            instructor_score: None,
            instructor_feedback: None,
            final_score: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assignment_transitions_only_move_forward() {
        assert!(
            ensure_assignment_transition(AssignmentStatus::Draft, AssignmentStatus::Published)
                .is_ok()
        );
        assert!(
            ensure_assignment_transition(AssignmentStatus::Published, AssignmentStatus::Closed)
                .is_ok()
        );
        assert!(
            ensure_assignment_transition(AssignmentStatus::Closed, AssignmentStatus::Published)
                .is_err()
        );
        assert!(
            ensure_assignment_transition(AssignmentStatus::Draft, AssignmentStatus::Closed)
                .is_err()
        );
    }

    #[test]
    fn test_first_submit_creates_submitted() {
        assert_eq!(
            plan_submit(None, 0, false).unwrap(),
            SubmitAction::Create {
                status: SubmissionStatus::Submitted
            }
        );
        assert_eq!(
            plan_submit(None, 0, true).unwrap(),
            SubmitAction::Create {
                status: SubmissionStatus::Draft
            }
        );
    }

    #[test]
    fn test_resubmission_keeps_status() {
        let current = submission(SubmissionStatus::InReview);
        assert_eq!(
            plan_submit(Some(&current), 0, false).unwrap(),
            SubmitAction::Update {
                expected: SubmissionStatus::InReview,
                status: SubmissionStatus::InReview,
                restamp: true,
            }
        );
    }

    #[test]
    fn test_resubmission_rejected_after_completed_review() {
        let current = submission(SubmissionStatus::InReview);
        let err = plan_submit(Some(&current), 1, false).unwrap_err();
        assert_eq!(err.code(), "E003");

        let reviewed = submission(SubmissionStatus::Reviewed);
        assert!(plan_submit(Some(&reviewed), 0, false).is_err());
    }

    #[test]
    fn test_cannot_go_back_to_draft() {
        let current = submission(SubmissionStatus::Submitted);
        assert!(plan_submit(Some(&current), 0, true).is_err());
    }

    #[test]
    fn test_status_never_moves_backward() {
        assert_eq!(
            after_reviewer_assigned(SubmissionStatus::Submitted),
            SubmissionStatus::InReview
        );
        assert_eq!(
            after_reviewer_assigned(SubmissionStatus::Reviewed),
            SubmissionStatus::Reviewed
        );
        assert_eq!(
            after_review_completed(SubmissionStatus::InReview),
            SubmissionStatus::Reviewed
        );
        assert_eq!(
            after_review_completed(SubmissionStatus::Approved),
            SubmissionStatus::Approved
        );
    }

    #[test]
    fn test_draft_is_not_gradable() {
        assert!(ensure_gradable(SubmissionStatus::Draft).is_err());
        assert!(ensure_gradable(SubmissionStatus::Submitted).is_ok());
        assert!(ensure_gradable(SubmissionStatus::Approved).is_ok());
    }
}
