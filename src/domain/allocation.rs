//! 评审人分配
//!
//! 给定作业当前的提交与评审快照，计算需要新增的 (提交, 评审人) 配对：
//! - 为 submitted / in_review / reviewed 的提交分配，已达到 `reviews_required` 的跳过；approved 不再补充
//! - 候选人为其他已提交的学生，排除作者本人、已配对的学生以及评审数已达 `reviews_per_student` 的学生
//! - 候选人按当前评审负载升序排列，负载相同时取提交顺序上紧随目标之后的学生
//!
//! 相同输入总是得到相同结果；对已稳定的快照再次计算不会产生新配对。

use std::collections::{HashMap, HashSet};

use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::peer_reviews::entities::PeerReview;
use crate::models::peer_reviews::responses::{AllocationSkipReason, UnderReviewed};
use crate::models::submissions::entities::Submission;

/// 最少需要的已提交学生数
pub const MIN_SUBMISSIONS: usize = 2;

/// 一个新配对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pairing {
    pub submission_id: i64,
    pub reviewer_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationPlan {
    pub pairings: Vec<Pairing>,
    pub under_reviewed: Vec<UnderReviewed>,
    pub skipped: Option<AllocationSkipReason>,
}

impl AllocationPlan {
    fn skipped(reason: AllocationSkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Default::default()
        }
    }
}

/// 按快照计算本轮分配
pub fn plan_allocation(
    assignment: &Assignment,
    submissions: &[Submission],
    reviews: &[PeerReview],
) -> AllocationPlan {
    if assignment.status != AssignmentStatus::Published {
        return AllocationPlan::skipped(AllocationSkipReason::AssignmentNotPublished);
    }
    if !assignment.peer_review_enabled {
        return AllocationPlan::skipped(AllocationSkipReason::PeerReviewDisabled);
    }

    // 按提交创建顺序排列，保证结果可复现
    let mut submitted: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.assignment_id == assignment.id && s.status.is_submitted())
        .collect();
    submitted.sort_by_key(|s| (s.created_at, s.id));

    if submitted.len() < MIN_SUBMISSIONS {
        return AllocationPlan::skipped(AllocationSkipReason::NotEnoughSubmissions);
    }

    let required = assignment.reviews_required;
    let capacity = assignment.reviews_per_student;

    let mut existing: HashMap<i64, i32> = HashMap::new();
    let mut load: HashMap<i64, i32> = HashMap::new();
    let mut paired: HashSet<(i64, i64)> = HashSet::new();
    for review in reviews {
        *existing.entry(review.submission_id).or_default() += 1;
        *load.entry(review.reviewer_id).or_default() += 1;
        paired.insert((review.submission_id, review.reviewer_id));
    }

    let mut plan = AllocationPlan::default();
    let total = submitted.len();

    for (position, target) in submitted.iter().enumerate() {
        if !target.status.awaits_reviewers() {
            continue;
        }
        let mut count = existing.get(&target.id).copied().unwrap_or(0);
        if count >= required {
            continue;
        }

        // (负载, 与目标的环形距离, 学生)
        let mut candidates: Vec<(i32, usize, i64)> = submitted
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let reviewer = candidate.student_id;
                let current = load.get(&reviewer).copied().unwrap_or(0);
                let eligible = reviewer != target.student_id
                    && !paired.contains(&(target.id, reviewer))
                    && current < capacity;
                eligible.then(|| (current, (index + total - position) % total, reviewer))
            })
            .collect();
        candidates.sort_unstable();

        for (_, _, reviewer) in candidates {
            if count >= required {
                break;
            }
            plan.pairings.push(Pairing {
                submission_id: target.id,
                reviewer_id: reviewer,
            });
            paired.insert((target.id, reviewer));
            *load.entry(reviewer).or_default() += 1;
            count += 1;
        }

        if count < required {
            plan.under_reviewed.push(UnderReviewed {
                submission_id: target.id,
                existing: count,
                required,
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::peer_reviews::entities::ReviewFeedback;
    use crate::models::submissions::entities::SubmissionStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn assignment(required: i32, per_student: i32) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            instructor_id: 100,
            title: "Essay".to_string(),
            description: None,
            max_points: 100.0,
            reviews_required: required,
            reviews_per_student: per_student,
            anonymous_reviews: true,
            peer_review_enabled: true,
            status: AssignmentStatus::Published,
            criteria: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// 学生 id = 10 + 提交 id，创建时间随 id 递增
    fn submissions(count: i64) -> Vec<Submission> {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        (1..=count)
            .map(|id| Submission {
                id,
                assignment_id: 1,
                student_id: 10 + id,
                content: format!("work {id}"),
                status: SubmissionStatus::Submitted,
                peer_score: None,
                instructor_score: None,
                instructor_feedback: None,
                final_score: None,
                submitted_at: Some(base + Duration::minutes(id)),
                created_at: base + Duration::minutes(id),
                updated_at: base + Duration::minutes(id),
            })
            .collect()
    }

    /// 把计划落成评审记录，模拟写入后的下一轮快照
    fn apply(plan: &AllocationPlan, reviews: &mut Vec<PeerReview>) {
        for pairing in &plan.pairings {
            reviews.push(PeerReview {
                id: reviews.len() as i64 + 1,
                assignment_id: 1,
                submission_id: pairing.submission_id,
                reviewer_id: pairing.reviewer_id,
                is_completed: false,
                total_score: None,
                feedback: ReviewFeedback::default(),
                criteria_scores: vec![],
                helpfulness_rating: None,
                assigned_at: Utc::now(),
                completed_at: None,
            });
        }
    }

    fn reviews_of(plan: &AllocationPlan, submission_id: i64) -> Vec<i64> {
        plan.pairings
            .iter()
            .filter(|p| p.submission_id == submission_id)
            .map(|p| p.reviewer_id)
            .collect()
    }

    fn load_of(plan: &AllocationPlan, reviewer_id: i64) -> usize {
        plan.pairings
            .iter()
            .filter(|p| p.reviewer_id == reviewer_id)
            .count()
    }

    #[test]
    fn test_three_submitters_pair_with_each_other() {
        let assignment = assignment(3, 3);
        let subs = submissions(3);
        let plan = plan_allocation(&assignment, &subs, &[]);

        let mut s1 = reviews_of(&plan, 1);
        s1.sort();
        assert_eq!(s1, vec![12, 13]);
        let mut s2 = reviews_of(&plan, 2);
        s2.sort();
        assert_eq!(s2, vec![11, 13]);
        let mut s3 = reviews_of(&plan, 3);
        s3.sort();
        assert_eq!(s3, vec![11, 12]);

        // 候选池只有 2 人，三份提交都达不到 3
        assert_eq!(plan.under_reviewed.len(), 3);
        assert!(plan.under_reviewed.iter().all(|u| u.existing == 2));
    }

    #[test]
    fn test_never_pairs_author_with_own_submission() {
        let assignment = assignment(4, 4);
        let subs = submissions(6);
        let plan = plan_allocation(&assignment, &subs, &[]);
        for pairing in &plan.pairings {
            let author = subs
                .iter()
                .find(|s| s.id == pairing.submission_id)
                .unwrap()
                .student_id;
            assert_ne!(author, pairing.reviewer_id);
        }
    }

    #[test]
    fn test_respects_capacity_and_target() {
        let assignment = assignment(2, 2);
        let subs = submissions(5);
        let plan = plan_allocation(&assignment, &subs, &[]);

        for sub in &subs {
            assert_eq!(reviews_of(&plan, sub.id).len(), 2, "submission {}", sub.id);
            assert!(load_of(&plan, sub.student_id) <= 2);
        }
        assert!(plan.under_reviewed.is_empty());
    }

    #[test]
    fn test_capacity_shortage_is_reported() {
        let assignment = assignment(3, 1);
        let subs = submissions(3);
        let plan = plan_allocation(&assignment, &subs, &[]);

        for sub in &subs {
            assert!(load_of(&plan, sub.student_id) <= 1);
        }
        assert_eq!(plan.pairings.len(), 3);
        assert_eq!(plan.under_reviewed.len(), 3);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let assignment = assignment(2, 2);
        let subs = submissions(4);
        let mut reviews = Vec::new();

        let first = plan_allocation(&assignment, &subs, &reviews);
        apply(&first, &mut reviews);
        let second = plan_allocation(&assignment, &subs, &reviews);

        assert!(second.pairings.is_empty());
        assert_eq!(reviews.len(), 8);
    }

    #[test]
    fn test_incremental_arrivals_fill_up() {
        let assignment = assignment(2, 2);
        let all = submissions(3);
        let mut reviews = Vec::new();

        let first = plan_allocation(&assignment, &all[..2], &reviews);
        assert_eq!(first.pairings.len(), 2);
        apply(&first, &mut reviews);

        let second = plan_allocation(&assignment, &all, &reviews);
        apply(&second, &mut reviews);

        for sub in &all {
            let received = reviews.iter().filter(|r| r.submission_id == sub.id).count();
            let given = reviews
                .iter()
                .filter(|r| r.reviewer_id == sub.student_id)
                .count();
            assert_eq!(received, 2);
            assert!(given <= 2);
        }
        let unique: HashSet<_> = reviews
            .iter()
            .map(|r| (r.submission_id, r.reviewer_id))
            .collect();
        assert_eq!(unique.len(), reviews.len());
    }

    #[test]
    fn test_deterministic() {
        let assignment = assignment(3, 3);
        let subs = submissions(7);
        let a = plan_allocation(&assignment, &subs, &[]);
        let mut shuffled = subs.clone();
        shuffled.reverse();
        let b = plan_allocation(&assignment, &shuffled, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reviewed_submission_below_target_is_topped_up() {
        let assignment = assignment(2, 2);
        let mut subs = submissions(3);
        subs[0].status = SubmissionStatus::Reviewed;
        let plan = plan_allocation(&assignment, &subs, &[]);

        assert_eq!(reviews_of(&plan, 1).len(), 2);
        assert!(load_of(&plan, 11) > 0);
    }

    #[test]
    fn test_approved_submissions_are_reviewers_but_not_targets() {
        let assignment = assignment(2, 2);
        let mut subs = submissions(3);
        subs[0].status = SubmissionStatus::Approved;
        let plan = plan_allocation(&assignment, &subs, &[]);

        assert!(reviews_of(&plan, 1).is_empty());
        assert!(load_of(&plan, 11) > 0);
        assert!(plan.under_reviewed.iter().all(|u| u.submission_id != 1));
    }

    #[test]
    fn test_skips_when_not_applicable() {
        let subs = submissions(3);

        let mut draft = assignment(2, 2);
        draft.status = AssignmentStatus::Draft;
        assert_eq!(
            plan_allocation(&draft, &subs, &[]).skipped,
            Some(AllocationSkipReason::AssignmentNotPublished)
        );

        let mut disabled = assignment(2, 2);
        disabled.peer_review_enabled = false;
        assert_eq!(
            plan_allocation(&disabled, &subs, &[]).skipped,
            Some(AllocationSkipReason::PeerReviewDisabled)
        );

        let mut lonely = submissions(2);
        lonely[1].status = SubmissionStatus::Draft;
        assert_eq!(
            plan_allocation(&assignment(2, 2), &lonely, &[]).skipped,
            Some(AllocationSkipReason::NotEnoughSubmissions)
        );
    }
}
