use std::collections::HashSet;

use super::aggregate::round2;
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::entities::Criterion;
use crate::models::peer_reviews::requests::CriteriaScoreInput;

/// 校验评审打分并计算加权归一化总分 (0-100)
///
/// 每个维度先换算为百分制 `score / max_score * 100`，再按权重求加权平均；
/// 只提交了部分维度时，分母只计入已提交维度的权重。
pub fn score_review(criteria: &[Criterion], scores: &[CriteriaScoreInput]) -> Result<f64> {
    if scores.is_empty() {
        return Err(PeerReviewError::validation("至少需要一个评分维度的得分"));
    }

    let mut seen = HashSet::with_capacity(scores.len());
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for input in scores {
        let criterion = criteria
            .iter()
            .find(|c| c.id == input.criterion_id)
            .ok_or_else(|| {
                PeerReviewError::invalid_criterion(format!(
                    "评分维度 {} 不属于该作业",
                    input.criterion_id
                ))
            })?;

        if !seen.insert(criterion.id) {
            return Err(PeerReviewError::validation(format!(
                "评分维度 {} 重复打分",
                criterion.id
            )));
        }

        if !input.score.is_finite() || input.score < 0.0 || input.score > criterion.max_score {
            return Err(PeerReviewError::score_out_of_range(format!(
                "维度「{}」的得分必须在 0 到 {} 之间，当前值: {}",
                criterion.name, criterion.max_score, input.score
            )));
        }

        let normalized = input.score / criterion.max_score * 100.0;
        weighted_sum += normalized * criterion.weight;
        weight_sum += criterion.weight;
    }

    Ok(round2(weighted_sum / weight_sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(id: i64, max_score: f64, weight: f64) -> Criterion {
        Criterion {
            id,
            assignment_id: 1,
            name: format!("C{id}"),
            description: None,
            max_score,
            weight,
            position: id as i32,
        }
    }

    fn score(criterion_id: i64, score: f64) -> CriteriaScoreInput {
        CriteriaScoreInput {
            criterion_id,
            score,
            comment: None,
        }
    }

    #[test]
    fn test_weighted_mean() {
        let criteria = [criterion(1, 10.0, 1.0), criterion(2, 10.0, 2.0)];
        let total = score_review(&criteria, &[score(1, 8.0), score(2, 6.0)]).unwrap();
        assert!((total - 66.67).abs() < 1e-9, "total = {total}");
    }

    #[test]
    fn test_normalizes_different_scales() {
        let criteria = [criterion(1, 5.0, 1.0), criterion(2, 20.0, 1.0)];
        let total = score_review(&criteria, &[score(1, 5.0), score(2, 10.0)]).unwrap();
        assert_eq!(total, 75.0);
    }

    #[test]
    fn test_subset_only_weighs_supplied_criteria() {
        let criteria = [criterion(1, 10.0, 1.0), criterion(2, 10.0, 3.0)];
        let total = score_review(&criteria, &[score(2, 5.0)]).unwrap();
        assert_eq!(total, 50.0);
    }

    #[test]
    fn test_unknown_criterion() {
        let criteria = [criterion(1, 10.0, 1.0)];
        let err = score_review(&criteria, &[score(99, 5.0)]).unwrap_err();
        assert!(matches!(err, PeerReviewError::InvalidCriterion(_)));
    }

    #[test]
    fn test_score_out_of_range() {
        let criteria = [criterion(1, 10.0, 1.0)];
        for bad in [-0.5, 10.5, f64::INFINITY] {
            let err = score_review(&criteria, &[score(1, bad)]).unwrap_err();
            assert!(matches!(err, PeerReviewError::ScoreOutOfRange(_)), "{bad}");
        }
        assert_eq!(score_review(&criteria, &[score(1, 10.0)]).unwrap(), 100.0);
        assert_eq!(score_review(&criteria, &[score(1, 0.0)]).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_scores() {
        let criteria = [criterion(1, 10.0, 1.0)];
        assert!(score_review(&criteria, &[]).unwrap_err().is_validation());
        let err = score_review(&criteria, &[score(1, 5.0), score(1, 6.0)]).unwrap_err();
        assert!(matches!(err, PeerReviewError::Validation(_)));
    }
}
