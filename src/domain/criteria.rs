use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::requests::{CreateAssignmentRequest, CriterionInput};

fn ensure_positive(value: f64, field: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PeerReviewError::validation(format!(
            "{field} 必须为正数，当前值: {value}"
        )))
    }
}

/// 校验单个评分维度
pub fn validate_criterion(input: &CriterionInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(PeerReviewError::validation("评分维度名称不能为空"));
    }
    ensure_positive(input.max_score, "max_score")?;
    if let Some(weight) = input.weight {
        ensure_positive(weight, "weight")?;
    }
    Ok(())
}

/// 校验创建作业请求
pub fn validate_assignment_request(req: &CreateAssignmentRequest) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(PeerReviewError::validation("作业标题不能为空"));
    }
    if let Some(max_points) = req.max_points {
        ensure_positive(max_points, "max_points")?;
    }
    if req.reviews_required.is_some_and(|n| n < 1) {
        return Err(PeerReviewError::validation("reviews_required 至少为 1"));
    }
    if req.reviews_per_student.is_some_and(|n| n < 1) {
        return Err(PeerReviewError::validation("reviews_per_student 至少为 1"));
    }
    if req.criteria.is_empty() {
        return Err(PeerReviewError::validation("至少需要一个评分维度"));
    }
    req.criteria.iter().try_for_each(validate_criterion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, max_score: f64, weight: Option<f64>) -> CriterionInput {
        CriterionInput {
            name: name.to_string(),
            description: None,
            max_score,
            weight,
        }
    }

    fn request(criteria: Vec<CriterionInput>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: "Essay".to_string(),
            description: None,
            max_points: Some(100.0),
            reviews_required: Some(3),
            reviews_per_student: Some(3),
            anonymous_reviews: None,
            peer_review_enabled: None,
            criteria,
        }
    }

    #[test]
    fn test_accepts_valid_request() {
        let req = request(vec![criterion("Clarity", 10.0, Some(2.0))]);
        assert!(validate_assignment_request(&req).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_max_score_and_weight() {
        assert!(validate_criterion(&criterion("A", 0.0, None)).is_err());
        assert!(validate_criterion(&criterion("A", 10.0, Some(0.0))).is_err());
        assert!(validate_criterion(&criterion("A", f64::NAN, None)).is_err());
    }

    #[test]
    fn test_rejects_zero_review_counts() {
        let mut req = request(vec![criterion("A", 10.0, None)]);
        req.reviews_required = Some(0);
        assert!(validate_assignment_request(&req).unwrap_err().is_validation());

        let mut req = request(vec![criterion("A", 10.0, None)]);
        req.reviews_per_student = Some(0);
        assert!(validate_assignment_request(&req).is_err());
    }

    #[test]
    fn test_rejects_missing_criteria() {
        assert!(validate_assignment_request(&request(vec![])).is_err());
    }
}
