//! 成绩汇总
//!
//! 互评分为所有已完成评审总分的平均值；最终成绩按教师 70% / 互评 30% 加权。

use crate::errors::{PeerReviewError, Result};

/// 教师评分权重
pub const INSTRUCTOR_WEIGHT: f64 = 0.7;
/// 互评分权重
pub const PEER_WEIGHT: f64 = 0.3;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 互评均分，没有已完成评审时为 None
pub fn peer_score(completed_totals: &[f64]) -> Option<f64> {
    if completed_totals.is_empty() {
        return None;
    }
    let sum: f64 = completed_totals.iter().sum();
    Some(round2(sum / completed_totals.len() as f64))
}

/// 最终成绩
///
/// 只有教师评分存在时才有最终成绩；没有互评分时直接取教师评分。
pub fn final_score(instructor_score: Option<f64>, peer_score: Option<f64>) -> Option<f64> {
    let instructor = instructor_score?;
    Some(match peer_score {
        Some(peer) => round2(instructor * INSTRUCTOR_WEIGHT + peer * PEER_WEIGHT),
        None => instructor,
    })
}

/// 教师评分范围 [0, max_points]
pub fn validate_instructor_score(score: f64, max_points: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 || score > max_points {
        return Err(PeerReviewError::score_out_of_range(format!(
            "教师评分必须在 0 到 {max_points} 之间，当前值: {score}"
        )));
    }
    Ok(())
}
