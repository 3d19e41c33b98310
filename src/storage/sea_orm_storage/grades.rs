//! 成绩存储操作

use super::SeaOrmStorage;
use crate::domain::{aggregate, lifecycle};
use crate::entity::peer_reviews::{Column as PeerReviewColumn, Entity as PeerReviews};
use crate::entity::submissions::{ActiveModel, Entity as Submissions, Model};
use crate::errors::{PeerReviewError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

async fn find_submission<C: ConnectionTrait>(db: &C, submission_id: i64) -> Result<Model> {
    Submissions::find_by_id(submission_id)
        .one(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询提交失败: {e}")))?
        .ok_or_else(|| PeerReviewError::not_found(format!("提交 {submission_id} 不存在")))
}

/// 读取库中保存的提交状态，无法识别时报错而不是猜测
fn stored_status(model: &Model) -> Result<SubmissionStatus> {
    model.status.parse::<SubmissionStatus>().map_err(|e| {
        PeerReviewError::database_operation(format!("提交 {} 的状态无法识别: {e}", model.id))
    })
}

/// 根据全部已完成评审重新计算互评分
async fn completed_peer_score<C: ConnectionTrait>(db: &C, submission_id: i64) -> Result<Option<f64>> {
    let reviews = PeerReviews::find()
        .filter(PeerReviewColumn::SubmissionId.eq(submission_id))
        .filter(PeerReviewColumn::IsCompleted.eq(true))
        .all(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询已完成评审失败: {e}")))?;

    let totals: Vec<f64> = reviews.iter().filter_map(|r| r.total_score).collect();
    Ok(aggregate::peer_score(&totals))
}

/// 评审完成后刷新提交的互评分、最终成绩与状态
pub(super) async fn refresh_submission_grades<C: ConnectionTrait>(
    db: &C,
    submission_id: i64,
) -> Result<Submission> {
    let model = find_submission(db, submission_id).await?;
    let peer = completed_peer_score(db, submission_id).await?;

    let current = stored_status(&model)?;
    let status = if peer.is_some() {
        lifecycle::after_review_completed(current)
    } else {
        current
    };
    let final_score = aggregate::final_score(model.instructor_score, peer);

    let mut active: ActiveModel = model.into();
    active.peer_score = Set(peer);
    active.final_score = Set(final_score);
    active.status = Set(status.to_string());
    active.updated_at = Set(chrono::Utc::now().timestamp());

    let updated = active
        .update(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("更新提交成绩失败: {e}")))?;

    Ok(updated.into_submission())
}

impl SeaOrmStorage {
    /// 记录教师评分并计算最终成绩，可重复评分
    pub async fn record_instructor_grade_impl(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("开启事务失败: {e}")))?;

        let model = find_submission(&txn, submission_id).await?;
        let current = stored_status(&model)?;
        lifecycle::ensure_gradable(current)?;

        let peer = completed_peer_score(&txn, submission_id).await?;

        let mut active: ActiveModel = model.into();
        active.instructor_score = Set(Some(score));
        active.instructor_feedback = Set(feedback);
        active.peer_score = Set(peer);
        active.final_score = Set(aggregate::final_score(Some(score), peer));
        active.status = Set(SubmissionStatus::Approved.to_string());
        active.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("保存教师评分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_submission())
    }
}
