//! 互评存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::grades::refresh_submission_grades;
use crate::entity::criteria_scores::{
    ActiveModel as CriteriaScoreActiveModel, Column as CriteriaScoreColumn,
    Entity as CriteriaScores,
};
use crate::entity::peer_reviews::{Column, Entity as PeerReviews, Model};
use crate::errors::{PeerReviewError, Result};
use crate::models::peer_reviews::entities::PeerReview;
use crate::models::submissions::entities::Submission;
use crate::storage::ReviewCompletion;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 为评审记录附加各维度得分
async fn attach_scores<C: ConnectionTrait>(
    db: &C,
    models: Vec<Model>,
) -> Result<Vec<PeerReview>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let scores = CriteriaScores::find()
        .filter(CriteriaScoreColumn::ReviewId.is_in(ids))
        .order_by_asc(CriteriaScoreColumn::Id)
        .all(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询维度得分失败: {e}")))?;

    let mut grouped: HashMap<i64, Vec<_>> = HashMap::new();
    for score in scores {
        grouped.entry(score.review_id).or_default().push(score);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let scores = grouped.remove(&m.id).unwrap_or_default();
            m.into_peer_review(scores)
        })
        .collect())
}

async fn load_review<C: ConnectionTrait>(db: &C, review_id: i64) -> Result<Option<PeerReview>> {
    let Some(model) = PeerReviews::find_by_id(review_id)
        .one(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询评审失败: {e}")))?
    else {
        return Ok(None);
    };

    Ok(attach_scores(db, vec![model]).await?.pop())
}

impl SeaOrmStorage {
    /// 通过 ID 获取评审
    pub async fn get_peer_review_by_id_impl(&self, review_id: i64) -> Result<Option<PeerReview>> {
        load_review(&self.db, review_id).await
    }

    /// 列出提交收到的评审
    pub async fn list_submission_reviews_impl(&self, submission_id: i64) -> Result<Vec<PeerReview>> {
        let models = PeerReviews::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询评审列表失败: {e}")))?;

        attach_scores(&self.db, models).await
    }

    /// 列出评审人在作业下承担的评审
    pub async fn list_reviewer_reviews_impl(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Vec<PeerReview>> {
        let models = PeerReviews::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::ReviewerId.eq(reviewer_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询评审列表失败: {e}")))?;

        attach_scores(&self.db, models).await
    }

    /// 列出作业下的全部评审（不含维度得分）
    pub async fn list_assignment_reviews_impl(&self, assignment_id: i64) -> Result<Vec<PeerReview>> {
        let models = PeerReviews::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询评审列表失败: {e}")))?;

        Ok(models
            .into_iter()
            .map(|m| m.into_peer_review(Vec::new()))
            .collect())
    }

    /// 完成评审
    ///
    /// 以 is_completed = false 为条件更新，并发提交时只有一方成功，另一方得到 AlreadyCompleted。
    /// 维度得分与提交成绩的重新汇总在同一事务内完成。
    pub async fn complete_review_impl(
        &self,
        review_id: i64,
        completion: ReviewCompletion,
    ) -> Result<(PeerReview, Submission)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("开启事务失败: {e}")))?;

        let feedback = completion.feedback;
        let result = PeerReviews::update_many()
            .col_expr(Column::IsCompleted, Expr::value(true))
            .col_expr(Column::TotalScore, Expr::value(completion.total_score))
            .col_expr(Column::Comment, Expr::value(feedback.comment))
            .col_expr(Column::Strengths, Expr::value(feedback.strengths))
            .col_expr(Column::Improvements, Expr::value(feedback.improvements))
            .col_expr(Column::CompletedAt, Expr::value(now))
            .filter(Column::Id.eq(review_id))
            .filter(Column::IsCompleted.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("更新评审失败: {e}")))?;

        if result.rows_affected == 0 {
            let exists = PeerReviews::find_by_id(review_id)
                .one(&txn)
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("查询评审失败: {e}")))?
                .is_some();
            return Err(if exists {
                PeerReviewError::already_completed(format!("评审 {review_id} 已完成"))
            } else {
                PeerReviewError::not_found(format!("评审 {review_id} 不存在"))
            });
        }

        if !completion.scores.is_empty() {
            let rows = completion
                .scores
                .into_iter()
                .map(|input| CriteriaScoreActiveModel {
                    review_id: Set(review_id),
                    criterion_id: Set(input.criterion_id),
                    score: Set(input.score),
                    comment: Set(input.comment),
                    ..Default::default()
                });
            CriteriaScores::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("写入维度得分失败: {e}")))?;
        }

        let review = load_review(&txn, review_id)
            .await?
            .ok_or_else(|| PeerReviewError::not_found(format!("评审 {review_id} 不存在")))?;
        let submission = refresh_submission_grades(&txn, review.submission_id).await?;

        txn.commit()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((review, submission))
    }

    /// 记录作者对评审质量的打分
    pub async fn set_helpfulness_rating_impl(
        &self,
        review_id: i64,
        rating: i32,
    ) -> Result<Option<PeerReview>> {
        let result = PeerReviews::update_many()
            .col_expr(Column::HelpfulnessRating, Expr::value(rating))
            .filter(Column::Id.eq(review_id))
            .exec(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("更新评审评价失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        load_review(&self.db, review_id).await
    }
}
