//! 提交存储操作

use super::SeaOrmStorage;
use crate::domain::lifecycle::SubmitAction;
use crate::entity::peer_reviews::{Column as PeerReviewColumn, Entity as PeerReviews};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{PeerReviewError, Result};
use crate::models::submissions::entities::Submission;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

/// 按创建顺序读取作业下的全部提交
pub(super) async fn load_assignment_submissions<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
) -> Result<Vec<Submission>> {
    let models = Submissions::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询提交列表失败: {e}")))?;

    Ok(models.into_iter().map(|m| m.into_submission()).collect())
}

impl SeaOrmStorage {
    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生在作业下的提交
    pub async fn get_submission_by_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        load_assignment_submissions(&self.db, assignment_id).await
    }

    /// 写入提交内容
    ///
    /// 首次写入依赖 (assignment_id, student_id) 唯一索引去重；覆盖写入要求状态未变，
    /// 重新提交还要求期间没有评审完成。条件不满足时返回 None。
    pub async fn write_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: String,
        action: SubmitAction,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        match action {
            SubmitAction::Create { status } => {
                let model = ActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(content),
                    status: Set(status.to_string()),
                    submitted_at: Set(status.is_submitted().then_some(now)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };

                let inserted = Submissions::insert(model)
                    .on_conflict(
                        OnConflict::columns([Column::AssignmentId, Column::StudentId])
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(&self.db)
                    .await
                    .map_err(|e| PeerReviewError::database_operation(format!("创建提交失败: {e}")))?;

                if inserted == 0 {
                    return Ok(None);
                }
            }
            SubmitAction::Update {
                expected,
                status,
                restamp,
            } => {
                let mut update = Submissions::update_many()
                    .col_expr(Column::Content, Expr::value(content))
                    .col_expr(Column::Status, Expr::value(status.to_string()))
                    .col_expr(Column::UpdatedAt, Expr::value(now))
                    .filter(Column::AssignmentId.eq(assignment_id))
                    .filter(Column::StudentId.eq(student_id))
                    .filter(Column::Status.eq(expected.to_string()));

                if restamp {
                    update = update.col_expr(Column::SubmittedAt, Expr::value(now));
                }
                if expected.is_submitted() {
                    let reviewed = PeerReviews::find()
                        .select_only()
                        .column(PeerReviewColumn::SubmissionId)
                        .filter(PeerReviewColumn::IsCompleted.eq(true))
                        .into_query();
                    update = update.filter(Column::Id.not_in_subquery(reviewed));
                }

                let result = update
                    .exec(&self.db)
                    .await
                    .map_err(|e| PeerReviewError::database_operation(format!("更新提交失败: {e}")))?;

                if result.rows_affected == 0 {
                    return Ok(None);
                }
            }
        }

        self.get_submission_by_student_impl(assignment_id, student_id)
            .await
    }

    /// 统计提交已完成的评审数
    pub async fn count_completed_reviews_impl(&self, submission_id: i64) -> Result<u64> {
        PeerReviews::find()
            .filter(PeerReviewColumn::SubmissionId.eq(submission_id))
            .filter(PeerReviewColumn::IsCompleted.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("统计评审失败: {e}")))
    }
}
