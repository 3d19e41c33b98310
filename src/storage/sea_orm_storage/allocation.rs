//! 评审分配存储操作

use std::collections::HashSet;

use super::SeaOrmStorage;
use super::assignments::load_assignment;
use super::submissions::load_assignment_submissions;
use crate::domain::allocation::plan_allocation;
use crate::domain::lifecycle::after_reviewer_assigned;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::peer_reviews::{ActiveModel, Column, Entity as PeerReviews};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{PeerReviewError, Result};
use crate::models::peer_reviews::responses::AllocationOutcome;
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QuerySelect, Select, Set,
    TransactionTrait,
};
use tracing::debug;

fn assignment_lock_query(assignment_id: i64) -> Select<Assignments> {
    Assignments::find_by_id(assignment_id).lock_exclusive()
}

/// 锁定作业行，使多个实例对同一作业的分配串行执行
///
/// SQLite 不支持行锁，同一时刻只允许一个写事务。
async fn lock_assignment_row<C: ConnectionTrait>(db: &C, assignment_id: i64) -> Result<()> {
    if db.get_database_backend() == DbBackend::Sqlite {
        return Ok(());
    }
    assignment_lock_query(assignment_id)
        .one(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("锁定作业失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 执行一轮评审分配
    ///
    /// 快照读取、配对计算与写入在同一事务内完成。事务先锁定作业行，
    /// (submission_id, reviewer_id) 唯一索引再兜底防止重复配对。
    pub async fn allocate_reviewers_impl(&self, assignment_id: i64) -> Result<AllocationOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("开启事务失败: {e}")))?;

        lock_assignment_row(&txn, assignment_id).await?;
        let assignment = load_assignment(&txn, assignment_id)
            .await?
            .ok_or_else(|| PeerReviewError::not_found(format!("作业 {assignment_id} 不存在")))?;
        let submissions = load_assignment_submissions(&txn, assignment_id).await?;
        let existing: Vec<_> = PeerReviews::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(&txn)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("查询评审列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_peer_review(Vec::new()))
            .collect();

        let plan = plan_allocation(&assignment, &submissions, &existing);
        if let Some(reason) = plan.skipped {
            txn.rollback()
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(AllocationOutcome::skipped(reason));
        }

        let now = chrono::Utc::now().timestamp();
        let mut created_models = Vec::with_capacity(plan.pairings.len());
        let mut targets = HashSet::new();

        for pairing in &plan.pairings {
            let model = ActiveModel {
                assignment_id: Set(assignment_id),
                submission_id: Set(pairing.submission_id),
                reviewer_id: Set(pairing.reviewer_id),
                is_completed: Set(false),
                assigned_at: Set(now),
                ..Default::default()
            };

            let inserted = PeerReviews::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::SubmissionId, Column::ReviewerId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("创建评审失败: {e}")))?;

            if inserted == 0 {
                debug!(
                    "评审配对已存在，跳过: submission={} reviewer={}",
                    pairing.submission_id, pairing.reviewer_id
                );
                continue;
            }

            let created = PeerReviews::find()
                .filter(Column::SubmissionId.eq(pairing.submission_id))
                .filter(Column::ReviewerId.eq(pairing.reviewer_id))
                .one(&txn)
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("查询评审失败: {e}")))?;
            if let Some(created) = created {
                created_models.push(created);
                targets.insert(pairing.submission_id);
            }
        }

        if !targets.is_empty() {
            Submissions::update_many()
                .col_expr(
                    SubmissionColumn::Status,
                    Expr::value(after_reviewer_assigned(SubmissionStatus::Submitted).to_string()),
                )
                .col_expr(SubmissionColumn::UpdatedAt, Expr::value(now))
                .filter(SubmissionColumn::Id.is_in(targets))
                .filter(SubmissionColumn::Status.eq(SubmissionStatus::Submitted.to_string()))
                .exec(&txn)
                .await
                .map_err(|e| PeerReviewError::database_operation(format!("更新提交状态失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(AllocationOutcome {
            created: created_models
                .into_iter()
                .map(|m| m.into_peer_review(Vec::new()))
                .collect(),
            under_reviewed: plan.under_reviewed,
            skipped: None,
        })
    }
}
