//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::criteria::{
    ActiveModel as CriterionActiveModel, Column as CriterionColumn, Entity as Criteria,
};
use crate::errors::{PeerReviewError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::CreateAssignmentRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 读取作业及其评分维度
pub(super) async fn load_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
) -> Result<Option<Assignment>> {
    let Some(model) = Assignments::find_by_id(assignment_id)
        .one(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询作业失败: {e}")))?
    else {
        return Ok(None);
    };

    let criteria = Criteria::find()
        .filter(CriterionColumn::AssignmentId.eq(assignment_id))
        .order_by_asc(CriterionColumn::Position)
        .all(db)
        .await
        .map_err(|e| PeerReviewError::database_operation(format!("查询评分维度失败: {e}")))?;

    Ok(Some(model.into_assignment(criteria)))
}

impl SeaOrmStorage {
    /// 创建作业，评分维度在同一事务内写入
    pub async fn create_assignment_impl(
        &self,
        instructor_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            instructor_id: Set(instructor_id),
            title: Set(req.title),
            description: Set(req.description),
            max_points: Set(req
                .max_points
                .unwrap_or(CreateAssignmentRequest::DEFAULT_MAX_POINTS)),
            reviews_required: Set(req
                .reviews_required
                .unwrap_or(CreateAssignmentRequest::DEFAULT_REVIEWS_REQUIRED)),
            reviews_per_student: Set(req
                .reviews_per_student
                .unwrap_or(CreateAssignmentRequest::DEFAULT_REVIEWS_PER_STUDENT)),
            anonymous_reviews: Set(req.anonymous_reviews.unwrap_or(true)),
            peer_review_enabled: Set(req.peer_review_enabled.unwrap_or(true)),
            status: Set(AssignmentStatus::Draft.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let assignment = model
            .insert(&txn)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("创建作业失败: {e}")))?;

        let mut criteria = Vec::with_capacity(req.criteria.len());
        for (position, input) in req.criteria.into_iter().enumerate() {
            let criterion = CriterionActiveModel {
                assignment_id: Set(assignment.id),
                name: Set(input.name),
                description: Set(input.description),
                max_score: Set(input.max_score),
                weight: Set(input
                    .weight
                    .unwrap_or(CreateAssignmentRequest::DEFAULT_CRITERION_WEIGHT)),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("创建评分维度失败: {e}")))?;
            criteria.push(criterion);
        }

        txn.commit()
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(assignment.into_assignment(criteria))
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        load_assignment(&self.db, assignment_id).await
    }

    /// 变更作业状态，仅当当前状态与 expected 一致时生效
    pub async fn update_assignment_status_impl(
        &self,
        assignment_id: i64,
        expected: AssignmentStatus,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(status.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(assignment_id))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("更新作业状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        load_assignment(&self.db, assignment_id).await
    }
}
