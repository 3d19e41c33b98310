//! 互评记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "peer_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub is_completed: bool,
    pub total_score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub strengths: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub improvements: Option<String>,
    pub helpfulness_rating: Option<i32>,
    pub assigned_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(has_many = "super::criteria_scores::Entity")]
    CriteriaScores,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::criteria_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CriteriaScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_peer_review(
        self,
        scores: Vec<super::criteria_scores::Model>,
    ) -> crate::models::peer_reviews::entities::PeerReview {
        use crate::models::peer_reviews::entities::{PeerReview, ReviewFeedback};

        PeerReview {
            id: self.id,
            assignment_id: self.assignment_id,
            submission_id: self.submission_id,
            reviewer_id: self.reviewer_id,
            is_completed: self.is_completed,
            total_score: self.total_score,
            feedback: ReviewFeedback {
                comment: self.comment,
                strengths: self.strengths,
                improvements: self.improvements,
            },
            criteria_scores: scores.into_iter().map(|s| s.into_criteria_score()).collect(),
            helpfulness_rating: self.helpfulness_rating,
            assigned_at: super::timestamp_to_utc(self.assigned_at),
            completed_at: self.completed_at.map(super::timestamp_to_utc),
        }
    }
}
