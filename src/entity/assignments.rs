//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub max_points: f64,
    pub reviews_required: i32,
    pub reviews_per_student: i32,
    pub anonymous_reviews: bool,
    pub peer_review_enabled: bool,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(
        self,
        criteria: Vec<super::criteria::Model>,
    ) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, AssignmentStatus};

        let mut criteria: Vec<_> = criteria.into_iter().map(|c| c.into_criterion()).collect();
        criteria.sort_by_key(|c| (c.position, c.id));

        Assignment {
            id: self.id,
            instructor_id: self.instructor_id,
            title: self.title,
            description: self.description,
            max_points: self.max_points,
            reviews_required: self.reviews_required,
            reviews_per_student: self.reviews_per_student,
            anonymous_reviews: self.anonymous_reviews,
            peer_review_enabled: self.peer_review_enabled,
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Draft),
            criteria,
            created_at: super::timestamp_to_utc(self.created_at),
            updated_at: super::timestamp_to_utc(self.updated_at),
        }
    }
}
