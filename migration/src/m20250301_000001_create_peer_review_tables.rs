use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::MaxPoints).double().not_null())
                    .col(
                        ColumnDef::new(Assignments::ReviewsRequired)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::ReviewsPerStudent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AnonymousReviews)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Assignments::PeerReviewEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分维度表
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Criteria::Name).string().not_null())
                    .col(ColumnDef::new(Criteria::Description).text().null())
                    .col(ColumnDef::new(Criteria::MaxScore).double().not_null())
                    .col(ColumnDef::new(Criteria::Weight).double().not_null())
                    .col(ColumnDef::new(Criteria::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Criteria::Table, Criteria::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::PeerScore).double().null())
                    .col(ColumnDef::new(Submissions::InstructorScore).double().null())
                    .col(ColumnDef::new(Submissions::InstructorFeedback).text().null())
                    .col(ColumnDef::new(Submissions::FinalScore).double().null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建互评记录表
        manager
            .create_table(
                Table::create()
                    .table(PeerReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeerReviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::ReviewerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PeerReviews::TotalScore).double().null())
                    .col(ColumnDef::new(PeerReviews::Comment).text().null())
                    .col(ColumnDef::new(PeerReviews::Strengths).text().null())
                    .col(ColumnDef::new(PeerReviews::Improvements).text().null())
                    .col(
                        ColumnDef::new(PeerReviews::HelpfulnessRating)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PeerReviews::CompletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PeerReviews::Table, PeerReviews::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PeerReviews::Table, PeerReviews::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分维度得分表
        manager
            .create_table(
                Table::create()
                    .table(CriteriaScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CriteriaScores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CriteriaScores::ReviewId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CriteriaScores::CriterionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CriteriaScores::Score).double().not_null())
                    .col(ColumnDef::new(CriteriaScores::Comment).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CriteriaScores::Table, CriteriaScores::ReviewId)
                            .to(PeerReviews::Table, PeerReviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CriteriaScores::Table, CriteriaScores::CriterionId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 每个学生在同一作业下只有一份提交
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        // 同一评审人对同一提交只能分配一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_peer_reviews_submission_reviewer")
                    .table(PeerReviews::Table)
                    .col(PeerReviews::SubmissionId)
                    .col(PeerReviews::ReviewerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_criteria_scores_review_criterion")
                    .table(CriteriaScores::Table)
                    .col(CriteriaScores::ReviewId)
                    .col(CriteriaScores::CriterionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_criteria_assignment_id")
                    .table(Criteria::Table)
                    .col(Criteria::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_peer_reviews_assignment_reviewer")
                    .table(PeerReviews::Table)
                    .col(PeerReviews::AssignmentId)
                    .col(PeerReviews::ReviewerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(CriteriaScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PeerReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    InstructorId,
    Title,
    Description,
    MaxPoints,
    ReviewsRequired,
    ReviewsPerStudent,
    AnonymousReviews,
    PeerReviewEnabled,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    AssignmentId,
    Name,
    Description,
    MaxScore,
    Weight,
    Position,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    Status,
    PeerScore,
    InstructorScore,
    InstructorFeedback,
    FinalScore,
    SubmittedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PeerReviews {
    #[sea_orm(iden = "peer_reviews")]
    Table,
    Id,
    AssignmentId,
    SubmissionId,
    ReviewerId,
    IsCompleted,
    TotalScore,
    Comment,
    Strengths,
    Improvements,
    HelpfulnessRating,
    AssignedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum CriteriaScores {
    #[sea_orm(iden = "criteria_scores")]
    Table,
    Id,
    ReviewId,
    CriterionId,
    Score,
    Comment,
}
