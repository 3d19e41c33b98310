//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::criteria::{
    ActiveModel as CriterionActiveModel, Entity as Criteria, Model as CriterionModel,
};
pub use super::criteria_scores::{
    ActiveModel as CriteriaScoreActiveModel, Entity as CriteriaScores,
    Model as CriteriaScoreModel,
};
pub use super::peer_reviews::{
    ActiveModel as PeerReviewActiveModel, Entity as PeerReviews, Model as PeerReviewModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
