pub mod notifications;
pub mod peer_reviews;

pub use notifications::{Notifier, TracingNotifier};
pub use peer_reviews::PeerReviewService;
