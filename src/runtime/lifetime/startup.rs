use crate::config::AppConfig;
use crate::services::{PeerReviewService, TracingNotifier};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub service: Arc<PeerReviewService>,
}

/// 准备服务器启动的上下文
/// 包括存储（含迁移）和互评服务
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let service = Arc::new(PeerReviewService::new(
        storage,
        Arc::new(TracingNotifier),
        &config.peer_review,
    ));
    debug!(
        "Peer review service ready (auto_allocate_on_submit = {})",
        config.peer_review.auto_allocate_on_submit
    );

    StartupContext { service }
}
