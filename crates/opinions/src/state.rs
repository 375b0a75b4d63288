//! Application state with repository-based storage.
//!
//! Handlers reach the store only through the repository trait objects held
//! here. The backing store is chosen at compile time via feature flags.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use opinions_core::storage::{
    CommentRepository, OpinionRepository, ReactionRepository, StoreClient, StoreRepository,
};

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'dynamodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'dynamodb'");

/// Shared application state.
///
/// Cloned for each request handler. All three repositories share one store
/// client and one cancellation token.
#[derive(Clone)]
pub struct AppState {
    pub opinion_repo: Arc<dyn OpinionRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub reaction_repo: Arc<dyn ReactionRepository>,
    /// Root token every store call races against. Fired on shutdown.
    shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new AppState over the given store client.
    fn build(client: Arc<dyn StoreClient>, config: &Config) -> Self {
        let shutdown = CancellationToken::new();
        let repo = Arc::new(
            StoreRepository::new(client, config.tables.clone()).with_cancellation(shutdown.clone()),
        );

        Self {
            opinion_repo: repo.clone(),
            comment_repo: repo.clone(),
            reaction_repo: repo,
            shutdown,
        }
    }

    /// Cancels outstanding store calls. Later calls fail immediately.
    pub fn signal_shutdown(&self) {
        self.shutdown.cancel();
    }
}

// ============================================================================
// Factory functions for different backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use opinions_core::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState backed by a process-local store.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");

            let store = Arc::new(InMemoryStore::for_tables(&config.tables));

            Ok(Self::build(store, config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::dynamodb::DynamoDbStore;

    impl AppState {
        /// Creates AppState backed by DynamoDB.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()));

            if let Some(endpoint) = &config.aws_endpoint_url {
                tracing::info!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
                loader = loader.endpoint_url(endpoint);
            }

            let aws_config = loader.load().await;
            let store = Arc::new(DynamoDbStore::new(aws_sdk_dynamodb::Client::new(
                &aws_config,
            )));

            Ok(Self::build(store, config))
        }
    }
}
