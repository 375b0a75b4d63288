//! Store-backed repository implementation.
//!
//! Implements the repository traits on top of any [`StoreClient`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::opinion::{
    Comment, Coordinate, IdGenerator, Opinion, Reaction, ReactionInfo, UuidGenerator,
};

use super::conversions::{
    comment_to_item, is_reactioned, item_to_comment, item_to_opinion, opinion_to_item,
    reaction_to_item,
};
use super::item::{AttributeValue, KeyCondition};
use super::keys::{self, TableNames};
use super::pagination::{collect_pages, run_cancellable};
use super::store::StoreClient;
use super::traits::{CommentRepository, OpinionRepository, ReactionRepository};
use super::Result;

/// Repository for opinions, comments and reactions over a key-value store.
///
/// Holds no state besides its collaborators; cloning is cheap and clones
/// share the same store client.
#[derive(Clone)]
pub struct StoreRepository {
    client: Arc<dyn StoreClient>,
    tables: TableNames,
    ids: Arc<dyn IdGenerator>,
    cancel: CancellationToken,
}

impl StoreRepository {
    /// Creates a repository over the given store client and table layout.
    pub fn new(client: Arc<dyn StoreClient>, tables: TableNames) -> Self {
        Self {
            client,
            tables,
            ids: Arc::new(UuidGenerator),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Binds every store call of this repository to `cancel`.
    ///
    /// Once the token fires, in-flight and later calls fail with
    /// [`RepositoryError::Cancelled`](super::RepositoryError::Cancelled).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token store calls are raced against.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Get the table layout.
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    fn by_opinion(opinion_id: &str) -> KeyCondition {
        KeyCondition::equals(keys::OPINION_ID, AttributeValue::S(opinion_id.to_string()))
    }
}

// ============================================================================
// OpinionRepository implementation
// ============================================================================

#[async_trait]
impl OpinionRepository for StoreRepository {
    async fn save_opinion(
        &self,
        mail_address: &str,
        latitude: f64,
        longitude: f64,
        opinion: &str,
    ) -> Result<String> {
        let opinion = Opinion {
            id: self.ids.new_id(),
            mail_address: mail_address.to_string(),
            coordinate: Coordinate::new(latitude, longitude),
            opinion: opinion.to_string(),
        };

        run_cancellable(
            &self.cancel,
            self.client.put(&self.tables.opinions, opinion_to_item(&opinion)),
        )
        .await?;

        tracing::debug!(opinion_id = %opinion.id, "Stored opinion");
        Ok(opinion.id)
    }

    async fn list_opinions(&self) -> Result<Vec<Opinion>> {
        let client = self.client.as_ref();
        let table = self.tables.opinions.as_str();

        let items = collect_pages(&self.cancel, move |cursor| client.scan(table, cursor)).await?;

        items.iter().map(item_to_opinion).collect()
    }
}

// ============================================================================
// CommentRepository implementation
// ============================================================================

#[async_trait]
impl CommentRepository for StoreRepository {
    async fn save_comment(
        &self,
        opinion_id: &str,
        mail_address: &str,
        comment: &str,
    ) -> Result<String> {
        let comment = Comment {
            opinion_id: opinion_id.to_string(),
            comment_id: self.ids.new_id(),
            mail_address: mail_address.to_string(),
            comment: comment.to_string(),
            created_date_time: Utc::now(),
        };

        run_cancellable(
            &self.cancel,
            self.client.put(&self.tables.comments, comment_to_item(&comment)),
        )
        .await?;

        tracing::debug!(
            opinion_id = %comment.opinion_id,
            comment_id = %comment.comment_id,
            "Stored comment"
        );
        Ok(comment.comment_id)
    }

    async fn list_comments(&self, opinion_id: &str) -> Result<Vec<Comment>> {
        let client = self.client.as_ref();
        let table = self.tables.comments.as_str();
        let index = self.tables.comments_by_created.as_str();
        let condition = &Self::by_opinion(opinion_id);

        let items = collect_pages(&self.cancel, move |cursor| {
            client.query(table, Some(index), condition, cursor)
        })
        .await?;

        items.iter().map(item_to_comment).collect()
    }
}

// ============================================================================
// ReactionRepository implementation
// ============================================================================

#[async_trait]
impl ReactionRepository for StoreRepository {
    async fn save_reaction(
        &self,
        opinion_id: &str,
        mail_address: &str,
        is_reactioned: bool,
    ) -> Result<Reaction> {
        let reaction = Reaction {
            opinion_id: opinion_id.to_string(),
            mail_address: mail_address.to_string(),
            is_reactioned,
        };

        run_cancellable(
            &self.cancel,
            self.client.put(&self.tables.reactions, reaction_to_item(&reaction)),
        )
        .await?;

        tracing::debug!(opinion_id, is_reactioned, "Stored reaction");
        Ok(reaction)
    }

    async fn get_reaction_info(
        &self,
        opinion_id: &str,
        mail_address: &str,
    ) -> Result<ReactionInfo> {
        let client = self.client.as_ref();
        let table = self.tables.reactions.as_str();

        // Two independent reads; a write landing in between can make them disagree.
        let own = run_cancellable(
            &self.cancel,
            client.get(table, keys::reaction_key(opinion_id, mail_address)),
        )
        .await?;
        let own_reaction = match own {
            Some(item) => is_reactioned(&item)?,
            None => false,
        };

        let condition = &Self::by_opinion(opinion_id);
        let rows = collect_pages(&self.cancel, move |cursor| {
            client.query(table, None, condition, cursor)
        })
        .await?;

        let mut reaction_count = 0_u32;
        for row in &rows {
            if is_reactioned(row)? {
                reaction_count += 1;
            }
        }

        Ok(ReactionInfo {
            is_reactioned: own_reaction,
            reaction_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::item::{Cursor, Item, Page};
    use crate::storage::{DecodeError, InMemoryStore, RepositoryError};

    /// Hands out `id-1`, `id-2`, ...
    #[derive(Default)]
    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn new_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// A store whose every call fails.
    struct UnreachableStore;

    #[async_trait]
    impl StoreClient for UnreachableStore {
        async fn put(&self, _table: &str, _item: Item) -> Result<()> {
            Err(RepositoryError::ConnectionFailed("connection refused".to_string()))
        }

        async fn get(&self, _table: &str, _key: Item) -> Result<Option<Item>> {
            Err(RepositoryError::ConnectionFailed("connection refused".to_string()))
        }

        async fn query(
            &self,
            _table: &str,
            _index: Option<&str>,
            _condition: &KeyCondition,
            _cursor: Option<Cursor>,
        ) -> Result<Page> {
            Err(RepositoryError::ConnectionFailed("connection refused".to_string()))
        }

        async fn scan(&self, _table: &str, _cursor: Option<Cursor>) -> Result<Page> {
            Err(RepositoryError::ConnectionFailed("connection refused".to_string()))
        }
    }

    fn setup(page_size: usize) -> (InMemoryStore, StoreRepository) {
        let store = InMemoryStore::default().with_page_size(page_size);
        let repo = StoreRepository::new(Arc::new(store.clone()), TableNames::default());
        (store, repo)
    }

    #[tokio::test]
    async fn test_save_then_list_opinion() {
        let (_, repo) = setup(2);
        let repo = repo.with_id_generator(Arc::new(SequentialIds::default()));

        let id = repo
            .save_opinion("a@x.com", 35.0, 139.0, "hello")
            .await
            .unwrap();
        let opinions = repo.list_opinions().await.unwrap();

        assert_eq!(id, "id-1");
        assert_eq!(
            opinions,
            vec![Opinion {
                id: "id-1".to_string(),
                mail_address: "a@x.com".to_string(),
                coordinate: Coordinate::new(35.0, 139.0),
                opinion: "hello".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_generated_opinion_id_is_uuid() {
        let (_, repo) = setup(2);

        let id = repo.save_opinion("a@x.com", 1.5, -2.5, "x").await.unwrap();

        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_list_opinions_spans_pages() {
        let (_, repo) = setup(2);

        let mut saved = Vec::new();
        for n in 0..5 {
            let id = repo
                .save_opinion("a@x.com", f64::from(n), f64::from(n), &format!("opinion {n}"))
                .await
                .unwrap();
            saved.push(id);
        }

        let mut listed: Vec<String> = repo
            .list_opinions()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        listed.sort();
        saved.sort();

        assert_eq!(listed, saved);
    }

    #[tokio::test]
    async fn test_list_opinions_aborts_on_bad_row() {
        let (store, repo) = setup(2);
        repo.save_opinion("a@x.com", 35.0, 139.0, "fine")
            .await
            .unwrap();
        store
            .put(
                "opinions",
                HashMap::from([("id".to_string(), AttributeValue::S("broken".to_string()))]),
            )
            .await
            .unwrap();

        let err = repo.list_opinions().await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Decode {
                entity_type: "Opinion",
                source: DecodeError::MissingField { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_comments_are_distinct_and_ordered() {
        let (_, repo) = setup(2);

        let mut ids = Vec::new();
        for n in 0..5 {
            ids.push(
                repo.save_comment("op-1", "b@x.com", &format!("comment {n}"))
                    .await
                    .unwrap(),
            );
        }
        repo.save_comment("op-2", "b@x.com", "elsewhere")
            .await
            .unwrap();

        let comments = repo.list_comments("op-1").await.unwrap();

        assert_eq!(comments.len(), 5);
        assert!(comments.iter().all(|c| c.opinion_id == "op-1"));
        assert!(comments
            .windows(2)
            .all(|w| w[0].created_date_time <= w[1].created_date_time));

        let mut listed: Vec<String> = comments.into_iter().map(|c| c.comment_id).collect();
        listed.sort();
        listed.dedup();
        ids.sort();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_list_comments_for_unknown_opinion_is_empty() {
        let (_, repo) = setup(2);
        assert!(repo.list_comments("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_comments_aborts_on_bad_timestamp() {
        let (store, repo) = setup(2);
        repo.save_comment("op-1", "b@x.com", "fine").await.unwrap();
        store
            .put(
                "comments",
                HashMap::from([
                    ("opinionId".to_string(), AttributeValue::S("op-1".to_string())),
                    ("commentId".to_string(), AttributeValue::S("c-bad".to_string())),
                    ("mailAddress".to_string(), AttributeValue::S("b@x.com".to_string())),
                    ("comment".to_string(), AttributeValue::S("bad".to_string())),
                    (
                        "createdDateTime".to_string(),
                        AttributeValue::S("9999-99-99".to_string()),
                    ),
                ]),
            )
            .await
            .unwrap();

        let err = repo.list_comments("op-1").await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Decode {
                entity_type: "Comment",
                source: DecodeError::Malformed {
                    field: "createdDateTime",
                    ..
                }
            }
        ));
    }

    #[tokio::test]
    async fn test_reaction_upsert_keeps_one_row() {
        let (store, repo) = setup(2);

        repo.save_reaction("op-1", "u1", true).await.unwrap();
        let reaction = repo.save_reaction("op-1", "u1", false).await.unwrap();

        assert_eq!(store.row_count("reactions").await, 1);
        assert!(!reaction.is_reactioned);
        let info = repo.get_reaction_info("op-1", "u1").await.unwrap();
        assert!(!info.is_reactioned);
        assert_eq!(info.reaction_count, 0);
    }

    #[tokio::test]
    async fn test_reaction_info_scenario() {
        let (_, repo) = setup(1);

        repo.save_reaction("I1", "u1", true).await.unwrap();
        repo.save_reaction("I1", "u2", true).await.unwrap();
        repo.save_reaction("I1", "u1", false).await.unwrap();

        let info = repo.get_reaction_info("I1", "u1").await.unwrap();

        assert_eq!(
            info,
            ReactionInfo {
                is_reactioned: false,
                reaction_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_reaction_info_for_user_who_never_reacted() {
        let (_, repo) = setup(2);
        for user in ["u1", "u2", "u3"] {
            repo.save_reaction("op-1", user, true).await.unwrap();
        }
        repo.save_reaction("op-2", "u4", true).await.unwrap();

        let info = repo.get_reaction_info("op-1", "stranger").await.unwrap();

        assert!(!info.is_reactioned);
        assert_eq!(info.reaction_count, 3);
    }

    #[tokio::test]
    async fn test_reaction_info_for_own_reaction() {
        let (_, repo) = setup(2);
        repo.save_reaction("op-1", "u1", true).await.unwrap();

        let info = repo.get_reaction_info("op-1", "u1").await.unwrap();

        assert!(info.is_reactioned);
        assert_eq!(info.reaction_count, 1);
    }

    #[tokio::test]
    async fn test_store_errors_surface_unchanged() {
        let repo = StoreRepository::new(Arc::new(UnreachableStore), TableNames::default());
        let expected = RepositoryError::ConnectionFailed("connection refused".to_string());

        assert_eq!(
            repo.save_opinion("a@x.com", 0.0, 0.0, "x").await.unwrap_err(),
            expected
        );
        assert_eq!(repo.list_opinions().await.unwrap_err(), expected);
        assert_eq!(
            repo.save_comment("op-1", "a@x.com", "x").await.unwrap_err(),
            expected
        );
        assert_eq!(repo.list_comments("op-1").await.unwrap_err(), expected);
        assert_eq!(
            repo.save_reaction("op-1", "u1", true).await.unwrap_err(),
            expected
        );
        assert_eq!(
            repo.get_reaction_info("op-1", "u1").await.unwrap_err(),
            expected
        );
    }

    #[tokio::test]
    async fn test_cancelled_repository_stops() {
        let (store, repo) = setup(2);
        let cancel = CancellationToken::new();
        let repo = repo.with_cancellation(cancel.clone());
        repo.save_opinion("a@x.com", 1.0, 2.0, "kept").await.unwrap();

        cancel.cancel();

        assert_eq!(
            repo.list_opinions().await.unwrap_err(),
            RepositoryError::Cancelled
        );
        assert_eq!(
            repo.save_opinion("a@x.com", 1.0, 2.0, "dropped")
                .await
                .unwrap_err(),
            RepositoryError::Cancelled
        );
        assert_eq!(store.row_count("opinions").await, 1);
    }
}
