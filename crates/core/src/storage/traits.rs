use async_trait::async_trait;

use crate::opinion::{Comment, Opinion, Reaction, ReactionInfo};

use super::Result;

/// Repository for opinion operations.
#[async_trait]
pub trait OpinionRepository: Send + Sync {
    /// Stores a new opinion and returns its generated ID.
    async fn save_opinion(
        &self,
        mail_address: &str,
        latitude: f64,
        longitude: f64,
        opinion: &str,
    ) -> Result<String>;

    /// Lists every stored opinion.
    async fn list_opinions(&self) -> Result<Vec<Opinion>>;
}

/// Repository for comment operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a new comment on an opinion and returns its generated ID.
    async fn save_comment(&self, opinion_id: &str, mail_address: &str, comment: &str)
        -> Result<String>;

    /// Lists the comments of an opinion, oldest first.
    async fn list_comments(&self, opinion_id: &str) -> Result<Vec<Comment>>;
}

/// Repository for reaction operations.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Sets a user's reaction on an opinion, replacing any previous value.
    async fn save_reaction(
        &self,
        opinion_id: &str,
        mail_address: &str,
        is_reactioned: bool,
    ) -> Result<Reaction>;

    /// Gets the user's reaction state together with the opinion's reaction count.
    ///
    /// A user who never reacted is reported as not reacting.
    async fn get_reaction_info(&self, opinion_id: &str, mail_address: &str)
        -> Result<ReactionInfo>;
}
