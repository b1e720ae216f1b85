use anyhow::Result;
use async_trait::async_trait;
use raven_protocol::{AddChannelMember, CreateReaction, ToggleLike};

/// Persistent actions the UI delegates to the server.
///
/// Implemented by [`super::NetworkClient`]; components only see this trait
/// so they can be exercised without a live backend.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    /// Create a `Raven Message Reaction` document
    async fn create_reaction(&self, reaction: CreateReaction) -> Result<()>;

    /// Flip the like flag of a document
    async fn toggle_like(&self, request: ToggleLike) -> Result<()>;

    async fn delete_message(&self, name: &str) -> Result<()>;

    /// Replace the text of a text message
    async fn edit_message(&self, name: &str, text: &str) -> Result<()>;

    async fn add_channel_member(&self, request: AddChannelMember) -> Result<()>;
}
