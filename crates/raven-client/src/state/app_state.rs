use std::sync::Arc;
use tokio::sync::RwLock;

use raven_protocol::{ChannelData, ChannelMembers, Message};

#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<RwLock<AppStateInner>>,
}

#[derive(Debug, Default)]
pub struct AppStateInner {
    // Channel
    pub current_channel_id: Option<String>,
    pub channel_data: Option<ChannelData>,
    pub channel_members: ChannelMembers,

    // Messages of the current channel, oldest first
    pub messages: Vec<Message>,

    // Presence
    pub active_users: Vec<String>,

    // Connection state
    pub is_loading: bool,
    pub connection_error: Option<String>,
}

/// Channel metadata and membership, as read by channel header components
#[derive(Debug, Clone, Default)]
pub struct ChannelContext {
    pub channel_data: Option<ChannelData>,
    pub channel_members: ChannelMembers,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::default())),
        }
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppStateInner> {
        self.inner.read().await
    }

    pub async fn select_channel(&self, channel_id: &str) {
        let mut state = self.inner.write().await;
        if state.current_channel_id.as_deref() == Some(channel_id) {
            return;
        }
        state.current_channel_id = Some(channel_id.to_string());
        state.channel_data = None;
        state.channel_members.clear();
        state.messages.clear();
        state.is_loading = true;
    }

    pub async fn set_messages(&self, channel_id: &str, messages: Vec<Message>) {
        let mut state = self.inner.write().await;
        // Responses for a channel we already left are stale
        if state.current_channel_id.as_deref() != Some(channel_id) {
            return;
        }
        state.messages = messages;
        state.is_loading = false;
        state.connection_error = None;
    }

    pub async fn set_channel(&self, channel: ChannelData) {
        let mut state = self.inner.write().await;
        if state.current_channel_id.as_deref() == Some(channel.name.as_str()) {
            state.channel_data = Some(channel);
        }
    }

    pub async fn set_channel_members(&self, channel_id: &str, members: ChannelMembers) {
        let mut state = self.inner.write().await;
        if state.current_channel_id.as_deref() == Some(channel_id) {
            state.channel_members = members;
        }
    }

    pub async fn set_active_users(&self, users: Vec<String>) {
        self.inner.write().await.active_users = users;
    }

    pub async fn set_connection_error(&self, error: String) {
        let mut state = self.inner.write().await;
        state.connection_error = Some(error);
        state.is_loading = false;
    }

}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStateInner {
    pub fn channel_context(&self) -> ChannelContext {
        ChannelContext {
            channel_data: self.channel_data.clone(),
            channel_members: self.channel_members.clone(),
        }
    }
}
