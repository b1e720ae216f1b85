//! In-memory backend for component tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use raven_protocol::{AddChannelMember, CreateReaction, ToggleLike};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::MessageBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateReaction(CreateReaction),
    ToggleLike(ToggleLike),
    DeleteMessage(String),
    EditMessage { name: String, text: String },
    AddChannelMember(AddChannelMember),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Succeed,
    Fail,
    /// Record the call, then succeed after a delay
    Delay(Duration),
}

/// Records every call on a channel and answers according to its mode
pub struct RecordingBackend {
    calls: mpsc::UnboundedSender<BackendCall>,
    mode: Mode,
}

impl RecordingBackend {
    fn with_mode(mode: Mode) -> (Arc<Self>, mpsc::UnboundedReceiver<BackendCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls: tx, mode }), rx)
    }

    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<BackendCall>) {
        Self::with_mode(Mode::Succeed)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<BackendCall>) {
        Self::with_mode(Mode::Fail)
    }

    pub fn delayed(delay: Duration) -> (Arc<Self>, mpsc::UnboundedReceiver<BackendCall>) {
        Self::with_mode(Mode::Delay(delay))
    }

    async fn answer(&self, call: BackendCall) -> Result<()> {
        let _ = self.calls.send(call);
        match self.mode {
            Mode::Succeed => Ok(()),
            Mode::Fail => Err(anyhow!("backend unavailable")),
            Mode::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl MessageBackend for RecordingBackend {
    async fn create_reaction(&self, reaction: CreateReaction) -> Result<()> {
        self.answer(BackendCall::CreateReaction(reaction)).await
    }

    async fn toggle_like(&self, request: ToggleLike) -> Result<()> {
        self.answer(BackendCall::ToggleLike(request)).await
    }

    async fn delete_message(&self, name: &str) -> Result<()> {
        self.answer(BackendCall::DeleteMessage(name.to_string())).await
    }

    async fn edit_message(&self, name: &str, text: &str) -> Result<()> {
        self.answer(BackendCall::EditMessage {
            name: name.to_string(),
            text: text.to_string(),
        })
        .await
    }

    async fn add_channel_member(&self, request: AddChannelMember) -> Result<()> {
        self.answer(BackendCall::AddChannelMember(request)).await
    }
}
