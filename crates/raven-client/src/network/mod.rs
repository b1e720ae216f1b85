mod api;
mod backend;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::MessageBackend;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use raven_protocol::{
    AddChannelMember, ChannelData, ChannelMembers, CreateReaction, EditMessage, Message, ToggleLike,
    CHANNEL_DOCTYPE, CHANNEL_MEMBER_DOCTYPE, GET_ACTIVE_USERS_METHOD, GET_CHANNEL_MEMBERS_METHOD,
    GET_MESSAGES_METHOD, MESSAGE_DOCTYPE, REACTION_DOCTYPE, TOGGLE_LIKE_METHOD,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ClientConfig;

#[derive(Clone)]
pub struct NetworkClient {
    http: reqwest::Client,
    server_url: Arc<RwLock<String>>,
    authorization: Arc<RwLock<Option<String>>>,
}

impl NetworkClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: Arc::new(RwLock::new(config.server_url.clone())),
            authorization: Arc::new(RwLock::new(config.authorization())),
        }
    }

    pub async fn server_url(&self) -> String {
        self.server_url.read().await.clone()
    }

    async fn get_authorization(&self) -> Option<String> {
        self.authorization.read().await.clone()
    }

    // Messages

    pub async fn get_messages(&self, channel_id: &str) -> Result<Vec<Message>> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::get_method(
            &self.http,
            &api::method_url(&server_url, GET_MESSAGES_METHOD),
            &[("channel_id", channel_id)],
            auth.as_deref(),
        )
        .await
    }

    // Channels

    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelData> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::get_doc(
            &self.http,
            &api::resource_url(&server_url, CHANNEL_DOCTYPE, Some(channel_id)),
            auth.as_deref(),
        )
        .await
    }

    // Members

    pub async fn get_channel_members(&self, channel_id: &str) -> Result<ChannelMembers> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::get_method(
            &self.http,
            &api::method_url(&server_url, GET_CHANNEL_MEMBERS_METHOD),
            &[("channel_id", channel_id)],
            auth.as_deref(),
        )
        .await
    }

    // Files

    /// Download an image and decode it to RGBA pixels
    pub async fn fetch_image(&self, file: &str) -> Result<DecodedImage> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;
        let url = resolve_file_url(&server_url, file);

        let bytes = api::get_bytes(&self.http, &url, auth.as_deref()).await?;
        decode_image(&bytes).with_context(|| format!("Failed to decode {}", url))
    }

    pub async fn get_active_users(&self) -> Result<Vec<String>> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::get_method(
            &self.http,
            &api::method_url(&server_url, GET_ACTIVE_USERS_METHOD),
            &[],
            auth.as_deref(),
        )
        .await
    }
}

#[async_trait]
impl MessageBackend for NetworkClient {
    async fn create_reaction(&self, reaction: CreateReaction) -> Result<()> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        tracing::debug!("Adding reaction {} to {}", reaction.reaction, reaction.message);
        api::create_doc(
            &self.http,
            &api::resource_url(&server_url, REACTION_DOCTYPE, None),
            &reaction,
            auth.as_deref(),
        )
        .await
    }

    async fn toggle_like(&self, request: ToggleLike) -> Result<()> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        tracing::debug!("Toggling like on {} ({:?})", request.name, request.add);
        api::post_method(
            &self.http,
            &api::method_url(&server_url, TOGGLE_LIKE_METHOD),
            &request,
            auth.as_deref(),
        )
        .await
    }

    async fn delete_message(&self, name: &str) -> Result<()> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::delete_doc(
            &self.http,
            &api::resource_url(&server_url, MESSAGE_DOCTYPE, Some(name)),
            auth.as_deref(),
        )
        .await
    }

    async fn edit_message(&self, name: &str, text: &str) -> Result<()> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::update_doc(
            &self.http,
            &api::resource_url(&server_url, MESSAGE_DOCTYPE, Some(name)),
            &EditMessage {
                text: text.to_string(),
            },
            auth.as_deref(),
        )
        .await
    }

    async fn add_channel_member(&self, request: AddChannelMember) -> Result<()> {
        let server_url = self.server_url().await;
        let auth = self.get_authorization().await;

        api::create_doc(
            &self.http,
            &api::resource_url(&server_url, CHANNEL_MEMBER_DOCTYPE, None),
            &request,
            auth.as_deref(),
        )
        .await
    }
}

/// RGBA8 pixels of a decoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedImage {
        size: [width as usize, height as usize],
        rgba: image.into_raw(),
    })
}

/// Absolute URL for a file path returned by the backend
pub fn resolve_file_url(server_url: &str, file: &str) -> String {
    if file.starts_with("http://") || file.starts_with("https://") {
        file.to_string()
    } else if file.starts_with('/') {
        format!("{}{}", server_url, file)
    } else {
        format!("{}/{}", server_url, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_file_url("http://localhost:8000", "/files/a.png"),
            "http://localhost:8000/files/a.png"
        );
        assert_eq!(
            resolve_file_url("http://localhost:8000", "files/a.png"),
            "http://localhost:8000/files/a.png"
        );
        assert_eq!(
            resolve_file_url("http://localhost:8000", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_decode_image() {
        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut png, image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_image(png.get_ref()).unwrap();
        assert_eq!(decoded.size, [3, 2]);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);

        assert!(decode_image(b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_client_uses_configured_server() {
        let config = ClientConfig::from_toml(r#"server_url = "https://chat.example.com/""#).unwrap();
        let client = NetworkClient::new(&config);
        assert_eq!(client.server_url().await, "https://chat.example.com");
        assert_eq!(client.get_authorization().await, None);
    }
}
