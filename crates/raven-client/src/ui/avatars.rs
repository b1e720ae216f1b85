//! Texture cache for member avatar images

use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;

use crate::network::{DecodedImage, NetworkClient};
use crate::tasks::TaskScope;

/// Decoded images waiting to be uploaded; `None` marks a failed download
type LoadedImages = Arc<Mutex<HashMap<String, Option<DecodedImage>>>>;

fn lock(loaded: &LoadedImages) -> MutexGuard<'_, HashMap<String, Option<DecodedImage>>> {
    loaded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct AvatarCache {
    network: NetworkClient,
    tasks: TaskScope,
    textures: HashMap<String, egui::TextureHandle>,
    /// Files already requested, including failed ones
    requested: HashSet<String>,
    loaded: LoadedImages,
}

impl AvatarCache {
    pub fn new(network: NetworkClient, runtime: Handle) -> Self {
        Self {
            network,
            tasks: TaskScope::new(runtime),
            textures: HashMap::new(),
            requested: HashSet::new(),
            loaded: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Texture for an avatar file, or `None` while it loads or when it failed.
    ///
    /// The first call for a file starts the download.
    pub fn texture(&mut self, ctx: &egui::Context, file: &str) -> Option<egui::TextureId> {
        if file.is_empty() {
            return None;
        }
        if let Some(texture) = self.textures.get(file) {
            return Some(texture.id());
        }

        let loaded = lock(&self.loaded).remove(file);
        match loaded {
            Some(Some(image)) => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.rgba);
                let texture = ctx.load_texture(file, color_image, egui::TextureOptions::LINEAR);
                let id = texture.id();
                self.textures.insert(file.to_string(), texture);
                Some(id)
            }
            Some(None) => None,
            None => {
                if self.requested.insert(file.to_string()) {
                    self.request(file);
                }
                None
            }
        }
    }

    fn request(&mut self, file: &str) {
        let network = self.network.clone();
        let loaded = self.loaded.clone();
        let file = file.to_string();

        self.tasks.spawn(async move {
            let image = match network.fetch_image(&file).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::debug!("Failed to load avatar {}: {}", file, e);
                    None
                }
            };
            lock(&loaded).insert(file, image);
        });
    }
}

/// Paint an avatar image into `rect`
pub fn paint_avatar(painter: &egui::Painter, rect: egui::Rect, texture: egui::TextureId) {
    painter.image(
        texture,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn cache() -> AvatarCache {
        AvatarCache::new(NetworkClient::new(&ClientConfig::default()), Handle::current())
    }

    #[tokio::test]
    async fn test_decoded_image_becomes_texture() {
        let ctx = egui::Context::default();
        let mut avatars = cache();
        lock(&avatars.loaded).insert(
            "/files/u1.png".to_string(),
            Some(DecodedImage {
                size: [1, 1],
                rgba: vec![255, 0, 0, 255],
            }),
        );

        let first = avatars.texture(&ctx, "/files/u1.png");
        assert!(first.is_some());
        assert_eq!(avatars.texture(&ctx, "/files/u1.png"), first);
        assert!(avatars.requested.is_empty());
    }

    #[tokio::test]
    async fn test_failed_image_is_not_requested_again() {
        let ctx = egui::Context::default();
        let mut avatars = cache();
        avatars.requested.insert("/files/broken.png".to_string());
        lock(&avatars.loaded).insert("/files/broken.png".to_string(), None);

        assert_eq!(avatars.texture(&ctx, "/files/broken.png"), None);
        assert_eq!(avatars.texture(&ctx, "/files/broken.png"), None);
        assert_eq!(avatars.tasks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_is_ignored() {
        let ctx = egui::Context::default();
        let mut avatars = cache();
        assert_eq!(avatars.texture(&ctx, ""), None);
        assert!(avatars.requested.is_empty());
    }
}
