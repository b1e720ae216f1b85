use anyhow::{Context as _, Result};
use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::network::NetworkClient;
use crate::state::{AppState, NotificationLevel, Notifications, UiState};

use super::actions_palette::PaletteContext;
use super::avatars::AvatarCache;
use super::main_view::{MainView, Refresh};
use super::theme;

/// How often presence is polled
const PRESENCE_INTERVAL: Duration = Duration::from_secs(60);

pub struct RavenApp {
    state: AppState,
    network: NetworkClient,
    notifications: Notifications,
    runtime: tokio::runtime::Runtime,
    ui_state: UiState,
    main_view: MainView,
    last_presence_poll: Instant,
}

impl RavenApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Result<Self> {
        // Set up custom style
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.visuals.panel_fill = theme::BG_PRIMARY;
        cc.egui_ctx.set_style(style);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create Tokio runtime")?;

        let state = AppState::new();
        let network = NetworkClient::new(&config);
        let notifications = Notifications::new();
        let mut ui_state = UiState::load();

        let palette_ctx = PaletteContext {
            current_user: config.current_user.clone(),
            backend: Arc::new(network.clone()),
            notifications: notifications.clone(),
            runtime: runtime.handle().clone(),
            server_url: config.server_url.clone(),
        };

        let avatars = AvatarCache::new(network.clone(), runtime.handle().clone());

        let channel_id = config.startup_channel(ui_state.last_channel_id.as_deref());
        if ui_state.last_channel_id.as_deref() != Some(channel_id.as_str()) {
            ui_state.last_channel_id = Some(channel_id.clone());
            ui_state.save();
        }

        let app = Self {
            state,
            network,
            notifications,
            runtime,
            ui_state,
            main_view: MainView::new(palette_ctx, avatars),
            last_presence_poll: Instant::now(),
        };
        app.open_channel(&channel_id);

        Ok(app)
    }

    fn open_channel(&self, channel_id: &str) {
        tracing::info!("Opening channel {}", channel_id);
        let state = self.state.clone();
        self.runtime.block_on(async { state.select_channel(channel_id).await });

        let state = self.state.clone();
        let network = self.network.clone();
        let channel_id_owned = channel_id.to_string();
        self.runtime.spawn(async move {
            match network.get_channel(&channel_id_owned).await {
                Ok(channel) => state.set_channel(channel).await,
                Err(e) => tracing::warn!("Failed to load channel {}: {}", channel_id_owned, e),
            }
        });

        self.refresh_messages(channel_id);
        self.refresh_members(channel_id);
        self.refresh_presence();
    }

    fn refresh_messages(&self, channel_id: &str) {
        let state = self.state.clone();
        let network = self.network.clone();
        let channel_id = channel_id.to_string();

        self.runtime.spawn(async move {
            match network.get_messages(&channel_id).await {
                Ok(messages) => {
                    tracing::debug!("Loaded {} message(s) for {}", messages.len(), channel_id);
                    state.set_messages(&channel_id, messages).await;
                }
                Err(e) => {
                    tracing::error!("Failed to load messages: {}", e);
                    state.set_connection_error(format!("Could not load messages: {}", e)).await;
                }
            }
        });
    }

    fn refresh_members(&self, channel_id: &str) {
        let state = self.state.clone();
        let network = self.network.clone();
        let channel_id = channel_id.to_string();

        self.runtime.spawn(async move {
            match network.get_channel_members(&channel_id).await {
                Ok(members) => state.set_channel_members(&channel_id, members).await,
                Err(e) => tracing::warn!("Failed to load members of {}: {}", channel_id, e),
            }
        });
    }

    fn refresh_presence(&self) {
        let state = self.state.clone();
        let network = self.network.clone();

        self.runtime.spawn(async move {
            match network.get_active_users().await {
                Ok(users) => state.set_active_users(users).await,
                Err(e) => tracing::debug!("Failed to load active users: {}", e),
            }
        });
    }

    fn handle_refreshes(&mut self) {
        let refreshes = self.main_view.drain_refreshes();
        if refreshes.is_empty() {
            return;
        }

        let state = self.state.clone();
        let Some(channel_id) = self.runtime.block_on(async { state.read().await.current_channel_id.clone() }) else {
            return;
        };

        for refresh in refreshes {
            match refresh {
                Refresh::Messages => self.refresh_messages(&channel_id),
                Refresh::Members => self.refresh_members(&channel_id),
            }
        }
    }

    fn show_notifications(&self, ctx: &egui::Context) {
        let active = self.notifications.active(Instant::now());
        if active.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notifications"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                for (index, notification) in active.iter().enumerate() {
                    let color = match notification.level {
                        NotificationLevel::Info => theme::GREEN,
                        NotificationLevel::Error => theme::RED,
                    };

                    let response = egui::Frame::none()
                        .fill(theme::BG_SECONDARY)
                        .stroke(egui::Stroke::new(1.0, color))
                        .rounding(6.0)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(&notification.message).color(theme::TEXT_NORMAL));
                        })
                        .response
                        .interact(egui::Sense::click())
                        .on_hover_text("Dismiss");

                    if response.clicked() {
                        dismissed = Some(index);
                    }
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = dismissed {
            self.notifications.dismiss(index);
        }
    }
}

impl eframe::App for RavenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Request continuous repainting for real-time updates
        ctx.request_repaint();

        if self.last_presence_poll.elapsed() >= PRESENCE_INTERVAL {
            self.last_presence_poll = Instant::now();
            self.refresh_presence();
        }

        self.handle_refreshes();

        self.main_view
            .show(ctx, &self.state, &mut self.ui_state, &self.runtime);

        self.show_notifications(ctx);
    }
}
