pub mod actions_palette;
mod add_members;
mod app;
mod avatars;
mod chat;
mod emoji_button;
pub mod emoji_picker;
#[cfg(test)]
mod headless;
mod main_view;
mod member_list;
pub mod members_button;
mod message_modals;
pub mod modal;
pub mod theme;

pub use actions_palette::{ActionsPalette, PaletteAction, PaletteContext, PaletteEvent, PaletteProps};
pub use app::RavenApp;
pub use members_button::{MembersButtonEvent, ViewOrAddMembersButton};
