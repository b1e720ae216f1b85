use egui::Color32;

// Dark theme colors
pub const BG_PRIMARY: Color32 = Color32::from_rgb(26, 32, 44);      // Main background
pub const BG_SECONDARY: Color32 = Color32::from_rgb(23, 25, 35);    // Side panels
pub const BG_PALETTE: Color32 = Color32::from_rgb(0, 0, 0);         // Action palette
pub const BG_ACCENT: Color32 = Color32::from_rgb(45, 55, 72);       // Hover states, avatars

pub const BORDER: Color32 = Color32::from_rgb(74, 85, 104);         // Palette border

pub const TEXT_NORMAL: Color32 = Color32::from_rgb(226, 232, 240);  // Primary text
pub const TEXT_MUTED: Color32 = Color32::from_rgb(160, 174, 192);   // Secondary text
pub const TEXT_LINK: Color32 = Color32::from_rgb(99, 179, 237);     // Links

pub const AUTHOR: Color32 = Color32::from_rgb(129, 140, 248);       // Author names
pub const GREEN: Color32 = Color32::from_rgb(72, 187, 120);         // Presence badge
pub const RED: Color32 = Color32::from_rgb(245, 101, 101);          // Errors, delete
