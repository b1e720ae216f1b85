use eframe::egui;

/// A small button labelled with an emoji, with a tooltip
pub struct EmojiButton<'a> {
    emoji: &'a str,
    label: &'a str,
}

impl<'a> EmojiButton<'a> {
    pub fn new(emoji: &'a str, label: &'a str) -> Self {
        Self { emoji, label }
    }

    /// Render the button and call `on_click` when it is pressed
    pub fn show(self, ui: &mut egui::Ui, on_click: impl FnOnce()) -> egui::Response {
        let response = ui
            .add(egui::Button::new(egui::RichText::new(self.emoji).size(15.0)).small())
            .on_hover_text(self.label);

        if response.clicked() {
            on_click();
        }

        response
    }
}
