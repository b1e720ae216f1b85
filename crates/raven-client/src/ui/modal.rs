/// Which modal of a message's action palette is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalType {
    #[default]
    None,
    DeleteMessage,
    EditMessage,
    EmojiPicker,
}

/// Single-slot modal selector: opening a modal replaces the current one
#[derive(Debug, Default)]
pub struct ModalManager {
    modal_type: ModalType,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal_type(&self) -> ModalType {
        self.modal_type
    }

    pub fn open_modal(&mut self, modal: ModalType) {
        if self.modal_type != modal {
            tracing::trace!("Modal {:?} -> {:?}", self.modal_type, modal);
        }
        self.modal_type = modal;
    }

    pub fn close_modal(&mut self) {
        self.modal_type = ModalType::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let manager = ModalManager::new();
        assert_eq!(manager.modal_type(), ModalType::None);
    }

    #[test]
    fn test_opening_replaces_current_modal() {
        let mut manager = ModalManager::new();
        manager.open_modal(ModalType::EmojiPicker);
        manager.open_modal(ModalType::DeleteMessage);

        assert_eq!(manager.modal_type(), ModalType::DeleteMessage);

        manager.close_modal();
        assert_eq!(manager.modal_type(), ModalType::None);
    }
}
