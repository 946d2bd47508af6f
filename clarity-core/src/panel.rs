//! Open/closed state of the overlay panel

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Where keyboard focus should land after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The panel's close control.
    CloseButton,
    /// The floating button that opens the panel.
    Launcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    OutsideClick,
}

impl PanelState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Closed → Open. Returns a focus hint only when the state changed.
    pub fn open(&mut self) -> Option<FocusTarget> {
        match self {
            Self::Closed => {
                *self = Self::Open;
                Some(FocusTarget::CloseButton)
            }
            Self::Open => None,
        }
    }

    /// Open → Closed. Returns a focus hint only when the state changed.
    pub fn close(&mut self) -> Option<FocusTarget> {
        match self {
            Self::Open => {
                *self = Self::Closed;
                Some(FocusTarget::Launcher)
            }
            Self::Closed => None,
        }
    }

    pub fn toggle(&mut self) -> Option<FocusTarget> {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Escape and outside clicks only ever close an open panel.
    pub fn dismiss(&mut self, reason: DismissReason) -> Option<FocusTarget> {
        log::trace!("panel dismiss requested: {reason:?}");
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_report_focus_only_on_change() {
        let mut panel = PanelState::default();
        assert_eq!(panel.close(), None);
        assert_eq!(panel.open(), Some(FocusTarget::CloseButton));
        assert_eq!(panel.open(), None);
        assert_eq!(panel.toggle(), Some(FocusTarget::Launcher));
        assert_eq!(panel, PanelState::Closed);
    }

    #[test]
    fn dismiss_is_ignored_while_closed() {
        let mut panel = PanelState::Closed;
        assert_eq!(panel.dismiss(DismissReason::Escape), None);
        panel.open();
        assert_eq!(
            panel.dismiss(DismissReason::OutsideClick),
            Some(FocusTarget::Launcher)
        );
        assert!(!panel.is_open());
    }
}
