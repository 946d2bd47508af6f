mod focus;
mod host;
mod intent;
mod panel;

pub use focus::{focus_node, keydown_handler};
pub use host::{OverlayProps, OverlayWidget, PageController};
pub use intent::{Intent, Outcome, OverlayView, dispatch, notice_message};
pub use panel::{OverlayPanel, Props as OverlayPanelProps};
