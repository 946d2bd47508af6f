use crate::i18n;
use clarity_core::{
    Controller, DismissReason, FlagName, FocusTarget, KeyValueStore, Notice, PanelState,
    PresentationSurface, SettingsRecord, Speaker,
};
use std::collections::BTreeMap;

/// A user gesture on the widget, already decoded from the DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TogglePanel,
    ClosePanel,
    Dismiss(DismissReason),
    SetFlag(FlagName, bool),
    IncreaseFont,
    DecreaseFont,
    ApplyPreset(&'static str),
    Reset,
    ReadPage,
    StopReading,
}

/// What the panel needs to draw itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayView {
    pub record: SettingsRecord,
    pub panel: PanelState,
    pub reading: bool,
}

impl OverlayView {
    #[must_use]
    pub fn of<Surf, Store, Sp>(ctl: &Controller<Surf, Store, Sp>) -> Self
    where
        Surf: PresentationSurface,
        Store: KeyValueStore,
        Sp: Speaker,
    {
        Self {
            record: *ctl.record(),
            panel: ctl.panel(),
            reading: ctl.reading().is_reading(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub focus: Option<FocusTarget>,
    pub notices: Vec<Notice>,
    pub view: OverlayView,
}

/// Route one intent to the controller and collect what the view must do next.
///
/// `page_text` is only evaluated for [`Intent::ReadPage`].
pub fn dispatch<Surf, Store, Sp>(
    ctl: &mut Controller<Surf, Store, Sp>,
    intent: Intent,
    page_text: impl FnOnce() -> String,
) -> Outcome
where
    Surf: PresentationSurface,
    Store: KeyValueStore,
    Sp: Speaker,
{
    log::debug!("intent {intent:?}");
    let focus = match intent {
        Intent::TogglePanel => ctl.toggle_panel(),
        Intent::ClosePanel => ctl.close(),
        Intent::Dismiss(reason) => ctl.dismiss(reason),
        Intent::SetFlag(flag, on) => {
            ctl.toggle_flag(flag, on);
            None
        }
        Intent::IncreaseFont => {
            ctl.increase_font();
            None
        }
        Intent::DecreaseFont => {
            ctl.decrease_font();
            None
        }
        Intent::ApplyPreset(name) => {
            ctl.apply_preset(name);
            None
        }
        Intent::Reset => {
            ctl.reset_all();
            None
        }
        Intent::ReadPage => {
            ctl.read_page(&page_text());
            None
        }
        Intent::StopReading => {
            ctl.stop_reading();
            None
        }
    };
    Outcome {
        focus,
        notices: ctl.drain_notices(),
        view: OverlayView::of(ctl),
    }
}

/// Localised text for a notice.
#[must_use]
pub fn notice_message(notice: Notice) -> String {
    match notice {
        Notice::PresetApplied { label_key, .. } => {
            let label = i18n::t(label_key);
            let mut args = BTreeMap::new();
            args.insert("preset", label.as_str());
            i18n::tr(notice.message_key(), Some(&args))
        }
        Notice::SettingsReset | Notice::SpeechUnavailable => i18n::t(notice.message_key()),
    }
}
