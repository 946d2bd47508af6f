use clarity_core::{
    Controller, FlagName, FontScale, MemoryStore, NoSpeech, PanelState, RecordingSurface,
    SettingsRecord, WidgetProfile,
};
use clarity_web::widget::{OverlayPanel, OverlayPanelProps, OverlayView};
use clarity_web::{OverlayProps, OverlayWidget, i18n};
use futures::executor::block_on;
use std::rc::Rc;
use yew::{AttrValue, Callback, LocalServerRenderer};

fn render_panel(profile: WidgetProfile, view: OverlayView, toast: Option<&'static str>) -> String {
    let props = OverlayPanelProps {
        profile: Rc::new(profile),
        view,
        on_intent: Callback::noop(),
        toast: toast.map(AttrValue::from),
        root_ref: Default::default(),
        launcher_ref: Default::default(),
        close_ref: Default::default(),
    };
    block_on(LocalServerRenderer::<OverlayPanel>::with_props(props).render())
}

fn open_view(record: SettingsRecord) -> OverlayView {
    OverlayView {
        record,
        panel: PanelState::Open,
        reading: false,
    }
}

#[test]
fn closed_panel_is_hidden_from_assistive_tech() {
    i18n::set_lang("en");
    let html = render_panel(WidgetProfile::modern(), OverlayView::default(), None);
    assert!(html.contains("aria-expanded=\"false\""));
    assert!(html.contains("aria-hidden=\"true\""));
    assert!(html.contains("Open accessibility menu"));
    assert!(html.contains("id=\"clarity-live\""));
}

#[test]
fn open_panel_reflects_record() {
    i18n::set_lang("en");
    let mut record = SettingsRecord {
        font_scale: FontScale::clamped(130),
        ..SettingsRecord::default()
    };
    record.set_flag(FlagName::UnderlineLinks, true);
    let html = render_panel(WidgetProfile::modern(), open_view(record), None);

    assert!(html.contains("aria-expanded=\"true\""));
    assert!(html.contains("130%"));
    assert!(html.contains("Underline links"));
    assert!(html.contains("Stop animations"));
    for preset in ["dyslexia", "vision", "cognitive"] {
        assert!(html.contains(&format!("data-preset=\"{preset}\"")), "{preset}");
    }
}

#[test]
fn every_rendered_preset_is_accepted_by_the_controller() {
    i18n::set_lang("en");
    let html = render_panel(
        WidgetProfile::classic(),
        open_view(SettingsRecord::default()),
        None,
    );
    let mut ctl = Controller::start(
        WidgetProfile::classic(),
        RecordingSurface::new(),
        MemoryStore::new(),
        NoSpeech,
    );
    let names = ctl.catalog().names();
    assert_eq!(html.matches("data-preset=").count(), names.len());
    for name in names {
        assert!(html.contains(&format!("data-preset=\"{name}\"")), "{name}");
        assert!(ctl.apply_preset(name), "{name}");
    }
}

#[test]
fn classic_profile_omits_motion_toggle() {
    i18n::set_lang("en");
    let html = render_panel(
        WidgetProfile::classic(),
        open_view(SettingsRecord::default()),
        None,
    );
    assert!(html.contains("clarity-flag-high-contrast"));
    assert!(!html.contains("clarity-flag-disable-animations"));
}

#[test]
fn hebrew_panel_is_right_to_left() {
    i18n::set_lang("he");
    let html = render_panel(
        WidgetProfile::classic(),
        open_view(SettingsRecord::default()),
        None,
    );
    assert!(html.contains("dir=\"rtl\""));
    assert!(html.contains("הגדרות נגישות"));
    i18n::set_lang("en");
}

#[test]
fn toast_is_rendered_when_present() {
    i18n::set_lang("en");
    let html = render_panel(
        WidgetProfile::modern(),
        OverlayView::default(),
        Some("Settings were reset"),
    );
    assert!(html.contains("clarity-toast"));
    assert!(html.contains("Settings were reset"));

    let quiet = render_panel(WidgetProfile::modern(), OverlayView::default(), None);
    assert!(!quiet.contains("clarity-toast"));
}

#[test]
fn widget_renders_closed_before_mounting() {
    i18n::set_lang("en");
    let props = OverlayProps {
        profile: Rc::new(WidgetProfile::modern()),
    };
    let html = block_on(LocalServerRenderer::<OverlayWidget>::with_props(props).render());
    assert!(html.contains("clarity-launcher"));
    assert!(html.contains("aria-expanded=\"false\""));
    assert!(html.contains("data-profile=\"modern\""));
}
