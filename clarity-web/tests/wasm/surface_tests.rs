#![cfg(target_arch = "wasm32")]
use clarity_core::{
    Controller, FlagName, FontScale, NoSpeech, PresentationSurface, SettingsStore, WidgetProfile,
};
use clarity_web::{DomSurface, LocalStorageBackend, dom};
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn clean_page() {
    let body = dom::body().expect("body");
    body.set_class_name("");
    let root = dom::root_element().expect("html");
    let _ = root.style().remove_property("font-size");
    if let Ok(storage) = dom::local_storage() {
        let _ = storage.clear();
    }
}

#[wasm_bindgen_test]
fn modern_surface_sets_prefixed_classes_and_root_percent() {
    clean_page();
    let mut surface = DomSurface::attach(&WidgetProfile::modern()).expect("surface");
    surface.set_flag(FlagName::HighContrast, true);
    surface.set_scale(FontScale::clamped(130));

    let body = dom::body().expect("body");
    let root = dom::root_element().expect("html");
    assert!(body.class_list().contains("clarity-high-contrast"));
    assert_eq!(root.style().get_property_value("font-size").unwrap(), "130%");

    surface.set_flag(FlagName::HighContrast, false);
    surface.set_scale(FontScale::DEFAULT);
    assert!(!body.class_list().contains("clarity-high-contrast"));
    assert_eq!(root.style().get_property_value("font-size").unwrap(), "");
}

#[wasm_bindgen_test]
fn classic_surface_keeps_one_bucket_class() {
    clean_page();
    let mut surface = DomSurface::attach(&WidgetProfile::classic()).expect("surface");
    surface.set_scale(FontScale::clamped(125));
    surface.set_scale(FontScale::clamped(175));

    let classes = dom::body().expect("body").class_list();
    assert!(classes.contains("font-size-xxlarge"));
    assert!(!classes.contains("font-size-large"));
}

#[wasm_bindgen_test]
fn local_storage_backend_round_trips_records() {
    clean_page();
    let store = SettingsStore::new(LocalStorageBackend::open(), "clarity-settings");
    let mut ctl = Controller::start(
        WidgetProfile::modern(),
        DomSurface::attach(&WidgetProfile::modern()).expect("surface"),
        LocalStorageBackend::open(),
        NoSpeech,
    );
    ctl.apply_preset("vision");
    let loaded = store.load();
    assert_eq!(loaded.font_scale.percent(), 150);
    assert!(loaded.flag(FlagName::LargeCursor));
    assert!(
        dom::body()
            .expect("body")
            .class_list()
            .contains("clarity-large-cursor")
    );

    drop(ctl.teardown());
    assert!(
        !dom::body()
            .expect("body")
            .class_list()
            .contains("clarity-large-cursor")
    );
    assert_eq!(store.load().font_scale.percent(), 150);
}

#[wasm_bindgen_test]
fn classic_teardown_removes_every_bucket_class() {
    clean_page();
    let mut ctl = Controller::start(
        WidgetProfile::classic(),
        DomSurface::attach(&WidgetProfile::classic()).expect("surface"),
        LocalStorageBackend::open(),
        NoSpeech,
    );
    let classes = dom::body().expect("body").class_list();
    assert!(classes.contains("font-size-medium"));
    ctl.increase_font();
    assert!(classes.contains("font-size-large"));

    drop(ctl.teardown());
    assert_eq!(classes.length(), 0);
}
