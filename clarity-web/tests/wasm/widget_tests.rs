#![cfg(target_arch = "wasm32")]
use clarity_core::WidgetProfile;
use clarity_web::{a11y, dom, mount};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;
use yew::platform::time::sleep;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn element(selector: &str) -> HtmlElement {
    dom::document()
        .expect("document")
        .query_selector(selector)
        .expect("query")
        .unwrap_or_else(|| panic!("{selector} exists"))
        .dyn_into()
        .expect("html element")
}

async fn settle() {
    sleep(Duration::from_millis(30)).await;
}

#[wasm_bindgen_test]
async fn launcher_opens_panel_and_focuses_close_button() {
    if let Ok(storage) = dom::local_storage() {
        let _ = storage.clear();
    }
    mount(WidgetProfile::modern()).expect("mount");
    settle().await;

    let launcher = element(".clarity-launcher");
    assert_eq!(launcher.get_attribute("aria-expanded").as_deref(), Some("false"));
    launcher.click();
    settle().await;

    assert_eq!(launcher.get_attribute("aria-expanded").as_deref(), Some("true"));
    let active = dom::document().and_then(|d| d.active_element()).expect("focus");
    assert!(active.class_list().contains("clarity-close"));

    element("#clarity-flag-underline-links").click();
    settle().await;
    assert!(
        dom::body()
            .expect("body")
            .class_list()
            .contains("clarity-underline-links")
    );

    element(".clarity-close").click();
    settle().await;
    assert_eq!(launcher.get_attribute("aria-expanded").as_deref(), Some("false"));
}

#[wasm_bindgen_test]
async fn outside_click_closes_panel() {
    mount(WidgetProfile::classic()).expect("mount");
    settle().await;

    let launcher = element(".clarity-launcher");
    launcher.click();
    settle().await;
    assert_eq!(launcher.get_attribute("aria-expanded").as_deref(), Some("true"));

    dom::body().expect("body").click();
    settle().await;
    assert_eq!(launcher.get_attribute("aria-expanded").as_deref(), Some("false"));
}

#[wasm_bindgen_test]
async fn remount_with_other_profile_rewrites_stylesheet() {
    mount(WidgetProfile::classic()).expect("mount classic");
    settle().await;
    let css = a11y::installed_css().expect("classic styles");
    assert!(css.contains("body.high-contrast{"));
    assert!(css.contains("body.font-size-large{"));

    mount(WidgetProfile::modern()).expect("mount modern");
    settle().await;
    let css = a11y::installed_css().expect("modern styles");
    assert!(css.contains("body.clarity-high-contrast{"));
    assert!(css.contains("body.clarity-disable-animations *{"));
    assert!(!css.contains("body.high-contrast{"));
    assert!(!css.contains("font-size-"));
}
