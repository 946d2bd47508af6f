#![forbid(unsafe_code)]
//! Browser front-end of the Clarity accessibility overlay.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use clarity_core::WidgetProfile;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;

pub mod a11y;
pub mod dom;
pub mod i18n;
pub mod logging;
pub mod speech;
pub mod storage;
pub mod surface;
pub mod widget;

pub use storage::{LocalStorageBackend, WebStorageError};
pub use surface::DomSurface;
pub use widget::{OverlayProps, OverlayWidget};

/// Host `<script>` carrying the profile name to start with.
pub const PROFILE_SCRIPT_SELECTOR: &str = "script[data-profile]";

const MOUNT_ID: &str = "clarity-root";

thread_local! {
    static MOUNTED: RefCell<Option<yew::AppHandle<OverlayWidget>>> = const { RefCell::new(None) };
}

/// Built-in profile for a `data-profile` value. Missing or blank means `modern`.
#[must_use]
pub fn profile_from_attribute(value: Option<&str>) -> WidgetProfile {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => WidgetProfile::modern(),
        Some(name) => WidgetProfile::builtin(name).unwrap_or_else(|| {
            log::warn!(
                "unknown profile '{name}'; expected one of {:?}, using modern",
                WidgetProfile::builtin_names()
            );
            WidgetProfile::modern()
        }),
    }
}

/// Render the widget into its own container at the end of `<body>`.
///
/// Only one widget lives on a page; mounting again tears down the previous one first.
///
/// # Errors
/// Returns an error if there is no document body to attach to.
pub fn mount(profile: WidgetProfile) -> Result<(), JsValue> {
    let doc = dom::document().ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    if let Some(previous) = MOUNTED.with(|cell| cell.borrow_mut().take()) {
        log::info!("replacing mounted widget");
        previous.destroy();
    }
    let host = match doc.get_element_by_id(MOUNT_ID) {
        Some(existing) => existing,
        None => {
            let el = doc.create_element("div")?;
            el.set_id(MOUNT_ID);
            body.append_child(&el)?;
            el
        }
    };

    i18n::set_lang(&profile.locale);
    log::info!("mounting '{}' widget", profile.name);
    let props = OverlayProps {
        profile: Rc::new(profile),
    };
    let handle = yew::Renderer::<OverlayWidget>::with_root_and_props(host, props).render();
    MOUNTED.with(|cell| *cell.borrow_mut() = Some(handle));
    Ok(())
}

/// Mount with a host-supplied profile object; missing fields take `modern` values.
///
/// # Errors
/// Returns an error if `config` does not describe a profile or mounting fails.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(config: JsValue) -> Result<(), JsValue> {
    let profile: WidgetProfile = serde_wasm_bindgen::from_value(config)
        .map_err(|err| JsValue::from_str(&format!("invalid widget config: {err}")))?;
    mount(profile)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);

    let attr =
        dom::host_script(PROFILE_SCRIPT_SELECTOR).and_then(|el| el.get_attribute("data-profile"));
    if attr.as_deref() == Some("manual") {
        log::info!("waiting for mountWithConfig");
        return;
    }
    if let Err(err) = mount(profile_from_attribute(attr.as_deref())) {
        dom::console_error(&dom::js_error_message(&err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_selects_builtin_profile() {
        assert_eq!(profile_from_attribute(Some("classic")).name, "classic");
        assert_eq!(profile_from_attribute(Some(" modern ")).name, "modern");
    }

    #[test]
    fn missing_or_unknown_attribute_falls_back_to_modern() {
        assert_eq!(profile_from_attribute(None), WidgetProfile::modern());
        assert_eq!(profile_from_attribute(Some("")), WidgetProfile::modern());
        assert_eq!(profile_from_attribute(Some("retro")), WidgetProfile::modern());
    }
}
