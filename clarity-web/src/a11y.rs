// Accessibility helpers
use crate::dom;
use crate::surface::bucket_class;
use clarity_core::{FlagName, FontBucket, ScaleMode, WidgetProfile};
use std::fmt::Write as _;

/// Id of the polite live region the widget renders.
pub const LIVE_REGION_ID: &str = "clarity-live";

const STYLE_ELEMENT_ID: &str = "clarity-styles";

/// Focus ring and screen reader utilities scoped to the widget.
#[must_use]
pub const fn visible_focus_css() -> &'static str {
    ".clarity-widget :focus{outline:3px solid #1d4ed8;outline-offset:2px} .clarity-widget .sr-only{position:absolute;width:1px;height:1px;margin:-1px;overflow:hidden;clip:rect(0 0 0 0);white-space:nowrap;}"
}

fn flag_rule(flag: FlagName) -> &'static str {
    match flag {
        FlagName::HighContrast => "{filter:contrast(1.5)}",
        FlagName::LargeCursor => "{cursor:zoom-in}",
        FlagName::UnderlineLinks => " a{text-decoration:underline !important}",
        FlagName::ReadableFont => "{font-family:Arial,Helvetica,sans-serif !important;letter-spacing:0.05em}",
        FlagName::DisableAnimations => " *{animation:none !important;transition:none !important}",
    }
}

const fn bucket_size(bucket: FontBucket) -> &'static str {
    match bucket {
        FontBucket::Small => "75%",
        FontBucket::Medium => "100%",
        FontBucket::Large => "125%",
        FontBucket::XLarge => "150%",
        FontBucket::XxLarge => "175%",
    }
}

/// Page-level rules for every class the profile can set.
#[must_use]
pub fn presentation_css(profile: &WidgetProfile) -> String {
    let mut css = String::from(visible_focus_css());
    for flag in &profile.flags {
        let _ = write!(css, " body.{}{}", profile.class_for(*flag), flag_rule(*flag));
    }
    if profile.scale_mode == ScaleMode::ClassBuckets {
        for bucket in FontBucket::ALL {
            let class = bucket_class(&profile.class_prefix, bucket);
            let _ = write!(css, " body.{class}{{font-size:{}}}", bucket_size(bucket));
        }
    }
    css
}

/// Write the stylesheet for `profile` into `<head>`, replacing any earlier one.
pub fn install_styles(profile: &WidgetProfile) {
    let Some(doc) = dom::document() else {
        return;
    };
    let css = presentation_css(profile);
    if let Some(existing) = doc.get_element_by_id(STYLE_ELEMENT_ID) {
        existing.set_text_content(Some(&css));
        return;
    }
    let Some(head) = doc.head() else {
        return;
    };
    match doc.create_element("style") {
        Ok(style) => {
            style.set_id(STYLE_ELEMENT_ID);
            style.set_text_content(Some(&css));
            if let Err(err) = head.append_child(&style) {
                log::warn!("could not install styles: {}", dom::js_error_message(&err));
            }
        }
        Err(err) => log::warn!("could not create style element: {}", dom::js_error_message(&err)),
    }
}

/// Remove the stylesheet added by [`install_styles`].
pub fn remove_styles() {
    if let Some(style) = dom::document().and_then(|doc| doc.get_element_by_id(STYLE_ELEMENT_ID)) {
        style.remove();
    }
}

/// Text of the installed widget stylesheet, if any.
#[must_use]
pub fn installed_css() -> Option<String> {
    dom::document()
        .and_then(|doc| doc.get_element_by_id(STYLE_ELEMENT_ID))
        .and_then(|style| style.text_content())
}

/// Update the live region so assistive technology reads `msg`.
pub fn announce(msg: &str) {
    if let Some(node) = dom::document().and_then(|doc| doc.get_element_by_id(LIVE_REGION_ID)) {
        node.set_text_content(Some(msg));
    }
}
