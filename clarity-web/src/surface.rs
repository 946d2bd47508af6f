//! The host page as a [`PresentationSurface`]
use crate::dom;
use clarity_core::{FlagName, FontBucket, FontScale, PresentationSurface, ScaleMode, WidgetProfile};
use web_sys::{Element, HtmlElement};

/// Class token for a font bucket under the profile's prefix.
#[must_use]
pub fn bucket_class(prefix: &str, bucket: FontBucket) -> String {
    format!("{prefix}{}", bucket.token())
}

/// Inline `font-size` for the root element. `None` clears the override.
#[must_use]
pub fn root_font_size(scale: FontScale) -> Option<String> {
    (!scale.is_default()).then(|| format!("{}%", scale.percent()))
}

/// Toggles flag classes on `<body>` and sizes text via `<html>`.
pub struct DomSurface {
    body: Element,
    root: HtmlElement,
    class_prefix: String,
    scale_mode: ScaleMode,
}

impl DomSurface {
    /// Bind to the current document. `None` outside a browser.
    #[must_use]
    pub fn attach(profile: &WidgetProfile) -> Option<Self> {
        Some(Self::new(
            dom::body()?.into(),
            dom::root_element()?,
            profile,
        ))
    }

    #[must_use]
    pub fn new(body: Element, root: HtmlElement, profile: &WidgetProfile) -> Self {
        Self {
            body,
            root,
            class_prefix: profile.class_prefix.clone(),
            scale_mode: profile.scale_mode,
        }
    }

    fn toggle_class(&self, class: &str, on: bool) {
        let list = self.body.class_list();
        let result = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        if let Err(err) = result {
            log::warn!("could not toggle '{class}': {}", dom::js_error_message(&err));
        }
    }
}

impl PresentationSurface for DomSurface {
    fn set_flag(&mut self, flag: FlagName, on: bool) {
        let class = format!("{}{}", self.class_prefix, flag.token());
        self.toggle_class(&class, on);
    }

    fn set_scale(&mut self, scale: FontScale) {
        match self.scale_mode {
            ScaleMode::RootPercent => {
                let style = self.root.style();
                let result = match root_font_size(scale) {
                    Some(size) => style.set_property("font-size", &size),
                    None => style.remove_property("font-size").map(|_| ()),
                };
                if let Err(err) = result {
                    log::warn!("could not size root text: {}", dom::js_error_message(&err));
                }
            }
            ScaleMode::ClassBuckets => {
                let current = scale.bucket();
                for bucket in FontBucket::ALL {
                    if bucket != current {
                        self.toggle_class(&bucket_class(&self.class_prefix, bucket), false);
                    }
                }
                self.toggle_class(&bucket_class(&self.class_prefix, current), true);
            }
        }
    }

    fn clear_scale(&mut self) {
        match self.scale_mode {
            ScaleMode::RootPercent => {
                if let Err(err) = self.root.style().remove_property("font-size") {
                    log::warn!("could not clear root text size: {}", dom::js_error_message(&err));
                }
            }
            ScaleMode::ClassBuckets => {
                for bucket in FontBucket::ALL {
                    self.toggle_class(&bucket_class(&self.class_prefix, bucket), false);
                }
            }
        }
    }
}
