use crate::i18n::locales::{is_rtl_lang, load_translations};
use serde_json::Value;
use std::cell::RefCell;

pub struct I18nBundle {
    pub lang: String,
    pub rtl: bool,
    pub translations: Value,
    pub fallback: Value,
}

fn build_bundle(lang: &str) -> Option<I18nBundle> {
    let fallback = load_translations("en")?;
    let translations = load_translations(lang)?;

    Some(I18nBundle {
        lang: lang.to_string(),
        rtl: is_rtl_lang(lang),
        translations,
        fallback,
    })
}

fn fallback_bundle() -> I18nBundle {
    let fallback = load_translations("en").unwrap_or(Value::Object(serde_json::Map::new()));

    I18nBundle {
        lang: "en".to_string(),
        rtl: false,
        translations: fallback.clone(),
        fallback,
    }
}

thread_local! {
    pub(super) static CURRENT: RefCell<I18nBundle> = RefCell::new(fallback_bundle());
}

pub(super) fn with_bundle<R>(f: impl FnOnce(&I18nBundle) -> R) -> R {
    CURRENT.with(|cell| f(&cell.borrow()))
}

/// Switch the widget's language.
///
/// Unknown codes keep the current bundle. The host page's own `lang`/`dir`
/// are left alone; the widget root carries its own direction.
pub fn set_lang(lang: &str) {
    match build_bundle(lang) {
        Some(bundle) => {
            CURRENT.with(|cell| cell.replace(bundle));
        }
        None => log::warn!("no translations for '{lang}'; keeping {}", current_lang()),
    }
}

/// Get the current active language code
#[must_use]
pub fn current_lang() -> String {
    with_bundle(|bundle| bundle.lang.clone())
}

/// Check if the current language uses right-to-left text direction
#[must_use]
pub fn is_rtl() -> bool {
    with_bundle(|bundle| bundle.rtl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_bundle_loads_requested_locale() {
        let bundle = build_bundle("he").expect("bundle should load");
        assert_eq!(bundle.lang, "he");
        assert!(bundle.rtl);
        assert!(bundle.translations.is_object());
        assert!(bundle.fallback.is_object());
    }

    #[test]
    fn unknown_locale_keeps_current_bundle() {
        set_lang("en");
        set_lang("xx");
        assert_eq!(current_lang(), "en");
        assert!(!is_rtl());
    }
}
