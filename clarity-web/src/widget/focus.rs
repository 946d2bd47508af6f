use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent};
use yew::prelude::*;

const FOCUSABLE_QUERY: &str =
    "button:not([disabled]), [href], input:not([disabled]), select, textarea, [tabindex]:not([tabindex='-1'])";

/// Focus the element behind `node`, if it has been rendered.
pub fn focus_node(node: &NodeRef) {
    if let Some(el) = node.cast::<HtmlElement>()
        && let Err(err) = el.focus()
    {
        log::debug!("focus failed: {}", crate::dom::js_error_message(&err));
    }
}

/// Escape closes the panel; Tab and Shift+Tab wrap inside it.
pub fn keydown_handler(container_ref: NodeRef, on_escape: Callback<()>) -> Callback<KeyboardEvent> {
    Callback::from(move |e: KeyboardEvent| {
        if !cfg!(target_arch = "wasm32") {
            let _ = e;
            return;
        }
        if e.key() == "Escape" {
            e.stop_propagation();
            on_escape.emit(());
            return;
        }
        if e.key() != "Tab" {
            return;
        }
        let Some(container) = container_ref.cast::<web_sys::Element>() else {
            return;
        };
        let Ok(nodes) = container.query_selector_all(FOCUSABLE_QUERY) else {
            return;
        };
        let len = nodes.length();
        if len == 0 {
            return;
        }
        let first = nodes.get(0).and_then(|n| n.dyn_into::<HtmlElement>().ok());
        let last = nodes
            .get(len - 1)
            .and_then(|n| n.dyn_into::<HtmlElement>().ok());
        let active = crate::dom::document().and_then(|d| d.active_element());
        let shift = e.shift_key();
        if let (Some(first), Some(last), Some(active)) = (first, last, active) {
            if !container.contains(Some(&active)) {
                e.prevent_default();
                let _ = first.focus();
                return;
            }
            let first_el: &web_sys::Element = first.as_ref();
            let last_el: &web_sys::Element = last.as_ref();
            if shift && active == *first_el {
                e.prevent_default();
                let _ = last.focus();
            } else if !shift && active == *last_el {
                e.prevent_default();
                let _ = first.focus();
            }
        }
    })
}
