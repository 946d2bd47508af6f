use super::focus::keydown_handler;
use super::intent::{Intent, OverlayView};
use crate::a11y::LIVE_REGION_ID;
use crate::i18n;
use clarity_core::{FlagName, PresetCatalog, WidgetProfile};
use std::collections::BTreeMap;
use std::rc::Rc;
use yew::prelude::*;

const PANEL_ID: &str = "clarity-panel";
const TITLE_ID: &str = "clarity-title";

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub profile: Rc<WidgetProfile>,
    pub view: OverlayView,
    pub on_intent: Callback<Intent>,
    #[prop_or_default]
    pub toast: Option<AttrValue>,
    #[prop_or_default]
    pub root_ref: NodeRef,
    #[prop_or_default]
    pub launcher_ref: NodeRef,
    #[prop_or_default]
    pub close_ref: NodeRef,
}

fn emit(on_intent: &Callback<Intent>, intent: Intent) -> Callback<MouseEvent> {
    on_intent.reform(move |_| intent)
}

fn flag_row(flag: FlagName, on: bool, on_intent: &Callback<Intent>) -> Html {
    let input_id = format!("clarity-flag-{}", flag.token());
    let hint_id = format!("{input_id}-hint");
    html! {
      <li class="clarity-flag" data-flag={flag.key()}>
        <input
          id={input_id.clone()}
          type="checkbox"
          role="switch"
          checked={on}
          aria-describedby={hint_id.clone()}
          onclick={emit(on_intent, Intent::SetFlag(flag, !on))}
        />
        <label for={input_id}>{ i18n::t(&format!("flags.{}.label", flag.key())) }</label>
        <small id={hint_id}>{ i18n::t(&format!("flags.{}.hint", flag.key())) }</small>
      </li>
    }
}

/// Launcher button plus the settings panel. Stateless; every gesture is emitted as an [`Intent`].
#[function_component(OverlayPanel)]
pub fn overlay_panel(p: &Props) -> Html {
    let panel_ref = use_node_ref();
    let open = p.view.panel.is_open();
    let record = p.view.record;
    let on_keydown = keydown_handler(
        panel_ref.clone(),
        p.on_intent
            .reform(|()| Intent::Dismiss(clarity_core::DismissReason::Escape)),
    );

    let presets = PresetCatalog::builtin()
        .iter()
        .map(|preset| {
            html! {
              <button type="button" class="clarity-preset" data-preset={preset.name}
                onclick={emit(&p.on_intent, Intent::ApplyPreset(preset.name))}>
                <span class="clarity-preset-icon" aria-hidden="true">{ preset.icon }</span>
                <span>{ i18n::t(preset.label_key) }</span>
              </button>
            }
        })
        .collect::<Html>();

    let flags = p
        .profile
        .flags
        .iter()
        .map(|flag| flag_row(*flag, record.flag(*flag), &p.on_intent))
        .collect::<Html>();

    let scale_text = record.font_scale.to_string();
    let scale_label = {
        let mut args = BTreeMap::new();
        args.insert("value", scale_text.as_str());
        i18n::tr("font.current", Some(&args))
    };

    let reading = p.view.reading;
    let speech = html! {
      <>
        <button type="button" class="clarity-read" hidden={reading}
          onclick={emit(&p.on_intent, Intent::ReadPage)}>
          { i18n::t("speech.read") }
        </button>
        <button type="button" class="clarity-stop" hidden={!reading}
          onclick={emit(&p.on_intent, Intent::StopReading)}>
          { i18n::t("speech.stop") }
        </button>
      </>
    };

    html! {
      <div class="clarity-widget" ref={p.root_ref.clone()} data-profile={p.profile.name.clone()}
        dir={if i18n::is_rtl() { "rtl" } else { "ltr" }} lang={i18n::current_lang()}>
        <button type="button" class="clarity-launcher" ref={p.launcher_ref.clone()}
          aria-label={i18n::t("panel.open")}
          title={i18n::t("panel.launcher")}
          aria-expanded={open.to_string()}
          aria-controls={PANEL_ID}
          onclick={emit(&p.on_intent, Intent::TogglePanel)}>
          <span aria-hidden="true">{ "♿" }</span>
        </button>
        <div id={PANEL_ID} class={classes!("clarity-panel", open.then_some("active"))}
          role="dialog" aria-labelledby={TITLE_ID} aria-hidden={(!open).to_string()}
          hidden={!open} ref={panel_ref} onkeydown={on_keydown}>
          <header class="clarity-header">
            <h2 id={TITLE_ID}>{ i18n::t("panel.title") }</h2>
            <p>{ i18n::t("panel.subtitle") }</p>
            <button type="button" class="clarity-close" ref={p.close_ref.clone()}
              aria-label={i18n::t("panel.close")}
              onclick={emit(&p.on_intent, Intent::ClosePanel)}>{ "×" }</button>
          </header>
          <section aria-label={i18n::t("sections.presets")}>
            <h3>{ i18n::t("sections.presets") }</h3>
            <div class="clarity-presets">{ presets }</div>
          </section>
          <section aria-label={i18n::t("sections.text_size")}>
            <h3>{ i18n::t("sections.text_size") }</h3>
            <div class="clarity-font-controls">
              <button type="button" class="clarity-font-decrease" aria-label={i18n::t("font.decrease")}
                onclick={emit(&p.on_intent, Intent::DecreaseFont)}>{ "A-" }</button>
              <output class="clarity-font-value" aria-label={scale_label}>{ scale_text.clone() }</output>
              <button type="button" class="clarity-font-increase" aria-label={i18n::t("font.increase")}
                onclick={emit(&p.on_intent, Intent::IncreaseFont)}>{ "A+" }</button>
            </div>
          </section>
          <section aria-label={i18n::t("sections.adjustments")}>
            <h3>{ i18n::t("sections.adjustments") }</h3>
            <ul class="clarity-flags">{ flags }</ul>
          </section>
          <section aria-label={i18n::t("sections.speech")}>
            <h3>{ i18n::t("sections.speech") }</h3>
            { speech }
          </section>
          <button type="button" class="clarity-reset" onclick={emit(&p.on_intent, Intent::Reset)}>
            { i18n::t("reset.button") }
          </button>
        </div>
        <div id={LIVE_REGION_ID} class="sr-only" role="status" aria-live="polite"></div>
        if let Some(toast) = p.toast.clone() {
          <div class="clarity-toast" aria-hidden="true">{ toast }</div>
        }
      </div>
    }
}
