use super::focus::focus_node;
use super::intent::{Intent, OverlayView, dispatch, notice_message};
use super::panel::OverlayPanel;
use crate::a11y;
use crate::dom;
use crate::speech::{BrowserSpeaker, OnSpeechEnd};
use crate::storage::LocalStorageBackend;
use crate::surface::DomSurface;
use clarity_core::{Controller, DismissReason, FocusTarget, WidgetProfile};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

const TOAST_MS: i32 = 2500;

pub type PageController = Controller<DomSurface, LocalStorageBackend, BrowserSpeaker>;
type ControllerSlot = Rc<RefCell<Option<PageController>>>;

#[derive(Properties, PartialEq, Clone)]
pub struct OverlayProps {
    pub profile: Rc<WidgetProfile>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ToastState {
    id: u32,
    text: Option<AttrValue>,
}

enum ToastAction {
    Show(u32, String),
    Expire(u32),
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Show(id, text) => Rc::new(Self {
                id,
                text: Some(text.into()),
            }),
            ToastAction::Expire(id) if id == self.id => Rc::new(Self { id, text: None }),
            ToastAction::Expire(_) => self,
        }
    }
}

fn start_controller(
    profile: &WidgetProfile,
    slot: &ControllerSlot,
    view: &UseStateHandle<OverlayView>,
) {
    let Some(surface) = DomSurface::attach(profile) else {
        log::error!("no document to attach the '{}' widget to", profile.name);
        return;
    };
    let on_end: OnSpeechEnd = {
        let weak = Rc::downgrade(slot);
        let view = view.clone();
        Rc::new(move |id| {
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let Ok(mut guard) = cell.try_borrow_mut() else {
                log::debug!("controller busy; dropping completion of {id}");
                return;
            };
            if let Some(ctl) = guard.as_mut()
                && ctl.speech_finished(id)
            {
                view.set(OverlayView::of(ctl));
            }
        })
    };
    let ctl = Controller::start(
        profile.clone(),
        surface,
        LocalStorageBackend::open(),
        BrowserSpeaker::new(on_end),
    );
    view.set(OverlayView::of(&ctl));
    *slot.borrow_mut() = Some(ctl);
}

/// The embeddable widget: owns one [`PageController`] for the lifetime of the component.
#[function_component(OverlayWidget)]
pub fn overlay_widget(props: &OverlayProps) -> Html {
    let slot: ControllerSlot = use_mut_ref(|| None);
    let view = use_state_eq(OverlayView::default);
    let toast = use_reducer_eq(ToastState::default);
    let toast_seq = use_mut_ref(|| 0_u32);
    let pending_focus = use_mut_ref(|| None::<FocusTarget>);
    let root_ref = use_node_ref();
    let launcher_ref = use_node_ref();
    let close_ref = use_node_ref();

    {
        let slot = slot.clone();
        let view = view.clone();
        use_effect_with(props.profile.clone(), move |profile| {
            a11y::install_styles(profile);
            start_controller(profile, &slot, &view);
            move || {
                if let Some(ctl) = slot.borrow_mut().take() {
                    drop(ctl.teardown());
                }
                a11y::remove_styles();
            }
        });
    }

    let on_intent = {
        let slot = slot.clone();
        let view = view.clone();
        let toast = toast.clone();
        let pending_focus = pending_focus.clone();
        Callback::from(move |intent: Intent| {
            let outcome = {
                let Ok(mut guard) = slot.try_borrow_mut() else {
                    log::warn!("controller busy; dropping {intent:?}");
                    return;
                };
                let Some(ctl) = guard.as_mut() else {
                    return;
                };
                dispatch(ctl, intent, dom::page_text)
            };
            view.set(outcome.view);
            *pending_focus.borrow_mut() = outcome.focus;
            for notice in outcome.notices {
                let message = notice_message(notice);
                a11y::announce(&message);
                let id = {
                    let mut seq = toast_seq.borrow_mut();
                    *seq += 1;
                    *seq
                };
                toast.dispatch(ToastAction::Show(id, message));
                let expire = toast.dispatcher();
                if let Err(err) = dom::set_timeout(TOAST_MS, move || {
                    expire.dispatch(ToastAction::Expire(id));
                }) {
                    dom::console_error(&dom::js_error_message(&err));
                }
            }
        })
    };

    {
        let pending_focus = pending_focus.clone();
        let launcher_ref = launcher_ref.clone();
        let close_ref = close_ref.clone();
        use_effect(move || {
            if let Some(target) = pending_focus.borrow_mut().take() {
                match target {
                    FocusTarget::CloseButton => focus_node(&close_ref),
                    FocusTarget::Launcher => focus_node(&launcher_ref),
                }
            }
        });
    }

    {
        let on_intent = on_intent.clone();
        use_effect_with(root_ref.clone(), move |root_ref| {
            let root_ref = root_ref.clone();
            let on_click = move |e: web_sys::MouseEvent| {
                let Some(root) = root_ref.cast::<web_sys::Element>() else {
                    return;
                };
                let target = e.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
                // Nodes swapped out by a re-render during this click are no longer in the page.
                if target.as_ref().is_some_and(|node| !node.is_connected()) {
                    return;
                }
                if !root.contains(target.as_ref()) {
                    on_intent.emit(Intent::Dismiss(DismissReason::OutsideClick));
                }
            };
            let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(on_click);
            let doc = dom::document();
            if let Some(doc) = doc.as_ref()
                && let Err(err) =
                    doc.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            {
                dom::console_error(&dom::js_error_message(&err));
            }
            move || {
                if let Some(doc) = doc {
                    let _ = doc.remove_event_listener_with_callback(
                        "click",
                        listener.as_ref().unchecked_ref(),
                    );
                }
                drop(listener);
            }
        });
    }

    html! {
      <OverlayPanel
        profile={props.profile.clone()}
        view={*view}
        on_intent={on_intent}
        toast={toast.text.clone()}
        root_ref={root_ref}
        launcher_ref={launcher_ref}
        close_ref={close_ref}
      />
    }
}
