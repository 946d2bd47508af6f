//! Web Speech API speaker
use crate::dom;
use clarity_core::{Speaker, Utterance, UtteranceId};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

/// Completion sink; receives the id of the utterance that ended.
pub type OnSpeechEnd = Rc<dyn Fn(UtteranceId)>;

struct Active {
    utterance: SpeechSynthesisUtterance,
    _on_end: Closure<dyn FnMut()>,
}

/// Speaks through `window.speechSynthesis`.
pub struct BrowserSpeaker {
    synth: Option<SpeechSynthesis>,
    on_end: OnSpeechEnd,
    active: Option<Active>,
}

impl BrowserSpeaker {
    #[must_use]
    pub fn new(on_end: OnSpeechEnd) -> Self {
        let synth = dom::window().and_then(|win| win.speech_synthesis().ok());
        if synth.is_none() {
            log::info!("speech synthesis is not available in this browser");
        }
        Self {
            synth,
            on_end,
            active: None,
        }
    }

    fn detach(&mut self) {
        if let Some(active) = self.active.take() {
            active.utterance.set_onend(None);
            active.utterance.set_onerror(None);
        }
    }
}

impl Speaker for BrowserSpeaker {
    fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    fn speak(&mut self, utterance: Utterance) {
        let Some(synth) = self.synth.as_ref() else {
            return;
        };
        let native = match SpeechSynthesisUtterance::new_with_text(&utterance.text) {
            Ok(native) => native,
            Err(err) => {
                log::warn!("could not create utterance: {}", dom::js_error_message(&err));
                return;
            }
        };
        native.set_lang(&utterance.lang);
        native.set_rate(utterance.rate);
        native.set_pitch(utterance.pitch);
        native.set_volume(utterance.volume);

        let id = utterance.id;
        let sink = Rc::clone(&self.on_end);
        let on_end = Closure::<dyn FnMut()>::new(move || sink(id));
        native.set_onend(Some(on_end.as_ref().unchecked_ref()));
        native.set_onerror(Some(on_end.as_ref().unchecked_ref()));

        synth.speak(&native);
        log::debug!("speaking {id} ({} chars)", utterance.text.len());
        self.active = Some(Active {
            utterance: native,
            _on_end: on_end,
        });
    }

    fn cancel(&mut self) {
        self.detach();
        if let Some(synth) = self.synth.as_ref() {
            synth.cancel();
        }
    }
}

impl Drop for BrowserSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}
