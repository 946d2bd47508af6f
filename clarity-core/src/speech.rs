//! Text-to-speech capability and the reading/idle indicator
use std::fmt;

/// Identifies one spoken request so late completions can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    #[must_use]
    pub fn new(id: UtteranceId, text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            lang: lang.into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// A speech synthesis engine.
///
/// Implementations report completion by calling back into
/// [`crate::Controller::speech_finished`] with the utterance id.
pub trait Speaker {
    fn is_available(&self) -> bool;

    fn speak(&mut self, utterance: Utterance);

    /// Stop whatever is being spoken. Must be harmless when idle.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("speech synthesis is not supported here")]
pub struct SpeechUnavailable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadingState {
    #[default]
    Idle,
    Reading(UtteranceId),
}

impl ReadingState {
    #[must_use]
    pub const fn is_reading(self) -> bool {
        matches!(self, Self::Reading(_))
    }
}

/// At-most-one-utterance bookkeeping for a single widget.
#[derive(Debug, Clone, Default)]
pub struct SpeechSession {
    state: ReadingState,
    next_id: u64,
}

impl SpeechSession {
    #[must_use]
    pub const fn state(&self) -> ReadingState {
        self.state
    }

    /// Cancel anything in flight, then speak `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechUnavailable`] if the speaker cannot synthesize speech.
    pub fn start(
        &mut self,
        speaker: &mut impl Speaker,
        text: &str,
        lang: &str,
    ) -> Result<UtteranceId, SpeechUnavailable> {
        if !speaker.is_available() {
            return Err(SpeechUnavailable);
        }
        self.stop(speaker);
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        speaker.speak(Utterance::new(id, text, lang));
        self.state = ReadingState::Reading(id);
        Ok(id)
    }

    /// Idempotent; only touches the speaker when it is available.
    pub fn stop(&mut self, speaker: &mut impl Speaker) {
        if speaker.is_available() {
            speaker.cancel();
        }
        self.state = ReadingState::Idle;
    }

    /// Completion callback. Returns whether the indicator changed.
    pub fn finished(&mut self, id: UtteranceId) -> bool {
        match self.state {
            ReadingState::Reading(current) if current == id => {
                self.state = ReadingState::Idle;
                true
            }
            _ => {
                log::debug!("ignoring completion of stale {id}");
                false
            }
        }
    }
}

/// A speaker for environments with no speech synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl Speaker for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: Utterance) {}

    fn cancel(&mut self) {}
}

/// In-memory speaker that records requests and tracks what is "playing".
#[derive(Debug, Clone)]
pub struct RecordingSpeaker {
    pub available: bool,
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub active: Option<UtteranceId>,
}

impl Default for RecordingSpeaker {
    fn default() -> Self {
        Self {
            available: true,
            spoken: Vec::new(),
            cancels: 0,
            active: None,
        }
    }
}

impl Speaker for RecordingSpeaker {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: Utterance) {
        self.active = Some(utterance.id);
        self.spoken.push(utterance);
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_again_cancels_the_previous_utterance() {
        let mut speaker = RecordingSpeaker::default();
        let mut session = SpeechSession::default();
        let first = session.start(&mut speaker, "one", "en-US").unwrap();
        let second = session.start(&mut speaker, "two", "en-US").unwrap();
        assert_ne!(first, second);
        assert_eq!(speaker.active, Some(second));
        assert_eq!(speaker.cancels, 2);
        assert_eq!(session.state(), ReadingState::Reading(second));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut speaker = RecordingSpeaker::default();
        let mut session = SpeechSession::default();
        let first = session.start(&mut speaker, "one", "he-IL").unwrap();
        let second = session.start(&mut speaker, "two", "he-IL").unwrap();
        assert!(!session.finished(first));
        assert!(session.state().is_reading());
        assert!(session.finished(second));
        assert_eq!(session.state(), ReadingState::Idle);
    }

    #[test]
    fn unavailable_speaker_stays_idle() {
        let mut session = SpeechSession::default();
        assert_eq!(
            session.start(&mut NoSpeech, "hello", "en-US"),
            Err(SpeechUnavailable)
        );
        session.stop(&mut NoSpeech);
        assert_eq!(session.state(), ReadingState::Idle);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut speaker = RecordingSpeaker::default();
        let mut session = SpeechSession::default();
        session.stop(&mut speaker);
        session.stop(&mut speaker);
        assert_eq!(session.state(), ReadingState::Idle);
        assert!(speaker.spoken.is_empty());
    }
}
