//! Control logic coordinating the live record, the surface and the store
use crate::applier;
use crate::flags::FlagName;
use crate::panel::{DismissReason, FocusTarget, PanelState};
use crate::presets::PresetCatalog;
use crate::profile::WidgetProfile;
use crate::settings::SettingsRecord;
use crate::speech::{ReadingState, SpeechSession, Speaker, UtteranceId};
use crate::store::{KeyValueStore, PersistenceError, SettingsStore};
use crate::surface::PresentationSurface;

/// Something the UI layer should tell the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PresetApplied {
        preset: &'static str,
        label_key: &'static str,
    },
    SettingsReset,
    SpeechUnavailable,
}

impl Notice {
    /// i18n key of the message to show.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::PresetApplied { .. } => "notices.preset_applied",
            Self::SettingsReset => "notices.reset",
            Self::SpeechUnavailable => "notices.speech_unavailable",
        }
    }
}

/// One widget instance: owns its record, panel state and speech session.
///
/// Every settings mutation runs reconcile-then-persist. Persistence failures
/// are logged and kept in [`Controller::last_save_error`]; the in-memory record
/// stays authoritative.
pub struct Controller<Surf, Store, Sp> {
    profile: WidgetProfile,
    catalog: PresetCatalog,
    surface: Surf,
    store: SettingsStore<Store>,
    speaker: Sp,
    record: SettingsRecord,
    panel: PanelState,
    speech: SpeechSession,
    notices: Vec<Notice>,
    last_save_error: Option<PersistenceError>,
}

impl<Surf, Store, Sp> Controller<Surf, Store, Sp>
where
    Surf: PresentationSurface,
    Store: KeyValueStore,
    Sp: Speaker,
{
    /// Load persisted settings for `profile` and reconcile the surface once.
    pub fn start(profile: WidgetProfile, surface: Surf, backend: Store, speaker: Sp) -> Self {
        let store = SettingsStore::new(backend, profile.storage_key.clone());
        let mut record = store.load();
        record.retain_flags(|flag| profile.offers(flag));
        log::info!(
            "starting '{}' widget at {} with {} flag(s) on",
            profile.name,
            record.font_scale,
            record.flags.enabled().count()
        );

        let mut controller = Self {
            profile,
            catalog: PresetCatalog::builtin(),
            surface,
            store,
            speaker,
            record,
            panel: PanelState::Closed,
            speech: SpeechSession::default(),
            notices: Vec::new(),
            last_save_error: None,
        };
        controller.reconcile();
        controller
    }

    #[must_use]
    pub const fn record(&self) -> &SettingsRecord {
        &self.record
    }

    #[must_use]
    pub const fn profile(&self) -> &WidgetProfile {
        &self.profile
    }

    #[must_use]
    pub const fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn panel(&self) -> PanelState {
        self.panel
    }

    #[must_use]
    pub const fn reading(&self) -> ReadingState {
        self.speech.state()
    }

    #[must_use]
    pub const fn surface(&self) -> &Surf {
        &self.surface
    }

    #[must_use]
    pub const fn store(&self) -> &SettingsStore<Store> {
        &self.store
    }

    #[must_use]
    pub const fn speaker(&self) -> &Sp {
        &self.speaker
    }

    #[must_use]
    pub const fn last_save_error(&self) -> Option<&PersistenceError> {
        self.last_save_error.as_ref()
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- settings -------------------------------------------------------

    /// Replace the whole record.
    pub fn apply_settings(&mut self, record: SettingsRecord) {
        self.record = record;
        let profile = &self.profile;
        self.record.retain_flags(|flag| profile.offers(flag));
        self.commit();
    }

    /// Set one flag, then reconcile and persist even if it was already set.
    pub fn toggle_flag(&mut self, flag: FlagName, value: bool) {
        if !self.profile.offers(flag) {
            log::debug!("'{}' does not offer {flag}; ignoring", self.profile.name);
            return;
        }
        self.record.set_flag(flag, value);
        self.commit();
    }

    /// Shift the font scale by `delta`, clamping silently at the bounds.
    pub fn adjust_font_scale(&mut self, delta: i32) {
        self.record.font_scale = self.record.font_scale.adjusted(delta);
        self.commit();
    }

    pub fn increase_font(&mut self) {
        self.adjust_font_scale(self.profile.font_step);
    }

    pub fn decrease_font(&mut self) {
        self.adjust_font_scale(self.profile.font_step.saturating_neg());
    }

    /// Merge the named preset over the live record. Unknown names are a no-op.
    ///
    /// Returns whether a preset was applied.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(preset) = self.catalog.get(name) else {
            log::debug!("unknown preset '{name}'; ignoring");
            return false;
        };
        let profile = &self.profile;
        self.record
            .merge_where(&preset.settings, |flag| profile.offers(flag));
        self.commit();
        self.notices.push(Notice::PresetApplied {
            preset: preset.name,
            label_key: preset.label_key,
        });
        true
    }

    /// Back to defaults: every flag off, scale 100.
    pub fn reset_all(&mut self) {
        self.record = SettingsRecord::default();
        self.commit();
        self.notices.push(Notice::SettingsReset);
    }

    fn reconcile(&mut self) {
        applier::reconcile(&mut self.surface, &self.record);
    }

    fn commit(&mut self) {
        self.reconcile();
        match self.store.save(&self.record) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                log::warn!("could not persist settings under '{}': {err}", self.store.key());
                self.last_save_error = Some(err);
            }
        }
    }

    // --- panel ----------------------------------------------------------

    pub fn open(&mut self) -> Option<FocusTarget> {
        self.panel.open()
    }

    pub fn close(&mut self) -> Option<FocusTarget> {
        self.panel.close()
    }

    pub fn toggle_panel(&mut self) -> Option<FocusTarget> {
        self.panel.toggle()
    }

    pub fn dismiss(&mut self, reason: DismissReason) -> Option<FocusTarget> {
        self.panel.dismiss(reason)
    }

    // --- speech ---------------------------------------------------------

    /// Read `text` aloud, cancelling any read already in progress.
    ///
    /// Queues [`Notice::SpeechUnavailable`] when there is no synthesizer.
    pub fn read_page(&mut self, text: &str) -> Option<UtteranceId> {
        match self
            .speech
            .start(&mut self.speaker, text, &self.profile.speech_lang)
        {
            Ok(id) => Some(id),
            Err(err) => {
                log::info!("{err}");
                self.notices.push(Notice::SpeechUnavailable);
                None
            }
        }
    }

    pub fn stop_reading(&mut self) {
        self.speech.stop(&mut self.speaker);
    }

    /// Completion callback from the speaker. Returns whether the indicator changed.
    pub fn speech_finished(&mut self, id: UtteranceId) -> bool {
        self.speech.finished(id)
    }

    /// Stop speech and strip this widget's presentation without touching storage.
    pub fn teardown(mut self) -> Surf {
        self.stop_reading();
        for flag in FlagName::ALL {
            self.surface.set_flag(flag, false);
        }
        self.surface.clear_scale();
        self.surface
    }
}
