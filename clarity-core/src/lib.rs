//! Clarity Settings Engine
//!
//! Platform-agnostic core of the Clarity accessibility overlay: the settings
//! record, its persistence, reconciliation onto a presentation surface, preset
//! bundles and the controller that ties them together. This crate has no UI or
//! browser dependencies; hosts supply a [`PresentationSurface`], a
//! [`KeyValueStore`] and a [`Speaker`].

pub mod applier;
pub mod controller;
pub mod flags;
pub mod panel;
pub mod presets;
pub mod profile;
pub mod scale;
pub mod settings;
pub mod speech;
pub mod store;
pub mod surface;

// Re-export commonly used types
pub use applier::{apply_font_scale, plan, reconcile};
pub use controller::{Controller, Notice};
pub use flags::{FlagName, Flags, UnknownFlag};
pub use panel::{DismissReason, FocusTarget, PanelState};
pub use presets::{PresetCatalog, PresetDefinition};
pub use profile::{ScaleMode, WidgetProfile};
pub use scale::{FontBucket, FontScale};
pub use settings::{PartialSettings, SettingsRecord};
pub use speech::{
    NoSpeech, ReadingState, RecordingSpeaker, SpeechSession, SpeechUnavailable, Speaker,
    Utterance, UtteranceId,
};
pub use store::{
    KeyValueStore, LoadError, MemoryStore, MemoryStoreError, PersistenceError, SettingsStore,
};
pub use surface::{PresentationSurface, RecordingSurface, SurfaceOp, SurfaceOps, SurfaceState};
