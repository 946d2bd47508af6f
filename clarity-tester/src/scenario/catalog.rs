use anyhow::{Result, anyhow, ensure};
use clarity_core::store::{decode, encode};
use clarity_core::{
    Controller, FlagName, FontScale, KeyValueStore, MemoryStore, Notice, RecordingSpeaker,
    RecordingSurface, SettingsRecord, SettingsStore, WidgetProfile, reconcile,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{ScenarioCtx, TestScenario};

type SimController = Controller<RecordingSurface, MemoryStore, RecordingSpeaker>;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "reconcile-idempotent",
            "Idempotent Reconciliation",
            "Reconciling the same record twice leaves the surface unchanged",
            reconcile_idempotent,
        ),
        TestScenario::new(
            "scale-clamping",
            "Font Scale Clamping",
            "Any sequence of deltas keeps the scale inside [75, 200]",
            scale_clamping,
        ),
        TestScenario::new(
            "preset-merge",
            "Partial Preset Merge",
            "Presets only overwrite the fields they name",
            preset_merge,
        ),
        TestScenario::new(
            "store-roundtrip",
            "Load/Save Round Trip",
            "Whatever is saved loads back identical",
            store_roundtrip,
        ),
        TestScenario::new(
            "corrupt-storage",
            "Corrupt Storage Recovery",
            "Unreadable blobs start the widget on defaults",
            corrupt_storage,
        ),
        TestScenario::new(
            "legacy-shapes",
            "Legacy Blob Shapes",
            "Nested and flat blobs load; bad scales repair; wrong types reject",
            legacy_shapes,
        ),
        TestScenario::new(
            "reset-complete",
            "Reset Completeness",
            "Reset after any history restores defaults everywhere",
            reset_complete,
        ),
        TestScenario::new(
            "unknown-preset",
            "Unknown Preset No-op",
            "An unknown preset name changes neither record, surface nor storage",
            unknown_preset,
        ),
        TestScenario::new(
            "single-utterance",
            "Single Utterance",
            "At most one utterance is active and stale completions are ignored",
            single_utterance,
        ),
        TestScenario::new(
            "independent-controllers",
            "Independent Controllers",
            "Widgets with distinct storage keys never see each other's changes",
            independent_controllers,
        ),
    ]
}

fn start(profile: &WidgetProfile, store: &MemoryStore) -> SimController {
    Controller::start(
        profile.clone(),
        RecordingSurface::new(),
        store.clone(),
        RecordingSpeaker::default(),
    )
}

fn random_record(profile: &WidgetProfile, rng: &mut ChaCha8Rng) -> SettingsRecord {
    let mut record = SettingsRecord {
        font_scale: FontScale::clamped(rng.gen_range(75..=200)),
        ..SettingsRecord::default()
    };
    for flag in &profile.flags {
        record.set_flag(*flag, rng.gen_bool(0.5));
    }
    record
}

/// Drive a controller through `steps` random user actions.
fn random_history(ctl: &mut SimController, rng: &mut ChaCha8Rng, steps: usize) {
    let offered = ctl.profile().flags.clone();
    let presets = ctl.catalog().names();
    for _ in 0..steps {
        match rng.gen_range(0..5) {
            0 if !offered.is_empty() => {
                let flag = offered[rng.gen_range(0..offered.len())];
                ctl.toggle_flag(flag, rng.gen_bool(0.6));
            }
            1 => ctl.increase_font(),
            2 => ctl.decrease_font(),
            3 => {
                ctl.apply_preset(presets[rng.gen_range(0..presets.len())]);
            }
            _ => ctl.adjust_font_scale(rng.gen_range(-60..=60)),
        }
    }
}

fn expect_surface_matches(ctl: &SimController) -> Result<()> {
    let record = ctl.record();
    for flag in FlagName::ALL {
        ensure!(
            ctl.surface().is_on(flag) == record.flag(flag),
            "surface disagrees with record on {flag}"
        );
    }
    ensure!(
        ctl.surface().scale() == Some(record.font_scale),
        "surface shows {:?}, record holds {}",
        ctl.surface().scale(),
        record.font_scale
    );
    Ok(())
}

fn reconcile_idempotent(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let record = random_record(&ctx.profile, rng);
    let mut once = RecordingSurface::new();
    reconcile(&mut once, &record);
    let mut twice = once.clone();
    reconcile(&mut twice, &record);
    ensure!(
        once.state() == twice.state(),
        "second reconcile of {record:?} changed the surface"
    );
    Ok(())
}

fn scale_clamping(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let mut ctl = start(&ctx.profile, &MemoryStore::new());
    for _ in 0..50 {
        let delta = match rng.gen_range(0..4) {
            0 => rng.gen_range(-30..=30),
            1 => rng.gen_range(-5_000..=5_000),
            2 => i32::MAX,
            _ => i32::MIN,
        };
        ctl.adjust_font_scale(delta);
        let scale = ctl.record().font_scale;
        ensure!(
            (FontScale::MIN..=FontScale::MAX).contains(&scale),
            "delta {delta} produced {scale}"
        );
    }

    ctl.apply_settings(SettingsRecord {
        font_scale: FontScale::clamped(190),
        ..SettingsRecord::default()
    });
    ctl.adjust_font_scale(25);
    ensure!(ctl.record().font_scale.percent() == 200, "190 + 25 should clamp to 200");
    ctl.apply_settings(SettingsRecord {
        font_scale: FontScale::MIN,
        ..SettingsRecord::default()
    });
    ctl.adjust_font_scale(-25);
    ensure!(ctl.record().font_scale.percent() == 75, "75 - 25 should clamp to 75");
    expect_surface_matches(&ctl)
}

fn preset_merge(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let mut ctl = start(&ctx.profile, &MemoryStore::new());
    random_history(&mut ctl, rng, 10);
    let before = *ctl.record();
    let names = ctl.catalog().names();
    let name = names[rng.gen_range(0..names.len())];
    let preset = ctl
        .catalog()
        .get(name)
        .ok_or_else(|| anyhow!("catalog lost preset '{name}'"))?;

    ensure!(ctl.apply_preset(name), "preset '{name}' was not applied");
    let after = *ctl.record();
    for flag in FlagName::ALL {
        let named = preset.settings.flags.iter().find(|(f, _)| *f == flag);
        let expected = match named {
            Some((_, value)) if ctx.profile.offers(flag) => *value,
            _ => before.flag(flag),
        };
        ensure!(
            after.flag(flag) == expected,
            "preset '{name}' left {flag}={} (expected {expected})",
            after.flag(flag)
        );
    }
    if let Some(scale) = preset.settings.font_scale {
        ensure!(after.font_scale == scale, "preset '{name}' scale not applied");
    }
    ensure!(
        ctl.drain_notices()
            .iter()
            .any(|n| matches!(n, Notice::PresetApplied { preset, .. } if *preset == name)),
        "preset '{name}' queued no notice"
    );
    expect_surface_matches(&ctl)
}

fn store_roundtrip(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let store = SettingsStore::new(MemoryStore::new(), ctx.profile.storage_key.clone());
    let record = random_record(&ctx.profile, rng);
    store
        .save(&record)
        .map_err(|err| anyhow!("save failed: {err}"))?;
    let loaded = store.load();
    ensure!(loaded == record, "saved {record:?}, loaded {loaded:?}");
    Ok(())
}

const CORRUPT_BLOBS: &[&str] = &[
    "",
    "not json",
    "{\"fontScale\":",
    "42",
    "null",
    "[]",
    "\"text\"",
    "{\"fontScale\":\"big\"}",
    "{\"flags\":{\"highContrast\":\"yes\"}}",
];

fn corrupt_storage(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let blob = CORRUPT_BLOBS[rng.gen_range(0..CORRUPT_BLOBS.len())];
    let store = MemoryStore::new();
    store.insert_raw(&ctx.profile.storage_key, blob);
    let ctl = start(&ctx.profile, &store);
    ensure!(ctl.record().is_default(), "blob {blob:?} did not fall back to defaults");
    ensure!(
        ctl.surface().state().flags.is_empty(),
        "blob {blob:?} left flags on the surface"
    );
    Ok(())
}

fn legacy_shapes(_ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let scale = rng.gen_range(75..=200_i64);
    let on = rng.gen_bool(0.5);
    let nested = format!(r#"{{"fontSize":{scale},"settings":{{"highContrast":{on}}}}}"#);
    let flat = format!(r#"{{"fontSize":{scale},"highContrast":{on}}}"#);
    for blob in [&nested, &flat] {
        let record = decode(blob).map_err(|err| anyhow!("{blob} rejected: {err}"))?;
        ensure!(
            i64::from(record.font_scale.percent()) == scale,
            "{blob} loaded scale {}",
            record.font_scale
        );
        ensure!(record.flag(FlagName::HighContrast) == on, "{blob} lost highContrast");
    }

    let wild = rng.gen_range(201..=10_000_i64);
    let high = decode(&format!(r#"{{"fontScale":{wild}}}"#))?;
    ensure!(high.font_scale == FontScale::MAX, "{wild} did not clamp to 200");
    let low = decode(&format!(r#"{{"fontScale":{}}}"#, -wild))?;
    ensure!(low.font_scale == FontScale::MIN, "-{wild} did not clamp to 75");
    let zero = decode(r#"{"fontScale":0}"#)?;
    ensure!(zero.font_scale == FontScale::DEFAULT, "0 did not repair to default");

    ensure!(
        decode(r#"{"fontScale":true}"#).is_err(),
        "boolean scale must be rejected"
    );
    ensure!(
        decode(r#"{"flags":{"underlineLinks":1}}"#).is_err(),
        "numeric flag must be rejected"
    );

    let canonical = encode(&decode(&nested)?)?;
    ensure!(
        canonical.contains("\"fontScale\"") && canonical.contains("\"flags\""),
        "re-encoding did not produce the canonical shape: {canonical}"
    );
    Ok(())
}

fn reset_complete(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let store = MemoryStore::new();
    let mut ctl = start(&ctx.profile, &store);
    let steps = rng.gen_range(1..=40);
    random_history(&mut ctl, rng, steps);
    ctl.drain_notices();
    ctl.reset_all();

    ensure!(ctl.record().is_default(), "record not default after reset");
    expect_surface_matches(&ctl)?;
    ensure!(
        ctl.drain_notices() == vec![Notice::SettingsReset],
        "reset queued the wrong notices"
    );
    let reloaded = SettingsStore::new(store, ctx.profile.storage_key.clone()).load();
    ensure!(reloaded.is_default(), "storage still holds {reloaded:?}");
    Ok(())
}

fn unknown_preset(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let store = MemoryStore::new();
    let mut ctl = start(&ctx.profile, &store);
    random_history(&mut ctl, rng, 8);
    ctl.drain_notices();
    let record = *ctl.record();
    let surface = ctl.surface().state().clone();
    let blob = store
        .get(&ctx.profile.storage_key)
        .map_err(|err| anyhow!("store read failed: {err}"))?;

    let name = format!("preset-{}", rng.gen_range(0..u32::MAX));
    ensure!(!ctl.apply_preset(&name), "'{name}' should not exist");
    ensure!(*ctl.record() == record, "record changed");
    ensure!(*ctl.surface().state() == surface, "surface changed");
    ensure!(
        store.get(&ctx.profile.storage_key).ok().flatten() == blob,
        "storage changed"
    );
    ensure!(ctl.drain_notices().is_empty(), "unknown preset queued a notice");
    Ok(())
}

fn single_utterance(ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let mut ctl = start(&ctx.profile, &MemoryStore::new());
    let mut issued = Vec::new();
    for _ in 0..rng.gen_range(1..=6) {
        let text = format!("page {}", rng.gen_range(0..1000));
        let id = ctl
            .read_page(&text)
            .ok_or_else(|| anyhow!("speaker refused '{text}'"))?;
        ensure!(ctl.speaker().active == Some(id), "{id} is not the active utterance");
        issued.push(id);
    }
    let Some((&last, stale)) = issued.split_last() else {
        return Ok(());
    };
    for id in stale {
        ensure!(!ctl.speech_finished(*id), "stale completion of {id} was honoured");
        ensure!(ctl.reading().is_reading(), "stale completion stopped reading");
    }
    if rng.gen_bool(0.5) {
        ensure!(ctl.speech_finished(last), "completion of {last} was ignored");
    } else {
        ctl.stop_reading();
        ctl.stop_reading();
        ensure!(!ctl.speech_finished(last), "completion after stop changed state");
    }
    ensure!(!ctl.reading().is_reading(), "still reading");
    if ctx.verbose {
        log::debug!("{} utterances, last {last}", issued.len());
    }
    Ok(())
}

fn independent_controllers(_ctx: &ScenarioCtx, rng: &mut ChaCha8Rng) -> Result<()> {
    let store = MemoryStore::new();
    let mut classic = start(&WidgetProfile::classic(), &store);
    let mut modern = start(&WidgetProfile::modern(), &store);
    let modern_before = *modern.record();

    random_history(&mut classic, rng, 15);
    ensure!(
        *modern.record() == modern_before,
        "classic changes leaked into modern"
    );
    let classic_snapshot = *classic.record();
    random_history(&mut modern, rng, 15);
    ensure!(
        *classic.record() == classic_snapshot,
        "modern changes leaked into classic"
    );

    let classic_stored = SettingsStore::new(store.clone(), "accessibilitySettings").load();
    let modern_stored = SettingsStore::new(store, "clarity-settings").load();
    ensure!(classic_stored == classic_snapshot, "classic blob diverged");
    ensure!(modern_stored == *modern.record(), "modern blob diverged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn every_scenario_passes_for_both_profiles() {
        for profile in [WidgetProfile::classic(), WidgetProfile::modern()] {
            let ctx = ScenarioCtx {
                profile,
                verbose: false,
            };
            for scenario in catalog_scenarios() {
                for seed in 0..5 {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    (scenario.check)(&ctx, &mut rng).unwrap_or_else(|err| {
                        panic!("{} ({}) seed {seed}: {err:#}", scenario.key, ctx.profile.name)
                    });
                }
            }
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = catalog_scenarios().iter().map(|s| s.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), catalog_scenarios().len());
    }
}
