//! Stateless translation of a settings record into surface mutations
use crate::flags::FlagName;
use crate::scale::FontScale;
use crate::settings::SettingsRecord;
use crate::surface::{PresentationSurface, SurfaceOp, SurfaceOps};

/// Every mutation [`reconcile`] performs for `record`, in order.
///
/// Each flag is written explicitly on or off so a previous record's flags
/// never survive.
#[must_use]
pub fn plan(record: &SettingsRecord) -> SurfaceOps {
    FlagName::ALL
        .into_iter()
        .map(|flag| SurfaceOp::SetFlag(flag, record.flag(flag)))
        .chain(std::iter::once(SurfaceOp::SetScale(record.font_scale)))
        .collect()
}

/// Bring `surface` fully in line with `record`.
///
/// Safe to call any number of times with the same record.
pub fn reconcile(surface: &mut impl PresentationSurface, record: &SettingsRecord) {
    for op in plan(record) {
        op.apply_to(surface);
    }
}

/// Write `scale` to the surface without clamping it.
pub fn apply_font_scale(surface: &mut impl PresentationSurface, scale: FontScale) {
    surface.set_scale(scale);
}
