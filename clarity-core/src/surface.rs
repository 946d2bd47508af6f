//! The presentation target that accessibility settings visibly affect
use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::flags::FlagName;
use crate::scale::FontScale;

/// Something that can switch named presentation flags and show a text scale.
///
/// In a browser this is the class list of `<body>` plus the root font size.
pub trait PresentationSurface {
    /// Turn the presentation for `flag` on or off.
    fn set_flag(&mut self, flag: FlagName, on: bool);

    /// Show text at `scale`. Values arrive already clamped.
    fn set_scale(&mut self, scale: FontScale);

    /// Drop any scale this surface applied, leaving the page's own sizing.
    fn clear_scale(&mut self);
}

impl<T: PresentationSurface + ?Sized> PresentationSurface for &mut T {
    fn set_flag(&mut self, flag: FlagName, on: bool) {
        (**self).set_flag(flag, on);
    }

    fn set_scale(&mut self, scale: FontScale) {
        (**self).set_scale(scale);
    }

    fn clear_scale(&mut self) {
        (**self).clear_scale();
    }
}

/// One surface mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    SetFlag(FlagName, bool),
    SetScale(FontScale),
    ClearScale,
}

impl SurfaceOp {
    pub fn apply_to(self, surface: &mut impl PresentationSurface) {
        match self {
            Self::SetFlag(flag, on) => surface.set_flag(flag, on),
            Self::SetScale(scale) => surface.set_scale(scale),
            Self::ClearScale => surface.clear_scale(),
        }
    }
}

/// The full mutation list for one reconciliation.
pub type SurfaceOps = SmallVec<[SurfaceOp; 6]>;

/// Observable state of a [`RecordingSurface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub flags: BTreeSet<FlagName>,
    pub scale: Option<FontScale>,
}

/// In-memory surface that keeps its state and every op it received.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: SurfaceState,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &SurfaceState {
        &self.state
    }

    #[must_use]
    pub fn is_on(&self, flag: FlagName) -> bool {
        self.state.flags.contains(&flag)
    }

    #[must_use]
    pub const fn scale(&self) -> Option<FontScale> {
        self.state.scale
    }

    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_flag(&mut self, flag: FlagName, on: bool) {
        self.ops.push(SurfaceOp::SetFlag(flag, on));
        if on {
            self.state.flags.insert(flag);
        } else {
            self.state.flags.remove(&flag);
        }
    }

    fn set_scale(&mut self, scale: FontScale) {
        self.ops.push(SurfaceOp::SetScale(scale));
        self.state.scale = Some(scale);
    }

    fn clear_scale(&mut self) {
        self.ops.push(SurfaceOp::ClearScale);
        self.state.scale = None;
    }
}
