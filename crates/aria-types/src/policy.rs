//! Blocking policies: which resource media a directive monopolizes.
//!
//! A directive declares the media it is `blocked_by` (it must wait while an
//! active directive blocks any of them) and the media it is `blocking` (it
//! holds them exclusively while active). [`Medium::Any`] is a wildcard that
//! overlaps with every non-empty set on either side.

use serde::{Deserialize, Serialize};

/// Coarse resource category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Audio,
    Visual,
    Any,
}

impl Medium {
    pub const ALL: [Medium; 3] = [Medium::Audio, Medium::Visual, Medium::Any];

    const fn bit(self) -> u8 {
        match self {
            Medium::Audio => 0b001,
            Medium::Visual => 0b010,
            Medium::Any => 0b100,
        }
    }
}

/// An immutable set of [`Medium`] values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Medium>", into = "Vec<Medium>")]
pub struct MediumSet(u8);

impl MediumSet {
    pub const EMPTY: MediumSet = MediumSet(0);
    /// `{audio, visual, any}`
    pub const ALL: MediumSet = MediumSet(0b111);
    /// `{any}`
    pub const ANY: MediumSet = MediumSet(0b100);
    /// `{audio, any}`
    pub const AUDIO: MediumSet = MediumSet(0b101);
    /// `{audio}`
    pub const AUDIO_ONLY: MediumSet = MediumSet(0b001);
    /// `{visual, any}`
    pub const VISUAL: MediumSet = MediumSet(0b110);
    /// `{visual}`
    pub const VISUAL_ONLY: MediumSet = MediumSet(0b010);
    /// `{audio, visual}`
    pub const AUDIO_AND_VISUAL: MediumSet = MediumSet(0b011);

    pub const fn contains(self, medium: Medium) -> bool {
        self.0 & medium.bit() != 0
    }

    /// Return a copy of this set with `medium` added.
    pub const fn with(self, medium: Medium) -> MediumSet {
        MediumSet(self.0 | medium.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Medium> {
        Medium::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Wildcard-aware intersection test.
    ///
    /// Empty sets never overlap. Otherwise `any` on either side overlaps with
    /// everything, and plain media overlap when they share a member.
    pub const fn overlaps(self, other: MediumSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if self.contains(Medium::Any) || other.contains(Medium::Any) {
            return true;
        }
        self.0 & other.0 != 0
    }
}

impl std::fmt::Debug for MediumSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Medium> for MediumSet {
    fn from_iter<I: IntoIterator<Item = Medium>>(iter: I) -> Self {
        iter.into_iter().fold(MediumSet::EMPTY, MediumSet::with)
    }
}

impl From<Vec<Medium>> for MediumSet {
    fn from(media: Vec<Medium>) -> Self {
        media.into_iter().collect()
    }
}

impl From<MediumSet> for Vec<Medium> {
    fn from(set: MediumSet) -> Self {
        set.iter().collect()
    }
}

/// Resource-exclusivity requirements of a directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingPolicy {
    pub blocked_by: Option<MediumSet>,
    pub blocking: Option<MediumSet>,
}

impl BlockingPolicy {
    pub const fn new(blocked_by: Option<MediumSet>, blocking: Option<MediumSet>) -> Self {
        Self {
            blocked_by,
            blocking,
        }
    }

    /// Whether a directive with this policy must wait while `active` runs.
    pub fn is_blocked_by(&self, active: &BlockingPolicy) -> bool {
        match (self.blocked_by, active.blocking) {
            (Some(blocked_by), Some(blocking)) => blocked_by.overlaps(blocking),
            _ => false,
        }
    }

    /// Symmetric check for two directives admitted at the same time.
    pub fn conflicts_with(&self, other: &BlockingPolicy) -> bool {
        self.is_blocked_by(other) || other.is_blocked_by(self)
    }

    /// Sound-only exclusivity: both directions are exactly `{audio}`.
    pub fn is_audio_exclusive(&self) -> bool {
        self.blocked_by == Some(MediumSet::AUDIO_ONLY) && self.blocking == Some(MediumSet::AUDIO_ONLY)
    }
}
