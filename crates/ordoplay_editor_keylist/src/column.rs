// SPDX-License-Identifier: MIT OR Apache-2.0
//! Key columns: every keyframe-like event at (roughly) the same time, merged.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Two times closer than this belong to the same column.
pub const BINARYSEARCH_THRESHOLD: f32 = 0.01;

/// `a` and `b` are the same frame within [`BINARYSEARCH_THRESHOLD`].
#[inline]
pub fn is_time_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= BINARYSEARCH_THRESHOLD
}

/// `a` comes strictly before `b`, by more than [`BINARYSEARCH_THRESHOLD`].
#[inline]
pub fn is_time_lt(a: f32, b: f32) -> bool {
    (b - a) > BINARYSEARCH_THRESHOLD
}

/// Exact float comparison used for key values and handles.
#[inline]
pub(crate) fn is_value_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON
}

/// Keyframe classification set by the animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyType {
    /// Regular keyframe
    #[default]
    Keyframe,
    /// Extreme pose
    Extreme,
    /// Breakdown between two keys
    Breakdown,
    /// Jitter / noise key
    Jitter,
    /// Part of a moving hold pair
    MovingHold,
    /// Generated by a tool rather than placed by hand
    Generated,
}

/// Handle shape shown for a column, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HandleType {
    /// Both handles auto-clamped
    #[default]
    AutoClamped,
    /// Both handles automatic
    Auto,
    /// Both handles vector
    Vector,
    /// Aligned handles
    Aligned,
    /// At least one free handle
    Free,
}

bitflags! {
    /// Local extreme classification of a key relative to its curve neighbours.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExtremeFlags: u8 {
        /// Value is below both neighbours
        const MIN = 1 << 0;
        /// Value is above both neighbours
        const MAX = 1 << 1;
        /// Value equals its neighbours
        const FLAT = Self::MIN.bits() | Self::MAX.bits();
        /// Handles overshoot, or curves disagree
        const MIXED = 1 << 2;
    }
}

impl ExtremeFlags {
    /// Not an extreme
    pub const NONE: Self = Self::empty();
}

bitflags! {
    /// Classification of the interval between a column and the next one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFlags: u8 {
        /// Both ends tagged as moving hold
        const MOVING_HOLD = 1 << 0;
        /// Value does not change over the interval
        const STATIC_HOLD = 1 << 1;
        /// Any kind of hold
        const ANY_HOLD = 1 << 2;
        /// Interpolation out of the first key is not Bézier
        const NON_BEZIER = 1 << 3;
        /// Block produced by a discrete drawing frame
        const GPENCIL = 1 << 4;
    }
}

/// Aggregated block data for the interval starting at a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockInfo {
    /// Union of the flags of every contributing curve
    pub flags: BlockFlags,
    /// Flags that not every contributing curve agrees on
    pub conflict: BlockFlags,
    /// Either end of a contributing interval is selected
    pub selected: bool,
}

impl BlockInfo {
    /// Block that carries no information, used to pad columns a curve does not span.
    pub const EMPTY: Self = Self {
        flags: BlockFlags::empty(),
        conflict: BlockFlags::empty(),
        selected: false,
    };

    /// Merge another curve's block into this column's block.
    pub(crate) fn merge(&mut self, other: &BlockInfo) {
        self.conflict |= self.flags ^ other.flags;
        self.flags |= other.flags;
        self.selected |= other.selected;
    }
}

/// All keyframe-like events at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Column {
    /// Representative time of the column
    pub time: f32,
    /// Any contributing event is selected
    pub selected: bool,
    /// Strongest key type seen
    pub key_type: KeyType,
    /// Widest handle shape seen
    pub handle_type: HandleType,
    /// Extreme classification, merged across curves
    pub extreme: ExtremeFlags,
    /// Number of events merged into this column
    pub key_count: u32,
    /// Block data for the interval up to the next column
    pub block: BlockInfo,
    /// Number of curves contributing a non-empty block
    pub block_count: u32,
    /// Number of source passes this column has been propagated through
    pub curve_count: u32,
}

impl Column {
    /// Create a column holding a single event
    pub fn new(time: f32, selected: bool) -> Self {
        Self {
            time,
            selected,
            key_count: 1,
            ..Default::default()
        }
    }

    /// Set the key type
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    /// Mark the column as the start of a visible block owned by a discrete frame
    pub fn with_visible_block(mut self, flags: BlockFlags) -> Self {
        self.block_count = 1;
        self.block = BlockInfo {
            flags,
            conflict: BlockFlags::empty(),
            selected: self.selected,
        };
        self
    }

    /// Record one more contributing event.
    ///
    /// Selection is OR-ed in and a `Keyframe` contribution outranks every
    /// other key type.
    pub fn merge_key(&mut self, selected: bool, key_type: Option<KeyType>) {
        self.selected |= selected;
        self.key_count += 1;
        if key_type == Some(KeyType::Keyframe) {
            self.key_type = KeyType::Keyframe;
        }
    }

    /// Merge the extreme classification of another curve's key.
    pub fn merge_extreme(&mut self, other: ExtremeFlags) {
        if other == self.extreme {
            return;
        }
        if self.extreme == ExtremeFlags::FLAT {
            self.extreme = other;
        } else if other != ExtremeFlags::FLAT {
            self.extreme |= other | ExtremeFlags::MIXED;
        }
    }

    /// Fold one curve's block into this column.
    pub(crate) fn add_block(&mut self, block: &BlockInfo) {
        if self.curve_count <= 1 && self.block_count == 0 {
            self.block = *block;
        } else {
            self.block.merge(block);
        }

        if !block.flags.is_empty() {
            self.block_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_comparison() {
        assert!(is_time_eq(1.0, 1.0 + BINARYSEARCH_THRESHOLD / 2.0));
        assert!(!is_time_eq(1.0, 1.0 + BINARYSEARCH_THRESHOLD * 2.0));
        assert!(is_time_lt(1.0, 1.0 + BINARYSEARCH_THRESHOLD * 2.0));
        assert!(!is_time_lt(1.0, 1.0 + BINARYSEARCH_THRESHOLD / 2.0));
        assert!(!is_time_lt(2.0, 1.0));
    }

    #[test]
    fn test_handle_type_order() {
        assert!(HandleType::AutoClamped < HandleType::Auto);
        assert!(HandleType::Auto < HandleType::Vector);
        assert!(HandleType::Vector < HandleType::Aligned);
        assert!(HandleType::Aligned < HandleType::Free);
    }

    #[test]
    fn test_merge_key_precedence() {
        let mut column = Column::new(1.0, false).with_key_type(KeyType::Breakdown);
        column.merge_key(false, Some(KeyType::Jitter));
        assert_eq!(column.key_type, KeyType::Breakdown);
        column.merge_key(true, Some(KeyType::Keyframe));
        assert_eq!(column.key_type, KeyType::Keyframe);
        column.merge_key(false, Some(KeyType::Breakdown));
        assert_eq!(column.key_type, KeyType::Keyframe);
        assert!(column.selected);
        // The initial event plus three merges
        assert_eq!(column.key_count, 4);
    }

    #[test]
    fn test_merge_extreme() {
        let mut column = Column::new(0.0, false);
        column.extreme = ExtremeFlags::FLAT;
        column.merge_extreme(ExtremeFlags::MAX);
        assert_eq!(column.extreme, ExtremeFlags::MAX);

        // Flat never downgrades a real extreme
        column.merge_extreme(ExtremeFlags::FLAT);
        assert_eq!(column.extreme, ExtremeFlags::MAX);

        column.merge_extreme(ExtremeFlags::MIN);
        assert!(column.extreme.contains(ExtremeFlags::MIN | ExtremeFlags::MAX | ExtremeFlags::MIXED));
    }

    #[test]
    fn test_block_conflict() {
        let mut column = Column::new(0.0, false);
        column.curve_count = 2;
        column.block = BlockInfo {
            flags: BlockFlags::STATIC_HOLD | BlockFlags::ANY_HOLD,
            ..BlockInfo::EMPTY
        };
        column.block_count = 1;

        column.add_block(&BlockInfo {
            flags: BlockFlags::ANY_HOLD,
            conflict: BlockFlags::empty(),
            selected: true,
        });

        assert_eq!(column.block.conflict, BlockFlags::STATIC_HOLD);
        assert!(column.block.flags.contains(BlockFlags::STATIC_HOLD | BlockFlags::ANY_HOLD));
        assert!(column.block.selected);
        assert_eq!(column.block_count, 2);
    }
}
