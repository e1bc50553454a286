// SPDX-License-Identifier: MIT OR Apache-2.0
//! Column adapters: how each kind of source event creates or updates a column.
//!
//! The set of sources is closed. Every event kind that can be folded into a
//! keylist implements [`ColumnSource`] here:
//! - [`CurvePointChain`]: a curve key with its neighbours
//! - [`GpencilFrame`]: a drawing frame (always starts a visible block)
//! - [`MaskShape`]: a mask shape key
//! - [`RetimingKey`]: a strip retiming key

use crate::column::{BlockFlags, Column, KeyType};
use crate::curve::CurvePoint;
use crate::extreme::extreme_type;
use crate::layer::{GpencilFrame, MaskShape, RetimingKey};

mod private {
    pub trait Sealed {}
}

/// An event that can be merged into a keylist column
pub trait ColumnSource: private::Sealed {
    /// Frame the event happens on
    fn time(&self) -> f32;

    /// Build a fresh column for this event
    fn new_column(&self) -> Column;

    /// Merge this event into an existing column at the same time
    fn update_column(&self, column: &mut Column);
}

/// A curve key together with its logical neighbours on the same curve.
///
/// Neighbours are only needed for extreme detection and may be left out.
#[derive(Debug, Clone, Copy)]
pub struct CurvePointChain<'a> {
    /// Current key
    pub cur: &'a CurvePoint,
    /// Previous key, wrapping around on cyclic curves
    pub prev: Option<&'a CurvePoint>,
    /// Next key, wrapping around on cyclic curves
    pub next: Option<&'a CurvePoint>,
}

impl<'a> CurvePointChain<'a> {
    /// Create a chain
    pub fn new(cur: &'a CurvePoint, prev: Option<&'a CurvePoint>, next: Option<&'a CurvePoint>) -> Self {
        Self { cur, prev, next }
    }

    /// A chain without neighbours
    pub fn single(cur: &'a CurvePoint) -> Self {
        Self::new(cur, None, None)
    }
}

impl private::Sealed for CurvePointChain<'_> {}

impl ColumnSource for CurvePointChain<'_> {
    fn time(&self) -> f32 {
        self.cur.time
    }

    fn new_column(&self) -> Column {
        let mut column = Column::new(self.cur.time, self.cur.selected).with_key_type(self.cur.key_type);
        column.handle_type = self.cur.handle_type();
        column.extreme = extreme_type(self);
        column
    }

    fn update_column(&self, column: &mut Column) {
        column.merge_key(self.cur.selected, Some(self.cur.key_type));
        column.handle_type = column.handle_type.max(self.cur.handle_type());
        column.merge_extreme(extreme_type(self));
    }
}

impl private::Sealed for GpencilFrame {}

impl ColumnSource for GpencilFrame {
    fn time(&self) -> f32 {
        self.frame_number as f32
    }

    fn new_column(&self) -> Column {
        Column::new(self.time(), self.selected)
            .with_key_type(self.key_type)
            .with_visible_block(BlockFlags::GPENCIL)
    }

    fn update_column(&self, column: &mut Column) {
        column.merge_key(self.selected, Some(self.key_type));
    }
}

impl private::Sealed for MaskShape {}

impl ColumnSource for MaskShape {
    fn time(&self) -> f32 {
        self.frame as f32
    }

    fn new_column(&self) -> Column {
        Column::new(self.time(), self.selected)
    }

    fn update_column(&self, column: &mut Column) {
        column.merge_key(self.selected, None);
    }
}

impl private::Sealed for RetimingKey {}

impl ColumnSource for RetimingKey {
    fn time(&self) -> f32 {
        self.timeline_frame
    }

    fn new_column(&self) -> Column {
        Column::new(self.timeline_frame, self.selected)
            .with_key_type(KeyType::Keyframe)
            .with_visible_block(BlockFlags::empty())
    }

    fn update_column(&self, column: &mut Column) {
        column.merge_key(self.selected, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ExtremeFlags, HandleType};
    use crate::curve::HandleKind;

    #[test]
    fn test_curve_point_column() {
        let prev = CurvePoint::new(0.0, 0.0);
        let cur = CurvePoint::new(10.0, 5.0)
            .with_selected(true)
            .with_key_type(KeyType::Breakdown)
            .with_handle_kinds(HandleKind::Vector, HandleKind::Vector);
        let next = CurvePoint::new(20.0, 0.0);

        let column = CurvePointChain::new(&cur, Some(&prev), Some(&next)).new_column();
        assert_eq!(column.time, 10.0);
        assert!(column.selected);
        assert_eq!(column.key_type, KeyType::Breakdown);
        assert_eq!(column.handle_type, HandleType::Vector);
        assert_eq!(column.extreme, ExtremeFlags::MAX);
        assert_eq!(column.key_count, 1);
    }

    #[test]
    fn test_curve_point_update() {
        let a = CurvePoint::new(10.0, 5.0).with_key_type(KeyType::Breakdown);
        let b = CurvePoint::new(10.0, 1.0)
            .with_selected(true)
            .with_handle_kinds(HandleKind::Free, HandleKind::Aligned);

        let mut column = CurvePointChain::single(&a).new_column();
        CurvePointChain::single(&b).update_column(&mut column);

        assert!(column.selected);
        assert_eq!(column.key_type, KeyType::Keyframe);
        assert_eq!(column.handle_type, HandleType::Free);
        assert_eq!(column.key_count, 2);
    }

    #[test]
    fn test_gpencil_frame_column() {
        let frame = GpencilFrame::new(12).with_selected(true).with_key_type(KeyType::Breakdown);
        let mut column = frame.new_column();
        assert_eq!(column.time, 12.0);
        assert_eq!(column.block_count, 1);
        assert!(column.block.selected);
        assert_eq!(column.block.flags, BlockFlags::GPENCIL);

        GpencilFrame::new(12).update_column(&mut column);
        assert_eq!(column.key_type, KeyType::Keyframe);
        assert_eq!(column.key_count, 2);
    }

    #[test]
    fn test_mask_shape_column() {
        let mut column = MaskShape::new(4).new_column();
        assert!(!column.selected);
        assert_eq!(column.block_count, 0);

        MaskShape { frame: 4, selected: true }.update_column(&mut column);
        assert!(column.selected);
        assert_eq!(column.key_count, 2);
    }
}
