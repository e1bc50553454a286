// SPDX-License-Identifier: MIT OR Apache-2.0
//! Long keyframe blocks: classification of the intervals between keys.

use crate::column::{is_time_lt, is_value_eq, BlockFlags, BlockInfo, KeyType};
use crate::curve::{CurvePoint, Interpolation};
use crate::keylist::BuildList;

/// Classify the interval between two consecutive keys of one curve
pub fn compute_block_info(prev: &CurvePoint, next: &CurvePoint) -> BlockInfo {
    let mut info = BlockInfo::EMPTY;

    // A single moving-hold key is only the first of a pair
    if next.key_type == KeyType::MovingHold && prev.key_type == KeyType::MovingHold {
        info.flags |= BlockFlags::MOVING_HOLD | BlockFlags::ANY_HOLD;
    }

    if is_value_eq(next.value, prev.value) {
        let hold = if prev.interpolation == Interpolation::Bezier {
            // The handles facing into the interval must be flat as well
            is_value_eq(next.value, next.handle_left[1]) && is_value_eq(prev.value, prev.handle_right[1])
        } else {
            !prev.interpolation.moves_between_equal_keys()
        };

        if hold {
            info.flags |= BlockFlags::STATIC_HOLD | BlockFlags::ANY_HOLD;
        }
    }

    if prev.interpolation != Interpolation::Bezier {
        info.flags |= BlockFlags::NON_BEZIER;
    }

    info.selected = prev.selected || next.selected;
    info
}

impl BuildList {
    /// Propagate curve bookkeeping to all columns, then fold in the blocks of `points`.
    pub(crate) fn update_blocks(&mut self, points: &[CurvePoint]) {
        let order = self.order();

        let max_curve = order
            .iter()
            .map(|&i| self.nodes[i].column.curve_count)
            .max()
            .unwrap_or(0);

        // Columns inserted by the last pass inherit the block they split
        let mut prev_ready: Option<usize> = None;
        for &index in &order {
            if self.nodes[index].column.curve_count > 0 {
                prev_ready = Some(index);
            } else if let Some(ready) = prev_ready {
                let source = self.nodes[ready].column;
                let column = &mut self.nodes[index].column;
                column.block_count = source.block_count;
                column.block = source.block;
            }
            self.nodes[index].column.curve_count = max_curve + 1;
        }

        self.add_curve_blocks(&order, points);
    }

    fn add_curve_blocks(&mut self, order: &[usize], points: &[CurvePoint]) {
        let mut pos = 0;

        if let [first, _, ..] = points {
            // Columns before the curve starts
            while pos < order.len() && is_time_lt(self.nodes[order[pos]].column.time, first.time) {
                self.nodes[order[pos]].column.add_block(&BlockInfo::EMPTY);
                pos += 1;
            }

            for pair in points.windows(2) {
                if pos >= order.len() {
                    break;
                }
                let (prev, next) = (&pair[0], &pair[1]);

                if is_time_lt(next.time, prev.time) {
                    tracing::warn!(
                        "Keys out of order at frame {}, skipping block from {}",
                        next.time,
                        prev.time
                    );
                    // The block leading into this column is garbage too
                    if pos > 0 && is_time_lt(next.time, self.nodes[order[pos]].column.time) {
                        self.nodes[order[pos - 1]].column.add_block(&BlockInfo::EMPTY);
                    }
                    continue;
                }

                let block = compute_block_info(prev, next);
                while pos < order.len() && is_time_lt(self.nodes[order[pos]].column.time, next.time) {
                    self.nodes[order[pos]].column.add_block(&block);
                    pos += 1;
                }
            }
        }

        for &index in &order[pos..] {
            self.nodes[index].column.add_block(&BlockInfo::EMPTY);
        }
    }
}
