// SPDX-License-Identifier: MIT OR Apache-2.0
//! Local extreme detection for curve keys.

use crate::column::{is_value_eq, ExtremeFlags};
use crate::curve::Interpolation;
use crate::source::CurvePointChain;

/// Classify a key against its logical neighbours on the same curve.
///
/// Ends of flat sections are reported as extremes too: one neighbour may be
/// equal to the key as long as the other one establishes a direction.
pub fn extreme_type(chain: &CurvePointChain<'_>) -> ExtremeFlags {
    if chain.prev.is_none() && chain.next.is_none() {
        return ExtremeFlags::NONE;
    }

    let cur_y = chain.cur.value;
    let prev_y = chain
        .prev
        .map(|p| p.value)
        .filter(|&y| !is_value_eq(cur_y, y))
        .unwrap_or(cur_y);
    let next_y = chain
        .next
        .map(|n| n.value)
        .filter(|&y| !is_value_eq(cur_y, y))
        .unwrap_or(cur_y);

    if prev_y == cur_y && next_y == cur_y {
        return ExtremeFlags::FLAT;
    }

    // Middle of an incline
    if (prev_y < cur_y && next_y > cur_y) || (prev_y > cur_y && next_y < cur_y) {
        return ExtremeFlags::NONE;
    }

    let left_bezier = chain
        .prev
        .is_some_and(|p| p.interpolation == Interpolation::Bezier);
    let right_bezier = chain.next.is_some() && chain.cur.interpolation == Interpolation::Bezier;
    let handle_l = if left_bezier { chain.cur.handle_left[1] } else { cur_y };
    let handle_r = if right_bezier { chain.cur.handle_right[1] } else { cur_y };

    if prev_y < cur_y || next_y < cur_y {
        let overshoot = handle_l > cur_y || handle_r > cur_y;
        return overshoot_flag(ExtremeFlags::MAX, overshoot);
    }

    if prev_y > cur_y || next_y > cur_y {
        let overshoot = handle_l < cur_y || handle_r < cur_y;
        return overshoot_flag(ExtremeFlags::MIN, overshoot);
    }

    ExtremeFlags::NONE
}

fn overshoot_flag(kind: ExtremeFlags, overshoot: bool) -> ExtremeFlags {
    if overshoot {
        kind | ExtremeFlags::MIXED
    } else {
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurvePoint;

    fn classify(values: [f32; 3]) -> ExtremeFlags {
        let points: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| CurvePoint::new(i as f32 * 10.0, v))
            .collect();
        extreme_type(&CurvePointChain::new(&points[1], Some(&points[0]), Some(&points[2])))
    }

    #[test]
    fn test_maximum() {
        assert_eq!(classify([0.0, 5.0, 0.0]), ExtremeFlags::MAX);
    }

    #[test]
    fn test_minimum() {
        assert_eq!(classify([5.0, 0.0, 5.0]), ExtremeFlags::MIN);
    }

    #[test]
    fn test_flat() {
        assert_eq!(classify([5.0, 5.0, 5.0]), ExtremeFlags::FLAT);
    }

    #[test]
    fn test_incline() {
        assert_eq!(classify([0.0, 5.0, 10.0]), ExtremeFlags::NONE);
    }

    #[test]
    fn test_end_of_hold_is_extreme() {
        assert_eq!(classify([5.0, 5.0, 0.0]), ExtremeFlags::MAX);
        assert_eq!(classify([0.0, 5.0, 5.0]), ExtremeFlags::MAX);
    }

    #[test]
    fn test_no_neighbours() {
        let point = CurvePoint::new(0.0, 1.0);
        assert_eq!(extreme_type(&CurvePointChain::new(&point, None, None)), ExtremeFlags::NONE);
    }

    #[test]
    fn test_single_neighbour() {
        let a = CurvePoint::new(0.0, 1.0);
        let b = CurvePoint::new(10.0, 1.0);
        assert_eq!(extreme_type(&CurvePointChain::new(&b, Some(&a), None)), ExtremeFlags::FLAT);

        let c = CurvePoint::new(10.0, 3.0);
        assert_eq!(extreme_type(&CurvePointChain::new(&c, Some(&a), None)), ExtremeFlags::MAX);
    }

    #[test]
    fn test_handle_overshoot() {
        let prev = CurvePoint::new(0.0, 0.0);
        let cur = CurvePoint::new(10.0, 5.0).with_handles([9.0, 4.0], [11.0, 6.0]);
        let next = CurvePoint::new(20.0, 0.0);
        let kind = extreme_type(&CurvePointChain::new(&cur, Some(&prev), Some(&next)));
        assert_eq!(kind, ExtremeFlags::MAX | ExtremeFlags::MIXED);

        // Handles are ignored when the segments are not Bézier
        let prev = prev.with_interpolation(Interpolation::Linear);
        let cur = cur.with_interpolation(Interpolation::Linear);
        let kind = extreme_type(&CurvePointChain::new(&cur, Some(&prev), Some(&next)));
        assert_eq!(kind, ExtremeFlags::MAX);
    }
}
