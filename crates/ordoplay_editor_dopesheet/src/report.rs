// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text report of a frozen keylist.

use ordoplay_editor_keylist::{AnimKeylist, BlockFlags, ColumnRef, ExtremeFlags, KeyType, KeylistError};
use std::fmt::Write;

fn key_type_label(key_type: KeyType) -> &'static str {
    match key_type {
        KeyType::Keyframe => "key",
        KeyType::Extreme => "extreme",
        KeyType::Breakdown => "breakdown",
        KeyType::Jitter => "jitter",
        KeyType::MovingHold => "moving-hold",
        KeyType::Generated => "generated",
    }
}

fn extreme_label(extreme: ExtremeFlags) -> &'static str {
    if extreme.contains(ExtremeFlags::MIXED) {
        "mixed"
    } else if extreme == ExtremeFlags::FLAT {
        "flat"
    } else if extreme == ExtremeFlags::MAX {
        "max"
    } else if extreme == ExtremeFlags::MIN {
        "min"
    } else {
        "-"
    }
}

fn hold_label(column: &ColumnRef<'_>) -> &'static str {
    let hold = column.valid_hold();
    if hold.contains(BlockFlags::STATIC_HOLD) {
        "hold"
    } else if hold.contains(BlockFlags::ANY_HOLD) {
        "moving-hold"
    } else if column.block_is_valid() {
        "block"
    } else {
        ""
    }
}

/// One line per column: frame, selection, key type, key count, extreme and hold
pub fn format_keylist(title: &str, keylist: &AnimKeylist) -> Result<String, KeylistError> {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    let Some(mut current) = keylist.first()? else {
        let _ = writeln!(out, "  (no keys)");
        return Ok(out);
    };

    loop {
        let _ = writeln!(
            out,
            "  {:>8.2} {} {:<11} x{:<3} {:<6} {}",
            current.time,
            if current.selected { '*' } else { ' ' },
            key_type_label(current.key_type),
            current.key_count,
            extreme_label(current.extreme),
            hold_label(&current),
        );
        match current.next() {
            Some(next) => current = next,
            None => break,
        }
    }

    if let Some((start, end)) = keylist.all_keys_frame_range() {
        let _ = writeln!(out, "  range {start:.2}..{end:.2}");
    }
    if let Some((start, end)) = keylist.selected_keys_frame_range() {
        let _ = writeln!(out, "  selected {start:.2}..{end:.2}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_editor_keylist::{fcurve_to_keylist, CurvePoint, FCurve, KeylistSettings};

    #[test]
    fn test_report() {
        let curve = FCurve::new("location")
            .with_point(CurvePoint::new(1.0, 0.0).with_selected(true))
            .with_point(CurvePoint::new(5.0, 0.0).with_selected(true));
        let mut keylist = AnimKeylist::new();
        fcurve_to_keylist(&mut keylist, &curve, &KeylistSettings::default()).unwrap();
        keylist.prepare_for_direct_access();

        let report = format_keylist("location", &keylist).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "location");
        assert!(lines[1].contains("1.00"));
        assert!(lines[1].ends_with("hold"));
        assert!(lines[2].contains("5.00"));
        assert_eq!(lines[3], "  range 1.00..5.00");
        assert_eq!(lines[4], "  selected 1.00..5.00");
    }

    #[test]
    fn test_empty_report() {
        let mut keylist = AnimKeylist::new();
        keylist.prepare_for_direct_access();
        let report = format_keylist("empty", &keylist).unwrap();
        assert_eq!(report, "empty\n  (no keys)\n");
    }

    #[test]
    fn test_report_needs_frozen_keylist() {
        let keylist = AnimKeylist::new();
        assert!(format_keylist("building", &keylist).is_err());
    }
}
