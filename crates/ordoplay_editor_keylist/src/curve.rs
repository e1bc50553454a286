// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation curve data read by the keylist builders.

use crate::column::{HandleType, KeyType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Interpolation mode from a key to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interpolation {
    /// Constant (step)
    Constant,
    /// Linear interpolation
    Linear,
    /// Cubic Bézier interpolation
    #[default]
    Bezier,
    /// Back easing
    Back,
    /// Bounce easing
    Bounce,
    /// Circular easing
    Circ,
    /// Cubic easing
    Cubic,
    /// Elastic easing
    Elastic,
    /// Exponential easing
    Expo,
    /// Quadratic easing
    Quad,
    /// Quartic easing
    Quart,
    /// Quintic easing
    Quint,
    /// Sinusoidal easing
    Sine,
}

impl Interpolation {
    /// Whether this interpolation moves even between two keys with the same value
    pub fn moves_between_equal_keys(&self) -> bool {
        matches!(self, Self::Elastic)
    }
}

/// Kind of a single Bézier handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HandleKind {
    /// Free handle
    Free,
    /// Automatic handle
    Auto,
    /// Vector handle, pointing at the neighbour key
    Vector,
    /// Aligned with the opposite handle
    Aligned,
    /// Automatic, clamped to avoid overshoot
    #[default]
    AutoClamped,
}

/// A key on an animation curve, with its two handles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Frame of the key
    pub time: f32,
    /// Value at the key
    pub value: f32,
    /// Left handle (frame, value)
    pub handle_left: [f32; 2],
    /// Right handle (frame, value)
    pub handle_right: [f32; 2],
    /// Key or either handle is selected
    #[serde(default)]
    pub selected: bool,
    /// Animator-assigned key type
    #[serde(default)]
    pub key_type: KeyType,
    /// Left handle kind
    #[serde(default)]
    pub handle_left_kind: HandleKind,
    /// Right handle kind
    #[serde(default)]
    pub handle_right_kind: HandleKind,
    /// Interpolation towards the next key
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl CurvePoint {
    /// Create a key with flat handles one frame to either side
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            handle_left: [time - 1.0, value],
            handle_right: [time + 1.0, value],
            selected: false,
            key_type: KeyType::Keyframe,
            handle_left_kind: HandleKind::AutoClamped,
            handle_right_kind: HandleKind::AutoClamped,
            interpolation: Interpolation::Bezier,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set handle positions
    pub fn with_handles(mut self, left: [f32; 2], right: [f32; 2]) -> Self {
        self.handle_left = left;
        self.handle_right = right;
        self
    }

    /// Set handle kinds
    pub fn with_handle_kinds(mut self, left: HandleKind, right: HandleKind) -> Self {
        self.handle_left_kind = left;
        self.handle_right_kind = right;
        self
    }

    /// Set the key type
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    /// Set selection
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Handle shape used when drawing this key
    pub fn handle_type(&self) -> HandleType {
        use HandleKind::{Auto, AutoClamped, Free, Vector};

        let (left, right) = (self.handle_left_kind, self.handle_right_kind);
        if left == AutoClamped && right == AutoClamped {
            return HandleType::AutoClamped;
        }
        if matches!(left, AutoClamped | Auto) && matches!(right, AutoClamped | Auto) {
            return HandleType::Auto;
        }
        if left == Vector && right == Vector {
            return HandleType::Vector;
        }
        if left == Free || right == Free {
            return HandleType::Free;
        }
        HandleType::Aligned
    }
}

/// An animation curve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FCurve {
    /// Data path of the animated property
    pub data_path: String,
    /// Array index of the animated property
    #[serde(default)]
    pub array_index: u32,
    /// Keys, normally sorted by time
    pub points: Vec<CurvePoint>,
    /// Curve repeats (cycles modifier)
    #[serde(default)]
    pub cyclic: bool,
}

impl FCurve {
    /// Create an empty curve
    pub fn new(data_path: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    /// Append a key
    pub fn with_point(mut self, point: CurvePoint) -> Self {
        self.points.push(point);
        self
    }

    /// Mark the curve as cyclic
    pub fn with_cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    /// Cyclic and long enough to wrap around
    pub fn is_cyclic(&self) -> bool {
        self.cyclic && self.points.len() >= 2
    }
}

/// A named group of curves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionGroup {
    /// Curves in this group
    pub curves: Vec<FCurve>,
}

/// A set of curves animating one data-block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Action {
    /// Action name
    pub name: String,
    /// Groups, keyed by name, in display order
    #[serde(default)]
    pub groups: IndexMap<String, ActionGroup>,
    /// Curves that belong to no group
    #[serde(default)]
    pub ungrouped: Vec<FCurve>,
}

impl Action {
    /// Create an empty action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a curve to the named group, creating the group on first use
    pub fn add_grouped(&mut self, group: impl Into<String>, curve: FCurve) {
        self.groups.entry(group.into()).or_default().curves.push(curve);
    }

    /// All curves, grouped ones first
    pub fn curves(&self) -> impl Iterator<Item = &FCurve> {
        self.groups
            .values()
            .flat_map(|group| group.curves.iter())
            .chain(self.ungrouped.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_type() {
        let point = CurvePoint::new(0.0, 0.0);
        assert_eq!(point.handle_type(), HandleType::AutoClamped);

        let point = point.with_handle_kinds(HandleKind::Auto, HandleKind::AutoClamped);
        assert_eq!(point.handle_type(), HandleType::Auto);

        let point = point.with_handle_kinds(HandleKind::Vector, HandleKind::Vector);
        assert_eq!(point.handle_type(), HandleType::Vector);

        let point = point.with_handle_kinds(HandleKind::Aligned, HandleKind::Free);
        assert_eq!(point.handle_type(), HandleType::Free);

        let point = point.with_handle_kinds(HandleKind::Aligned, HandleKind::Vector);
        assert_eq!(point.handle_type(), HandleType::Aligned);
    }

    #[test]
    fn test_action_curve_order() {
        let mut action = Action::new("Walk");
        action.ungrouped.push(FCurve::new("hide"));
        action.add_grouped("Body", FCurve::new("location"));
        action.add_grouped("Arm", FCurve::new("rotation"));
        action.add_grouped("Body", FCurve::new("scale"));

        let paths: Vec<_> = action.curves().map(|c| c.data_path.as_str()).collect();
        assert_eq!(paths, ["location", "scale", "rotation", "hide"]);
    }

    #[test]
    fn test_serialization() {
        let curve = FCurve::new("location")
            .with_point(CurvePoint::new(1.0, 0.5).with_selected(true))
            .with_cyclic(true);
        let ron_str = ron::ser::to_string_pretty(&curve, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: FCurve = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded.points.len(), 1);
        assert!(loaded.points[0].selected);
        assert!(loaded.cyclic);
        assert!(!loaded.is_cyclic());
    }
}
