// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-based sources: drawing layers, mask layers and strip retiming keys.

use crate::column::KeyType;
use serde::{Deserialize, Serialize};

/// A drawing held from its frame number until the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpencilFrame {
    /// Frame the drawing starts on
    pub frame_number: i32,
    /// Frame is selected
    #[serde(default)]
    pub selected: bool,
    /// Key type of the frame
    #[serde(default)]
    pub key_type: KeyType,
}

impl GpencilFrame {
    /// Create an unselected keyframe-type frame
    pub fn new(frame_number: i32) -> Self {
        Self {
            frame_number,
            selected: false,
            key_type: KeyType::Keyframe,
        }
    }

    /// Set selection
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the key type
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }
}

/// A drawing layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpencilLayer {
    /// Layer name
    pub name: String,
    /// Frames, ordered by frame number
    pub frames: Vec<GpencilFrame>,
    /// Layer is hidden
    #[serde(default)]
    pub hidden: bool,
    /// Layer is selected
    #[serde(default)]
    pub selected: bool,
}

impl GpencilLayer {
    /// Create an empty layer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a frame
    pub fn with_frame(mut self, frame: GpencilFrame) -> Self {
        self.frames.push(frame);
        self
    }
}

/// A drawing data-block, with layers stored bottom to top
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpencilData {
    /// Layers
    pub layers: Vec<GpencilLayer>,
}

/// Node of a layer tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerTreeNode {
    /// A single layer
    Layer(GpencilLayer),
    /// A group of nodes
    Group {
        /// Group name
        name: String,
        /// Child nodes, bottom to top
        children: Vec<LayerTreeNode>,
    },
}

/// A shape key of a mask layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskShape {
    /// Frame of the shape key
    pub frame: i32,
    /// Shape key is selected
    #[serde(default)]
    pub selected: bool,
}

impl MaskShape {
    /// Create an unselected shape key
    pub fn new(frame: i32) -> Self {
        Self {
            frame,
            selected: false,
        }
    }
}

/// A mask layer and its shape keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskLayer {
    /// Layer name
    pub name: String,
    /// Shape keys, ordered by frame
    pub shapes: Vec<MaskShape>,
}

/// A retiming key of a sequencer strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetimingKey {
    /// Position of the key on the timeline
    pub timeline_frame: f32,
    /// Key is selected
    #[serde(default)]
    pub selected: bool,
}

/// A sequencer strip
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strip {
    /// Strip name
    pub name: String,
    /// Retiming is enabled for this strip
    #[serde(default)]
    pub retiming_active: bool,
    /// Retiming keys, ordered by timeline frame
    #[serde(default)]
    pub retiming_keys: Vec<RetimingKey>,
}
