// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversions from animation sources into keylists.
//!
//! Every conversion resets the keylist cursor before feeding its events and
//! propagates blocks afterwards, so any number of sources can be summarized
//! into the same keylist.

use crate::curve::{Action, ActionGroup, FCurve};
use crate::error::Result;
use crate::keylist::AnimKeylist;
use crate::layer::{GpencilData, GpencilLayer, LayerTreeNode, MaskLayer, Strip};
use crate::settings::KeylistSettings;
use crate::source::CurvePointChain;
use serde::{Deserialize, Serialize};

/// One row of the dope sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Channel {
    /// A single animation curve
    Curve(FCurve),
    /// All curves of an action
    Action(Action),
    /// A drawing layer
    GpencilLayer(GpencilLayer),
    /// A drawing layer tree
    LayerTree(LayerTreeNode),
    /// A mask layer
    MaskLayer(MaskLayer),
    /// A sequencer strip
    Strip(Strip),
}

impl Channel {
    /// Display name of the channel
    pub fn name(&self) -> &str {
        match self {
            Self::Curve(curve) => &curve.data_path,
            Self::Action(action) => &action.name,
            Self::GpencilLayer(layer) => &layer.name,
            Self::LayerTree(LayerTreeNode::Layer(layer)) => &layer.name,
            Self::LayerTree(LayerTreeNode::Group { name, .. }) => name,
            Self::MaskLayer(layer) => &layer.name,
            Self::Strip(strip) => &strip.name,
        }
    }
}

fn point_chain<'a>(curve: &'a FCurve, index: usize, with_neighbors: bool) -> CurvePointChain<'a> {
    let points = &curve.points;
    let cur = &points[index];
    if !with_neighbors {
        return CurvePointChain::single(cur);
    }

    let cyclic = curve.is_cyclic();
    let prev = if index > 0 {
        Some(&points[index - 1])
    } else if cyclic {
        Some(&points[points.len() - 2])
    } else {
        None
    };
    let next = if index + 1 < points.len() {
        Some(&points[index + 1])
    } else if cyclic {
        Some(&points[1])
    } else {
        None
    };

    CurvePointChain::new(cur, prev, next)
}

/// Add the keys of a curve.
///
/// Keys outside `settings.range` are skipped, except the nearest one on each
/// side so that blocks still reach past the visible range.
pub fn fcurve_to_keylist(keylist: &mut AnimKeylist, curve: &FCurve, settings: &KeylistSettings) -> Result<()> {
    if curve.points.is_empty() {
        return Ok(());
    }
    keylist.reset_cursor()?;

    let (start, end) = settings.range;
    let mut index_bounds: Option<(usize, usize)> = None;
    let mut include = |index: usize| {
        index_bounds = Some(match index_bounds {
            Some((min, max)) => (min.min(index), max.max(index)),
            None => (index, index),
        });
    };

    // Not binary searching the range: keys may be unsorted while being transformed
    let mut left_outside: Option<(usize, f32)> = None;
    let mut right_outside: Option<(usize, f32)> = None;
    for (index, point) in curve.points.iter().enumerate() {
        let x = point.time;
        if x < start && left_outside.map_or(true, |(_, left)| x > left) {
            left_outside = Some((index, x));
        }
        if x > end && right_outside.map_or(true, |(_, right)| x < right) {
            right_outside = Some((index, x));
        }
        if x < start || x > end {
            continue;
        }

        include(index);
        keylist.add_source(&point_chain(curve, index, settings.show_extremes))?;
    }

    for (index, _) in [left_outside, right_outside].into_iter().flatten() {
        include(index);
        keylist.add_source(&point_chain(curve, index, settings.show_extremes))?;
    }

    if let Some((min, max)) = index_bounds {
        keylist.update_blocks(Some(&curve.points[min..=max]))?;
    }

    tracing::debug!(
        "Added curve {}[{}] with {} keys to keylist",
        curve.data_path,
        curve.array_index,
        curve.points.len()
    );
    Ok(())
}

/// Add the keys of every curve in a group
pub fn action_group_to_keylist(
    keylist: &mut AnimKeylist,
    group: &ActionGroup,
    settings: &KeylistSettings,
) -> Result<()> {
    for curve in &group.curves {
        fcurve_to_keylist(keylist, curve, settings)?;
    }
    Ok(())
}

/// Add the keys of every curve in an action
pub fn action_to_keylist(keylist: &mut AnimKeylist, action: &Action, settings: &KeylistSettings) -> Result<()> {
    for group in action.groups.values() {
        action_group_to_keylist(keylist, group, settings)?;
    }
    for curve in &action.ungrouped {
        fcurve_to_keylist(keylist, curve, settings)?;
    }
    Ok(())
}

/// Add the frames of a drawing layer
pub fn gpencil_layer_to_keylist(keylist: &mut AnimKeylist, layer: &GpencilLayer) -> Result<()> {
    keylist.reset_cursor()?;
    for frame in &layer.frames {
        keylist.add_source(frame)?;
    }
    keylist.update_blocks(None)?;

    tracing::debug!("Added layer {} with {} frames to keylist", layer.name, layer.frames.len());
    Ok(())
}

/// Add the frames of every visible layer, top layer first.
///
/// With `active_only`, only selected layers contribute.
pub fn gpencil_to_keylist(keylist: &mut AnimKeylist, data: &GpencilData, active_only: bool) -> Result<()> {
    for layer in data.layers.iter().rev() {
        if layer.hidden {
            continue;
        }
        if !active_only || layer.selected {
            gpencil_layer_to_keylist(keylist, layer)?;
        }
    }
    Ok(())
}

/// Add the frames of every layer below a layer tree node, top layer first
pub fn layer_tree_to_keylist(keylist: &mut AnimKeylist, node: &LayerTreeNode) -> Result<()> {
    match node {
        LayerTreeNode::Layer(layer) => gpencil_layer_to_keylist(keylist, layer),
        LayerTreeNode::Group { children, .. } => {
            for child in children.iter().rev() {
                layer_tree_to_keylist(keylist, child)?;
            }
            Ok(())
        }
    }
}

/// Add the shape keys of a mask layer
pub fn mask_layer_to_keylist(keylist: &mut AnimKeylist, layer: &MaskLayer) -> Result<()> {
    keylist.reset_cursor()?;
    for shape in &layer.shapes {
        keylist.add_source(shape)?;
    }
    keylist.update_blocks(None)
}

/// Add the retiming keys of a strip, if retiming is active
pub fn strip_to_keylist(keylist: &mut AnimKeylist, strip: &Strip) -> Result<()> {
    if !strip.retiming_active {
        return Ok(());
    }
    keylist.reset_cursor()?;
    for key in &strip.retiming_keys {
        keylist.add_source(key)?;
    }
    keylist.update_blocks(None)
}

/// Add the keys of a single channel
pub fn channel_to_keylist(keylist: &mut AnimKeylist, channel: &Channel, settings: &KeylistSettings) -> Result<()> {
    match channel {
        Channel::Curve(curve) => fcurve_to_keylist(keylist, curve, settings),
        Channel::Action(action) => action_to_keylist(keylist, action, settings),
        Channel::GpencilLayer(layer) => gpencil_layer_to_keylist(keylist, layer),
        Channel::LayerTree(node) => layer_tree_to_keylist(keylist, node),
        Channel::MaskLayer(layer) => mask_layer_to_keylist(keylist, layer),
        Channel::Strip(strip) => strip_to_keylist(keylist, strip),
    }
}

/// Summarize every channel into one keylist
pub fn summary_to_keylist(keylist: &mut AnimKeylist, channels: &[Channel], settings: &KeylistSettings) -> Result<()> {
    for channel in channels {
        channel_to_keylist(keylist, channel, settings)?;
    }
    tracing::debug!("Summarized {} channels into {} columns", channels.len(), keylist.len());
    Ok(())
}
