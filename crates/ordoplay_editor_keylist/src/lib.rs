// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe column index for OrdoPlay Editor.
//!
//! This crate merges the keys of many animation sources into one ordered
//! list of columns, as shown by the dope sheet summary rows:
//! - Animation curve keys, with handle shapes and extreme detection
//! - Drawing layer frames
//! - Mask layer shape keys
//! - Strip retiming keys
//!
//! ## Architecture
//!
//! A keylist is built in two phases:
//! - Build: sources are fed one after the other through [`AnimKeylist::add_source`]
//!   (or the conversions in [`convert`]), each followed by
//!   [`AnimKeylist::update_blocks`]
//! - Query: [`AnimKeylist::prepare_for_direct_access`] freezes the columns into
//!   an array that is binary searched by the `find_*` methods
//!
//! ```
//! use ordoplay_editor_keylist::{AnimKeylist, MaskShape};
//!
//! let mut keylist = AnimKeylist::new();
//! for frame in [1, 3, 5] {
//!     keylist.add_source(&MaskShape::new(frame))?;
//! }
//! keylist.update_blocks(None)?;
//! keylist.prepare_for_direct_access();
//!
//! let next = keylist.find_next(3.0)?.map(|column| column.time);
//! assert_eq!(next, Some(5.0));
//! # Ok::<(), ordoplay_editor_keylist::KeylistError>(())
//! ```

pub mod block;
pub mod column;
pub mod convert;
pub mod curve;
pub mod error;
pub mod extreme;
pub mod keylist;
pub mod layer;
pub mod settings;
pub mod source;

pub use column::{
    BlockFlags, BlockInfo, Column, ExtremeFlags, HandleType, KeyType, BINARYSEARCH_THRESHOLD,
};
pub use convert::{
    action_group_to_keylist, action_to_keylist, channel_to_keylist, fcurve_to_keylist,
    gpencil_layer_to_keylist, gpencil_to_keylist, layer_tree_to_keylist, mask_layer_to_keylist,
    strip_to_keylist, summary_to_keylist, Channel,
};
pub use curve::{Action, ActionGroup, CurvePoint, FCurve, HandleKind, Interpolation};
pub use error::{KeylistError, Result};
pub use keylist::{AnimKeylist, ColumnRef, Columns};
pub use layer::{
    GpencilData, GpencilFrame, GpencilLayer, LayerTreeNode, MaskLayer, MaskShape, RetimingKey, Strip,
};
pub use settings::KeylistSettings;
pub use source::{ColumnSource, CurvePointChain};
