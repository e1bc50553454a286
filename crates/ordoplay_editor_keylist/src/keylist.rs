// SPDX-License-Identifier: MIT OR Apache-2.0
//! The keylist: a merged, time-ordered set of key columns.
//!
//! A keylist lives in two phases. While building, columns sit in a doubly
//! linked arena so that insertions next to the previously touched column are
//! cheap; sources are usually fed in time order. Once every source has been
//! added, [`AnimKeylist::prepare_for_direct_access`] freezes the columns into
//! a contiguous array that supports binary searching.
//!
//! Adjacent columns are always more than [`BINARYSEARCH_THRESHOLD`] apart,
//! which is what makes the threshold-aware comparisons usable as an ordering
//! inside the binary searches.
//!
//! [`BINARYSEARCH_THRESHOLD`]: crate::column::BINARYSEARCH_THRESHOLD

use crate::column::{is_time_eq, is_time_lt, BlockFlags, Column};
use crate::curve::CurvePoint;
use crate::error::{KeylistError, Result};
use crate::source::ColumnSource;
use std::ops::{Deref, Range};

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) column: Column,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

/// Build-phase storage: columns linked in time order through an arena.
#[derive(Debug, Clone, Default)]
pub(crate) struct BuildList {
    pub(crate) nodes: Vec<Node>,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    /// Last column added or updated
    pub(crate) cursor: Option<usize>,
}

impl BuildList {
    fn time(&self, index: usize) -> f32 {
        self.nodes[index].column.time
    }

    fn push_node(&mut self, column: Column, prev: Option<usize>, next: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node { column, prev, next });

        match prev {
            Some(p) => self.nodes[p].next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(index),
            None => self.tail = Some(index),
        }
        index
    }

    fn insert_after(&mut self, anchor: usize, column: Column) -> usize {
        let next = self.nodes[anchor].next;
        self.push_node(column, Some(anchor), next)
    }

    fn insert_before(&mut self, anchor: usize, column: Column) -> usize {
        let prev = self.nodes[anchor].prev;
        self.push_node(column, prev, Some(anchor))
    }

    /// Walk from the cursor to the column that matches `time`, or to the
    /// neighbour a new column for `time` must be inserted next to.
    ///
    /// Walking stops on the last column not strictly after `time` (forward)
    /// or the first column not strictly before it (backward), so a match
    /// within the threshold is never stepped over.
    fn find_exact_or_neighbor(&mut self, time: f32) -> Option<usize> {
        let mut cursor = self.cursor.or(self.head)?;

        if !is_time_eq(self.time(cursor), time) {
            if self.time(cursor) <= time {
                while let Some(next) = self.nodes[cursor].next {
                    if is_time_lt(time, self.time(next)) {
                        break;
                    }
                    cursor = next;
                }
            } else {
                while let Some(prev) = self.nodes[cursor].prev {
                    if is_time_lt(self.time(prev), time) {
                        break;
                    }
                    cursor = prev;
                }
            }
        }

        self.cursor = Some(cursor);
        Some(cursor)
    }

    /// Arena indices in time order
    pub(crate) fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut current = self.head;
        while let Some(index) = current {
            order.push(index);
            current = self.nodes[index].next;
        }
        order
    }

    fn columns(&self) -> Vec<Column> {
        self.order().into_iter().map(|i| self.nodes[i].column).collect()
    }
}

#[derive(Debug, Clone)]
enum Representation {
    Building(BuildList),
    Frozen(Vec<Column>),
}

/// Merged keyframe columns of one or more animation sources
#[derive(Debug, Clone)]
pub struct AnimKeylist {
    repr: Representation,
}

impl AnimKeylist {
    /// Create an empty keylist, ready for building
    pub fn new() -> Self {
        Self {
            repr: Representation::Building(BuildList::default()),
        }
    }

    /// Whether the keylist has been prepared for direct access
    pub fn is_frozen(&self) -> bool {
        matches!(self.repr, Representation::Frozen(_))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        match &self.repr {
            Representation::Building(list) => list.nodes.len(),
            Representation::Frozen(columns) => columns.len(),
        }
    }

    /// Whether the keylist holds no columns
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn build_list_mut(&mut self) -> Result<&mut BuildList> {
        match &mut self.repr {
            Representation::Building(list) => Ok(list),
            Representation::Frozen(_) => Err(KeylistError::Frozen),
        }
    }

    fn frozen(&self) -> Result<&[Column]> {
        match &self.repr {
            Representation::Frozen(columns) => Ok(columns),
            Representation::Building(_) => Err(KeylistError::NotFrozen),
        }
    }

    /// Forget the last touched column.
    ///
    /// Must be called before feeding events from another source, so the
    /// search for the insertion point does not start next to an unrelated
    /// column.
    pub fn reset_cursor(&mut self) -> Result<()> {
        self.build_list_mut()?.cursor = None;
        Ok(())
    }

    /// Merge an event into the column at `time`, creating the column if needed.
    ///
    /// `time` takes precedence over the source's own time, so a new column is
    /// always placed and stamped at `time`.
    pub fn add_or_update_column<S: ColumnSource + ?Sized>(&mut self, time: f32, source: &S) -> Result<()> {
        let list = self.build_list_mut()?;
        let new_column = || Column {
            time,
            ..source.new_column()
        };

        let Some(nearest) = list.find_exact_or_neighbor(time) else {
            let index = list.push_node(new_column(), None, None);
            list.cursor = Some(index);
            return Ok(());
        };

        let nearest_time = list.time(nearest);
        let touched = if is_time_eq(nearest_time, time) {
            source.update_column(&mut list.nodes[nearest].column);
            tracing::trace!("Updated key column at {}", nearest_time);
            nearest
        } else if is_time_lt(nearest_time, time) {
            tracing::trace!("Inserted key column at {} after {}", time, nearest_time);
            list.insert_after(nearest, new_column())
        } else {
            tracing::trace!("Inserted key column at {} before {}", time, nearest_time);
            list.insert_before(nearest, new_column())
        };

        list.cursor = Some(touched);
        Ok(())
    }

    /// Merge an event into the column at the event's own time
    pub fn add_source<S: ColumnSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        self.add_or_update_column(source.time(), source)
    }

    /// Propagate block data after a source pass.
    ///
    /// Must be called once for every source after all its events were added.
    /// Curves pass their keys so the intervals between them can be classified;
    /// frame-based sources pass `None`, which only keeps the per-column curve
    /// bookkeeping consistent.
    pub fn update_blocks(&mut self, points: Option<&[CurvePoint]>) -> Result<()> {
        let list = self.build_list_mut()?;
        list.update_blocks(points.unwrap_or_default());
        Ok(())
    }

    /// Freeze the keylist into a searchable array. Calling it again is a no-op.
    pub fn prepare_for_direct_access(&mut self) {
        if let Representation::Building(list) = &self.repr {
            let columns = list.columns();
            tracing::debug!("Prepared keylist with {} columns for direct access", columns.len());
            self.repr = Representation::Frozen(columns);
        }
    }

    /// The frozen columns, in time order
    pub fn as_array(&self) -> Result<&[Column]> {
        self.frozen()
    }

    /// Iterate columns in time order, in either phase
    pub fn iter(&self) -> Columns<'_> {
        match &self.repr {
            Representation::Building(list) => Columns {
                inner: ColumnsInner::Building {
                    list,
                    front: list.head,
                    back: list.tail,
                    remaining: list.nodes.len(),
                },
            },
            Representation::Frozen(columns) => Columns {
                inner: ColumnsInner::Frozen(columns.iter()),
            },
        }
    }

    /// First column in time order
    pub fn first(&self) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        Ok((!columns.is_empty()).then(|| ColumnRef::new(columns, 0)))
    }

    /// Last column in time order
    pub fn last(&self) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        Ok(columns.len().checked_sub(1).map(|index| ColumnRef::new(columns, index)))
    }

    /// Index of the first column not before `time`
    fn lower_bound(columns: &[Column], time: f32) -> usize {
        columns.partition_point(|c| is_time_lt(c.time, time))
    }

    /// Index of the first column strictly after `time`
    fn upper_bound(columns: &[Column], time: f32) -> usize {
        columns.partition_point(|c| !is_time_lt(time, c.time))
    }

    /// Column at `time`, within the threshold
    pub fn find_exact(&self, time: f32) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        let index = Self::lower_bound(columns, time);
        Ok(columns
            .get(index)
            .filter(|c| is_time_eq(c.time, time))
            .map(|_| ColumnRef::new(columns, index)))
    }

    /// First column strictly after `time`
    pub fn find_next(&self, time: f32) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        let index = Self::upper_bound(columns, time);
        Ok((index < columns.len()).then(|| ColumnRef::new(columns, index)))
    }

    /// Last column strictly before `time`.
    ///
    /// When no column lies at or after `time` this is the last column.
    pub fn find_prev(&self, time: f32) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        if columns.is_empty() {
            return Ok(None);
        }

        let index = Self::lower_bound(columns, time);
        if index == columns.len() {
            return Ok(Some(ColumnRef::new(columns, columns.len() - 1)));
        }
        Ok(index.checked_sub(1).map(|prev| ColumnRef::new(columns, prev)))
    }

    /// Column nearest to `time`; ties go to the earlier column
    pub fn find_closest(&self, time: f32) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        let (Some(first), Some(last)) = (columns.first(), columns.last()) else {
            return Ok(None);
        };

        if is_time_lt(first.time, time) && is_time_lt(time, last.time) {
            let Some(prev) = self.find_prev(time)? else {
                return Ok(Some(ColumnRef::new(columns, 0)));
            };
            let Some(next) = prev.next() else {
                return Ok(Some(prev));
            };
            if time - prev.time <= next.time - time {
                return Ok(Some(prev));
            }
            return Ok(Some(next));
        }

        if !is_time_lt(first.time, time) {
            return Ok(Some(ColumnRef::new(columns, 0)));
        }
        Ok(Some(ColumnRef::new(columns, columns.len() - 1)))
    }

    /// Any column in the half-open range `[range.start, range.end)`.
    ///
    /// The result is the earliest such column; walk forward with
    /// [`ColumnRef::next`] to visit the rest.
    pub fn find_any_between(&self, range: Range<f32>) -> Result<Option<ColumnRef<'_>>> {
        let columns = self.frozen()?;
        let index = Self::lower_bound(columns, range.start);
        Ok(columns
            .get(index)
            .filter(|c| c.time < range.end)
            .map(|_| ColumnRef::new(columns, index)))
    }

    /// Times of the first and the last column
    pub fn all_keys_frame_range(&self) -> Option<(f32, f32)> {
        let first = self.iter().next()?;
        let last = self.iter().next_back()?;
        Some((first.time, last.time))
    }

    /// Times of the first and the last selected column.
    ///
    /// A single selected column does not make a range.
    pub fn selected_keys_frame_range(&self) -> Option<(f32, f32)> {
        let mut columns = self.iter();
        let first = columns.find(|c| c.selected)?;
        let last = columns.rfind(|c| c.selected)?;
        Some((first.time, last.time))
    }
}

impl Default for AnimKeylist {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over the columns of a keylist
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    inner: ColumnsInner<'a>,
}

#[derive(Debug, Clone)]
enum ColumnsInner<'a> {
    Building {
        list: &'a BuildList,
        front: Option<usize>,
        back: Option<usize>,
        remaining: usize,
    },
    Frozen(std::slice::Iter<'a, Column>),
}

impl<'a> Iterator for Columns<'a> {
    type Item = &'a Column;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ColumnsInner::Building {
                list,
                front,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return None;
                }
                let list: &'a BuildList = *list;
                let node = &list.nodes[(*front)?];
                *front = node.next;
                *remaining -= 1;
                Some(&node.column)
            }
            ColumnsInner::Frozen(iter) => iter.next(),
        }
    }
}

impl<'a> DoubleEndedIterator for Columns<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ColumnsInner::Building {
                list,
                back,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return None;
                }
                let list: &'a BuildList = *list;
                let node = &list.nodes[(*back)?];
                *back = node.prev;
                *remaining -= 1;
                Some(&node.column)
            }
            ColumnsInner::Frozen(iter) => iter.next_back(),
        }
    }
}

impl<'a> IntoIterator for &'a AnimKeylist {
    type Item = &'a Column;
    type IntoIter = Columns<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A column of a frozen keylist, with access to its neighbours
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef<'a> {
    columns: &'a [Column],
    index: usize,
}

impl<'a> ColumnRef<'a> {
    fn new(columns: &'a [Column], index: usize) -> Self {
        Self { columns, index }
    }

    /// Position in [`AnimKeylist::as_array`]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The column itself
    pub fn column(&self) -> &'a Column {
        &self.columns[self.index]
    }

    /// Previous column, if any
    pub fn prev(&self) -> Option<ColumnRef<'a>> {
        self.index.checked_sub(1).map(|i| Self::new(self.columns, i))
    }

    /// Next column, if any
    pub fn next(&self) -> Option<ColumnRef<'a>> {
        let i = self.index + 1;
        (i < self.columns.len()).then(|| Self::new(self.columns, i))
    }

    /// The block starting here has an end column and at least one curve contributed to it
    pub fn block_is_valid(&self) -> bool {
        self.next().is_some() && self.column().block_count > 0
    }

    /// Hold flags of the block starting here that every contributing curve agrees on
    pub fn valid_hold(&self) -> BlockFlags {
        if !self.block_is_valid() {
            return BlockFlags::empty();
        }
        let block = &self.column().block;
        (block.flags & !block.conflict) & (BlockFlags::ANY_HOLD | BlockFlags::STATIC_HOLD)
    }
}

impl Deref for ColumnRef<'_> {
    type Target = Column;

    fn deref(&self) -> &Column {
        self.column()
    }
}
