//! Mutable, identity-stable segment collection
//!
//! The store is the single writer for the user's segments. Identity lives in
//! an arena map keyed by [`SegmentId`] plus a separate ordered id list for
//! display order, so insert/remove/reorder never shift identity the way
//! index-keyed collections do. Selection is an orthogonal id set, kept a
//! subset of existing ids by every mutation.
//!
//! The store deliberately does not enforce "no overlap": overlapping user
//! segments are a legal editing state. Only the inversion and chapter
//! consumers in [`crate::timeline`] refuse overlapping input.

use std::collections::{HashMap, HashSet};

use crate::domain::model::{Bound, Segment, SegmentId};

/// Identity-stable collection of user segments plus the current selection
#[derive(Debug, Default, Clone)]
pub struct SegmentStore {
    segments: HashMap<SegmentId, Segment>,
    order: Vec<SegmentId>,
    selected: HashSet<SegmentId>,
    /// The segment playback currently revolves around, if any
    active: Option<SegmentId>,
}

impl SegmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a segment by id
    pub fn get(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Append a new segment with a fresh id and return its id
    pub fn add(&mut self, start: Bound, end: Bound, name: impl Into<String>) -> SegmentId {
        let segment = Segment::named(start, end, name);
        let id = segment.id.clone();
        self.segments.insert(id.clone(), segment);
        self.order.push(id.clone());
        id
    }

    /// Remove a segment; it also disappears from the selection and stops
    /// being active
    pub fn remove(&mut self, id: &SegmentId) -> Option<Segment> {
        let removed = self.segments.remove(id)?;
        self.order.retain(|existing| existing != id);
        self.selected.remove(id);
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(removed)
    }

    /// Move a segment to a new ordinal position (clamped to the collection
    /// length). Pure list reindex: ids and selection are untouched.
    pub fn reorder(&mut self, id: &SegmentId, new_index: usize) -> bool {
        let Some(current) = self.order.iter().position(|existing| existing == id) else {
            return false;
        };
        let moved = self.order.remove(current);
        let target = new_index.min(self.order.len());
        self.order.insert(target, moved);
        true
    }

    /// Clone a segment under a fresh id, inserted directly after the source
    pub fn duplicate(&mut self, id: &SegmentId) -> Option<SegmentId> {
        let position = self.order.iter().position(|existing| existing == id)?;
        let mut clone = self.segments.get(id)?.clone();
        clone.id = SegmentId::new();
        let clone_id = clone.id.clone();
        self.segments.insert(clone_id.clone(), clone);
        self.order.insert(position + 1, clone_id.clone());
        Some(clone_id)
    }

    /// Set a segment's display name
    pub fn set_name(&mut self, id: &SegmentId, name: impl Into<String>) -> bool {
        match self.segments.get_mut(id) {
            Some(segment) => {
                segment.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Set or replace a tag on a segment
    pub fn set_tag(
        &mut self,
        id: &SegmentId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.segments.get_mut(id) {
            Some(segment) => {
                segment.tags.insert(key.into(), value.into());
                true
            }
            None => false,
        }
    }

    /// Remove a tag from a segment
    pub fn remove_tag(&mut self, id: &SegmentId, key: &str) -> bool {
        match self.segments.get_mut(id) {
            Some(segment) => segment.tags.remove(key).is_some(),
            None => false,
        }
    }

    /// Mark a segment as the active one (no-op for unknown ids)
    pub fn set_active(&mut self, id: &SegmentId) -> bool {
        if self.segments.contains_key(id) {
            self.active = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Clear the active segment
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The currently active segment, if any
    pub fn active(&self) -> Option<&Segment> {
        self.active.as_ref().and_then(|id| self.segments.get(id))
    }

    /// Whether a segment is currently selected
    pub fn is_selected(&self, id: &SegmentId) -> bool {
        self.selected.contains(id)
    }

    /// Select one segment (no-op for unknown ids)
    pub fn select(&mut self, id: &SegmentId) {
        if self.segments.contains_key(id) {
            self.selected.insert(id.clone());
        }
    }

    /// Deselect one segment
    pub fn deselect(&mut self, id: &SegmentId) {
        self.selected.remove(id);
    }

    /// Toggle one segment's selection
    pub fn toggle_selection(&mut self, id: &SegmentId) {
        if self.selected.contains(id) {
            self.selected.remove(id);
        } else {
            self.select(id);
        }
    }

    /// Select every segment
    pub fn select_all(&mut self) {
        self.selected = self.order.iter().cloned().collect();
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Invert the selection across all segments
    pub fn invert_selection(&mut self) {
        self.selected = self
            .order
            .iter()
            .filter(|id| !self.selected.contains(*id))
            .cloned()
            .collect();
    }

    /// Select exactly the segments matching a predicate
    pub fn select_where<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Segment) -> bool,
    {
        self.selected = self
            .order
            .iter()
            .filter(|id| predicate(&self.segments[*id]))
            .cloned()
            .collect();
    }

    /// Snapshot of the collection in display order
    pub fn snapshot(&self) -> Vec<Segment> {
        self.order
            .iter()
            .map(|id| self.segments[id].clone())
            .collect()
    }

    /// Ids of the currently selected segments
    pub fn selected_ids(&self) -> HashSet<SegmentId> {
        self.selected.clone()
    }

    /// Replace the whole collection, e.g. with the output of a combine
    /// operation. Selection is restricted to ids that survived.
    pub fn replace_all(&mut self, segments: Vec<Segment>) {
        self.order = segments.iter().map(|segment| segment.id.clone()).collect();
        self.segments = segments
            .into_iter()
            .map(|segment| (segment.id.clone(), segment))
            .collect();
        self.selected.retain(|id| self.segments.contains_key(id));
        if let Some(active) = &self.active {
            if !self.segments.contains_key(active) {
                self.active = None;
            }
        }
    }
}
