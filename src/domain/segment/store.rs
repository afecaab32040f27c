use super::error::SegmentError;
use super::model::{Segment, SegmentId, SegmentStatus};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct StoreInner {
    /// Text the current segments were produced from
    source_text: Option<String>,
    order: Vec<SegmentId>,
    records: HashMap<SegmentId, Segment>,
}

/// Ordered, id-addressed collection of segment records.
///
/// Single source of truth for generation results. Writers take the lock per
/// point update, so a worker finishing one segment never overwrites another
/// worker's result.
#[derive(Default)]
pub struct SegmentStore {
    inner: RwLock<StoreInner>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every record with fresh idle segments built from `chunks`.
    pub fn replace_all(&self, source_text: String, chunks: Vec<String>) -> Vec<Segment> {
        let segments: Vec<Segment> = chunks.into_iter().map(Segment::new).collect();

        let mut inner = self.inner.write();
        inner.source_text = Some(source_text);
        inner.order = segments.iter().map(Segment::id).collect();
        inner.records = segments.iter().map(|s| (s.id(), s.clone())).collect();

        segments
    }

    pub fn source_text(&self) -> Option<String> {
        self.inner.read().source_text.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records in segmentation order.
    pub fn snapshot(&self) -> Vec<Segment> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    pub fn get(&self, id: SegmentId) -> Option<Segment> {
        self.inner.read().records.get(&id).cloned()
    }

    /// Apply `f` to one record under the write lock and return the updated copy.
    pub fn update<F>(&self, id: SegmentId, f: F) -> Result<Segment, SegmentError>
    where
        F: FnOnce(&mut Segment) -> Result<(), SegmentError>,
    {
        let mut inner = self.inner.write();
        let segment = inner
            .records
            .get_mut(&id)
            .ok_or(SegmentError::NotFound(id))?;
        f(segment)?;
        Ok(segment.clone())
    }

    /// Mark every listed segment pending in one write.
    pub fn mark_pending(&self, ids: &[SegmentId]) {
        let mut inner = self.inner.write();
        for id in ids {
            if let Some(segment) = inner.records.get_mut(id) {
                segment.mark_pending();
            }
        }
    }

    pub fn edit_text(&self, id: SegmentId, text: String) -> Result<Segment, SegmentError> {
        self.update(id, |segment| {
            if segment.status() == SegmentStatus::Pending {
                return Err(SegmentError::Busy(id));
            }
            segment.set_text(text);
            Ok(())
        })
    }

    pub fn toggle_selected(&self, id: SegmentId) -> Result<Segment, SegmentError> {
        self.update(id, |segment| {
            let selected = !segment.is_selected();
            if segment.set_selected(selected) {
                Ok(())
            } else {
                Err(SegmentError::NotCompleted(id))
            }
        })
    }

    /// Select every completed segment, or clear the selection if all of them
    /// already are. Returns the resulting selection state, `None` when no
    /// segment is completed.
    pub fn toggle_select_all(&self) -> Option<bool> {
        let mut inner = self.inner.write();

        let completed: Vec<&Segment> = inner.records.values().filter(|s| s.is_completed()).collect();
        if completed.is_empty() {
            return None;
        }
        let select = !completed.iter().all(|s| s.is_selected());

        for segment in inner.records.values_mut() {
            segment.set_selected(select);
        }
        Some(select)
    }

    /// Segment texts joined with single spaces.
    pub fn full_text(&self) -> String {
        self.snapshot()
            .iter()
            .map(Segment::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
