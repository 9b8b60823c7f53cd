use serde::{Deserialize, Serialize};

use crate::scene::{ElementId, SceneGraph};

/// Ids of the selected elements, in the order they were selected.
///
/// Purely a reference set: it never owns elements, and every id it holds
/// must exist in the scene. Call [`Selection::retain_existing`] whenever the
/// scene loses elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn insert(&mut self, id: ElementId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|&s| s != id);
    }

    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the whole set.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in `scene`. Returns how many were dropped.
    pub fn retain_existing(&mut self, scene: &SceneGraph) -> usize {
        let before = self.ids.len();
        self.ids.retain(|&id| scene.contains(id));
        before - self.ids.len()
    }
}
