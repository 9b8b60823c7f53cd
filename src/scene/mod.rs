//! The scene graph: a flat, paint-ordered list of typed elements.
//!
//! `elements` is always sorted by `layer` ascending, so iteration order is
//! paint order. Layer values are unique but not contiguous. Every mutating
//! method validates its whole input before touching anything, so an `Err`
//! leaves the graph exactly as it was.

pub mod align;
mod element;

use std::collections::HashSet;

use egui::{Color32, Pos2, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

pub use align::{Alignment, DistributeAxis};
pub use element::{
    ElementId, ElementKind, SceneElement, Shadow, StrokeStyle, Style, TextAlign, TextContent, TextCurve,
    Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderDirection {
    /// One step up in paint order.
    Forward,
    /// One step down in paint order.
    Backward,
    ToFront,
    ToBack,
}

impl ReorderDirection {
    pub fn label(&self) -> &'static str {
        match self {
            ReorderDirection::Forward => "Bring forward",
            ReorderDirection::Backward => "Send backward",
            ReorderDirection::ToFront => "Bring to front",
            ReorderDirection::ToBack => "Send to back",
        }
    }
}

/// Partial attribute update. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub position: Option<Pos2>,
    pub rotation: Option<f32>,
    pub scale: Option<Vec2>,
    pub opacity: Option<f32>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub style: Option<Style>,
    pub fill: Option<Color32>,
    /// Must be the same kind as the element's current one.
    pub kind: Option<ElementKind>,
}

impl ElementPatch {
    pub fn position(position: Pos2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn fill(color: Color32) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    /// True when nothing but the lock flag would change.
    fn only_lock(&self) -> bool {
        *self
            == ElementPatch {
                locked: self.locked,
                ..Self::default()
            }
    }

    fn validate(&self, element: &SceneElement) -> Result<(), SceneError> {
        if element.locked && !self.only_lock() {
            return Err(SceneError::Locked(element.id));
        }
        if let Some(kind) = &self.kind {
            if kind.name() != element.kind.name() {
                return Err(SceneError::KindMismatch {
                    id: element.id,
                    from: element.kind.name(),
                    to: kind.name(),
                });
            }
        }
        Ok(())
    }

    fn apply(&self, element: &mut SceneElement) {
        if let Some(name) = &self.name {
            element.name = name.clone();
        }
        if let Some(position) = self.position {
            element.position = position;
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            element.scale = scale;
        }
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(style) = &self.style {
            element.style = style.clone();
        }
        if let Some(fill) = self.fill {
            element.style.fill = fill;
        }
        if let Some(kind) = &self.kind {
            element.kind = kind.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    elements: Vec<SceneElement>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from foreign elements, e.g. an imported document.
    ///
    /// Paint order follows `layer` (ties keep input order). Layers are
    /// renumbered to `0..n` and duplicate ids are replaced with fresh ones.
    pub fn from_elements(mut elements: Vec<SceneElement>) -> Self {
        elements.sort_by_key(|e| e.layer);

        let mut seen = HashSet::new();
        for element in &mut elements {
            if !seen.insert(element.id) {
                warn!("Duplicate element id {} on import, assigning a fresh one", element.id);
                element.id = ElementId::new();
                seen.insert(element.id);
            }
        }

        let mut scene = Self { elements };
        scene.renumber();
        scene
    }

    /// Compact layers to `0..n`, keeping paint order.
    fn renumber(&mut self) {
        debug!("Renumbering layers of {} elements", self.elements.len());
        for (i, element) in self.elements.iter_mut().enumerate() {
            element.layer = i as i64;
        }
    }

    /// A layer above every element. Compacts first if the top is saturated.
    fn next_top_layer(&mut self) -> i64 {
        match self.max_layer() {
            None => 0,
            Some(top) => top.checked_add(1).unwrap_or_else(|| {
                self.renumber();
                self.elements.len() as i64
            }),
        }
    }

    /// A layer below every element. Compacts first if the bottom is saturated.
    fn next_bottom_layer(&mut self) -> i64 {
        match self.min_layer() {
            None => 0,
            Some(bottom) => bottom.checked_sub(1).unwrap_or_else(|| {
                self.renumber();
                -1
            }),
        }
    }

    /// Elements in paint order, bottom first.
    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<SceneElement> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn require(&self, id: ElementId) -> Result<&SceneElement, SceneError> {
        self.get(id).ok_or(SceneError::NotFound(id))
    }

    /// Resolve every id and reject locked ones when `unlocked` is set.
    fn require_all(&self, ids: &[ElementId], unlocked: bool) -> Result<(), SceneError> {
        for &id in ids {
            let element = self.require(id)?;
            if unlocked && element.locked {
                return Err(SceneError::Locked(id));
            }
        }
        Ok(())
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut SceneElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn max_layer(&self) -> Option<i64> {
        self.elements.last().map(|e| e.layer)
    }

    pub fn min_layer(&self) -> Option<i64> {
        self.elements.first().map(|e| e.layer)
    }

    fn sort(&mut self) {
        self.elements.sort_by_key(|e| e.layer);
    }

    /// Insert on top of everything under a fresh id.
    pub fn add(&mut self, mut element: SceneElement) -> ElementId {
        element.id = ElementId::new();
        element.layer = self.next_top_layer();
        let id = element.id;
        debug!("Adding {} element {}", element.kind.name(), id);
        self.elements.push(element);
        id
    }

    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> Result<(), SceneError> {
        let element = self.require(id)?;
        patch.validate(element)?;
        if let Some(element) = self.get_mut(id) {
            patch.apply(element);
        }
        Ok(())
    }

    pub fn remove(&mut self, id: ElementId) -> Result<SceneElement, SceneError> {
        let index = self.index_of(id).ok_or(SceneError::NotFound(id))?;
        Ok(self.elements.remove(index))
    }

    /// Remove every listed element. Fails without removing anything if any id
    /// is unknown.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> Result<Vec<SceneElement>, SceneError> {
        self.require_all(ids, false)?;
        let targets: HashSet<ElementId> = ids.iter().copied().collect();
        let (removed, kept) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| targets.contains(&e.id));
        self.elements = kept;
        Ok(removed)
    }

    /// Change paint order. Returns whether any layer value changed.
    pub fn reorder(&mut self, ids: &[ElementId], direction: ReorderDirection) -> Result<bool, SceneError> {
        self.require_all(ids, false)?;
        let targets: HashSet<ElementId> = ids.iter().copied().collect();
        let mut changed = false;

        match direction {
            ReorderDirection::Forward => {
                // Top-most first so a selected block moves up as a unit.
                for i in (0..self.elements.len().saturating_sub(1)).rev() {
                    if targets.contains(&self.elements[i].id) && !targets.contains(&self.elements[i + 1].id) {
                        self.swap_layers(i, i + 1);
                        changed = true;
                    }
                }
            }
            ReorderDirection::Backward => {
                for i in 1..self.elements.len() {
                    if targets.contains(&self.elements[i].id) && !targets.contains(&self.elements[i - 1].id) {
                        self.swap_layers(i, i - 1);
                        changed = true;
                    }
                }
            }
            ReorderDirection::ToFront => {
                let moving: Vec<ElementId> = self.ids().filter(|id| targets.contains(id)).collect();
                for id in moving {
                    let top = self.next_top_layer();
                    if let Some(element) = self.get_mut(id) {
                        element.layer = top;
                    }
                    self.sort();
                    changed = true;
                }
            }
            ReorderDirection::ToBack => {
                let moving: Vec<ElementId> = self.ids().filter(|id| targets.contains(id)).collect();
                for id in moving.into_iter().rev() {
                    let bottom = self.next_bottom_layer();
                    if let Some(element) = self.get_mut(id) {
                        element.layer = bottom;
                    }
                    self.sort();
                    changed = true;
                }
            }
        }
        Ok(changed)
    }

    fn swap_layers(&mut self, a: usize, b: usize) {
        let la = self.elements[a].layer;
        self.elements[a].layer = self.elements[b].layer;
        self.elements[b].layer = la;
        self.elements.swap(a, b);
    }

    /// Copy each listed element (in paint order) onto the top under a fresh id,
    /// moved by `offset`. Returns the new ids in the same order.
    pub fn duplicate(&mut self, ids: &[ElementId], offset: Vec2) -> Result<Vec<ElementId>, SceneError> {
        self.require_all(ids, false)?;
        let targets: HashSet<ElementId> = ids.iter().copied().collect();
        let copies: Vec<SceneElement> = self
            .elements
            .iter()
            .filter(|e| targets.contains(&e.id))
            .map(|e| e.fresh_copy(offset))
            .collect();
        Ok(self.insert_copies(copies))
    }

    /// Put already fresh copies on top, keeping their relative order.
    pub(crate) fn insert_copies(&mut self, copies: Vec<SceneElement>) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(copies.len());
        for mut copy in copies {
            copy.layer = self.next_top_layer();
            out.push(copy.id);
            self.elements.push(copy);
        }
        out
    }

    /// Move every listed element once by `delta`; repeated ids count once.
    pub fn translate(&mut self, ids: &[ElementId], delta: Vec2) -> Result<(), SceneError> {
        self.require_all(ids, true)?;
        let targets: HashSet<ElementId> = ids.iter().copied().collect();
        for element in self.elements.iter_mut().filter(|e| targets.contains(&e.id)) {
            element.position += delta;
        }
        Ok(())
    }

    /// Lock or unlock. Returns whether any flag flipped.
    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> Result<bool, SceneError> {
        self.require_all(ids, false)?;
        Ok(self.set_flag(ids, |e| &mut e.locked, locked))
    }

    /// Show or hide. Allowed on locked elements. Returns whether any flag flipped.
    pub fn set_visible(&mut self, ids: &[ElementId], visible: bool) -> Result<bool, SceneError> {
        self.require_all(ids, false)?;
        Ok(self.set_flag(ids, |e| &mut e.visible, visible))
    }

    fn set_flag(
        &mut self,
        ids: &[ElementId],
        field: impl Fn(&mut SceneElement) -> &mut bool,
        value: bool,
    ) -> bool {
        let mut changed = false;
        for element in self.elements.iter_mut().filter(|e| ids.contains(&e.id)) {
            let flag = field(element);
            changed |= *flag != value;
            *flag = value;
        }
        changed
    }

    /// Move elements to absolute positions, all or nothing.
    pub fn set_positions(&mut self, targets: &[(ElementId, Pos2)]) -> Result<(), SceneError> {
        let ids: Vec<ElementId> = targets.iter().map(|(id, _)| *id).collect();
        self.require_all(&ids, true)?;
        for &(id, pos) in targets {
            if let Some(element) = self.get_mut(id) {
                element.position = pos;
            }
        }
        Ok(())
    }

    fn member_bounds(&self, ids: &[ElementId]) -> Result<Vec<(ElementId, egui::Rect)>, SceneError> {
        self.require_all(ids, true)?;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|&id| self.get(id).map(|e| (id, e.bounds())))
            .collect())
    }

    /// Apply computed positions. Returns whether any element actually moved.
    fn move_members(&mut self, targets: &[(ElementId, Pos2)]) -> Result<bool, SceneError> {
        let moved = targets
            .iter()
            .any(|(id, pos)| self.get(*id).is_some_and(|e| e.position != *pos));
        self.set_positions(targets)?;
        Ok(moved)
    }

    /// Returns whether any member moved.
    pub fn align(&mut self, ids: &[ElementId], alignment: Alignment) -> Result<bool, SceneError> {
        let members = self.member_bounds(ids)?;
        let targets = align::align_positions(&members, alignment)?;
        self.move_members(&targets)
    }

    /// Returns whether any member moved.
    pub fn distribute(&mut self, ids: &[ElementId], axis: DistributeAxis) -> Result<bool, SceneError> {
        let members = self.member_bounds(ids)?;
        let targets = align::distribute_positions(&members, axis)?;
        self.move_members(&targets)
    }
}
