//! Scene editing session: scene, selection, history, viewport, grid and
//! clipboard behind one owner.

use egui::{Pos2, Rect, Vec2};
use log::{debug, info};

use crate::clipboard::{Clipboard, ClipboardPayload};
use crate::command::{Command, CommandContext, CommandError, HistoryStack, Outcome};
use crate::config::StudioConfig;
use crate::error::{SceneError, ValidationError};
use crate::geometry;
use crate::scene::{ElementId, SceneGraph};
use crate::selection::Selection;
use crate::state::SceneFile;
use crate::viewport::{Grid, Viewport};

/// Positions of the dragged elements when the drag started.
#[derive(Debug, Clone)]
struct DragState {
    origins: Vec<(ElementId, Pos2)>,
}

#[derive(Debug)]
pub struct Document {
    name: String,
    ctx: CommandContext,
    history: HistoryStack<SceneGraph>,
    viewport: Viewport,
    grid: Grid,
    clipboard: Clipboard,
    duplicate_offset: Vec2,
    drag: Option<DragState>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled", &StudioConfig::default())
    }
}

impl Document {
    pub fn new(name: impl Into<String>, config: &StudioConfig) -> Self {
        let mut history = HistoryStack::new(config.history_capacity);
        history.push(SceneGraph::new(), "Initial state");
        Self {
            name: name.into(),
            ctx: CommandContext::default(),
            history,
            viewport: Viewport::new(config.vector_zoom, Vec2::new(800.0, 600.0)),
            grid: config.grid.into(),
            clipboard: Clipboard::new(),
            duplicate_offset: config.duplicate_offset,
            drag: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.ctx.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.ctx.selection
    }

    pub fn history(&self) -> &HistoryStack<SceneGraph> {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Run a command; a change becomes exactly one history entry.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let outcome = command.execute(&mut self.ctx)?;
        if outcome.changed() {
            self.history.push(self.ctx.scene.clone(), command.label());
        }
        Ok(outcome)
    }

    fn selected_ids(&self) -> Vec<ElementId> {
        self.ctx.selection.ids().to_vec()
    }

    /// Start moving the selection. Nothing is recorded until [`Self::end_drag`].
    pub fn begin_drag(&mut self) -> Result<bool, SceneError> {
        if self.ctx.selection.is_empty() {
            return Ok(false);
        }
        let mut origins = Vec::with_capacity(self.ctx.selection.len());
        for &id in self.ctx.selection.ids() {
            let element = self.ctx.scene.get(id).ok_or(SceneError::NotFound(id))?;
            if element.locked {
                return Err(SceneError::Locked(id));
            }
            origins.push((id, element.position));
        }
        self.drag = Some(DragState { origins });
        Ok(true)
    }

    /// Live move during a drag. No history.
    pub fn drag_selected(&mut self, delta: Vec2) -> Result<(), SceneError> {
        let Some(drag) = &self.drag else {
            return Ok(());
        };
        let ids: Vec<ElementId> = drag.origins.iter().map(|(id, _)| *id).collect();
        self.ctx.scene.translate(&ids, delta)
    }

    /// Finish the drag: snap to the grid and record one "Move" entry if
    /// anything ended up somewhere else.
    pub fn end_drag(&mut self) -> Result<bool, SceneError> {
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };
        if self.grid.snap {
            let snapped: Vec<(ElementId, Pos2)> = drag
                .origins
                .iter()
                .filter_map(|(id, _)| self.ctx.scene.get(*id).map(|e| (*id, self.grid.snap(e.position))))
                .collect();
            self.ctx.scene.set_positions(&snapped)?;
        }
        let moved = drag
            .origins
            .iter()
            .any(|(id, origin)| self.ctx.scene.get(*id).is_some_and(|e| e.position != *origin));
        if moved {
            self.history.push(self.ctx.scene.clone(), "Move");
        }
        Ok(moved)
    }

    fn restore(&mut self, snapshot: Option<SceneGraph>) -> bool {
        let Some(scene) = snapshot else {
            return false;
        };
        self.drag = None;
        self.ctx.scene = scene;
        let dropped = self.ctx.selection.retain_existing(&self.ctx.scene);
        if dropped > 0 {
            debug!("Dropped {} stale ids from the selection", dropped);
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        let snapshot = self.history.undo().cloned();
        self.restore(snapshot)
    }

    pub fn redo(&mut self) -> bool {
        let snapshot = self.history.redo().cloned();
        self.restore(snapshot)
    }

    /// Serialize the selection into the clipboard. `None` when nothing is
    /// selected.
    pub fn copy_selection(&mut self) -> Result<Option<String>, ValidationError> {
        if self.ctx.selection.is_empty() {
            return Ok(None);
        }
        let text = ClipboardPayload::from_selection(&self.ctx.scene, &self.ctx.selection).to_json()?;
        self.clipboard.set(text.clone());
        Ok(Some(text))
    }

    /// Paste a payload under fresh ids, offset from the source.
    pub fn paste(&mut self, text: &str) -> Result<Outcome, CommandError> {
        let payload = ClipboardPayload::parse(text)?;
        let offset = self.clipboard.next_offset(text, self.duplicate_offset);
        self.execute(Command::Paste { payload, offset })
    }

    /// Paste whatever the in-app clipboard holds.
    pub fn paste_clipboard(&mut self) -> Result<Outcome, CommandError> {
        let Some(text) = self.clipboard.contents().map(str::to_owned) else {
            return Ok(Outcome::Unchanged);
        };
        self.paste(&text)
    }

    pub fn duplicate_selection(&mut self) -> Result<Outcome, CommandError> {
        let ids = self.selected_ids();
        self.execute(Command::Duplicate {
            ids,
            offset: self.duplicate_offset,
        })
    }

    pub fn delete_selection(&mut self) -> Result<Outcome, CommandError> {
        let ids = self.selected_ids();
        self.execute(Command::RemoveElements(ids))
    }

    pub fn nudge_selection(&mut self, delta: Vec2) -> Result<Outcome, CommandError> {
        let ids = self.selected_ids();
        self.execute(Command::TranslateElements { ids, delta })
    }

    pub fn select(&mut self, id: ElementId) -> bool {
        if !self.ctx.scene.contains(id) {
            return false;
        }
        self.ctx.selection.set([id]);
        true
    }

    pub fn toggle_select(&mut self, id: ElementId) -> bool {
        if !self.ctx.scene.contains(id) {
            return false;
        }
        self.ctx.selection.toggle(id);
        true
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ElementId> = self.ctx.scene.ids().collect();
        self.ctx.selection.set(ids);
    }

    /// Marquee selection in content space. With `additive` the hits are
    /// added to the current selection.
    pub fn select_in_rect(&mut self, marquee: Rect, additive: bool) -> usize {
        let hits = geometry::elements_in_rect(&self.ctx.scene, marquee);
        if !additive {
            self.ctx.selection.clear();
        }
        for &id in &hits {
            self.ctx.selection.insert(id);
        }
        hits.len()
    }

    /// Click selection. A miss clears the selection unless `additive`.
    pub fn select_at(&mut self, p: Pos2, additive: bool) -> Option<ElementId> {
        let hit = geometry::element_at(&self.ctx.scene, p);
        match (hit, additive) {
            (Some(id), true) => self.ctx.selection.toggle(id),
            (Some(id), false) => self.ctx.selection.set([id]),
            (None, true) => {}
            (None, false) => self.ctx.selection.clear(),
        }
        hit
    }

    pub fn clear_selection(&mut self) {
        self.ctx.selection.clear();
    }

    pub fn export_scene(&self) -> Result<String, ValidationError> {
        SceneFile::new(self.name.clone(), &self.ctx.scene).to_json()
    }

    /// Replace the scene with a document. Undoable as one entry.
    pub fn import_scene(&mut self, json: &str) -> Result<(), ValidationError> {
        let file = SceneFile::from_json(json)?;
        if !file.name.is_empty() {
            self.name = file.name.clone();
        }
        self.drag = None;
        self.ctx.scene = file.into_scene();
        self.ctx.selection.clear();
        info!("Imported scene '{}' with {} elements", self.name, self.ctx.scene.len());
        self.history.push(self.ctx.scene.clone(), "Import scene");
        Ok(())
    }
}
