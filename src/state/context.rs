//! The raster editing session: one loaded image and everything that edits it.
//!
//! The `EditorContext` owns the [`PixelStore`], the raster history, the
//! viewport, brush settings and the [`EditorState`] machine. All mutation of
//! `current` goes through its methods, so the invariants hold in one place:
//!
//! - one history entry per completed gesture (stroke, outline, reset,
//!   segmentation), never one per pointer sample
//! - no pointer or outline input while a segmentation is pending
//! - a failed load or segmentation leaves the session as it was
//!
//! # Example
//!
//! ```rust,no_run
//! use design_studio::state::EditorContext;
//! use design_studio::config::StudioConfig;
//!
//! let mut context = EditorContext::new(StudioConfig::default());
//! # let bytes: Vec<u8> = Vec::new();
//! context.load_image(&bytes, Some("image/png")).ok();
//! context.grow_brush();
//! ```

use egui::{Modifiers, Pos2, Vec2};
use log::{debug, error, info, warn};
use std::task::Poll;
use uuid::Uuid;

use super::EditorState;
use crate::command::HistoryStack;
use crate::config::StudioConfig;
use crate::error::{EncodeError, InvariantViolation, SegmentationError, StateTransitionError, StudioResult};
use crate::raster::codec::{self, ExportFormat};
use crate::raster::outline::{self, OutlineStyle};
use crate::raster::trace::{self, TraceOutcome};
use crate::raster::{BrushMode, BrushSettings, PixelBuffer, PixelStore};
use crate::segment::{PendingSegmentation, Segmenter};
use crate::tool::{BrushTool, PanTool, PointerInput, Tool, ToolOutcome, ToolTarget};
use crate::viewport::Viewport;

/// What `poll_segmentation` found.
#[derive(Debug)]
pub enum SegmentationStatus {
    /// Nothing was running
    Idle,
    Pending,
    /// The result was merged into `current` as one history entry
    Applied,
    /// The segmenter failed; `current` is untouched
    Failed(SegmentationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveTool {
    Brush,
    Pan,
}

/// The main context for a raster editing session.
#[derive(Debug)]
pub struct EditorContext {
    config: StudioConfig,
    state: EditorState,
    store: PixelStore,
    history: HistoryStack<PixelBuffer>,
    viewport: Viewport,
    brush: BrushSettings,
    brush_tool: BrushTool,
    pan_tool: PanTool,
    active_tool: Option<ActiveTool>,
    last_screen: Pos2,
    pending: Option<PendingSegmentation>,
    show_original: bool,
    session: Option<Uuid>,
    /// Bumped on every change to `current`, for texture invalidation.
    revision: u64,
}

impl EditorContext {
    /// An empty session: nothing loaded, idle, default brush.
    pub fn new(config: StudioConfig) -> Self {
        let brush = BrushSettings {
            radius: config.brush.default_radius,
            hardness: config.brush.default_hardness,
            ..BrushSettings::default()
        };
        Self {
            state: EditorState::Idle,
            store: PixelStore::new(),
            history: HistoryStack::new(config.history_capacity),
            viewport: Viewport::new(config.raster_zoom, Vec2::ZERO),
            brush,
            brush_tool: BrushTool::new(),
            pan_tool: PanTool::default(),
            active_tool: None,
            last_screen: Pos2::ZERO,
            pending: None,
            show_original: false,
            session: None,
            revision: 0,
            config,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Whether a pointer gesture is between `pointer_down` and `pointer_up`.
    pub fn in_gesture(&self) -> bool {
        self.active_tool.is_some()
    }

    pub fn store(&self) -> &PixelStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryStack<PixelBuffer> {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn show_original(&self) -> bool {
        self.show_original
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    /// The buffer the canvas should show right now.
    pub fn display_buffer(&self) -> Option<&PixelBuffer> {
        if self.show_original {
            self.store.original()
        } else {
            self.store.current()
        }
    }

    /// Attempts to transition to a new state.
    ///
    /// # Errors
    ///
    /// Returns a [`StateTransitionError`] if the requested transition is not
    /// allowed from the current state.
    pub fn transition_to(&mut self, new_state: EditorState) -> Result<(), StateTransitionError> {
        if !self.state.can_transition_to(&new_state) {
            return Err(StateTransitionError {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        debug!("Editor state {} -> {}", self.state.name(), new_state.name());
        self.state = new_state;
        Ok(())
    }

    /// Returns the editor to the idle state. A no-op when already idle.
    pub fn return_to_idle(&mut self) -> Result<(), StateTransitionError> {
        if self.state.is_idle() {
            return Ok(());
        }
        self.transition_to(EditorState::Idle)
    }

    fn ensure_accepts_edits(&self, what: &'static str) -> Result<(), StateTransitionError> {
        if self.state.accepts_edits() {
            Ok(())
        } else {
            debug!("Rejected {} while {}", what, self.state.name());
            Err(StateTransitionError {
                from: self.state.name(),
                to: what,
            })
        }
    }

    /// Validate, decode and load an image, starting a fresh session.
    ///
    /// On any error the previous session is left exactly as it was.
    pub fn load_image(&mut self, bytes: &[u8], mime: Option<&str>) -> StudioResult<()> {
        self.ensure_accepts_edits("load")?;
        let format = codec::validate_upload(bytes, mime, self.config.max_upload_bytes)?;
        let image = codec::decode(bytes, format)?;
        self.replace_image(image);
        Ok(())
    }

    /// Start a fresh session on an already decoded buffer.
    pub fn load_buffer(&mut self, image: PixelBuffer) -> Result<(), StateTransitionError> {
        self.ensure_accepts_edits("load")?;
        self.replace_image(image);
        Ok(())
    }

    fn replace_image(&mut self, image: PixelBuffer) {
        let size = Vec2::new(image.width() as f32, image.height() as f32);
        let snapshot = self.store.load(image);
        self.history = HistoryStack::new(self.config.history_capacity);
        self.history.push(snapshot, "Load image");
        self.viewport = Viewport::new(self.config.raster_zoom, size);
        self.brush_tool = BrushTool::new();
        self.pan_tool = PanTool::default();
        self.active_tool = None;
        self.state = EditorState::Idle;
        self.show_original = false;
        let session = Uuid::new_v4();
        info!("Started editing session {} ({}x{})", session, size.x, size.y);
        self.session = Some(session);
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn pointer_input(&mut self, screen: Pos2, modifiers: Modifiers) -> PointerInput {
        let input = PointerInput {
            screen,
            content: self.viewport.to_content_clamped(screen),
            delta: screen - self.last_screen,
            modifiers,
        };
        self.last_screen = screen;
        input
    }

    fn run_tool<R>(&mut self, tool: ActiveTool, f: impl FnOnce(&mut dyn Tool, &mut ToolTarget<'_>) -> R) -> R {
        let mut target = ToolTarget {
            store: &mut self.store,
            viewport: &mut self.viewport,
            brush: self.brush,
        };
        match tool {
            ActiveTool::Brush => f(&mut self.brush_tool, &mut target),
            ActiveTool::Pan => f(&mut self.pan_tool, &mut target),
        }
    }

    /// Start a gesture. Alt-drag pans; anything else strokes with the brush.
    pub fn pointer_down(&mut self, screen: Pos2, modifiers: Modifiers) -> Result<(), StateTransitionError> {
        self.ensure_accepts_edits("stroke")?;
        self.last_screen = screen;
        let input = self.pointer_input(screen, modifiers);

        let tool = if modifiers.alt {
            self.transition_to(EditorState::Panning)?;
            ActiveTool::Pan
        } else {
            if !self.store.is_loaded() {
                return Ok(());
            }
            self.transition_to(EditorState::Stroking { mode: self.brush.mode })?;
            ActiveTool::Brush
        };
        self.active_tool = Some(tool);
        self.run_tool(tool, |t, target| t.begin(target, &input));
        if tool == ActiveTool::Brush {
            self.touch();
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, screen: Pos2, modifiers: Modifiers) {
        let input = self.pointer_input(screen, modifiers);
        let Some(tool) = self.active_tool else {
            return;
        };
        self.run_tool(tool, |t, target| t.update(target, &input));
        if tool == ActiveTool::Brush {
            self.touch();
        }
    }

    /// Finish the gesture. A stroke that touched pixels becomes exactly one
    /// history entry. Returns whether one was pushed.
    pub fn pointer_up(&mut self, screen: Pos2, modifiers: Modifiers) -> bool {
        let input = self.pointer_input(screen, modifiers);
        let Some(tool) = self.active_tool.take() else {
            return false;
        };
        let outcome = self.run_tool(tool, |t, target| t.finish(target, &input));
        let mode = self.brush.mode;
        if let Err(e) = self.return_to_idle() {
            error!("Failed to end gesture: {}", e);
        }
        match outcome {
            ToolOutcome::Modified(_) => {
                self.touch();
                self.commit(match mode {
                    BrushMode::Erase => "Erase",
                    BrushMode::Restore => "Restore",
                })
            }
            ToolOutcome::Untouched => false,
        }
    }

    /// Snapshot `current` into history.
    fn commit(&mut self, label: &str) -> bool {
        match self.store.snapshot() {
            Some(snapshot) => {
                self.history.push(snapshot, label);
                true
            }
            None => false,
        }
    }

    fn restore_from_history(&mut self, snapshot: Option<PixelBuffer>) -> bool {
        let Some(snapshot) = snapshot else {
            return false;
        };
        match self.store.restore(&snapshot) {
            Ok(()) => {
                self.touch();
                true
            }
            Err(e) => {
                error!("History snapshot does not fit the loaded image: {}", e);
                false
            }
        }
    }

    /// Step back one gesture. `Ok(false)` at the start of history.
    pub fn undo(&mut self) -> Result<bool, StateTransitionError> {
        self.ensure_accepts_edits("undo")?;
        if self.active_tool.is_some() {
            return Ok(false);
        }
        let snapshot = self.history.undo().cloned();
        Ok(self.restore_from_history(snapshot))
    }

    pub fn redo(&mut self) -> Result<bool, StateTransitionError> {
        self.ensure_accepts_edits("redo")?;
        if self.active_tool.is_some() {
            return Ok(false);
        }
        let snapshot = self.history.redo().cloned();
        Ok(self.restore_from_history(snapshot))
    }

    pub fn grow_brush(&mut self) {
        let limits = self.config.brush;
        self.brush.resize(limits.radius_step, limits.min_radius, limits.max_radius);
    }

    pub fn shrink_brush(&mut self) {
        let limits = self.config.brush;
        self.brush.resize(-limits.radius_step, limits.min_radius, limits.max_radius);
    }

    pub fn set_brush(&mut self, brush: BrushSettings) {
        let limits = self.config.brush;
        self.brush = BrushSettings {
            radius: brush.radius.clamp(limits.min_radius, limits.max_radius),
            hardness: brush.hardness.clamp(0.0, 1.0),
            ..brush
        };
    }

    pub fn set_mode(&mut self, mode: BrushMode) {
        self.brush.mode = mode;
    }

    /// Display-only; `current` and history are untouched.
    pub fn toggle_show_original(&mut self) {
        self.show_original = !self.show_original;
    }

    /// Run the edge tracer against `current`. `None` without an image.
    pub fn trace_edges(&self) -> Option<TraceOutcome> {
        self.store
            .current()
            .map(|current| trace::trace_edges(current, &self.config.trace))
    }

    /// Stamp the traced outline into `current` as one history entry.
    /// Returns whether anything was drawn.
    pub fn apply_outline(&mut self, style: &OutlineStyle) -> StudioResult<bool> {
        self.ensure_accepts_edits("outline")?;
        let outcome = self.trace_edges().ok_or(InvariantViolation::NoImage)?;
        let TraceOutcome::Traced(edges) = outcome else {
            return Ok(false);
        };
        if edges.polylines.is_empty() {
            info!("Outline skipped, no chain survived noise filtering");
            return Ok(false);
        }
        let current = self.store.current_mut().ok_or(InvariantViolation::NoImage)?;
        outline::stamp_outline(current, &edges, style);
        self.touch();
        Ok(self.commit("Outline"))
    }

    /// Write `original` back over `current` as one history entry.
    pub fn reset_to_original(&mut self) -> StudioResult<()> {
        self.ensure_accepts_edits("reset")?;
        let original = self.store.original().cloned().ok_or(InvariantViolation::NoImage)?;
        self.store.restore(&original)?;
        self.touch();
        self.commit("Reset");
        Ok(())
    }

    /// Hand a copy of `current` to `segmenter`. Input is locked until the
    /// result is polled in or the task is cancelled.
    pub fn begin_segmentation(&mut self, segmenter: &dyn Segmenter) -> StudioResult<()> {
        if self.pending.is_some() {
            return Err(SegmentationError::Busy.into());
        }
        let input = self.store.snapshot().ok_or(InvariantViolation::NoImage)?;
        self.transition_to(EditorState::Segmenting)?;
        info!("Segmentation started with {}", segmenter.name());
        self.pending = Some(PendingSegmentation::start(segmenter, input));
        Ok(())
    }

    pub fn is_segmenting(&self) -> bool {
        self.pending.is_some()
    }

    /// Drive the pending segmentation one step. Call once per frame.
    pub fn poll_segmentation(&mut self) -> SegmentationStatus {
        let Some(pending) = self.pending.as_mut() else {
            return SegmentationStatus::Idle;
        };
        let result = match pending.poll() {
            Poll::Pending => return SegmentationStatus::Pending,
            Poll::Ready(result) => result,
        };
        self.pending = None;
        if let Err(e) = self.return_to_idle() {
            error!("Failed to leave segmenting state: {}", e);
        }

        let merged = result.and_then(|mask| {
            self.store.restore(&mask).map_err(|e| match e {
                InvariantViolation::DimensionMismatch {
                    want_w,
                    want_h,
                    got_w,
                    got_h,
                } => SegmentationError::DimensionMismatch {
                    want_w,
                    want_h,
                    got_w,
                    got_h,
                },
                other => SegmentationError::Failed(other.to_string()),
            })
        });
        match merged {
            Ok(()) => {
                info!("Segmentation applied");
                self.touch();
                self.commit("Remove background");
                SegmentationStatus::Applied
            }
            Err(e) => {
                warn!("Segmentation failed: {}", e);
                SegmentationStatus::Failed(e)
            }
        }
    }

    /// Drop the pending task. Its result, if any, is never merged.
    pub fn cancel_segmentation(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        info!("Segmentation cancelled");
        if let Err(e) = self.return_to_idle() {
            error!("Failed to leave segmenting state: {}", e);
        }
        true
    }

    pub fn export(&self, format: &ExportFormat) -> Result<Vec<u8>, EncodeError> {
        let current = self.store.current().ok_or(EncodeError::NoImage)?;
        codec::encode(current, format)
    }
}
