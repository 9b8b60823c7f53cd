//! The state machine for a raster editing session.
//!
//! Pointer gestures and background segmentation are mutually exclusive: a
//! brush stroke landing while a segmentation is pending would be overwritten
//! by the result. The machine makes that race unrepresentable.
//!
//! # State Transitions
//!
//! ```text
//!              ┌─────────────┐
//!        ┌─────►  Stroking   ├─────┐
//!        │     └─────────────┘     │
//!        │     ┌─────────────┐     │
//! ┌──────┴─┐   │             │   ┌─▼──────┐
//! │  Idle  ├───►   Panning   ├───►  Idle  │
//! └──────┬─┘   │             │   └─▲──────┘
//!        │     └─────────────┘     │
//!        │     ┌─────────────┐     │
//!        └─────► Segmenting  ├─────┘
//!              └─────────────┘
//! ```
//!
//! Every operation ends back in `Idle`; nothing moves directly between the
//! three busy states.

use serde::{Deserialize, Serialize};

use crate::raster::BrushMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorState {
    /// No active operation
    #[default]
    Idle,
    /// A brush stroke is in progress
    Stroking { mode: BrushMode },
    /// The view is being dragged
    Panning,
    /// A segmentation is pending; pointer and outline input is rejected
    Segmenting,
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Stroking { .. } => "stroking",
            EditorState::Panning => "panning",
            EditorState::Segmenting => "segmenting",
        }
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (EditorState::Idle, EditorState::Idle) => false,
            (EditorState::Idle, _) => true,
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self, EditorState::Stroking { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, EditorState::Panning)
    }

    pub fn is_segmenting(&self) -> bool {
        matches!(self, EditorState::Segmenting)
    }

    /// Whether brush, outline and history input may run.
    pub fn accepts_edits(&self) -> bool {
        !self.is_segmenting()
    }
}
