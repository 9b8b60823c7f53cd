use egui::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandResult, Outcome};
use crate::clipboard::ClipboardPayload;
use crate::scene::{Alignment, DistributeAxis, ElementId, ElementPatch, ReorderDirection, SceneElement};

/// Every discrete scene edit. Executing one is a single history step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Add an element on top and select it.
    AddElement(SceneElement),

    UpdateElement {
        id: ElementId,
        patch: ElementPatch,
    },

    /// Delete elements and drop them from the selection.
    RemoveElements(Vec<ElementId>),

    TranslateElements {
        ids: Vec<ElementId>,
        delta: Vec2,
    },

    Reorder {
        ids: Vec<ElementId>,
        direction: ReorderDirection,
    },

    /// Copy elements under fresh ids and select the copies.
    Duplicate {
        ids: Vec<ElementId>,
        offset: Vec2,
    },

    Align {
        ids: Vec<ElementId>,
        alignment: Alignment,
    },

    Distribute {
        ids: Vec<ElementId>,
        axis: DistributeAxis,
    },

    /// Insert clipboard contents under fresh ids and select them.
    Paste {
        payload: ClipboardPayload,
        offset: Vec2,
    },

    SetLocked {
        ids: Vec<ElementId>,
        locked: bool,
    },

    SetVisible {
        ids: Vec<ElementId>,
        visible: bool,
    },
}

impl Command {
    /// History label for this command.
    pub fn label(&self) -> String {
        match self {
            Command::AddElement(element) => format!("Add {}", element.kind.name()),
            Command::UpdateElement { .. } => "Edit properties".to_owned(),
            Command::RemoveElements(ids) if ids.len() == 1 => "Delete element".to_owned(),
            Command::RemoveElements(ids) => format!("Delete {} elements", ids.len()),
            Command::TranslateElements { .. } => "Move".to_owned(),
            Command::Reorder { direction, .. } => direction.label().to_owned(),
            Command::Duplicate { .. } => "Duplicate".to_owned(),
            Command::Align { alignment, .. } => format!("Align {}", alignment.name()),
            Command::Distribute { axis, .. } => match axis {
                DistributeAxis::Horizontal => "Distribute horizontally".to_owned(),
                DistributeAxis::Vertical => "Distribute vertically".to_owned(),
            },
            Command::Paste { .. } => "Paste".to_owned(),
            Command::SetLocked { locked: true, .. } => "Lock".to_owned(),
            Command::SetLocked { locked: false, .. } => "Unlock".to_owned(),
            Command::SetVisible { visible: true, .. } => "Show".to_owned(),
            Command::SetVisible { visible: false, .. } => "Hide".to_owned(),
        }
    }

    /// Execute the command against the scene and selection.
    ///
    /// On `Err` neither the scene nor the selection has been touched.
    pub fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        debug!("Executing {}", self.label());
        match self {
            Command::AddElement(element) => {
                let id = ctx.scene.add(element.clone());
                ctx.selection.set([id]);
                Ok(Outcome::Changed)
            }

            Command::UpdateElement { id, patch } => {
                if *patch == ElementPatch::default() {
                    return Ok(Outcome::Unchanged);
                }
                ctx.scene.update(*id, patch)?;
                Ok(Outcome::Changed)
            }

            Command::RemoveElements(ids) => {
                if ids.is_empty() {
                    return Ok(Outcome::Unchanged);
                }
                ctx.scene.remove_many(ids)?;
                ctx.prune_selection();
                Ok(Outcome::Changed)
            }

            Command::TranslateElements { ids, delta } => {
                if ids.is_empty() || *delta == Vec2::ZERO {
                    return Ok(Outcome::Unchanged);
                }
                ctx.scene.translate(ids, *delta)?;
                Ok(Outcome::Changed)
            }

            Command::Reorder { ids, direction } => {
                let changed = ctx.scene.reorder(ids, *direction)?;
                Ok(if changed { Outcome::Changed } else { Outcome::Unchanged })
            }

            Command::Duplicate { ids, offset } => {
                if ids.is_empty() {
                    return Ok(Outcome::Unchanged);
                }
                let copies = ctx.scene.duplicate(ids, *offset)?;
                ctx.selection.set(copies);
                Ok(Outcome::Changed)
            }

            Command::Align { ids, alignment } => {
                let moved = ctx.scene.align(ids, *alignment)?;
                Ok(if moved { Outcome::Changed } else { Outcome::Unchanged })
            }

            Command::Distribute { ids, axis } => {
                let moved = ctx.scene.distribute(ids, *axis)?;
                Ok(if moved { Outcome::Changed } else { Outcome::Unchanged })
            }

            Command::Paste { payload, offset } => {
                let pasted = ctx.scene.insert_copies(payload.instantiate(*offset));
                if pasted.is_empty() {
                    return Ok(Outcome::Unchanged);
                }
                ctx.selection.set(pasted);
                Ok(Outcome::Changed)
            }

            Command::SetLocked { ids, locked } => {
                let changed = ctx.scene.set_locked(ids, *locked)?;
                Ok(if changed { Outcome::Changed } else { Outcome::Unchanged })
            }

            Command::SetVisible { ids, visible } => {
                let changed = ctx.scene.set_visible(ids, *visible)?;
                Ok(if changed { Outcome::Changed } else { Outcome::Unchanged })
            }
        }
    }
}
