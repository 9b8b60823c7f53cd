use crate::scene::SceneGraph;
use crate::selection::Selection;

/// Context for command execution: the scene and the selection that refers
/// into it.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub scene: SceneGraph,
    pub selection: Selection,
}

impl CommandContext {
    pub fn new(scene: SceneGraph) -> Self {
        Self {
            scene,
            selection: Selection::new(),
        }
    }

    /// Drop selected ids that no longer resolve.
    pub fn prune_selection(&mut self) {
        self.selection.retain_existing(&self.scene);
    }
}
