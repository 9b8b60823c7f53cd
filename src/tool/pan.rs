use super::trait_def::{PointerInput, Tool, ToolOutcome, ToolTarget};

/// Drags the view. Never touches pixels.
#[derive(Debug, Clone, Default)]
pub struct PanTool {
    active: bool,
}

impl Tool for PanTool {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn begin(&mut self, _target: &mut ToolTarget<'_>, _input: &PointerInput) {
        self.active = true;
    }

    fn update(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) {
        if self.active {
            target.viewport.pan_by(input.delta);
        }
    }

    fn finish(&mut self, target: &mut ToolTarget<'_>, input: &PointerInput) -> ToolOutcome {
        self.update(target, input);
        self.active = false;
        ToolOutcome::Untouched
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
