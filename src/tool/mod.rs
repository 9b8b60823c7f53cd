mod brush;
mod pan;
mod trait_def;

pub use brush::BrushTool;
pub use pan::PanTool;
pub use trait_def::{PointerInput, Tool, ToolOutcome, ToolTarget};
