pub mod shortcuts;

use egui::{Context, Event, Key, Modifiers};

pub use shortcuts::{ImageAction, SceneAction};

/// Key presses of this frame, in order. Repeats are included.
pub fn key_presses(ctx: &Context) -> Vec<(Key, Modifiers)> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => Some((*key, *modifiers)),
                _ => None,
            })
            .collect()
    })
}
