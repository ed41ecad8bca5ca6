use egui::{Context, Event, Key, Modifiers};

/// Keys pressed on the native window this frame, in order. Repeats are skipped.
pub fn key_presses(ctx: &Context) -> Vec<Key> {
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => Some(*key),
                _ => None,
            })
            .collect()
    })
}

/// Remove Escape from this frame's input once it dismissed the window.
pub fn consume_escape(ctx: &Context) {
    ctx.input_mut(|input| {
        input.consume_key(Modifiers::NONE, Key::Escape);
    });
}
