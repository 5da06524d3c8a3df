use crate::engine::{EngineMessage, MessageLevel, RenderEngine};

/// Flushes the engine's message queue into the `log` facade. Returns how many
/// messages were forwarded.
pub fn dump_messages<E: RenderEngine + ?Sized>(engine: &mut E) -> usize {
    let messages = engine.drain_messages();
    for message in &messages {
        forward(message);
    }
    messages.len()
}

fn forward(message: &EngineMessage) {
    let level = match message.level {
        MessageLevel::Error => log::Level::Error,
        MessageLevel::Warning => log::Level::Warn,
        MessageLevel::Info => log::Level::Info,
        MessageLevel::Debug => log::Level::Debug,
    };
    log::log!(target: "engine", level, "[{:.3}s] {}", message.time, message.text);
}
