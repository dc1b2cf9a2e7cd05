use std::sync::mpsc;

use log::Level;

use crate::Message;

/// Receives messages pushed by a pipeline.
///
/// Delivery is a synchronous call from whatever thread the producer runs on,
/// so implementations synchronize their own state. Receiving cannot fail.
pub trait Observer: Send + Sync {
    fn receive(&self, message: &Message);
}

/// Forwards every message to a channel.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: mpsc::Sender<Message>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }
}

impl Observer for ChannelObserver {
    fn receive(&self, message: &Message) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(message.clone());
    }
}

/// Writes every message to the log facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }

    /// Log level a message is written at.
    pub fn level_for(message: &Message) -> Level {
        match message {
            Message::Error(_) => Level::Error,
            Message::Warning(_) => Level::Warn,
            Message::Progress(_) => Level::Debug,
            Message::Status(_) => Level::Info,
        }
    }
}

impl Observer for LoggingObserver {
    fn receive(&self, message: &Message) {
        log::log!(Self::level_for(message), "{}", message);
    }
}
