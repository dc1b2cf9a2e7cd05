//! Pipeline messages: typed notifications, observers and collectors.
mod bus;
mod collector;
mod message;
mod observer;

pub use bus::{MessageBus, ObserverId};
pub use collector::{
    Capacity, CollectorSettings, ErrorCollector, MessageCollector, MessageFilter, Overflow,
    ProgressTracker,
};
pub use message::{
    ErrorMessage, Message, MessageKind, Origin, ProgressMessage, StatusMessage, WarningMessage,
};
pub use observer::{ChannelObserver, LoggingObserver, Observer};
