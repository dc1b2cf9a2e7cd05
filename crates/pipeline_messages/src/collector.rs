use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pipeline_logging::{pipeline_debug, pipeline_warn};
use serde::{Deserialize, Serialize};

use crate::{Message, MessageKind, Observer, Origin};

/// Decides which messages a collector retains.
#[derive(Clone)]
pub enum MessageFilter {
    All,
    Errors,
    Warnings,
    Progress,
    Kinds(Vec<MessageKind>),
    Custom(Arc<dyn Fn(&Message) -> bool + Send + Sync>),
}

impl MessageFilter {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        MessageFilter::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, message: &Message) -> bool {
        let kind = message.kind();
        match self {
            MessageFilter::All => true,
            MessageFilter::Errors => kind.is_error(),
            MessageFilter::Warnings => kind.is_warning(),
            MessageFilter::Progress => kind.is_progress(),
            MessageFilter::Kinds(kinds) => kinds.contains(&kind),
            MessageFilter::Custom(predicate) => predicate(message),
        }
    }
}

impl fmt::Debug for MessageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageFilter::All => f.write_str("All"),
            MessageFilter::Errors => f.write_str("Errors"),
            MessageFilter::Warnings => f.write_str("Warnings"),
            MessageFilter::Progress => f.write_str("Progress"),
            MessageFilter::Kinds(kinds) => f.debug_tuple("Kinds").field(kinds).finish(),
            MessageFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What a full bounded collector does with one more message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    DropOldest,
    DropNewest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    #[default]
    Unbounded,
    Bounded { max: usize, overflow: Overflow },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorSettings {
    pub capacity: Capacity,
}

impl CollectorSettings {
    pub fn bounded(max: usize, overflow: Overflow) -> Self {
        Self {
            capacity: Capacity::Bounded { max, overflow },
        }
    }
}

#[derive(Debug, Default)]
struct Retained {
    messages: VecDeque<Message>,
    dropped: usize,
}

/// Retains, in arrival order, every message accepted by its filter.
#[derive(Debug)]
pub struct MessageCollector {
    filter: MessageFilter,
    settings: CollectorSettings,
    retained: Mutex<Retained>,
}

impl MessageCollector {
    pub fn new(filter: MessageFilter) -> Self {
        Self::with_settings(filter, CollectorSettings::default())
    }

    pub fn with_settings(filter: MessageFilter, settings: CollectorSettings) -> Self {
        Self {
            filter,
            settings,
            retained: Mutex::new(Retained::default()),
        }
    }

    pub fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    pub fn settings(&self) -> CollectorSettings {
        self.settings
    }

    /// Everything retained since construction or the last reset, oldest first.
    pub fn collected(&self) -> Vec<Message> {
        self.lock().messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().messages.is_empty()
    }

    /// Matching messages discarded because the collector was full.
    pub fn dropped(&self) -> usize {
        self.lock().dropped
    }

    pub fn clear(&self) {
        let mut retained = self.lock();
        retained.messages.clear();
        retained.dropped = 0;
    }

    /// Resets the collector and returns what it held.
    pub fn take(&self) -> Vec<Message> {
        let mut retained = self.lock();
        retained.dropped = 0;
        retained.messages.drain(..).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Retained> {
        self.retained.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for MessageCollector {
    fn receive(&self, message: &Message) {
        if !self.filter.matches(message) {
            return;
        }
        let mut retained = self.lock();
        match self.settings.capacity {
            Capacity::Unbounded => retained.messages.push_back(message.clone()),
            Capacity::Bounded { max, overflow } => {
                if retained.messages.len() < max {
                    retained.messages.push_back(message.clone());
                    return;
                }
                retained.dropped += 1;
                if overflow == Overflow::DropOldest && max > 0 {
                    retained.messages.pop_front();
                    retained.messages.push_back(message.clone());
                }
                pipeline_debug!(
                    "collector full ({} messages), dropped {} so far",
                    max,
                    retained.dropped
                );
            }
        }
    }
}

/// Collects error messages emitted during a pipeline run.
#[derive(Debug)]
pub struct ErrorCollector {
    inner: MessageCollector,
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::with_settings(CollectorSettings::default())
    }

    pub fn with_settings(settings: CollectorSettings) -> Self {
        Self {
            inner: MessageCollector::with_settings(MessageFilter::Errors, settings),
        }
    }

    pub fn collected(&self) -> Vec<Message> {
        self.inner.collected()
    }

    pub fn error_codes(&self) -> Vec<i32> {
        self.collected().iter().filter_map(Message::code).collect()
    }

    pub fn messages_text(&self) -> Vec<String> {
        self.collected()
            .iter()
            .map(|message| message.text().to_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.inner.dropped()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Resets the collector and returns the errors it held.
    pub fn take(&self) -> Vec<Message> {
        self.inner.take()
    }
}

impl Observer for ErrorCollector {
    fn receive(&self, message: &Message) {
        self.inner.receive(message);
    }
}

#[derive(Debug, Default)]
struct ProgressLog {
    entries: Vec<(Origin, i32)>,
    latest: HashMap<Origin, i32>,
    regressions: usize,
}

/// Records progress values in delivery order.
///
/// Progress is expected to be non-decreasing per origin. A regression is
/// logged and counted, never rejected.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    log: Mutex<ProgressLog>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<i32> {
        self.lock().entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn entries(&self) -> Vec<(Origin, i32)> {
        self.lock().entries.clone()
    }

    pub fn latest(&self, origin: &Origin) -> Option<i32> {
        self.lock().latest.get(origin).copied()
    }

    pub fn regressions(&self) -> usize {
        self.lock().regressions
    }

    fn lock(&self) -> MutexGuard<'_, ProgressLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for ProgressTracker {
    fn receive(&self, message: &Message) {
        let Message::Progress(progress) = message else {
            return;
        };
        let value = progress.progress();
        let mut log = self.lock();
        if let Some(previous) = log.latest.insert(progress.origin().clone(), value) {
            if value < previous {
                log.regressions += 1;
                pipeline_warn!(
                    "progress went backwards for {}: {} -> {}",
                    progress.origin(),
                    previous,
                    value
                );
            }
        }
        log.entries.push((progress.origin().clone(), value));
    }
}
