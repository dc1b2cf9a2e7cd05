use std::fmt;

use serde::{Deserialize, Serialize};

/// Producer of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    Pipeline {
        name: String,
    },
    Filter {
        human_label: String,
        /// Position of the filter inside its pipeline.
        pipeline_index: i32,
    },
}

impl Origin {
    pub fn pipeline(name: impl Into<String>) -> Self {
        Origin::Pipeline { name: name.into() }
    }

    pub fn filter(human_label: impl Into<String>, pipeline_index: i32) -> Self {
        Origin::Filter {
            human_label: human_label.into(),
            pipeline_index,
        }
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, Origin::Filter { .. })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Pipeline { name } => write!(f, "{name}"),
            Origin::Filter {
                human_label,
                pipeline_index,
            } => write!(f, "[{pipeline_index}] {human_label}"),
        }
    }
}

/// Kind tag, so consumers can tell variants apart without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    PipelineStatus,
    PipelineWarning,
    PipelineError,
    PipelineProgress,
    FilterStatus,
    FilterWarning,
    FilterError,
    FilterProgress,
}

impl MessageKind {
    /// Stable class name of the variant.
    pub fn class_name(self) -> &'static str {
        match self {
            MessageKind::PipelineStatus => "PipelineStatusMessage",
            MessageKind::PipelineWarning => "PipelineWarningMessage",
            MessageKind::PipelineError => "PipelineErrorMessage",
            MessageKind::PipelineProgress => "PipelineProgressMessage",
            MessageKind::FilterStatus => "FilterStatusMessage",
            MessageKind::FilterWarning => "FilterWarningMessage",
            MessageKind::FilterError => "FilterErrorMessage",
            MessageKind::FilterProgress => "FilterProgressMessage",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, MessageKind::PipelineError | MessageKind::FilterError)
    }

    pub fn is_warning(self) -> bool {
        matches!(self, MessageKind::PipelineWarning | MessageKind::FilterWarning)
    }

    pub fn is_progress(self) -> bool {
        matches!(
            self,
            MessageKind::PipelineProgress | MessageKind::FilterProgress
        )
    }

    pub fn is_status(self) -> bool {
        matches!(self, MessageKind::PipelineStatus | MessageKind::FilterStatus)
    }

    pub fn is_filter(self) -> bool {
        matches!(
            self,
            MessageKind::FilterStatus
                | MessageKind::FilterWarning
                | MessageKind::FilterError
                | MessageKind::FilterProgress
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    origin: Origin,
    text: String,
}

impl StatusMessage {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningMessage {
    origin: Origin,
    code: i32,
    text: String,
}

impl WarningMessage {
    pub fn new(origin: Origin, code: i32, text: impl Into<String>) -> Self {
        Self {
            origin,
            code,
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    origin: Origin,
    code: i32,
    text: String,
}

impl ErrorMessage {
    pub fn new(origin: Origin, code: i32, text: impl Into<String>) -> Self {
        Self {
            origin,
            code,
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Progress notification; the value is conventionally a percentage.
///
/// Only the progress value may change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    origin: Origin,
    text: String,
    progress: i32,
}

impl ProgressMessage {
    pub fn new(origin: Origin, text: impl Into<String>, progress: i32) -> Self {
        Self {
            origin,
            text: text.into(),
            progress,
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    /// Updates the value before the message is dispatched. Not clamped.
    pub fn set_progress(&mut self, progress: i32) {
        self.progress = progress;
    }
}

/// A notification flowing from a pipeline to its observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Status(StatusMessage),
    Warning(WarningMessage),
    Error(ErrorMessage),
    Progress(ProgressMessage),
}

impl Message {
    pub fn pipeline_status(name: impl Into<String>, text: impl Into<String>) -> Self {
        Message::Status(StatusMessage::new(Origin::pipeline(name), text))
    }

    pub fn pipeline_warning(name: impl Into<String>, code: i32, text: impl Into<String>) -> Self {
        Message::Warning(WarningMessage::new(Origin::pipeline(name), code, text))
    }

    pub fn pipeline_error(name: impl Into<String>, code: i32, text: impl Into<String>) -> Self {
        Message::Error(ErrorMessage::new(Origin::pipeline(name), code, text))
    }

    pub fn pipeline_progress(name: impl Into<String>, text: impl Into<String>, progress: i32) -> Self {
        Message::Progress(ProgressMessage::new(Origin::pipeline(name), text, progress))
    }

    pub fn filter_status(label: impl Into<String>, index: i32, text: impl Into<String>) -> Self {
        Message::Status(StatusMessage::new(Origin::filter(label, index), text))
    }

    pub fn filter_warning(
        label: impl Into<String>,
        index: i32,
        code: i32,
        text: impl Into<String>,
    ) -> Self {
        Message::Warning(WarningMessage::new(Origin::filter(label, index), code, text))
    }

    pub fn filter_error(
        label: impl Into<String>,
        index: i32,
        code: i32,
        text: impl Into<String>,
    ) -> Self {
        Message::Error(ErrorMessage::new(Origin::filter(label, index), code, text))
    }

    pub fn filter_progress(
        label: impl Into<String>,
        index: i32,
        text: impl Into<String>,
        progress: i32,
    ) -> Self {
        Message::Progress(ProgressMessage::new(
            Origin::filter(label, index),
            text,
            progress,
        ))
    }

    pub fn kind(&self) -> MessageKind {
        let filter = self.origin().is_filter();
        match (self, filter) {
            (Message::Status(_), false) => MessageKind::PipelineStatus,
            (Message::Status(_), true) => MessageKind::FilterStatus,
            (Message::Warning(_), false) => MessageKind::PipelineWarning,
            (Message::Warning(_), true) => MessageKind::FilterWarning,
            (Message::Error(_), false) => MessageKind::PipelineError,
            (Message::Error(_), true) => MessageKind::FilterError,
            (Message::Progress(_), false) => MessageKind::PipelineProgress,
            (Message::Progress(_), true) => MessageKind::FilterProgress,
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Message::Status(m) => &m.origin,
            Message::Warning(m) => &m.origin,
            Message::Error(m) => &m.origin,
            Message::Progress(m) => &m.origin,
        }
    }

    /// Human-readable description carried by the message.
    pub fn text(&self) -> &str {
        match self {
            Message::Status(m) => &m.text,
            Message::Warning(m) => &m.text,
            Message::Error(m) => &m.text,
            Message::Progress(m) => &m.text,
        }
    }

    /// Error or warning code; `None` for status and progress messages.
    pub fn code(&self) -> Option<i32> {
        match self {
            Message::Warning(m) => Some(m.code),
            Message::Error(m) => Some(m.code),
            Message::Status(_) | Message::Progress(_) => None,
        }
    }

    pub fn progress(&self) -> Option<i32> {
        match self {
            Message::Progress(m) => Some(m.progress()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Message::Error(_))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Status(m) => write!(f, "{}: {}", m.origin, m.text),
            Message::Warning(m) => write!(f, "{}: warning {}: {}", m.origin, m.code, m.text),
            Message::Error(m) => write!(f, "{}: error {}: {}", m.origin, m.code, m.text),
            Message::Progress(m) => write!(f, "{}: {} {}%", m.origin, m.text, m.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant_and_origin() {
        assert_eq!(
            Message::pipeline_error("p", 1, "x").kind(),
            MessageKind::PipelineError
        );
        assert_eq!(
            Message::filter_progress("Threshold", 2, "working", 10).kind(),
            MessageKind::FilterProgress
        );
        assert_eq!(
            Message::filter_status("Threshold", 2, "ok").kind().class_name(),
            "FilterStatusMessage"
        );
    }

    #[test]
    fn predicates_follow_kind() {
        let filter_error = Message::filter_error("Crop", 1, -5, "bad bounds");
        assert!(filter_error.is_error());
        assert!(filter_error.kind().is_filter());

        let pipeline_warning = Message::pipeline_warning("p", 2, "slow");
        assert!(!pipeline_warning.is_error());
        assert!(!pipeline_warning.kind().is_filter());
        assert!(pipeline_warning.kind().is_warning());
    }

    #[test]
    fn payload_accessors_are_read_only_views() {
        let error = ErrorMessage::new(Origin::filter("Crop", 1), -5, "bad bounds");
        assert_eq!(error.origin(), &Origin::filter("Crop", 1));
        assert_eq!(error.code(), -5);
        assert_eq!(error.text(), "bad bounds");

        let message = Message::Error(error);
        assert_eq!(message.code(), Some(-5));
        assert_eq!(message.text(), "bad bounds");
        assert_eq!(message.progress(), None);
    }

    #[test]
    fn display_includes_code_and_percent() {
        let error = Message::filter_error("Read Image", 0, -3001, "file not found");
        assert_eq!(error.to_string(), "[0] Read Image: error -3001: file not found");

        let progress = Message::pipeline_progress("Montage", "Stitching", 40);
        assert_eq!(progress.to_string(), "Montage: Stitching 40%");
    }

    #[test]
    fn progress_can_be_updated_before_dispatch() {
        let mut progress = ProgressMessage::new(Origin::pipeline("p"), "step", 0);
        progress.set_progress(75);
        assert_eq!(Message::Progress(progress).progress(), Some(75));
    }
}
