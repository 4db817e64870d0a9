//! User notifications
//!
//! The engine reports every changed setting and every error in a config
//! file through a [`UiNotifier`]. Messages are buffered until the user
//! interface registers a callback, so a config file can be loaded before
//! the interface exists.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

/// Importance of a message, `Info < Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NotificationLevel {
    Info,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationLevel::Info),
            "error" => Ok(NotificationLevel::Error),
            other => Err(format!("unknown notification level '{other}'")),
        }
    }
}

/// Where the engine currently reads from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    /// File name, [`Message::ENVIRONMENT_VARIABLES`] while loading the environment,
    /// `None` for lines passed to the engine directly
    pub file_name: Option<String>,
    /// 1-based, only set while reading a file
    pub line_number: Option<usize>,
    /// The line being parsed, empty if there is none
    pub line: String,
}

/// A message to be displayed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: NotificationLevel,
    pub message: String,
    pub file_name: Option<String>,
    pub line_number: Option<usize>,
    pub line: String,
}

impl Message {
    /// Value of `file_name` while loading environment variables
    pub const ENVIRONMENT_VARIABLES: &'static str = "environment variables";

    pub fn new(level: NotificationLevel, message: impl Into<String>, context: &SourceContext) -> Self {
        Self {
            level,
            message: message.into(),
            file_name: context.file_name.clone(),
            line_number: context.line_number,
            line: context.line.clone(),
        }
    }

    /// The message followed by the line number and line, if known
    pub fn format_msg_line(&self) -> String {
        if self.line.is_empty() {
            return self.message.clone();
        }
        match self.line_number {
            Some(n) => format!("{} in line {} '{}'", self.message, n, self.line),
            None => format!("{} in line '{}'", self.message, self.line),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_msg_line())
    }
}

/// Formats consecutive messages, naming the file once per block of messages from it
#[derive(Debug, Default)]
pub struct MessageFormatter {
    last_file_name: Option<String>,
}

impl MessageFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call when the widget showing the messages is cleared
    pub fn reset(&mut self) {
        self.last_file_name = None;
    }

    /// `While loading FILE:` if the file differs from the previous message, empty otherwise
    pub fn format_file_name(&mut self, msg: &Message) -> String {
        let file_name = msg.file_name.clone().unwrap_or_default();
        if self.last_file_name.as_deref() == Some(file_name.as_str()) {
            return String::new();
        }

        let mut out = if file_name.is_empty() {
            String::new()
        } else {
            format!("While loading {file_name}:\n")
        };
        if self.last_file_name.is_some() {
            out.insert(0, '\n');
        }
        self.last_file_name = Some(file_name);
        out
    }

    pub fn format(&mut self, msg: &Message) -> String {
        let header = self.format_file_name(msg);
        header + &msg.format_msg_line()
    }
}

/// Receives messages once the user interface is ready
pub type UiCallback = Box<dyn FnMut(Message)>;

/// Buffers and filters messages for the user interface
pub struct UiNotifier {
    messages: Vec<Message>,
    callback: Option<UiCallback>,
    level: NotificationLevel,
}

impl fmt::Debug for UiNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiNotifier")
            .field("messages", &self.messages)
            .field("callback", &self.callback.is_some())
            .field("level", &self.level)
            .finish()
    }
}

impl Default for UiNotifier {
    fn default() -> Self {
        Self::new(NotificationLevel::Error)
    }
}

impl UiNotifier {
    /// Messages less important than `level` are dropped
    pub fn new(level: NotificationLevel) -> Self {
        Self {
            messages: Vec::new(),
            callback: None,
            level,
        }
    }

    /// Forward the buffered messages to `callback` and every later message as it arrives
    pub fn set_ui_callback(&mut self, mut callback: UiCallback) {
        for msg in self.messages.drain(..) {
            callback(msg);
        }
        self.callback = Some(callback);
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub fn set_level(&mut self, level: NotificationLevel) {
        self.level = level;
    }

    /// Messages waiting for a callback
    pub fn pending(&self) -> &[Message] {
        &self.messages
    }

    pub fn show_info(&mut self, msg: impl Into<String>, context: &SourceContext, ignore_filter: bool) {
        self.show(NotificationLevel::Info, msg, context, ignore_filter);
    }

    pub fn show_error(&mut self, msg: impl Into<String>, context: &SourceContext, ignore_filter: bool) {
        self.show(NotificationLevel::Error, msg, context, ignore_filter);
    }

    pub fn show(
        &mut self,
        level: NotificationLevel,
        msg: impl Into<String>,
        context: &SourceContext,
        ignore_filter: bool,
    ) {
        let message = Message::new(level, msg, context);
        let file = message.file_name.as_deref().unwrap_or("");
        match level {
            NotificationLevel::Info => info!(file, line = message.line_number, "{}", message.message),
            NotificationLevel::Error => warn!(file, line = message.line_number, "{}", message.format_msg_line()),
        }

        if level < self.level && !ignore_filter {
            return;
        }
        match self.callback.as_mut() {
            Some(callback) => callback(message),
            None => self.messages.push(message),
        }
    }
}
