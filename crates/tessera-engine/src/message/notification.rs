use std::fmt;

/// Maximum length of a notification text, in bytes of UTF-8.
pub const LOG_TEXT_CAPACITY: usize = 255;

/// Kind tag of an outbound notification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NotificationKind {
    Log,
}

/// Bounded notification text.
///
/// Input longer than [`LOG_TEXT_CAPACITY`] bytes is cut at the last character
/// boundary that fits, so the stored text is always valid UTF-8.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LogText {
    text: String,
}

impl LogText {
    pub fn new(text: &str) -> Self {
        let mut end = text.len().min(LOG_TEXT_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self { text: text[..end].to_owned() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for LogText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for LogText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Outbound message from the render thread to the host event loop.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: LogText,
}

impl Notification {
    pub fn log(text: impl Into<LogText>) -> Self {
        Self {
            kind: NotificationKind::Log,
            text: text.into(),
        }
    }
}
