use serde::{Deserialize, Serialize};

use crate::core::image::ImageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Ai,
}

/// One transcript entry. Never mutated once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_ai(self) -> bool {
        self == Sender::Ai
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            _ => Err(format!("invalid message sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// Severity of a transient notification raised by the session. These are
/// surfaced to the user but never written into the transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl Message {
    pub fn new(id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender,
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<ImageRef>) -> Self {
        self.image = image;
        self
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_ai(&self) -> bool {
        self.sender.is_ai()
    }
}

/// Hands out transcript ids in the `user-<n>` / `ai-<n>` / `ai-error-<n>`
/// shape. The counter is shared across all kinds so ids never collide.
#[derive(Debug, Default)]
pub struct MessageIds {
    next: u64,
}

impl MessageIds {
    pub fn user(&mut self) -> String {
        self.next_with("user")
    }

    pub fn ai(&mut self) -> String {
        self.next_with("ai")
    }

    pub fn ai_error(&mut self) -> String {
        self.next_with("ai-error")
    }

    fn next_with(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ids = MessageIds::default();
        let a = ids.user();
        let b = ids.ai();
        let c = ids.ai_error();
        let d = ids.user();
        assert_eq!(a, "user-1");
        assert_eq!(b, "ai-2");
        assert_eq!(c, "ai-error-3");
        assert_eq!(d, "user-4");
    }

    #[test]
    fn invalid_sender_strings_are_rejected() {
        assert!(Sender::try_from("assistant").is_err());
        assert_eq!(Sender::try_from("ai"), Ok(Sender::Ai));
    }

    #[test]
    fn sender_serializes_as_plain_string() {
        let message = Message::new("user-1", Sender::User, "hello");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"sender\":\"user\""));
        assert!(!json.contains("image"));
    }
}
