//! Plain-text rendering of transcript entries and notifications.

use crate::core::design::Design;
use crate::core::message::{Message, NoticeKind, Notification};

pub const PENDING_TEXT: &str = "✨ Generating your vision...";

const AI_NAME: &str = "ISpace";

/// Lines for one transcript entry. User input is echoed by the terminal, so
/// only AI entries render.
pub fn message_lines(message: &Message) -> Vec<String> {
    if message.is_user() {
        return Vec::new();
    }
    let mut lines: Vec<String> = message
        .text
        .lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{AI_NAME}: {line}")
            } else {
                format!("{:width$}{line}", "", width = AI_NAME.len() + 2)
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(format!("{AI_NAME}:"));
    }
    if let Some(image) = &message.image {
        lines.push(format!("  {}", image.label()));
    }
    lines
}

/// The design now on display.
pub fn design_line(version: usize, design: &Design) -> String {
    format!(
        "  🖼  Version {version} {} (use /export to save it)",
        design.image().label()
    )
}

pub fn notification_line(notification: &Notification) -> String {
    match notification.kind {
        NoticeKind::Info => format!("✅ {}: {}", notification.title, notification.description),
        NoticeKind::Error => format!("❌ {}: {}", notification.title, notification.description),
    }
}
