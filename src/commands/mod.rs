mod registry;

pub use registry::{all_commands, CommandInvocation};

use std::path::PathBuf;

use crate::core::app::App;
use crate::core::config::data::path_display;
use crate::core::feedback::Sentiment;
use crate::export::{DirectorySaver, ExportError};

const USAGE_ATTACH: &str = "Usage: /attach <path>";
const USAGE_REFINE: &str = "Usage: /refine <feedback>";
const USAGE_SELECT: &str = "Usage: /select <version>";
const USAGE_LOG: &str = "Usage: /log [filename]";
const NO_DESIGN: &str = "No design yet. Describe your room to get started.";

/// What the chat loop should do after a line of input has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    /// Create a new design from this description (and any attachment).
    SubmitPrompt(String),
    /// Refine the current design with this already-composed feedback.
    Refine(String),
    Summarize,
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        if trimmed.is_empty() && app.attachment().is_none() {
            return CommandResult::Continue;
        }
        return CommandResult::SubmitPrompt(trimmed.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(app, invocation)
        }
        None => {
            app.set_status(format!(
                "Unknown command: /{command_name}. Type /help for a list of commands."
            ));
            CommandResult::Continue
        }
    }
}

fn usage_status(app: &mut App, usage: &'static str) -> CommandResult {
    app.set_status(usage);
    CommandResult::Continue
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.set_status("Describe the room you want and press Enter to generate a design.");
    app.set_status("Commands:");
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    for command in all_commands() {
        app.set_status(format!(
            "  {:<width$}  {}",
            command.usage,
            command.help,
            width = width
        ));
    }
    CommandResult::Continue
}

pub(super) fn handle_attach(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return usage_status(app, USAGE_ATTACH);
    }
    let path = PathBuf::from(invocation.args);
    let message = match app.attach(&path) {
        Ok(attachment) => format!(
            "📎 Attached {} {}",
            path_display(&attachment.path),
            attachment.image.label()
        ),
        Err(e) => format!("Attach error: {e}"),
    };
    app.set_status(message);
    CommandResult::Continue
}

pub(super) fn handle_detach(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let message = match app.detach() {
        Some(attachment) => format!("Removed attachment {}", path_display(&attachment.path)),
        None => "Nothing attached".to_string(),
    };
    app.set_status(message);
    CommandResult::Continue
}

fn toggle_sentiment(app: &mut App, sentiment: Sentiment) -> CommandResult {
    let message = match app.toggle_sentiment(sentiment) {
        Some(Sentiment::Love) => "❤️  Love it! Your next /refine will carry positive feedback.",
        Some(Sentiment::NotQuite) => {
            "👎 Not quite. Your next /refine will carry negative feedback."
        }
        None => "Sentiment cleared.",
    };
    app.set_status(message);
    CommandResult::Continue
}

pub(super) fn handle_love(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    toggle_sentiment(app, Sentiment::Love)
}

pub(super) fn handle_not_quite(
    app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    toggle_sentiment(app, Sentiment::NotQuite)
}

pub(super) fn handle_refine(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return usage_status(app, USAGE_REFINE);
    }
    if app.session.current_id().is_none() {
        return usage_status(app, NO_DESIGN);
    }
    CommandResult::Refine(app.compose_feedback(invocation.args))
}

pub(super) fn handle_history(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let history = app.session.history();
    if history.is_empty() {
        return usage_status(app, NO_DESIGN);
    }
    let current = app.session.current_id();
    let total = history.len();
    app.set_status(format!("Version history ({total}):"));
    for (index, design) in history.iter().enumerate() {
        let marker = if Some(design.id()) == current { '*' } else { ' ' };
        app.set_status(format!(
            "{marker} Version {:<3} {}  {}",
            total - index,
            design.created_at().format("%H:%M:%S"),
            design.prompt()
        ));
    }
    CommandResult::Continue
}

pub(super) fn handle_select(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(version) = invocation
        .arg(0)
        .and_then(|arg| arg.trim_start_matches(['v', 'V']).parse::<usize>().ok())
    else {
        return usage_status(app, USAGE_SELECT);
    };
    let selected = app
        .session
        .design_by_version(version)
        .is_some_and(|id| app.session.select_version(id));
    if selected {
        app.set_status(format!("Loaded version {version}."));
    } else {
        let total = app.session.history_len();
        app.set_status(format!("No version {version} (history has {total})."));
    }
    CommandResult::Continue
}

pub(super) fn handle_export(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let dir = if invocation.args.is_empty() {
        app.export_dir.clone()
    } else {
        PathBuf::from(invocation.args)
    };
    let saver = DirectorySaver::new(dir);
    let message = match app.session.export_current(&saver) {
        Ok(Some(path)) => format!("💾 Saved design to {}", path_display(path)),
        Ok(None) => NO_DESIGN.to_string(),
        Err(ExportError::RemoteReference(url)) => {
            format!("This design is hosted remotely and can be downloaded from {url}")
        }
        Err(e) => format!("Export error: {e}"),
    };
    app.set_status(message);
    CommandResult::Continue
}

pub(super) fn handle_summary(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.session.history_len() == 0 {
        return usage_status(app, NO_DESIGN);
    }
    CommandResult::Summarize
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let result = match invocation.args_len() {
        0 => app.logging.toggle_logging(),
        1 => app.logging.set_log_file(invocation.args.to_string()),
        _ => return usage_status(app, USAGE_LOG),
    };
    let message = match result {
        Ok(message) => message,
        Err(e) => format!("Log error: {e}"),
    };
    app.set_status(message);
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
