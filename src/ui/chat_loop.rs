//! Interactive line-oriented design session.
//!
//! Each input line is routed through [`crate::commands::process_input`].
//! Commands that need the backend are awaited here until they finish; a
//! request in flight is never dropped, so Ctrl+C only ends the session at
//! the prompt.

use std::error::Error;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::session::{Session, SubmitOutcome};
use crate::ui::render::{design_line, message_lines, notification_line, PENDING_TEXT};
use crate::utils::logging::LoggingState;

const WELCOME_TEXT: &str =
    "Welcome to ISpace! Describe your dream room, attach a photo with /attach, or type /help.";
const SUMMARY_PENDING_TEXT: &str = "📝 Summarizing your design history...";
const WAITING_TEXT: &str = "⏳ Still waiting for the response...";
const PROMPT: &str = "> ";

pub async fn run_chat(
    session: Session,
    export_dir: PathBuf,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let logging = LoggingState::new(log_file)?;
    let mut app = App::new(session, logging, export_dir);
    let input = BufReader::new(tokio::io::stdin());
    let mut output = io::stdout();
    drive(&mut app, input, &mut output).await?;
    Ok(())
}

/// Runs the session until `/quit`, end of input or Ctrl+C at the prompt.
pub async fn drive<R, W>(app: &mut App, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{WELCOME_TEXT}")?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            writeln!(out)?;
            break;
        };

        let result = process_input(app, &line);
        render_updates(app, out)?;

        match result {
            CommandResult::Continue => {}
            CommandResult::Quit => break,
            CommandResult::SubmitPrompt(text) => {
                let image = app.attachment().map(|attachment| attachment.image.clone());
                writeln!(out, "{PENDING_TEXT}")?;
                out.flush()?;
                let outcome = await_response(
                    app.session.submit_prompt(&text, image),
                    tokio::signal::ctrl_c,
                    out,
                )
                .await?;
                if !matches!(outcome, SubmitOutcome::Ignored) {
                    app.detach();
                }
                report_outcome(app, outcome, out)?;
            }
            CommandResult::Refine(feedback) => {
                writeln!(out, "{PENDING_TEXT}")?;
                out.flush()?;
                let outcome = await_response(
                    app.session.submit_feedback(&feedback),
                    tokio::signal::ctrl_c,
                    out,
                )
                .await?;
                report_outcome(app, outcome, out)?;
            }
            CommandResult::Summarize => {
                writeln!(out, "{SUMMARY_PENDING_TEXT}")?;
                out.flush()?;
                await_response(app.session.summarize_history(), tokio::signal::ctrl_c, out)
                    .await?;
            }
        }

        render_updates(app, out)?;
    }

    out.flush()
}

/// Awaits `request` to completion. Each interrupt that arrives meanwhile is
/// acknowledged and otherwise ignored.
async fn await_response<F, I, S, W>(
    request: F,
    mut interrupt: I,
    out: &mut W,
) -> io::Result<F::Output>
where
    F: Future,
    I: FnMut() -> S,
    S: Future,
    W: Write,
{
    tokio::pin!(request);
    loop {
        tokio::select! {
            biased;
            output = &mut request => return Ok(output),
            _ = interrupt() => {
                writeln!(out, "{WAITING_TEXT}")?;
                out.flush()?;
            }
        }
    }
}

fn report_outcome<W: Write>(
    app: &mut App,
    outcome: SubmitOutcome,
    out: &mut W,
) -> io::Result<()> {
    debug!(?outcome, "request finished");
    match outcome {
        SubmitOutcome::Generated(id) => {
            // Transcript first, so the design follows its acknowledgement.
            render_updates(app, out)?;
            let version = app.session.version_of(id).unwrap_or_default();
            match app.session.current() {
                Some(design) => writeln!(out, "{}", design_line(version, &design)),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn render_updates<W: Write>(app: &mut App, out: &mut W) -> io::Result<()> {
    for message in app.take_new_messages() {
        for line in message_lines(&message) {
            writeln!(out, "{line}")?;
        }
    }
    for notification in app.session.drain_notifications() {
        writeln!(out, "{}", notification_line(&notification))?;
    }
    for line in app.take_output() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
