use super::*;
use crate::core::image::ImageRef;
use crate::utils::logging::LoggingState;
use crate::utils::test_utils::{create_test_session, test_image, ScriptedGateway};
use std::fs;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn create_test_app(export_dir: &TempDir) -> (App, Arc<ScriptedGateway>) {
    let (session, gateway) = create_test_session();
    let logging = LoggingState::new(None).unwrap();
    (
        App::new(session, logging, export_dir.path().to_path_buf()),
        gateway,
    )
}

async fn app_with_versions(dir: &TempDir, count: usize) -> (App, Arc<ScriptedGateway>) {
    let (app, gateway) = create_test_app(dir);
    for n in 1..=count {
        gateway.push_image(test_image(&format!("v{n}")));
        app.session
            .submit_prompt(&format!("Design number {n}"), None)
            .await;
    }
    (app, gateway)
}

#[test]
fn plain_text_is_submitted_as_prompt() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(
        process_input(&mut app, "  A cozy loft  \n"),
        CommandResult::SubmitPrompt("A cozy loft".to_string())
    );
}

#[test]
fn blank_line_without_attachment_does_nothing() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(process_input(&mut app, "   "), CommandResult::Continue);
    assert!(app.take_output().is_empty());
}

#[test]
fn blank_line_with_attachment_submits_image_only() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    let photo = dir.path().join("room.png");
    fs::write(&photo, b"png").unwrap();

    let result = process_input(&mut app, &format!("/attach {}", photo.display()));
    assert_eq!(result, CommandResult::Continue);
    assert!(app.take_output()[0].starts_with("📎 Attached"));
    assert_eq!(
        process_input(&mut app, ""),
        CommandResult::SubmitPrompt(String::new())
    );
}

#[test]
fn attach_reports_missing_files() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    process_input(&mut app, "/attach /definitely/not/here.png");
    assert!(app.take_output()[0].starts_with("Attach error"));
    assert!(app.attachment().is_none());

    process_input(&mut app, "/attach");
    assert_eq!(app.take_output(), vec!["Usage: /attach <path>".to_string()]);
}

#[test]
fn commands_are_case_insensitive() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(process_input(&mut app, "/QUIT"), CommandResult::Quit);
}

#[test]
fn unknown_command_is_reported_not_submitted() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(process_input(&mut app, "/teleport"), CommandResult::Continue);
    assert!(app.take_output()[0].contains("Unknown command: /teleport"));
}

#[test]
fn help_lists_every_command() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    process_input(&mut app, "/help");
    let output = app.take_output().join("\n");
    for command in all_commands() {
        assert!(output.contains(command.usage), "missing {}", command.usage);
    }
}

#[test]
fn refine_requires_a_current_design() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(
        process_input(&mut app, "/refine more plants"),
        CommandResult::Continue
    );
    assert!(app.take_output()[0].starts_with("No design yet"));
}

#[tokio::test]
async fn refine_folds_in_the_chosen_sentiment() {
    let dir = tempdir().unwrap();
    let (mut app, _) = app_with_versions(&dir, 1).await;

    process_input(&mut app, "/notquite");
    assert_eq!(
        process_input(&mut app, "/refine darker floors"),
        CommandResult::Refine("Sentiment: Negative. Feedback: darker floors".to_string())
    );
    assert_eq!(
        process_input(&mut app, "/refine darker floors"),
        CommandResult::Refine("darker floors".to_string())
    );
    assert_eq!(
        process_input(&mut app, "/refine"),
        CommandResult::Continue
    );
}

#[tokio::test]
async fn history_lists_newest_first_and_marks_current() {
    let dir = tempdir().unwrap();
    let (mut app, _) = app_with_versions(&dir, 3).await;

    process_input(&mut app, "/select 2");
    app.take_output();
    process_input(&mut app, "/history");
    let output = app.take_output();

    assert_eq!(output[0], "Version history (3):");
    assert!(output[1].starts_with("  Version 3"));
    assert!(output[1].ends_with("Design number 3"));
    assert!(output[2].starts_with("* Version 2"));
    assert!(output[3].starts_with("  Version 1"));
}

#[tokio::test]
async fn select_loads_version_without_touching_history() {
    let dir = tempdir().unwrap();
    let (mut app, _) = app_with_versions(&dir, 2).await;
    let before = app.session.history();

    process_input(&mut app, "/select v1");
    assert_eq!(app.take_output(), vec!["Loaded version 1.".to_string()]);
    assert_eq!(app.session.version_of(app.session.current_id().unwrap()), Some(1));
    assert_eq!(app.session.history(), before);

    process_input(&mut app, "/select 9");
    assert!(app.take_output()[0].starts_with("No version 9"));
    process_input(&mut app, "/select latest");
    assert_eq!(app.take_output(), vec!["Usage: /select <version>".to_string()]);
}

#[tokio::test]
async fn export_writes_into_configured_or_given_directory() {
    let dir = tempdir().unwrap();
    let (mut app, _) = app_with_versions(&dir, 1).await;

    process_input(&mut app, "/export");
    assert!(app.take_output()[0].starts_with("💾 Saved design to"));
    let exported: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(exported.len(), 1);

    let other = dir.path().join("elsewhere");
    process_input(&mut app, &format!("/export {}", other.display()));
    let written = fs::read_dir(&other).unwrap().next().unwrap().unwrap();
    assert_eq!(fs::read(written.path()).unwrap(), b"v1");
}

#[tokio::test]
async fn export_of_remote_design_points_at_url() {
    let dir = tempdir().unwrap();
    let (mut app, gateway) = create_test_app(&dir);
    gateway.push_image(ImageRef::parse("https://cdn.test/room.png").unwrap());
    app.session.submit_prompt("A sunroom", None).await;

    process_input(&mut app, "/export");
    assert_eq!(
        app.take_output(),
        vec!["This design is hosted remotely and can be downloaded from https://cdn.test/room.png"
            .to_string()]
    );
}

#[tokio::test]
async fn summary_needs_history() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    assert_eq!(process_input(&mut app, "/summary"), CommandResult::Continue);

    let (mut app, _) = app_with_versions(&dir, 1).await;
    assert_eq!(process_input(&mut app, "/summary"), CommandResult::Summarize);
}

#[test]
fn log_command_sets_and_toggles_file() {
    let dir = tempdir().unwrap();
    let (mut app, _) = create_test_app(&dir);
    let log = dir.path().join("transcript.log");

    process_input(&mut app, "/log");
    assert!(app.take_output()[0].starts_with("Log error"));

    process_input(&mut app, &format!("/log {}", log.display()));
    assert!(app.take_output()[0].starts_with("Logging enabled to:"));
    assert!(app.logging.is_active());

    process_input(&mut app, "/log");
    assert!(app.take_output()[0].starts_with("Logging paused"));
    assert!(!app.logging.is_active());
}
