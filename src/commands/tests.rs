use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::utils::test_utils::create_test_app;

fn single_action(result: CommandResult) -> AppAction {
    match result {
        CommandResult::Actions(mut actions) if actions.len() == 1 => actions.remove(0),
        _ => panic!("expected exactly one action"),
    }
}

fn printed(result: CommandResult) -> String {
    match result {
        CommandResult::Print(text) => text,
        _ => panic!("expected printed output"),
    }
}

#[test]
fn plain_text_is_sent_as_message() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    match process_input(&app, "hello there") {
        CommandResult::ProcessAsMessage(message) => assert_eq!(message, "hello there"),
        _ => panic!("expected message"),
    }
}

#[test]
fn unknown_slash_command_is_sent_as_message() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    match process_input(&app, "/usr/bin is a directory, right?") {
        CommandResult::ProcessAsMessage(message) => {
            assert_eq!(message, "/usr/bin is a directory, right?")
        }
        _ => panic!("expected message"),
    }
    assert!(matches!(
        process_input(&app, "/"),
        CommandResult::ProcessAsMessage(_)
    ));
}

#[test]
fn commands_are_case_insensitive() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    assert!(matches!(process_input(&app, "/QUIT"), CommandResult::Quit));
    assert!(matches!(
        single_action(process_input(&app, "/New")),
        AppAction::NewSession
    ));
}

#[test]
fn switch_resolves_listing_position_and_id() {
    let dir = TempDir::new().expect("tempdir");
    let (mut app, _presenter) = create_test_app(dir.path());
    let oldest = app.active_id().to_string();
    app.new_session();

    match single_action(process_input(&app, "/switch 2")) {
        AppAction::SwitchSession { id } => assert_eq!(id, oldest),
        _ => panic!("expected switch"),
    }
    match single_action(process_input(&app, &format!("/switch {oldest}"))) {
        AppAction::SwitchSession { id } => assert_eq!(id, oldest),
        _ => panic!("expected switch"),
    }
    assert!(printed(process_input(&app, "/switch 9")).contains("No chat matches '9'"));
    assert_eq!(
        printed(process_input(&app, "/switch")),
        "Usage: /switch <n|id>"
    );
}

#[test]
fn delete_asks_for_confirmation() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());
    let active = app.active_id().to_string();

    match process_input(&app, "/delete") {
        CommandResult::ConfirmDelete { id, name } => {
            assert_eq!(id, active);
            assert_eq!(name, "New Chat");
        }
        _ => panic!("expected confirmation"),
    }
    match process_input(&app, "/delete 1") {
        CommandResult::ConfirmDelete { id, .. } => assert_eq!(id, active),
        _ => panic!("expected confirmation"),
    }
}

#[test]
fn attach_strips_quotes_from_paths() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    match single_action(process_input(&app, "/attach \"my notes.txt\"")) {
        AppAction::AttachFile { path } => assert_eq!(path, PathBuf::from("my notes.txt")),
        _ => panic!("expected attach"),
    }
    match single_action(process_input(&app, "/image './cat.png'")) {
        AppAction::AttachImage { path } => assert_eq!(path, PathBuf::from("./cat.png")),
        _ => panic!("expected image"),
    }
    assert_eq!(printed(process_input(&app, "/attach")), "Usage: /attach <path>");
}

#[test]
fn model_temp_and_system_show_or_set() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    assert_eq!(printed(process_input(&app, "/model")), "Current model: llama2");
    match single_action(process_input(&app, "/model llava:13b")) {
        AppAction::SetModel { model } => assert_eq!(model, "llava:13b"),
        _ => panic!("expected model"),
    }

    assert_eq!(
        printed(process_input(&app, "/temp")),
        "Current temperature: 0.7"
    );
    match single_action(process_input(&app, "/temp 1.2")) {
        AppAction::SetTemperature { value } => assert_eq!(value, 1.2),
        _ => panic!("expected temperature"),
    }
    assert_eq!(printed(process_input(&app, "/temp warm")), "Usage: /temp [0.0-2.0]");
    assert!(matches!(
        process_input(&app, "/temp NaN"),
        CommandResult::Print(_)
    ));

    assert_eq!(
        printed(process_input(&app, "/system")),
        "System prompt: You are helpful."
    );
    match single_action(process_input(&app, "/system Answer in haiku.")) {
        AppAction::SetSystemPrompt { prompt } => assert_eq!(prompt, "Answer in haiku."),
        _ => panic!("expected prompt"),
    }
}

#[test]
fn export_parses_force_flag_and_path() {
    let dir = TempDir::new().expect("tempdir");
    let (app, _presenter) = create_test_app(dir.path());

    match single_action(process_input(&app, "/export")) {
        AppAction::ExportActive { path, overwrite } => {
            assert_eq!(path, None);
            assert!(!overwrite);
        }
        _ => panic!("expected export"),
    }
    match single_action(process_input(&app, "/export --force out.txt")) {
        AppAction::ExportActive { path, overwrite } => {
            assert_eq!(path, Some(PathBuf::from("out.txt")));
            assert!(overwrite);
        }
        _ => panic!("expected export"),
    }
    match single_action(process_input(&app, "/export --forceful.txt")) {
        AppAction::ExportActive { path, overwrite } => {
            assert_eq!(path, Some(PathBuf::from("--forceful.txt")));
            assert!(!overwrite);
        }
        _ => panic!("expected export"),
    }
}

#[test]
fn help_lists_every_command() {
    let text = help_text();
    for command in all_commands() {
        assert!(text.contains(command.usage), "missing {}", command.name);
    }
}
