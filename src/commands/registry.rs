use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

impl CommandInvocation<'_> {
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new chat.",
        handler: super::handle_new,
    },
    Command {
        name: "list",
        usage: "/list",
        help: "List saved chats, newest first.",
        handler: super::handle_list,
    },
    Command {
        name: "switch",
        usage: "/switch <n|id>",
        help: "Open a chat by its number in /list or by id.",
        handler: super::handle_switch,
    },
    Command {
        name: "delete",
        usage: "/delete [n|id]",
        help: "Delete a chat (the current one by default). Asks first.",
        handler: super::handle_delete,
    },
    Command {
        name: "attach",
        usage: "/attach <path>",
        help: "Attach a text file to the next message.",
        handler: super::handle_attach,
    },
    Command {
        name: "image",
        usage: "/image <path>",
        help: "Attach an image to the next message.",
        handler: super::handle_image,
    },
    Command {
        name: "clear-attachments",
        usage: "/clear-attachments",
        help: "Drop all pending attachments.",
        handler: super::handle_clear_attachments,
    },
    Command {
        name: "model",
        usage: "/model [name]",
        help: "Show or change the model for this run.",
        handler: super::handle_model,
    },
    Command {
        name: "temp",
        usage: "/temp [0.0-2.0]",
        help: "Show or change the sampling temperature.",
        handler: super::handle_temp,
    },
    Command {
        name: "system",
        usage: "/system [prompt]",
        help: "Show or replace the system prompt.",
        handler: super::handle_system,
    },
    Command {
        name: "export",
        usage: "/export [--force] [file]",
        help: "Save the current chat as plain text.",
        handler: super::handle_export,
    },
    Command {
        name: "cancel",
        usage: "/cancel",
        help: "Stop waiting for the current response.",
        handler: super::handle_cancel,
    },
    Command {
        name: "status",
        usage: "/status",
        help: "Show model, temperature, and pending attachments.",
        handler: super::handle_status,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave chatdesk.",
        handler: super::handle_quit,
    },
];
