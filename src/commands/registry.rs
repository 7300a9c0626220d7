use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

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

impl<'a> CommandInvocation<'a> {
    pub fn args_len(&self) -> usize {
        self.args.split_whitespace().count()
    }

    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
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
        name: "attach",
        usage: "/attach <path>",
        help: "Attach a photo of your room to the next description.",
        handler: super::handle_attach,
    },
    Command {
        name: "detach",
        usage: "/detach",
        help: "Drop the pending attachment.",
        handler: super::handle_detach,
    },
    Command {
        name: "love",
        usage: "/love",
        help: "Mark the next refinement as positive feedback.",
        handler: super::handle_love,
    },
    Command {
        name: "notquite",
        usage: "/notquite",
        help: "Mark the next refinement as negative feedback.",
        handler: super::handle_not_quite,
    },
    Command {
        name: "refine",
        usage: "/refine <feedback>",
        help: "Refine the current design with your feedback.",
        handler: super::handle_refine,
    },
    Command {
        name: "history",
        usage: "/history",
        help: "List every version of the design, newest first.",
        handler: super::handle_history,
    },
    Command {
        name: "select",
        usage: "/select <version>",
        help: "Load an earlier version as the current design.",
        handler: super::handle_select,
    },
    Command {
        name: "export",
        usage: "/export [dir]",
        help: "Save the current design as an image file.",
        handler: super::handle_export,
    },
    Command {
        name: "summary",
        usage: "/summary",
        help: "Summarize how the design has evolved.",
        handler: super::handle_summary,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle transcript logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the session.",
        handler: super::handle_quit,
    },
];
