//! Slash command parsing for the chat front end.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the session without sending messages to the
//! agent.

/// A parsed chat command.
///
/// These commands control the session and are not sent to the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Log in with the given email.
    Login(String),

    /// Log out and clear the persisted identity.
    Logout,

    /// Show the current identity.
    Whoami,

    /// Reset the backend session (fresh identifier, same transcript).
    Reset,

    /// Print the transcript.
    History,

    /// Clear the transcript and rotate the session identifier.
    Clear,

    /// Register a new user (admin only).
    AddUser {
        /// Email of the user being registered.
        email: String,
        /// Whether the new user is granted admin privileges.
        admin: bool,
    },

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be relayed to the agent as a message.
///
/// # Examples
///
/// ```
/// # use pergamum::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/login a@b.com").is_some());
/// assert!(parse_command("What does the paper claim?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "login" => match argument {
            Some(email) => ChatCommand::Login(email.to_string()),
            None => ChatCommand::Invalid("/login requires an email".to_string()),
        },
        "logout" => ChatCommand::Logout,
        "whoami" => ChatCommand::Whoami,
        "reset" => ChatCommand::Reset,
        "history" => ChatCommand::History,
        "clear" => ChatCommand::Clear,
        "adduser" => parse_add_user(argument),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_add_user(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/adduser requires an email (optionally 'admin')".to_string());
    };

    let mut parts = arg.split_whitespace();
    let email = match parts.next() {
        Some(email) => email.to_string(),
        None => {
            return ChatCommand::Invalid(
                "/adduser requires an email (optionally 'admin')".to_string(),
            );
        }
    };
    match parts.next() {
        None => ChatCommand::AddUser {
            email,
            admin: false,
        },
        Some(flag) if flag.eq_ignore_ascii_case("admin") => {
            ChatCommand::AddUser { email, admin: true }
        }
        Some(flag) => ChatCommand::Invalid(format!(
            "Unrecognized /adduser flag: {flag} (use 'admin' or nothing)"
        )),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /login <email>         Log in with an email address
  /logout                Log out and clear the saved identity
  /whoami                Show the current identity
  /reset                 Reset the backend session (transcript is kept)
  /history               Print the transcript
  /clear                 Clear the transcript
  /adduser <email> [admin]  Register a new user (admin only)
  /help                  Show this help message
  /quit                  Exit the chat"#
}
