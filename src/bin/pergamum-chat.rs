//! Interactive chat client for the Pergamum papers service.
//!
//! This binary provides a REPL for asking questions about research papers
//! through the Pergamum backend.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; backend URL from $PERGAMUM_BASE_URL
//! pergamum-chat
//!
//! # Specify the backend and log in immediately
//! pergamum-chat --base-url https://papers.example.com --email a@b.com
//!
//! # Disable colors (useful for piping output)
//! pergamum-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/login <email>` - Log in
//! - `/reset` - Reset the backend session
//! - `/history` - Print the transcript
//! - `/adduser <email> [admin]` - Register a new user (admin only)
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use pergamum::chat::{ChatArgs, ChatCommand, ChatConfig, help_text, parse_command};
use pergamum::{
    AuthSession, Conversation, Directory, JsonFileStorage, Pergamum, PlainTextRenderer, Renderer,
    StorageBackend,
};

/// Main entry point for the pergamum-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("pergamum-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = Pergamum::with_options(config.base_url.clone(), config.timeout)?;
    let storage = JsonFileStorage::open(&config.credentials_path)?;
    let mut auth = AuthSession::new(client.clone(), storage);
    let mut conversation = Conversation::new(client.clone());
    let directory = Directory::new(client);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Pergamum Chat");
    println!("Type /help for commands, /quit to exit\n");

    if auth.restore_session()? {
        let email = auth.user_email().unwrap_or_default().to_string();
        renderer.print_info(&format!("Restored session for {email}"));
    } else if let Some(email) = &config.email {
        login(&mut auth, email, &mut renderer).await;
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Login(email) => {
                            login(&mut auth, &email, &mut renderer).await;
                        }
                        ChatCommand::Logout => {
                            conversation.clear();
                            match auth.logout() {
                                Ok(()) => renderer.print_info("Logged out."),
                                Err(err) => renderer
                                    .print_error(&format!("Failed to clear identity: {err}")),
                            }
                        }
                        ChatCommand::Whoami => {
                            print_identity(&auth, &conversation);
                        }
                        ChatCommand::Reset => {
                            reset_session(&mut conversation, &auth, &mut renderer).await;
                        }
                        ChatCommand::History => {
                            print_history(&conversation);
                        }
                        ChatCommand::Clear => {
                            conversation.clear();
                            renderer.print_info("Transcript cleared.");
                        }
                        ChatCommand::AddUser { email, admin } => {
                            add_user(&directory, &auth, &email, admin, &mut renderer).await;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - relay to the agent
                let (email, token) = match auth.credentials() {
                    Some(credentials) => credentials,
                    None => {
                        renderer.print_error("Not logged in. Use /login <email> first.");
                        continue;
                    }
                };
                conversation.add_user_message(line);
                match conversation
                    .send_to_agent(line, Some(email), Some(token))
                    .await
                {
                    Ok(_) => {
                        // The outcome, reply or error, is the transcript tail.
                        if let Some(last) = conversation.history().last() {
                            if !last.is_user {
                                renderer.print_agent_text(&last.text);
                            }
                        }
                    }
                    Err(err) => renderer.print_error(&err.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

async fn login<S: StorageBackend>(
    auth: &mut AuthSession<S>,
    email: &str,
    renderer: &mut PlainTextRenderer,
) {
    let response = auth.login(email).await;
    if response.status.is_success() && auth.is_logged_in() {
        if auth.is_admin() {
            renderer.print_info(&format!("Logged in as {email} (admin)"));
        } else {
            renderer.print_info(&format!("Logged in as {email}"));
        }
    } else {
        renderer.print_error(&response.message);
    }
}

async fn reset_session<S: StorageBackend>(
    conversation: &mut Conversation,
    auth: &AuthSession<S>,
    renderer: &mut PlainTextRenderer,
) {
    let Some((email, token)) = auth.credentials() else {
        renderer.print_error("Not logged in. Use /login <email> first.");
        return;
    };
    match conversation.delete_session(Some(email), Some(token)).await {
        Ok(response) if response.status.is_success() => {
            renderer.print_info(&format!(
                "Session reset (new id: {})",
                conversation.session_id()
            ));
        }
        Ok(response) => {
            // The old identifier stays active on failure.
            renderer.print_error(&format!("Failed to reset session: {}", response.message));
        }
        Err(err) => renderer.print_error(&err.to_string()),
    }
}

async fn add_user<S: StorageBackend>(
    directory: &Directory,
    auth: &AuthSession<S>,
    new_email: &str,
    admin: bool,
    renderer: &mut PlainTextRenderer,
) {
    if !auth.is_admin() {
        renderer.print_error("Admin privileges required to register users.");
        return;
    }
    match directory
        .add_user(auth.user_email(), new_email, admin, auth.token())
        .await
    {
        Ok(response) if response.status.is_success() => {
            renderer.print_info(&format!("Registered {new_email}"));
        }
        Ok(response) => renderer.print_error(&response.message),
        Err(err) => renderer.print_error(&err.to_string()),
    }
}

fn print_identity<S: StorageBackend>(auth: &AuthSession<S>, conversation: &Conversation) {
    match auth.user_email() {
        Some(email) => {
            println!("    Logged in as: {}", email);
            println!("    Admin: {}", if auth.is_admin() { "yes" } else { "no" });
        }
        None => println!("    Not logged in."),
    }
    println!("    Session id: {}", conversation.session_id());
    println!("    Messages: {}", conversation.message_count());
}

fn print_history(conversation: &Conversation) {
    let history = conversation.history();
    if history.is_empty() {
        println!("    (empty transcript)");
        return;
    }
    for message in history {
        let who = if message.is_user { "You" } else { "Agent" };
        println!("    [{}] {}: {}", message.timestamp, who, message.text);
    }
}
