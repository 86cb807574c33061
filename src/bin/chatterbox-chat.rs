//! Interactive terminal client for a trainable chatbot backend.
//!
//! This binary provides a REPL for chatting with the bot, rating its replies,
//! teaching it new responses and driving its training.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the backend on the default address
//! chatterbox-chat
//!
//! # Talk to another backend
//! chatterbox-chat --base-url http://bot.internal:5000
//!
//! # Disable colors (useful for piping output)
//! chatterbox-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/good`, `/bad`, `/rate <n>` - Rate the last reply
//! - `/teach <input> => <response>` - Teach a response
//! - `/retrain` - Retrain the model
//! - `/stats` - Show training statistics
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use chatterbox::BackendClient;
use chatterbox::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSessionController, CharCount, CharLevel,
    HELPFUL_RATING, MAX_MESSAGE_CHARS, Outcome, PlainTextRenderer, Rejection, SubmitOutcome,
    UNHELPFUL_RATING, help_text, parse_command,
};

type Session = ChatSessionController<BackendClient>;

/// Main entry point for the chatterbox-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("chatterbox-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let renderer = PlainTextRenderer::with_color(config.use_color).with_echo_user(false);

    let session = Arc::new(ChatSessionController::connect(config, Box::new(renderer))?);
    let mut rl = DefaultEditor::new()?;

    println!("Chatterbox (backend: {})", session.backend().base_url());
    println!("Type /help for commands, /quit to exit\n");
    session.init().await;
    if !session.training_enabled() {
        session.print_info("Training features are unavailable on this backend.");
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
                        ChatCommand::Clear => session.clear(),
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Good => {
                            report_rejection(&session, session.record_feedback(HELPFUL_RATING).await)
                        }
                        ChatCommand::Bad => report_rejection(
                            &session,
                            session.record_feedback(UNHELPFUL_RATING).await,
                        ),
                        ChatCommand::Rate(rating) => {
                            report_rejection(&session, session.record_feedback(rating).await)
                        }
                        ChatCommand::Teach { input, response } => {
                            session.set_teach_fields(&input, &response);
                            // Missing fields are reported by the session itself.
                            session.teach_from_composer().await;
                        }
                        ChatCommand::Retrain => {
                            session.print_info("Retraining...");
                            report_rejection(&session, session.retrain().await);
                        }
                        ChatCommand::Export => {
                            report_rejection(&session, session.export_training().await)
                        }
                        ChatCommand::Stats => {
                            if !session.refresh_stats().await {
                                session.print_error("Could not load training statistics.");
                            }
                            print_stats(&session);
                        }
                        ChatCommand::Suggest(index) => {
                            let suggestions = session.latest_suggestions();
                            match suggestions.get(index - 1) {
                                Some(suggestion) => {
                                    println!("You: {suggestion}");
                                    let outcome = session.send_suggestion(suggestion).await;
                                    report_submit(&session, outcome);
                                }
                                None => session.print_error(&format!(
                                    "No suggestion {index} (the latest reply offers {})",
                                    suggestions.len()
                                )),
                            }
                        }
                        ChatCommand::Invalid(message) => session.print_error(&message),
                    }
                    continue;
                }

                let count = CharCount::new(line.chars().count());
                if count.is_over_limit() {
                    session.print_error(&format!(
                        "Message is {} characters; the limit is {MAX_MESSAGE_CHARS}.",
                        count.count
                    ));
                    continue;
                }
                if count.level != CharLevel::Normal {
                    session.print_info(&format!("({}/{MAX_MESSAGE_CHARS})", count.count));
                }

                session.set_draft(line);
                let outcome = session.submit_draft().await;
                report_submit(&session, outcome);
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
                session.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    let summary = session.dispose();
    println!(
        "({} messages this session)",
        summary.transcript.len().saturating_sub(1)
    );
    Ok(())
}

fn report_submit(session: &Session, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Apologized(err) => session.print_error(&err.to_string()),
        SubmitOutcome::Rejected(rejection) => {
            session.print_error(&rejection.error().to_string())
        }
        SubmitOutcome::Answered => {}
    }
}

fn report_rejection<T>(session: &Session, outcome: Outcome<T>) {
    match outcome {
        Outcome::Rejected(Rejection::TrainingDisabled) => {
            session.print_info("Feedback is unavailable until training is enabled.")
        }
        Outcome::Rejected(Rejection::NoExchange) => session.print_info("Nothing to rate yet."),
        Outcome::Rejected(Rejection::Busy) => session.print_info("Already in progress."),
        Outcome::Rejected(rejection) => session.print_error(&rejection.error().to_string()),
        Outcome::Done(_) | Outcome::Refused(_) | Outcome::Failed(_) => {}
    }
}

fn print_stats(session: &Session) {
    let stats = session.stats_display();
    println!("    Training Statistics:");
    println!("      Conversations: {}", stats.conversation_count);
    println!("      Positive feedback: {}", stats.feedback_count);
    println!("      Learning rate: {}", stats.average_rating);
    println!("      Model: {}", stats.model_status);
    println!(
        "      Training: {}",
        if session.training_enabled() {
            "enabled"
        } else {
            "unavailable"
        }
    );
}
