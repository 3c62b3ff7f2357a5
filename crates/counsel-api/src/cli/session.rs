//! Session CLI commands: create, list, show, send, retry, rename, delete.
//!
//! Provides session browsing with rich tables and deletion with a
//! confirmation prompt. Every command honors `--json`.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use counsel_core::chat::instructions;
use counsel_types::chat::{ChatMessage, Exchange, MessageRole, NewSession, SessionFilter};
use counsel_types::error::ChatError;
use uuid::Uuid;

use super::parse_session_id;
use crate::state::AppState;

/// Create a session.
///
/// # Examples
///
/// ```bash
/// counsel new --user auth0|42 --title "Offer from Acme" --service salary_guidance
/// ```
pub async fn new_session(
    state: &AppState,
    user: String,
    title: String,
    description: Option<String>,
    service: Option<String>,
    json: bool,
) -> Result<()> {
    let session = state
        .chat_service
        .create_session(NewSession {
            title,
            description,
            user_id: user,
            service_type: service,
        })
        .await
        .context("failed to create session")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session '{}' created ({})",
        style("+").green().bold(),
        style(&session.title).cyan(),
        instructions::label(session.service_type)
    );
    println!("  {} {}", style("id:").dim(), session.id);

    let questions = instructions::follow_up_questions(session.service_type);
    if !questions.is_empty() {
        println!();
        println!("  {}", style("Useful things to mention:").bold());
        for question in questions {
            println!("  - {question}");
        }
    }
    println!();
    println!(
        "  Continue with: {}",
        style(format!("counsel send {} \"...\"", session.id)).yellow()
    );
    println!();

    Ok(())
}

/// List sessions with their latest message preview.
///
/// # Examples
///
/// ```bash
/// counsel sessions --user auth0|42
/// counsel sessions --json
/// ```
pub async fn list_sessions(state: &AppState, user: Option<String>, json: bool) -> Result<()> {
    // Operator view: no --user lists every session
    let filter = match user {
        Some(user) => SessionFilter::Owner(user),
        None => SessionFilter::Any,
    };

    let sessions = state.chat_service.list_sessions(&filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions found. Start one with: {}",
            style("i").blue().bold(),
            style("counsel new --user <id> --title <title>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Service").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Latest").fg(Color::White),
    ]);

    for summary in &sessions {
        let session = &summary.session;
        let latest = summary
            .latest_message
            .as_ref()
            .map(|m| format!("{}: {}", role_label(m.role), truncate(&m.content, 40)))
            .unwrap_or_else(|| "(no messages)".to_string());

        table.add_row(vec![
            Cell::new(session.id.to_string()).fg(Color::DarkGrey),
            Cell::new(truncate(&session.title, 40)).fg(Color::Cyan),
            Cell::new(instructions::label(session.service_type)).fg(Color::White),
            Cell::new(session.updated_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::White),
            Cell::new(summary.message_count.to_string()).fg(Color::White),
            Cell::new(latest).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print a session header and its full conversation.
pub async fn show_session(state: &AppState, id: &str, json: bool) -> Result<()> {
    let session_id = parse_session_id(id)?;
    let session = state
        .chat_service
        .get_session(&session_id)
        .await
        .with_context(|| format!("Session '{session_id}' not found"))?;
    let messages = state.chat_service.get_messages(&session_id).await?;

    if json {
        let export = serde_json::json!({
            "session": session,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&session.title).cyan().bold());
    if let Some(description) = &session.description {
        println!("  {}", style(description).dim());
    }
    println!(
        "  {} {}  {} {}",
        style("service:").dim(),
        instructions::label(session.service_type),
        style("started:").dim(),
        session.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    if messages.is_empty() {
        println!("  {}", style("(no messages yet)").dim());
        println!();
    }
    for message in &messages {
        print_message(message);
    }

    Ok(())
}

/// Send a message and print the reply.
pub async fn send_message(state: &AppState, id: &str, content: &str, json: bool) -> Result<()> {
    let session_id = parse_session_id(id)?;
    let exchange = state
        .chat_service
        .send_message(session_id, content)
        .await
        .map_err(|e| with_retry_hint(e, session_id))?;

    print_exchange(&exchange, json)
}

/// Re-run generation for an unanswered trailing user message.
pub async fn retry(state: &AppState, id: &str, json: bool) -> Result<()> {
    let session_id = parse_session_id(id)?;
    let exchange = state
        .chat_service
        .retry_last_exchange(session_id)
        .await
        .map_err(|e| with_retry_hint(e, session_id))?;

    print_exchange(&exchange, json)
}

pub async fn rename_session(state: &AppState, id: &str, title: &str, json: bool) -> Result<()> {
    let session_id = parse_session_id(id)?;
    let session = state.chat_service.rename_session(session_id, title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!(
            "  {} Session renamed to '{}'.",
            style("~").yellow().bold(),
            style(&session.title).cyan()
        );
    }
    Ok(())
}

/// Delete a session with confirmation.
///
/// # Examples
///
/// ```bash
/// counsel delete <session-id>
/// counsel delete <session-id> --force
/// ```
pub async fn delete_session(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let session_id = parse_session_id(id)?;
    let session = state
        .chat_service
        .get_session(&session_id)
        .await
        .with_context(|| format!("Session '{session_id}' not found"))?;

    if !force && !json {
        let message_count = state.chat_service.get_messages(&session_id).await?.len();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete session '{}' ({} messages)?",
                style(&session.title).red().bold(),
                message_count
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.chat_service.delete_session(session_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "session_id": session_id.to_string()})
        );
    } else {
        println!(
            "  {} Session '{}' deleted.",
            style("x").red().bold(),
            session.title
        );
    }

    Ok(())
}

// --- Formatting helpers ---

fn print_exchange(exchange: &Exchange, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(exchange)?);
        return Ok(());
    }
    println!();
    print_message(&exchange.assistant_message);
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let label = match message.role {
        MessageRole::User => style(role_label(message.role)).green().bold(),
        MessageRole::Assistant => style(role_label(message.role)).cyan().bold(),
    };
    println!("  {label} {}", style(message.created_at.format("%H:%M")).dim());
    for line in message.content.lines() {
        println!("  {line}");
    }
    println!();
}

fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Counselor",
    }
}

/// Generation failures leave the user turn unanswered; point at `retry`.
fn with_retry_hint(err: ChatError, session_id: Uuid) -> anyhow::Error {
    match err {
        ChatError::Generation(_) => anyhow::Error::new(err).context(format!(
            "no reply was saved; run `counsel retry {session_id}` to try again"
        )),
        other => anyhow::Error::new(other),
    }
}

/// Shorten to at most `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
