//! Display Helpers
//!
//! Terminal output formatting and styling.

use console::style;
use zerotrace_core::{short_hash, Message, StateRoot, StateStatus, Thread};

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Formats seconds since the epoch as `HH:MM:SS` (UTC).
pub fn clock_time(timestamp_secs: u64) -> String {
    let day_secs = timestamp_secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}

/// Renders the conversation list, newest first.
pub fn render_conversations(threads: &[Thread]) -> String {
    if threads.is_empty() {
        return format!("{}\n", style("No conversations yet").dim());
    }

    let mut out = format!("Conversations ({}):\n", threads.len());
    for thread in threads {
        let preview = if thread.is_placeholder() {
            style("(no messages)".to_string()).dim()
        } else {
            style(thread.last_message.clone())
        };
        out.push_str(&format!(
            "  {}  {}  {}\n",
            style(short_hash(&thread.recipient_hash)).cyan(),
            clock_time(thread.timestamp / 1000),
            preview
        ));
    }
    out
}

/// Renders a thread's message history, oldest first.
pub fn render_messages(messages: &[Message], own_hash: Option<&str>) -> String {
    if messages.is_empty() {
        return format!("{}\n", style("No messages yet. Say hello!").dim());
    }

    let mut out = String::new();
    for message in messages {
        let sender = if Some(message.sender.as_str()) == own_hash {
            style("you".to_string()).green().bold()
        } else {
            style(short_hash(&message.sender)).cyan()
        };
        let proof = if message.proof_present {
            style(" ✓").green()
        } else {
            style("").dim()
        };
        out.push_str(&format!(
            "[{}] {}: {}{}\n",
            clock_time(message.timestamp),
            sender,
            message.text,
            proof
        ));
    }
    out
}

/// Renders a state root query result.
pub fn render_state_root(root: &StateRoot) -> String {
    let status = match root.status() {
        StateStatus::Initialized => style("Initialized").yellow(),
        StateStatus::Active => style("Active").green(),
    };
    format!(
        "State root: {}\nStatus:     {}\nThreads:    {}\n",
        root.cstate_root, status, root.thread_count
    )
}
