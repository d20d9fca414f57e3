//! Plain-text rendering of digest results for the terminal.

use std::fmt::Write;

use crate::core::models::DigestReport;
use crate::source::Conversation;

pub const NO_MESSAGES_TEXT: &str = "No messages found.";

const BULLET_MARKERS: [&str; 3] = ["- ", "* ", "• "];

/// Summary lines without blanks, `Summary...` headings, or bullet markers.
#[must_use]
pub fn clean_summary_lines(summary: &str) -> Vec<String> {
    summary
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Summary"))
        .map(|line| {
            BULLET_MARKERS
                .iter()
                .find_map(|marker| line.strip_prefix(marker))
                .unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render the whole report: header, one block per conversation, failure
/// notes, and a footer with the model name and elapsed time.
#[must_use]
pub fn render_report(report: &DigestReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "TG Digest");
    let _ = writeln!(
        out,
        "Found {} messages in {} chats",
        report.total_messages(),
        report.results.len()
    );
    out.push('\n');

    for result in &report.results {
        let _ = writeln!(
            out,
            "{} ({} messages)",
            result.conversation_name, result.message_count
        );
        let lines = clean_summary_lines(&result.summary_text);
        let last = lines.len().saturating_sub(1);
        for (index, line) in lines.iter().enumerate() {
            let branch = if index == last { "└──" } else { "├──" };
            let _ = writeln!(out, "{branch} {line}");
        }
        out.push('\n');
    }

    for failure in &report.failures {
        let _ = writeln!(
            out,
            "Skipped {}: {}",
            failure.conversation_name, failure.reason
        );
    }
    if !report.failures.is_empty() {
        out.push('\n');
    }

    if report.interrupted {
        let _ = writeln!(out, "Interrupted; showing completed conversations only.");
    }

    let _ = writeln!(
        out,
        "Summarized with {} in {:.1}s",
        report.model,
        report.elapsed.as_secs_f64()
    );
    out
}

/// One line per conversation, with the unread count when there is one.
#[must_use]
pub fn render_conversation_list(conversations: &[Conversation]) -> String {
    let mut out = String::from("Available chats:\n\n");
    for conversation in conversations {
        let unread = if conversation.unread_count > 0 {
            format!(" ({} unread)", conversation.unread_count)
        } else {
            String::new()
        };
        let _ = writeln!(out, "  {}{}", conversation.display_name(), unread);
    }
    out
}
