// ABOUTME: Status bar widget — renders model name, session id, token usage, and waiting indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Inputs for the status bar line.
pub struct StatusBarParams<'a> {
    pub model: &'a str,
    pub session_id: &'a str,
    pub total_tokens: u64,
    pub context_used: u64,
    pub waiting: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", params.model),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("session {} ", params.session_id),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!(
                "{} tokens ({} ctx) ",
                format_tokens(params.total_tokens),
                format_tokens(params.context_used)
            ),
            Style::default().fg(Color::White),
        ),
    ];

    if params.waiting {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            "waiting for reply... ",
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("| ctrl+l clear · esc quit ", dim));

    Line::from(spans)
}

/// Format a token count for display: small numbers as-is, thousands as X.Xk, millions as X.XM.
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}
