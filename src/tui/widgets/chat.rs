// ABOUTME: Chat widget — renders chat messages into styled ratatui Lines.
// ABOUTME: User, assistant, pending, and notice entries each have distinct visual styling.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{ChatMessage, ChatMessageKind};

/// Render a slice of chat messages into styled Lines for display.
pub fn render_chat_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        match &msg.kind {
            ChatMessageKind::User => {
                push_prefixed(&mut lines, "❯ ", Color::Green, &msg.content, Style::default());
            }
            ChatMessageKind::Pending => {
                let dim = Style::default().fg(Color::DarkGray);
                push_prefixed(&mut lines, "❯ ", Color::Green, &msg.content, dim);
                lines.push(Line::from(Span::styled(
                    "⏺ thinking…",
                    dim.add_modifier(Modifier::ITALIC),
                )));
            }
            ChatMessageKind::Assistant => {
                push_prefixed(&mut lines, "⏺ ", Color::Cyan, &msg.content, Style::default());
            }
            ChatMessageKind::Notice { is_error } => {
                let style = if *is_error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC)
                };
                for text in msg.content.split('\n') {
                    lines.push(Line::from(Span::styled(text.to_string(), style)));
                }
            }
        }
    }

    lines
}

/// First line gets the bold coloured prefix, continuation lines are indented to match.
fn push_prefixed(
    lines: &mut Vec<Line<'static>>,
    prefix: &'static str,
    color: Color,
    content: &str,
    body: Style,
) {
    for (i, text) in content.split('\n').enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(
                    prefix,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(text.to_string(), body),
            ]));
        } else {
            lines.push(Line::from(Span::styled(format!("  {}", text), body)));
        }
    }
}
