// ABOUTME: Main TUI rendering function — assembles header, chat, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::TuiState;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};

pub const TITLE: &str = " 🤖 LLAMA Chatbot";
pub const INTRO: &str = "Ask me anything (type something below 👇)";
pub const PLACEHOLDER: &str = "Ask your question here...";

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header + intro
            Constraint::Min(3),    // Chat area
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Header
    let header = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", INTRO),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Chat area
    let chat_lines = render_chat_lines(&state.messages());

    let chat_chunk = chunks[1];
    let visible_height = chat_chunk.height;

    // ratatui's own line_count() matches its wrapping exactly, so the bottom
    // of the transcript is never hidden.
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });
    let total_lines = saturating_rows(chat_paragraph.line_count(chat_chunk.width));
    let max_scroll = total_lines.saturating_sub(visible_height);

    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input area
    let input_chunk = chunks[2];
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if state.waiting {
        input_block = input_block.title(Span::styled(
            " waiting for reply... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input_line = if state.input.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.input.clone())
    };

    // Keep the cursor visible by scrolling the single input line horizontally.
    state.clamp_cursor();
    let prefix: String = state.input.chars().take(state.cursor_pos).collect();
    let visual_col = UnicodeWidthStr::width(prefix.as_str()) as u16;
    let max_visual_col = input_chunk.width.saturating_sub(1);
    let h_scroll = visual_col.saturating_sub(max_visual_col);

    let input = Paragraph::new(input_line)
        .block(input_block)
        .scroll((0, h_scroll));
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.saturating_sub(h_scroll));
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        model: &state.model,
        session_id: &state.session_id,
        total_tokens: state.total_tokens,
        context_used: state.context_used,
        waiting: state.waiting,
    });
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

/// Clamp a wrapped line count to the u16 range ratatui scrolls in.
fn saturating_rows(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}
