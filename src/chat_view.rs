use crate::chat_message;
use crate::constants::INPUT_PREFIX;
use crate::transcript::Transcript;
use crate::ui::footer::draw_footer;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn draw_chat(f: &mut Frame, input: &str, transcript: &mut Transcript) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_messages(f, transcript, chunks[0]);
    draw_input(f, input, chunks[1]);
    draw_footer(f, chunks[2]);
}

/// Lines are already wrapped to the pane width, so the paragraph only
/// scrolls; it must not wrap again or the scroll extent would drift.
fn draw_messages(f: &mut Frame, transcript: &mut Transcript, area: Rect) {
    transcript.set_viewport(area.width, area.height);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in transcript.messages() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(chat_message::render(message, area.width));
    }

    let msgs_para = Paragraph::new(lines).style(Style::default());
    f.render_widget(msgs_para.scroll((transcript.scroll(), 0)), area);
}

fn draw_input(f: &mut Frame, input: &str, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    let separator_style = Style::default().fg(Color::DarkGray);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(separator.clone(), separator_style))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let prefix_width = INPUT_PREFIX.width();
    let visible_width = (area.width as usize).saturating_sub(prefix_width + 1);
    let visible = visible_tail(input, visible_width);

    let line = Line::from(vec![
        Span::styled(INPUT_PREFIX, Style::default().fg(Color::DarkGray)),
        Span::styled(visible, Style::default().fg(Color::White)),
    ]);

    f.render_widget(
        Paragraph::new(line),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: 1,
        },
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(separator, separator_style))),
        Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        },
    );

    let offset = u16::try_from(prefix_width + visible.width()).unwrap_or(u16::MAX);
    let last_column = area.x.saturating_add(area.width.saturating_sub(1));
    let cursor_x = area.x.saturating_add(offset).min(last_column);
    f.set_cursor_position((cursor_x, area.y + 1));
}

/// The longest suffix of `input` that fits in `max_width` columns, so the
/// end being typed stays in view however long the input grows.
fn visible_tail(input: &str, max_width: usize) -> &str {
    let mut width = 0;
    let mut start = input.len();
    for (idx, c) in input.char_indices().rev() {
        width += c.width().unwrap_or(0);
        if width > max_width {
            break;
        }
        start = idx;
    }
    &input[start..]
}
