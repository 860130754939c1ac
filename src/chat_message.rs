use crate::constants::{BOT_LABEL, USER_LABEL};
use crate::message::Message;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

const USER_INDENT: &str = "  ";
const GUTTER: &str = "│ ";

/// Turns one message into fully wrapped terminal lines. The transcript pane
/// renders these without further wrapping, so `render(..).len()` is the
/// exact height the message occupies.
pub fn render(message: &Message, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let style = base_style(message);
    let indent = indent(message);

    render_header(&mut lines, message, style, indent);
    render_content(&mut lines, message, width, style, indent);
    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╰─".to_string(), style),
    ]));

    lines
}

pub fn line_count(message: &Message, width: u16) -> usize {
    render(message, width).len()
}

fn indent(message: &Message) -> &'static str {
    if message.is_from_user() {
        USER_INDENT
    } else {
        ""
    }
}

fn base_style(message: &Message) -> Style {
    Style::default().fg(if message.is_from_user() {
        Color::Rgb(255, 223, 128)
    } else {
        Color::Rgb(144, 238, 144)
    })
}

fn render_header(lines: &mut Vec<Line<'static>>, message: &Message, style: Style, indent: &str) {
    let label = if message.is_from_user() {
        USER_LABEL
    } else {
        BOT_LABEL
    };
    let timestamp = message.timestamp().format("%H:%M").to_string();

    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("┌─".to_string(), style),
        Span::styled(label.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(" ".to_string(), style),
        Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
    ]));
}

fn render_content(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    width: u16,
    style: Style,
    indent: &str,
) {
    let mut in_code_block = false;
    let mut code_buffer = String::new();
    let mut text_buffer = String::new();

    for line in message.text().lines() {
        if line.trim().starts_with("```") {
            flush_text_buffer(lines, &text_buffer, width, style, indent);
            flush_code_buffer(lines, &code_buffer, width, style, indent);
            text_buffer.clear();
            code_buffer.clear();
            in_code_block = !in_code_block;
            continue;
        }

        let buffer = if in_code_block {
            &mut code_buffer
        } else {
            &mut text_buffer
        };
        buffer.push_str(line);
        buffer.push('\n');
    }

    flush_text_buffer(lines, &text_buffer, width, style, indent);
    flush_code_buffer(lines, &code_buffer, width, style, indent);
}

fn wrap_width(width: u16, indent: &str, extra: usize) -> usize {
    (width as usize)
        .saturating_sub(indent.len() + GUTTER.chars().count() + extra)
        .max(1)
}

fn flush_text_buffer(
    lines: &mut Vec<Line<'static>>,
    buffer: &str,
    width: u16,
    style: Style,
    indent: &str,
) {
    if buffer.is_empty() {
        return;
    }

    for paragraph in buffer.lines() {
        // keep blank lines inside a reply instead of letting wrap() drop them
        let wrapped = if paragraph.is_empty() {
            vec![String::new()]
        } else {
            wrap(paragraph, wrap_width(width, indent, 0))
                .into_iter()
                .map(|l| l.into_owned())
                .collect()
        };

        for wrapped_line in wrapped {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled(GUTTER.to_string(), style),
                Span::styled(wrapped_line, style),
            ]));
        }
    }
}

fn flush_code_buffer(
    lines: &mut Vec<Line<'static>>,
    buffer: &str,
    width: u16,
    style: Style,
    indent: &str,
) {
    if buffer.is_empty() {
        return;
    }

    let code_style = Style::default()
        .fg(Color::Rgb(209, 154, 102))
        .add_modifier(Modifier::BOLD);

    for code_line in buffer.lines() {
        let wrapped = if code_line.is_empty() {
            vec![String::new()]
        } else {
            wrap(code_line, wrap_width(width, indent, 2))
                .into_iter()
                .map(|l| l.into_owned())
                .collect()
        };

        for piece in wrapped {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled(GUTTER.to_string(), style),
                Span::styled("▎".to_string(), Style::default().fg(Color::DarkGray)),
                Span::styled(format!(" {}", piece), code_style),
            ]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_short_message_has_header_body_footer() {
        let lines = render(&Message::bot("Hello!"), 40);
        assert_eq!(lines.len(), 3);
        assert!(plain(&lines[0]).contains(BOT_LABEL));
        assert!(plain(&lines[1]).ends_with("Hello!"));
    }

    #[test]
    fn test_long_message_wraps_within_width() {
        let text = "Xin lỗi, đã có lỗi xảy ra. Vui lòng thử lại. ".repeat(6);
        let msg = Message::user(text);
        let lines = render(&msg, 30);
        assert!(lines.len() > 3);
        for line in &lines[1..lines.len() - 1] {
            assert!(plain(line).width() <= 30, "too wide: {:?}", plain(line));
        }
    }

    #[test]
    fn test_code_block_fences_are_not_rendered() {
        let msg = Message::bot("before\n```\nlet x = 1;\n```\nafter");
        let rendered: Vec<String> = render(&msg, 60).iter().map(plain).collect();
        assert!(rendered.iter().all(|l| !l.contains("```")));
        assert!(rendered.iter().any(|l| l.contains("let x = 1;")));
        assert_eq!(line_count(&msg, 60), 5);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let msg = Message::bot("a\n\nb");
        assert_eq!(line_count(&msg, 40), 5);
    }
}
