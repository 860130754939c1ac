use crate::constants::PAGE_SCROLL_LINES;
use crate::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub async fn handle_chat_input(key: KeyEvent, app: &mut App) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Enter => app.submit().await,
        KeyCode::PageUp => app.scroll_up(PAGE_SCROLL_LINES).await,
        KeyCode::PageDown => app.scroll_down(PAGE_SCROLL_LINES).await,
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.should_quit = true,
                    'u' => app.scroll_up(PAGE_SCROLL_LINES).await,
                    'd' => app.scroll_down(PAGE_SCROLL_LINES).await,
                    _ => {}
                }
            } else {
                app.input.push(c);
            }
        }
        _ => {}
    }
}
