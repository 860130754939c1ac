// src/ui.rs

pub mod footer;

use crate::{
    chat_view::draw_chat, constants::TICK_RATE_MS, errors::ChatResult,
    key_handlers::handle_chat_input, App,
};
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc;

/// Events the draw loop reacts to.
enum Event {
    Input(CEvent),
    /// Redraw so replies that landed in the background show up.
    Tick,
}

/// Runs the terminal UI until the user quits. The terminal is restored even
/// when the loop fails.
pub async fn run_ui(app: &mut App) -> ChatResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = res {
        log::error!("UI loop failed: {}", e);
    }
    res
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> ChatResult<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // crossterm's poll/read block, so they get their own thread.
    tokio::task::spawn_blocking(move || {
        let tick_rate = Duration::from_millis(TICK_RATE_MS);
        loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(event) => Event::Input(event),
                    Err(e) => {
                        log::error!("Failed to read terminal event: {}", e);
                        return;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    log::error!("Failed to poll terminal events: {}", e);
                    return;
                }
            };
            if tx.blocking_send(event).is_err() {
                return;
            }
        }
    });

    loop {
        {
            let transcript = app.controller.transcript();
            let mut transcript = transcript.lock().await;
            let input = app.input.as_str();
            terminal.draw(|f| draw_chat(f, input, &mut transcript))?;
        }

        match rx.recv().await {
            Some(Event::Input(CEvent::Key(key))) => handle_chat_input(key, app).await,
            Some(Event::Input(_)) | Some(Event::Tick) => {}
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
