use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;

use crate::core::command::{parse_command, Command, PRACTICE_HELP};
use crate::core::renderer;
use crate::practice::api::PracticeApi;
use crate::practice::session::PracticeSession;

/// Single-player loop. Requests block; the network round trip is the only
/// suspend point, and the guess control is drawn disabled while it lasts.
pub fn run<A: PracticeApi>(mut session: PracticeSession<A>, mut terminal: DefaultTerminal) -> Result<()> {
    session.view_mut().message = "Starting a new game...".into();
    terminal.draw(|f| renderer::draw_practice(f, session.view()))?;
    session.start_game();

    loop {
        terminal.draw(|f| renderer::draw_practice(f, session.view()))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => break,
            KeyCode::Backspace => {
                session.view_mut().input.pop();
            }
            KeyCode::Char(c) => session.view_mut().input.push(c),
            KeyCode::Enter => {
                let line = session.view().input.clone();
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::New) => {
                        session.view_mut().input.clear();
                        session.view_mut().message = "Starting a new game...".into();
                        terminal.draw(|f| renderer::draw_practice(f, session.view()))?;
                        session.start_game();
                    }
                    Ok(Command::Guess(guess)) => {
                        if let Some(code) = session.prepare_guess(&guess) {
                            terminal.draw(|f| renderer::draw_practice(f, session.view()))?;
                            session.complete_guess(&code);
                        }
                    }
                    Ok(Command::Help) => {
                        session.view_mut().input.clear();
                        session.view_mut().message = PRACTICE_HELP.into();
                    }
                    Ok(_) => session.view_mut().message = format!("Not available in practice mode. {PRACTICE_HELP}"),
                    Err(message) => session.view_mut().message = message,
                }
            }
            _ => {}
        }
    }

    info!("leaving practice client");
    Ok(())
}
