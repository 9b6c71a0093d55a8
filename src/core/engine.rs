use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::info;

use crate::client::websocket_client::{self, Connection};
use crate::core::command::parse_command;
use crate::core::controller::{Action, GameController};
use crate::core::renderer;
use crate::core::websocket::Envelope;

/// Realtime two-player loop: draw, poll keys, apply inbound envelopes.
pub struct Engine {
    url: String,
    controller: GameController,
    connection: Option<Connection>,
}

impl Engine {
    pub fn new(url: String) -> Self {
        Self { url, controller: GameController::new(), connection: None }
    }

    async fn connect(&mut self, inbound_tx: &mpsc::UnboundedSender<Envelope>) {
        // the previous connection (if any) is torn down before the new one opens
        self.connection = None;
        let epoch = self.controller.epoch();
        match websocket_client::connect(&self.url, epoch, inbound_tx.clone()).await {
            Ok(conn) => {
                self.controller.attach(epoch, conn.outbox());
                self.connection = Some(conn);
            }
            Err(e) => self.controller.connect_failed(&format!("{e:#}")),
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel::<Envelope>();
        let mut rng = rand::rng();

        terminal.draw(|f| renderer::draw_realtime(f, self.controller.view()))?;
        self.connect(&inbound_tx).await;

        loop {
            terminal.draw(|f| renderer::draw_realtime(f, self.controller.view()))?;

            // INPUT (non-blocking)
            let mut action = Action::None;
            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Esc => action = Action::Quit,
                            KeyCode::Enter => {
                                let line = self.controller.view().input.clone();
                                match parse_command(&line) {
                                    Ok(command) => action = self.controller.execute(command, &mut rng),
                                    Err(message) => self.controller.view_mut().set_message(message),
                                }
                            }
                            KeyCode::Backspace => {
                                self.controller.view_mut().input.pop();
                            }
                            KeyCode::Char(c) => self.controller.view_mut().input.push(c),
                            _ => {}
                        }
                    }
                }
            }

            match action {
                Action::Quit => break,
                Action::Connect => {
                    terminal.draw(|f| renderer::draw_realtime(f, self.controller.view()))?;
                    self.connect(&inbound_tx).await;
                    continue;
                }
                Action::None => {}
            }

            // RECEIVE: in arrival order, one at a time
            tokio::select! {
                Some(envelope) = inbound_rx.recv() => {
                    self.controller.handle(envelope);
                }
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }
        }

        info!("leaving realtime client");
        Ok(())
    }
}
