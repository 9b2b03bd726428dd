use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::connect_prompt::ConnectPrompt;
use crate::components::gate::ConnectionGate;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::number_panel::NumberPanel;
use crate::components::status_bar::StatusBar;
use crate::data::DataService;
use crate::events::AppEvent;
use crate::theme::THEME;

pub struct App {
    gate: ConnectionGate,

    // Components
    header: Header,
    prompt: ConnectPrompt,
    panel: Option<NumberPanel>,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Data
    data_service: Arc<DataService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    /// Generation for the next mounted panel's first read.
    next_read_generation: u64,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn with_service(
        data_service: Arc<DataService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
    ) -> Self {
        let settings = data_service.settings();
        let header = Header::new(settings.network.name.clone());
        let prompt = ConnectPrompt::new(settings.network.rpc_url.clone());
        let help = HelpOverlay::new(settings.contract);
        Self {
            gate: ConnectionGate::default(),
            header,
            prompt,
            panel: None,
            status_bar: StatusBar::new(),
            help,
            data_service,
            event_rx,
            next_read_generation: 0,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Fill background
        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | content (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);

        let content = chunks[1].inner(Margin::new(2, 1));
        match (self.gate.is_connected(), self.panel.as_mut()) {
            (true, Some(panel)) => panel.render(frame, content),
            _ => self.prompt.render(frame, content),
        }

        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
    }

    /// Drop the current panel, keeping its read generations retired.
    fn unmount_panel(&mut self) {
        if let Some(panel) = self.panel.take() {
            self.next_read_generation = panel.read_generation() + 1;
        }
    }

    fn panel_outstanding(&self) -> bool {
        self.panel.as_ref().is_some_and(|p| p.tx.is_outstanding())
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Help overlay consumes all keys when visible
            if self.help.handle_key(key) {
                return;
            }

            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.should_quit = true;
                return;
            }

            // Text inputs consume keys while focused
            let editing = if self.gate.is_connected() {
                self.panel.as_ref().is_some_and(|p| p.editing)
            } else {
                self.prompt.active
            };

            if !editing {
                match key.code {
                    KeyCode::Char('q') => {
                        self.should_quit = true;
                        return;
                    }
                    KeyCode::Char('?') => {
                        self.help.toggle();
                        return;
                    }
                    KeyCode::Char('d') if self.gate.is_connected() => {
                        self.handle_app_event(AppEvent::DisconnectWallet);
                        return;
                    }
                    _ => {}
                }
            }

            let app_event = if self.gate.is_connected() {
                self.panel.as_mut().and_then(|p| p.handle_key(key))
            } else {
                self.prompt.handle_key(key)
            };

            if let Some(event) = app_event {
                self.handle_app_event(event);
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        if self.gate.apply(&event) {
            self.status_bar.error_message = None;
        }

        match event {
            AppEvent::ConnectWallet(signer) => {
                self.status_bar.loading = true;
                self.status_bar.error_message = None;
                self.prompt.on_connecting();
                self.data_service.connect_wallet(*signer);
            }
            AppEvent::DisconnectWallet => {
                if self.panel_outstanding() {
                    self.status_bar.error_message = Some(
                        "A transaction is in progress; wait for it to resolve before disconnecting"
                            .to_string(),
                    );
                } else {
                    self.data_service.disconnect_wallet();
                }
            }
            AppEvent::WalletConnected { chain_id, .. } => {
                self.header.account = self.gate.account();
                self.header.chain_id = Some(chain_id);
                self.status_bar.connected = true;
                self.status_bar.chain_id = Some(chain_id);
                self.status_bar.loading = false;
                self.prompt.reset();

                // Mount a fresh panel and issue its initial read
                self.unmount_panel();
                let network = self.data_service.settings().network.name.clone();
                let generation = self.next_read_generation;
                self.panel = Some(NumberPanel::new(network, generation));
                self.data_service.fetch_number(generation);
            }
            AppEvent::WalletDisconnected => {
                self.header.account = None;
                self.header.chain_id = None;
                self.status_bar.connected = false;
                self.status_bar.chain_id = None;
                self.unmount_panel();
            }
            AppEvent::WalletError(msg) => {
                self.status_bar.loading = false;
                self.prompt.on_wallet_error(msg);
            }
            AppEvent::RefreshNumber(generation) => {
                if self.panel.is_some() {
                    self.data_service.fetch_number(generation);
                }
            }
            AppEvent::NumberLoaded { generation, value } => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.on_number_loaded(generation, value, Utc::now());
                }
            }
            AppEvent::ReadFailed { generation, error } => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.on_read_failed(generation, error);
                }
            }
            AppEvent::SubmitNumber(value) => {
                if self.panel.is_some() {
                    self.data_service.submit_number(value);
                }
            }
            AppEvent::TxSubmitted(hash) => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.on_tx_submitted(hash);
                }
            }
            AppEvent::TxConfirming(hash) => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.on_tx_confirming(hash);
                }
            }
            AppEvent::TxConfirmed(receipt) => {
                let follow_up = self
                    .panel
                    .as_mut()
                    .and_then(|panel| panel.on_tx_confirmed(*receipt));
                if let Some(event) = follow_up {
                    self.handle_app_event(event);
                }
            }
            AppEvent::TxFailed(err) => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.on_tx_failed(err);
                }
            }
            AppEvent::Error(msg) => {
                self.status_bar.error_message = Some(msg);
                self.status_bar.loading = false;
            }
        }
    }
}
