use alloy::primitives::{TxHash, U256};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::{ReadError, ReceiptSummary, WriteError};
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadState {
    Loading,
    Failed(ReadError),
    Ready {
        value: U256,
        fetched_at: DateTime<Utc>,
    },
}

/// Progress of the one write the panel allows at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxLifecycle {
    Idle,
    /// Waiting for the wallet to hand back a transaction hash.
    Sending,
    Submitted(TxHash),
    Confirming(TxHash),
    Confirmed(Box<ReceiptSummary>),
    Failed(WriteError),
}

impl TxLifecycle {
    pub fn is_outstanding(&self) -> bool {
        matches!(
            self,
            TxLifecycle::Sending | TxLifecycle::Submitted(_) | TxLifecycle::Confirming(_)
        )
    }

    /// Hash of the transaction this state refers to, once one exists.
    pub fn hash(&self) -> Option<TxHash> {
        match self {
            TxLifecycle::Submitted(hash) | TxLifecycle::Confirming(hash) => Some(*hash),
            TxLifecycle::Confirmed(receipt) => Some(receipt.hash),
            TxLifecycle::Failed(err) => err.tx_hash(),
            TxLifecycle::Idle | TxLifecycle::Sending => None,
        }
    }
}

/// Reads and writes the connected account's stored number.
///
/// All state changes go through the `on_*` handlers and [`NumberPanel::submit`],
/// which return the follow-up work (`RefreshNumber`, `SubmitNumber`) as events
/// rather than performing it.
pub struct NumberPanel {
    pub network_name: String,
    pub read: ReadState,
    pub tx: TxLifecycle,
    pub input: String,
    pub validation_error: Option<ValidationError>,
    pub editing: bool,
    refreshing: bool,
    /// Generation of the read whose result the panel is waiting for.
    read_generation: u64,
}

impl NumberPanel {
    /// A freshly mounted panel. The caller issues the initial read for
    /// `generation`, which must be newer than any read issued before.
    pub fn new(network_name: impl Into<String>, generation: u64) -> Self {
        Self {
            network_name: network_name.into(),
            read: ReadState::Loading,
            tx: TxLifecycle::Idle,
            input: String::new(),
            validation_error: None,
            editing: false,
            refreshing: false,
            read_generation: generation,
        }
    }

    pub fn read_generation(&self) -> u64 {
        self.read_generation
    }

    fn next_read(&mut self) -> AppEvent {
        self.read_generation += 1;
        AppEvent::RefreshNumber(self.read_generation)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.read, ReadState::Ready { .. })
    }

    pub fn value(&self) -> Option<U256> {
        match self.read {
            ReadState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Writes are only allowed on top of a settled read, one at a time.
    pub fn can_submit(&self) -> bool {
        self.is_ready() && !self.refreshing && !self.tx.is_outstanding()
    }

    /// Validate the pending input and, if it passes, start a write.
    pub fn submit(&mut self) -> Option<AppEvent> {
        if !self.can_submit() {
            return None;
        }
        match validation::validate(&self.input) {
            Ok(value) => {
                self.validation_error = None;
                self.tx = TxLifecycle::Sending;
                Some(AppEvent::SubmitNumber(value))
            }
            Err(e) => {
                self.validation_error = Some(e);
                None
            }
        }
    }

    /// Re-read the stored number on request. Refused while a write is in flight.
    pub fn refresh(&mut self) -> Option<AppEvent> {
        if self.tx.is_outstanding() {
            return None;
        }
        match self.read {
            ReadState::Ready { .. } => self.refreshing = true,
            ReadState::Failed(_) => self.read = ReadState::Loading,
            ReadState::Loading => return None,
        }
        Some(self.next_read())
    }

    /// Apply a read result. Results for any read but the latest are dropped.
    pub fn on_number_loaded(&mut self, generation: u64, value: U256, fetched_at: DateTime<Utc>) {
        if generation != self.read_generation {
            return;
        }
        self.refreshing = false;
        self.read = ReadState::Ready { value, fetched_at };
    }

    pub fn on_read_failed(&mut self, generation: u64, error: ReadError) {
        if generation != self.read_generation {
            return;
        }
        self.refreshing = false;
        self.editing = false;
        self.read = ReadState::Failed(error);
    }

    pub fn on_tx_submitted(&mut self, hash: TxHash) {
        if self.tx == TxLifecycle::Sending {
            self.tx = TxLifecycle::Submitted(hash);
        }
    }

    pub fn on_tx_confirming(&mut self, hash: TxHash) {
        if self.tx == TxLifecycle::Submitted(hash) {
            self.tx = TxLifecycle::Confirming(hash);
        }
    }

    /// Record a confirmation: clear the input and ask for the fresh value.
    pub fn on_tx_confirmed(&mut self, receipt: ReceiptSummary) -> Option<AppEvent> {
        let matches_outstanding = matches!(
            self.tx,
            TxLifecycle::Submitted(hash) | TxLifecycle::Confirming(hash) if hash == receipt.hash
        );
        if !matches_outstanding {
            return None;
        }
        self.tx = TxLifecycle::Confirmed(Box::new(receipt));
        self.input.clear();
        self.refreshing = true;
        Some(self.next_read())
    }

    /// Record a failed write. The input is kept so the user can resubmit.
    pub fn on_tx_failed(&mut self, error: WriteError) {
        let matches_outstanding = match (error.tx_hash(), &self.tx) {
            (None, TxLifecycle::Sending) => true,
            (Some(hash), state) if state.is_outstanding() => state.hash() == Some(hash),
            _ => false,
        };
        if matches_outstanding {
            self.tx = TxLifecycle::Failed(error);
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Enter => {
                self.editing = false;
                self.submit()
            }
            KeyCode::Esc => {
                self.editing = false;
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn submit_label(&self) -> &'static str {
        if self.tx.is_outstanding() {
            " Processing... "
        } else {
            " [Enter] Submit to Blockchain "
        }
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(hash) = self.tx.hash() {
            lines.push(Line::from(vec![
                Span::styled("  Transaction sent! ", THEME.info_style().add_modifier(Modifier::BOLD)),
                Span::styled(format!("Hash: {hash}"), THEME.hash_style()),
            ]));
        }

        match &self.tx {
            TxLifecycle::Sending => lines.push(Line::from(Span::styled(
                "  Waiting for the wallet to submit the transaction...",
                THEME.muted_style(),
            ))),
            TxLifecycle::Confirming(_) => lines.push(Line::from(Span::styled(
                "  Waiting for blockchain confirmation... This may take a few seconds.",
                THEME.muted_style(),
            ))),
            TxLifecycle::Confirmed(receipt) => {
                lines.push(Line::from(Span::styled(
                    "  \u{2714} Transaction confirmed! Your number has been updated on the blockchain.",
                    THEME.success_style(),
                )));
                let block = receipt
                    .block_number
                    .map(|n| format!("block #{}, ", utils::format_number(n)))
                    .unwrap_or_default();
                let gas = utils::format_number(receipt.gas_used);
                lines.push(Line::from(Span::styled(
                    format!("    Included in {block}gas used {gas}"),
                    THEME.muted_style(),
                )));
                if let Some(change) = receipt.change {
                    lines.push(Line::from(vec![
                        Span::styled("    NumberChanged by ", THEME.muted_style()),
                        Span::styled(utils::truncate_address(&change.by), THEME.address_style()),
                        Span::styled(" to ", THEME.muted_style()),
                        Span::styled(change.number.to_string(), THEME.number_style()),
                    ]));
                }
            }
            TxLifecycle::Failed(err) => {
                lines.push(Line::from(Span::styled(
                    "  Transaction failed",
                    THEME.error_style().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(format!("    {err}"), THEME.error_style())));
            }
            TxLifecycle::Idle | TxLifecycle::Submitted(_) => {}
        }

        if let Some(err) = self.validation_error {
            lines.push(Line::from(Span::styled(format!("  {err}"), THEME.error_style())));
        }

        lines
    }

    fn render_centered(&self, frame: &mut Frame, area: Rect, text: Paragraph) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(area);
        frame.render_widget(text, chunks[1]);
    }
}

impl Component for NumberPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            return self.handle_editing_key(key);
        }

        match key.code {
            KeyCode::Char('i') | KeyCode::Char('e') | KeyCode::Enter if self.is_ready() => {
                self.editing = true;
                None
            }
            KeyCode::Char('r') => self.refresh(),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (value, fetched_at) = match &self.read {
            ReadState::Loading => {
                let loading = Paragraph::new("Loading your stored number...")
                    .style(THEME.muted_style())
                    .alignment(Alignment::Center);
                self.render_centered(frame, area, loading);
                return;
            }
            ReadState::Failed(err) => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Unable to read from smart contract.",
                        THEME.error_style().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!(
                            "Make sure you are connected to the correct network ({}).",
                            self.network_name
                        ),
                        THEME.error_style(),
                    )),
                    Line::from(Span::styled(err.to_string(), THEME.muted_style())),
                    Line::from(""),
                    Line::from(Span::styled("[r] Retry", THEME.accent_style())),
                ];
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(THEME.error_style());
                let error = Paragraph::new(lines)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                self.render_centered(frame, area, error);
                return;
            }
            ReadState::Ready { value, fetched_at } => (*value, *fetched_at),
        };

        let status = self.status_lines();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(status.len() as u16 + 6),
                Constraint::Min(0),
            ])
            .split(area);

        // -- Stored number --
        let updated = if self.refreshing {
            "refreshing...".to_string()
        } else {
            format!("updated {}", utils::format_time_ago(fetched_at, Utc::now()))
        };
        let number_block = Block::default()
            .title(" Stored Number ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let number = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("  Your stored number: ", Style::default().fg(THEME.text)),
                Span::styled(value.to_string(), THEME.number_style()),
            ]),
            Line::from(Span::styled(format!("  {updated}"), THEME.muted_style())),
        ])
        .block(number_block);
        frame.render_widget(number, chunks[0]);

        // -- Update form --
        let form_block = Block::default()
            .title(" Update your number ")
            .borders(Borders::ALL)
            .border_style(if self.editing {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            });
        let form_inner = form_block.inner(chunks[1]);
        frame.render_widget(form_block, chunks[1]);

        let mut lines = status;
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        let input = if self.input.is_empty() && !self.editing {
            Span::styled("Enter a whole number (e.g., 42)...", THEME.muted_style())
        } else {
            let cursor = if self.editing { "_" } else { "" };
            Span::styled(
                format!("{}{cursor}", self.input),
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(vec![Span::styled("  Number: ", THEME.muted_style()), input]));
        lines.push(Line::from(""));

        let button_style = if self.can_submit() {
            THEME.button_style()
        } else {
            THEME.muted_style()
        };
        let hint = if self.editing {
            "  [Esc] Stop editing"
        } else {
            "  [i] Edit  [r] Refresh"
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(self.submit_label(), button_style),
            Span::styled(hint, THEME.muted_style()),
        ]));

        frame.render_widget(Paragraph::new(lines), form_inner);
    }
}
