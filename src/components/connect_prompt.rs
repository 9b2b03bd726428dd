use alloy::signers::local::PrivateKeySigner;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;

/// Call to action shown while no wallet is connected. Collects a private key
/// and reports connection progress.
pub struct ConnectPrompt {
    pub rpc_url: String,
    pub active: bool,
    pub connecting: bool,
    pub error: Option<String>,
    key_input: String,
}

impl ConnectPrompt {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            active: false,
            connecting: false,
            error: None,
            key_input: String::new(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.key_input.clear();
        self.error = None;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.key_input.clear();
    }

    /// Connection is underway, started from here or from the command line.
    pub fn on_connecting(&mut self) {
        self.connecting = true;
        self.error = None;
    }

    pub fn on_wallet_error(&mut self, message: String) {
        self.connecting = false;
        self.error = Some(message);
    }

    /// Back to the initial call to action.
    pub fn reset(&mut self) {
        self.deactivate();
        self.connecting = false;
        self.error = None;
    }

    fn submit_key(&mut self) -> Option<AppEvent> {
        let key = self.key_input.trim().to_string();
        self.key_input.clear();
        match key.parse::<PrivateKeySigner>() {
            Ok(signer) => {
                self.active = false;
                self.on_connecting();
                Some(AppEvent::ConnectWallet(Box::new(signer)))
            }
            Err(_) => {
                self.error = Some("Invalid private key (expected 32 bytes of hex)".to_string());
                None
            }
        }
    }
}

impl Component for ConnectPrompt {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if !self.active {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Enter if !self.connecting => {
                    self.activate();
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => self.submit_key(),
            KeyCode::Esc => {
                self.deactivate();
                None
            }
            KeyCode::Backspace => {
                self.key_input.pop();
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.key_input.clear();
                None
            }
            KeyCode::Char(c) => {
                self.key_input.push(c);
                self.error = None;
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(72);
        let height = 11.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup_area = Rect::new(x, y, width, height);

        let block = Block::default()
            .title(" Connect Wallet ")
            .borders(Borders::ALL)
            .border_style(if self.active {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            })
            .style(Style::default().bg(THEME.surface));

        let mut lines = vec![
            Line::from(Span::styled(
                "Please connect your wallet to use this DApp.",
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if self.connecting {
            lines.push(Line::from(Span::styled(
                format!("Connecting to {}...", self.rpc_url),
                THEME.accent_style(),
            )));
        } else if self.active {
            let masked = "*".repeat(self.key_input.chars().count());
            lines.push(Line::from(vec![
                Span::styled("Private key: ", THEME.muted_style()),
                Span::styled(format!("{masked}_"), Style::default().fg(THEME.text)),
            ]));
            lines.push(Line::from(Span::styled(
                "[Enter] Connect  [Esc] Cancel",
                THEME.muted_style(),
            )));
        } else {
            lines.push(Line::from(vec![
                Span::styled("[c] ", THEME.accent_style()),
                Span::styled("Connect with a private key", Style::default().fg(THEME.text)),
            ]));
            lines.push(Line::from(Span::styled(
                "Or start with --private-key / PRIVATE_KEY to connect automatically.",
                THEME.muted_style(),
            )));
        }

        if let Some(ref err) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(err.clone(), THEME.error_style())));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
