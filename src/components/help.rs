use alloy::primitives::Address;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::contract;
use crate::theme::THEME;

pub struct HelpOverlay {
    pub visible: bool,
    contract: Address,
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(THEME.text_accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn shortcut<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {keys:<9}"), Style::default().fg(THEME.text_accent)),
        Span::styled(action, Style::default().fg(THEME.text)),
    ])
}

impl HelpOverlay {
    pub fn new(contract: Address) -> Self {
        Self {
            visible: false,
            contract,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 70 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let mut help_text = vec![
            section("Wallet"),
            shortcut("c", "Connect with a private key"),
            shortcut("d", "Disconnect"),
            Line::from(""),
            section("Stored number"),
            shortcut("i / e", "Edit the number to submit"),
            shortcut("Enter", "Start editing / Submit to blockchain"),
            shortcut("Esc", "Stop editing"),
            shortcut("Ctrl+U", "Clear input"),
            shortcut("r", "Read the stored number again"),
            Line::from(""),
            section("Other"),
            shortcut("?", "Toggle this help"),
            shortcut("q", "Quit"),
            Line::from(""),
            section("Contract"),
            Line::from(Span::styled(format!("  {}", self.contract), THEME.address_style())),
        ];
        help_text.extend(
            contract::interface_signatures()
                .into_iter()
                .map(|sig| Line::from(Span::styled(format!("  {sig}"), THEME.muted_style()))),
        );

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
