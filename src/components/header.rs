use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::chains;
use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub network_name: String,
    pub chain_id: Option<u64>,
    pub account: Option<Address>,
}

impl Header {
    pub fn new(network_name: impl Into<String>) -> Self {
        Self {
            network_name: network_name.into(),
            chain_id: None,
            account: None,
        }
    }

    fn display_chain_name(&self) -> String {
        match self.chain_id {
            Some(id) => chains::chain_name(id),
            None => self.network_name.clone(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(0)])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " SimpleStorage ",
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "DApp",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        // Right: network and connected account, like a wallet connect button
        let account = match self.account {
            Some(addr) => Span::styled(utils::truncate_address(&addr), THEME.address_style()),
            None => Span::styled("Not connected", THEME.muted_style()),
        };
        let network_info = Line::from(vec![
            Span::styled(self.display_chain_name(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            account,
            Span::raw(" "),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[1]);
    }
}
