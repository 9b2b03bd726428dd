use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct StatusBar {
    pub connected: bool,
    pub chain_id: Option<u64>,
    pub error_message: Option<String>,
    pub loading: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            connected: false,
            chain_id: None,
            error_message: None,
            loading: false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(32)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if self.loading {
            Line::from(Span::styled(
                " Loading...",
                Style::default().fg(THEME.text_accent),
            ))
        } else {
            let mut hints = Vec::new();
            if self.connected {
                hints.extend([
                    Span::styled(" i", Style::default().fg(THEME.text_accent)),
                    Span::styled(":Edit  ", Style::default().fg(THEME.text_muted)),
                    Span::styled("Enter", Style::default().fg(THEME.text_accent)),
                    Span::styled(":Submit  ", Style::default().fg(THEME.text_muted)),
                    Span::styled("r", Style::default().fg(THEME.text_accent)),
                    Span::styled(":Refresh  ", Style::default().fg(THEME.text_muted)),
                    Span::styled("d", Style::default().fg(THEME.text_accent)),
                    Span::styled(":Disconnect  ", Style::default().fg(THEME.text_muted)),
                ]);
            } else {
                hints.extend([
                    Span::styled(" c", Style::default().fg(THEME.text_accent)),
                    Span::styled(":Connect  ", Style::default().fg(THEME.text_muted)),
                ]);
            }
            hints.extend([
                Span::styled("?", Style::default().fg(THEME.text_accent)),
                Span::styled(":Help  ", Style::default().fg(THEME.text_muted)),
                Span::styled("q", Style::default().fg(THEME.text_accent)),
                Span::styled(":Quit", Style::default().fg(THEME.text_muted)),
            ]);
            Line::from(hints)
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: connection status + chain id ---
        let (dot_color, status_text) = if self.connected {
            (THEME.success, "Connected")
        } else {
            (THEME.error, "Disconnected")
        };

        let chain = self
            .chain_id
            .map(|id| format!("chain {} ", utils::format_number(id)))
            .unwrap_or_default();

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(chain, THEME.accent_style()),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
