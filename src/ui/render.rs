use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::agent::TrailAgent;

/// Status line shown above the field. Carries the seed so an interactive
/// trail can be regenerated with `--seed`.
#[must_use]
pub fn hud_line<S>(agent: &TrailAgent<S>, seed: u64) -> String {
    let config = agent.config();
    let limit = config
        .max_length()
        .limit()
        .map_or_else(|| "inf".to_string(), |n| n.to_string());
    format!(
        "{} | {n}x{n} | Step: {}/{} | Pellets: {} | Heading: {} | Seed: {seed} | {}",
        config.name(),
        agent.steps(),
        limit,
        agent.pellets().len(),
        agent.heading(),
        agent.status(),
        n = config.grid_size(),
    )
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str, footer: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
            Constraint::Length(1), // Keys / messages
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::styled(s, Style::default().fg(Color::Yellow))))
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));
    f.render_widget(field, chunks[1]);

    let footer = Paragraph::new(Span::styled(
        footer,
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(footer, chunks[2]);
}
