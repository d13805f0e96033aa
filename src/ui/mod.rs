pub mod menu;

use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Outcome, Simulation};

/// Character-cell drawing target handed to the simulations.
pub trait Surface {
    /// Writes `text` starting at (`row`, `col`). Anything outside the surface is clipped.
    fn put(&mut self, row: u16, col: u16, text: &str, style: Style);
}

/// A ratatui buffer restricted to one rectangle, with (0, 0) at its top-left corner.
pub struct AreaSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> AreaSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self { buf, area }
    }
}

impl Surface for AreaSurface<'_> {
    fn put(&mut self, row: u16, col: u16, text: &str, style: Style) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        let room = (self.area.width - col) as usize;
        self.buf
            .set_stringn(self.area.x + col, self.area.y + row, text, room, style);
    }
}

/// Draws the frame around a running simulation: title block, status bar,
/// playfield and help bar.
pub fn render_session<S: Simulation + ?Sized>(frame: &mut Frame, sim: &S, paused: bool) {
    let area = frame.area();
    let accent = sim.accent();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", sim.title()))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    let status = Line::from(vec![
        Span::styled(
            format!(" Score: {} ", sim.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[0]);

    sim.draw(&mut AreaSurface::new(frame.buffer_mut(), chunks[1]));

    let help = match sim.outcome() {
        Some(Outcome::GameOver) => Line::from(vec![
            Span::styled(" GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled("Press any key to return", Style::default().fg(Color::Gray)),
        ]),
        Some(Outcome::Won) => Line::from(vec![
            Span::styled(" YOU WIN! ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled("Press any key to return", Style::default().fg(Color::Gray)),
        ]),
        None if paused => Line::from(vec![
            Span::styled(" PAUSED - Press P to resume ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]),
        None => Line::from(vec![
            Span::styled(format!(" {} ", sim.controls()), Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Q Menu", Style::default().fg(Color::DarkGray)),
        ]),
    };
    frame.render_widget(Paragraph::new(help), chunks[2]);
}
