use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{Menu, MenuChoice};

const BANNER: &str = r#"
    _    ____   ____ ___ ___ ____    _    ____  _____
   / \  / ___| / ___|_ _|_ _/ ___|  / \  |  _ \| ____|
  / _ \ \___ \| |    | | | | |     / _ \ | | | |  _|
 / ___ \ ___) | |___ | | | | |___ / ___ \| |_| | |___
/_/   \_\____/ \____|___|___\____/_/   \_\____/|_____|"#;

fn option_color(choice: MenuChoice) -> Color {
    match choice {
        MenuChoice::Tetris => Color::Rgb(200, 120, 255),
        MenuChoice::Snake => Color::Rgb(80, 220, 80),
        MenuChoice::SpaceInvaders => Color::Rgb(80, 255, 80),
        MenuChoice::IceClimber => Color::Rgb(100, 200, 255),
        MenuChoice::Quit => Color::Rgb(220, 80, 80),
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();
    let options = MenuChoice::all();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),                         // Banner
            Constraint::Length(2),                         // Subtitle
            Constraint::Length(options.len() as u16 + 2), // Options
            Constraint::Min(0),
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(vec![Span::styled(
        "Your Terminal Arcade",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            if i == menu.selected {
                Line::from(vec![
                    Span::styled(" ▶ ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                    Span::styled(
                        choice.label(),
                        Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw("   "),
                    Span::styled(choice.label(), Style::default().fg(option_color(*choice))),
                ])
            }
        })
        .collect();

    let games = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" Games ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(games, centered(chunks[2], 32));

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("↑↓ / j k", Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(" Select  ", Style::default().fg(Color::Rgb(140, 140, 140))),
        Span::styled("Enter", Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(" Play  ", Style::default().fg(Color::Rgb(140, 140, 140))),
        Span::styled("q", Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(" Quit", Style::default().fg(Color::Rgb(140, 140, 140))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
