//! UI rendering

use chrono::{DateTime, Utc};
use pomo_core::format;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::phase::Phase;
use crate::tui::app::App;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App, now: DateTime<Utc>) {
    let area = f.area();

    // Center a fixed-size card in the terminal.
    let card_width = area.width.min(60);
    let card_height = 12u16.min(area.height);
    let x = (area.width.saturating_sub(card_width)) / 2;
    let y = (area.height.saturating_sub(card_height)) / 2;
    let card = Rect::new(x, y, card_width, card_height);

    draw_timer_card(f, app, now, card);
    draw_footer(f, app, area);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_timer_card(f: &mut Frame, app: &App, now: DateTime<Utc>, area: Rect) {
    let session = &app.session;

    let mut title = " Pomodoro Timer ".to_string();
    if let Some(label) = session.label() {
        title = format!(" Pomodoro Timer - {} ", format::truncate(label, 30));
    }

    let phase_color = match session.phase() {
        Phase::Focus => Color::Red,
        Phase::ShortBreak => Color::Green,
        Phase::LongBreak => Color::Cyan,
    };

    let mut status = session.phase().as_str().to_string();
    if session.is_paused() {
        status.push_str(" (PAUSED)");
    }

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Magenta).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(phase_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status
            Constraint::Length(2), // clock
            Constraint::Length(1), // gauge
            Constraint::Length(1),
            Constraint::Length(1), // completed count
            Constraint::Min(0),    // rename prompt
        ])
        .margin(1)
        .split(inner);

    let status_line = Line::from(vec![
        Span::raw("Status: "),
        Span::styled(status, Style::default().fg(phase_color).bold()),
    ]);
    f.render_widget(Paragraph::new(status_line), chunks[0]);

    let clock = format::clock(app.session.remaining(now));
    let clock_line = Line::from(Span::styled(
        clock,
        Style::default().fg(Color::Yellow).bold(),
    ))
    .centered();
    f.render_widget(Paragraph::new(clock_line), chunks[1]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(phase_color))
        .ratio(session.progress(now))
        .use_unicode(true);
    f.render_widget(gauge, chunks[2]);

    let completed = Line::from(vec![
        Span::raw("Sessions completed: "),
        Span::styled(
            session.completed_focus().to_string(),
            Style::default().fg(Color::Green).bold(),
        ),
    ]);
    f.render_widget(Paragraph::new(completed), chunks[4]);

    if let Some(buffer) = session.rename_buffer() {
        let prompt = vec![
            Line::from(vec![
                Span::styled("Rename: ", Style::default().fg(Color::Cyan)),
                Span::raw(buffer.to_string()),
                Span::styled("_", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(Span::styled(
                "(Enter to save, Esc to cancel)",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(prompt), chunks[5]);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let footer_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

    let help = if app.session.is_renaming() {
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" save  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled(" q", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" quit  "),
            Span::styled("space/p", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" pause  "),
            Span::styled("r", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" rename  "),
            Span::styled("?", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" help"),
        ])
    };

    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, footer_area);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = f.area();

    let popup_width = 44;
    let popup_height = 9;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width.min(area.width), popup_height.min(area.height));

    // Clear the area behind the popup
    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  space / p  ", Style::default().fg(Color::Cyan)),
            Span::raw("Pause / resume"),
        ]),
        Line::from(vec![
            Span::styled("  r          ", Style::default().fg(Color::Cyan)),
            Span::raw("Rename session"),
        ]),
        Line::from(vec![
            Span::styled("  q / Esc    ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(vec![
            Span::styled("  ?          ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let help_popup = Paragraph::new(help_text).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(help_popup, popup_area);
}
