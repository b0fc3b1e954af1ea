use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::history::SessionSummary;
use crate::panel::LampRow;
use crate::session::{GameSession, State};
use crate::util::format_ms;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // `shown` is the state whose output is on the lamps right now
        if self.shown == State::Idle {
            render_idle(&self.session, area, buf);
        } else {
            render_board(self.shown, &self.session, &self.lamps, area, buf);
        }
    }
}

fn render_idle(session: &GameSession, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(Span::styled(
            "b l i k k",
            Style::default().patch(bold_style).fg(Color::Yellow),
        )),
        Line::default(),
        Line::from(Span::styled("press any key to play", italic_style)),
        Line::default(),
        Line::from(Span::styled(
            format!("total points: {}", session.points),
            bold_style,
        )),
    ];

    if let Some(summary) = &session.last_summary {
        let verdict = if summary.won {
            "cleared the board"
        } else {
            "ran out of lives"
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "last run {} at level {}: {}/{} hits, +{} points",
                verdict, summary.top_level, summary.hits, summary.rounds, summary.points_earned
            ),
            dim_style,
        )));
        if let Some(mean) = summary.mean_reaction_ms {
            lines.push(Line::from(Span::styled(
                format!("mean reaction {}", format_ms(mean)),
                dim_style,
            )));
        }
        let breakdown = SessionSummary::level_breakdown(session.session_rounds())
            .iter()
            .map(|(level, hits, played)| format!("L{} {}/{}", level, hits, played))
            .join("  ");
        if !breakdown.is_empty() {
            lines.push(Line::from(Span::styled(breakdown, dim_style)));
        }
    }

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_board(shown: State, session: &GameSession, lamps: &LampRow, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let hint_style = Style::default()
        .add_modifier(Modifier::DIM)
        .add_modifier(Modifier::ITALIC);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // banner
            Constraint::Min(1),
            Constraint::Length(1), // lamps
            Constraint::Length(1), // key legend
            Constraint::Min(1),
            Constraint::Length(1), // hud
        ])
        .split(area);

    let (banner, banner_style) = match shown {
        State::Correct => ("HIT", green_bold_style),
        State::Wrong => ("MISS", red_bold_style),
        State::TimedOut => ("TOO SLOW", red_bold_style),
        State::Victory => ("ALL LEVELS CLEAR", green_bold_style),
        State::Defeat => ("OUT OF LIVES", red_bold_style),
        _ => ("strike the key under the lit lamp", hint_style),
    };
    Paragraph::new(Span::styled(banner, banner_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(lamp_line(lamps))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    Paragraph::new(key_line(lamps.len()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let hud = format!(
        "level {}/{}   lives {}   points {}   window {}",
        session.level.min(session.config.levels),
        session.config.levels,
        session.lives,
        session.points,
        format_ms(session.timeout_ms.saturating_sub(session.elapsed_ms)),
    );
    Paragraph::new(Span::styled(hud, dim_style))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

fn lamp_line(lamps: &LampRow) -> Line<'static> {
    let lit_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dark_style = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::new();
    for channel in 0..lamps.len() {
        if channel > 0 {
            spans.push(Span::raw("   "));
        }
        if lamps.is_lit(channel) {
            spans.push(Span::styled("●", lit_style));
        } else {
            spans.push(Span::styled("○", dark_style));
        }
    }
    Line::from(spans)
}

fn key_line(channels: usize) -> Line<'static> {
    let style = Style::default().add_modifier(Modifier::DIM);
    let mut spans = Vec::new();
    for channel in 0..channels {
        if channel > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled((channel + 1).to_string(), style));
    }
    Line::from(spans)
}
