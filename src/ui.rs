use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::game::Phase;
use crate::ranking::MAX_PLAYER_ID_CHARS;
use crate::util::format_clock;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let blue_bold_style = Style::default().patch(bold_style).fg(Color::Blue);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let yellow_style = Style::default().fg(Color::Yellow);

        let hint_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(2), // instruction
                    Constraint::Length(2), // target symbol
                    Constraint::Length(2), // live clock
                    Constraint::Length(2), // result / name entry
                    Constraint::Min(7),    // ranking board
                    Constraint::Length(1), // key hints
                ]
                .as_ref(),
            )
            .split(area);

        let phase = self.game.phase();

        let instruction = match (&self.state, phase) {
            (AppState::NameEntry, _) => "register your score".to_string(),
            (_, Phase::Idle) => "press SPACE to start".to_string(),
            (_, Phase::Armed | Phase::Delaying) => "get ready...".to_string(),
            (_, Phase::Active) => match self.game.target() {
                Some(target) => format!("press the key: {}", target),
                None => String::new(),
            },
            (_, Phase::Finished) => "press SPACE to play again".to_string(),
        };
        Paragraph::new(Span::styled(instruction, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        // the symbol itself, oversized by context rather than font: alone on its line
        let (glyph, glyph_style) = match phase {
            Phase::Active => (
                self.game.target().map(String::from).unwrap_or_default(),
                blue_bold_style,
            ),
            Phase::Finished => ("✓".to_string(), green_bold_style),
            _ => (String::new(), dim_style),
        };
        Paragraph::new(Span::styled(glyph, glyph_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let clock_style = if phase == Phase::Finished {
            green_bold_style
        } else {
            red_bold_style
        };
        Paragraph::new(Span::styled(format_clock(self.display_ms), clock_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let result_line = match &self.state {
            AppState::NameEntry => format!(
                "name (max {} chars): {}_",
                MAX_PLAYER_ID_CHARS, self.name_input
            ),
            AppState::Playing => match self.game.last_reaction_ms() {
                Some(ms) => format!("reaction time: {} ms", ms),
                None => String::new(),
            },
        };
        Paragraph::new(Span::styled(result_line, yellow_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        render_ranking(self, chunks[4], buf);

        let hints = format!(
            "(space) start · (esc) quit · [{}]",
            phase.to_string().to_lowercase()
        );
        Paragraph::new(Span::styled(hints, hint_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}

fn render_ranking(app: &App, area: Rect, buf: &mut Buffer) {
    let body = if app.ranking.is_empty() {
        "(empty)".to_string()
    } else {
        app.ranking
            .snapshot()
            .iter()
            .enumerate()
            .map(|(place, entry)| {
                format!("{}. {}: {} ms", place + 1, entry.player, entry.reaction_ms)
            })
            .join("\n")
    };

    // size the box to the widest row so the board sits centered
    let inner_width = body
        .lines()
        .map(|line| line.width())
        .max()
        .unwrap_or(0)
        .max("ranking".width()) as u16;
    let height = (body.lines().count() as u16 + 2).min(area.height);
    let board = centered_rect(inner_width + 4, height, area);

    Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("ranking"))
        .render(board, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
