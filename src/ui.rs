pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::GameContext,
    countdown::Urgency,
    generator::{Letter, LetterId},
    layout::Position,
    session::GamePhase,
    settings::ShapeKind,
};

const HORIZONTAL_MARGIN: u16 = 2;
const HEADER_HEIGHT: u16 = 4;
const FOOTER_HEIGHT: u16 = 2;

/// Size of one letter biscuit in terminal cells
pub const BISCUIT_WIDTH: u16 = 5;
pub const BISCUIT_HEIGHT: u16 = 3;

/// Part of the screen the letters are scattered over
pub fn board_area(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    chunks[1]
}

/// Cells covered by a letter at a normalized position
pub fn biscuit_rect(board: Rect, position: Position) -> Rect {
    let free_x = board.width.saturating_sub(BISCUIT_WIDTH);
    let free_y = board.height.saturating_sub(BISCUIT_HEIGHT);
    let x = board.x + (position.x.clamp(0.0, 1.0) * free_x as f32).round() as u16;
    let y = board.y + (position.y.clamp(0.0, 1.0) * free_y as f32).round() as u16;
    Rect::new(
        x,
        y,
        BISCUIT_WIDTH.min(board.width),
        BISCUIT_HEIGHT.min(board.height),
    )
}

/// Letter under a click. Later letters are drawn on top, so they win.
pub fn letter_at(board: Rect, letters: &[Letter], column: u16, row: u16) -> Option<LetterId> {
    letters
        .iter()
        .rev()
        .find(|l| {
            let r = biscuit_rect(board, l.position);
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
        .map(|l| l.id)
}

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Calm => Color::Green,
        Urgency::Hurry => Color::Yellow,
        Urgency::Critical => Color::Red,
    }
}

fn biscuit_style(shape: ShapeKind) -> (BorderType, Color) {
    match shape {
        ShapeKind::Circle => (BorderType::Rounded, Color::Rgb(210, 160, 90)),
        ShapeKind::Star => (BorderType::Double, Color::Yellow),
        ShapeKind::Heart => (BorderType::Thick, Color::LightRed),
    }
}

/// Rect of `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn render_game(ctx: &GameContext, f: &mut Frame) {
    let area = f.area();
    let session = &ctx.session;
    let state = session.state();
    let settings = session.settings();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let status = Line::from(vec![
        Span::styled(format!("Score {}/{}", state.score, settings.win_score), bold_style),
        Span::raw("   "),
        Span::styled(
            format!("Errors {}/{}", state.errors, settings.lose_score),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!("   Round {}", state.round)),
        Span::raw(format!("   {}", session.formatted_game_time())),
    ]);
    f.render_widget(Paragraph::new(status), chunks[0]);

    let target = match state.target {
        Some(t) if settings.show_target_hint => format!("Find the letter  {t}"),
        Some(_) => "Listen and find the letter!".to_string(),
        None => String::new(),
    };
    f.render_widget(
        Paragraph::new(Span::styled(target, bold_style.fg(Color::Cyan)))
            .alignment(Alignment::Center),
        chunks[1],
    );

    let countdown = &state.countdown;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(urgency_color(countdown.urgency(&ctx.thresholds))))
        .ratio(countdown.fraction().clamp(0.0, 1.0) as f64)
        .label(format!("{}s", countdown.seconds_left()));
    f.render_widget(gauge, chunks[2]);

    let message = state
        .encouragement
        .clone()
        .or_else(|| session.announcer().caption().map(str::to_string))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(Span::styled(message, Style::default().fg(Color::Green)))
            .alignment(Alignment::Center),
        chunks[3],
    );

    let board = board_area(area);
    for letter in &state.letters {
        let (border, color) = biscuit_style(letter.shape);
        let mut style = Style::default().fg(color);
        if settings.show_target_hint && letter.is_target {
            style = style.bg(Color::Rgb(60, 60, 30));
        }
        let biscuit = Paragraph::new(Span::styled(letter.value.to_string(), bold_style))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border)
                    .border_style(style),
            );
        f.render_widget(biscuit, biscuit_rect(board, letter.position));
    }

    let help = "click a letter (or type it)  ·  space: pause  ·  esc: menu";
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center),
        chunks[6],
    );

    if state.phase == GamePhase::Paused {
        let text = "PAUSED - press space to continue";
        let popup = centered(area, text.width() as u16 + 4, 3);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(Span::styled(text, bold_style.fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            popup,
        );
    }
}

pub fn render_menu(ctx: &GameContext, name: &str, f: &mut Frame) {
    let area = f.area();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let history = ctx.profile.player_history();
    let mut lines = vec![
        Line::from(Span::styled("lettertap", bold_style.fg(Color::Magenta))),
        Line::from(""),
        Line::from(vec![
            Span::raw("Player: "),
            Span::styled(format!("{name}_"), bold_style),
        ]),
        Line::from(""),
    ];
    if !history.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Played before: {}", history.join(", ")),
            dim_style,
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from("enter: play   tab: settings   esc: quit"));

    let height = lines.len() as u16;
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, area.width, height),
    );
}

pub fn render_results(ctx: &GameContext, f: &mut Frame) {
    let area = f.area();
    let state = ctx.session.state();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let (headline, color) = match state.phase {
        GamePhase::Won => ("You won!", Color::Green),
        _ => ("Game over", Color::Red),
    };
    let name = ctx.session.player_name();
    let headline = if name.is_empty() {
        headline.to_string()
    } else {
        format!("{headline} {name}")
    };

    let lines = vec![
        Line::from(Span::styled(headline, bold_style.fg(color))),
        Line::from(""),
        Line::from(format!(
            "score {}   errors {}   rounds {}   time {}",
            state.score,
            state.errors,
            state.round,
            ctx.session.formatted_game_time()
        )),
        Line::from(""),
        Line::from("r: play again   m: menu   q: quit"),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, area.width, 5),
    );
}

pub fn render_settings(rows: &[(String, String)], cursor: usize, f: &mut Frame) {
    let area = f.area();
    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let text = format!("{label:<22}{value:>10}");
            if i == cursor {
                Line::from(Span::styled(text, selected))
            } else {
                Line::from(text)
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑↓ select  ←→ change  1/2/3 easy/medium/hard  enter: save  esc: cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let height = lines.len() as u16 + 2;
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Settings")),
        centered(area, area.width.min(80), height),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(slot: u8, x: f32, y: f32) -> Letter {
        Letter {
            id: LetterId { round: 1, slot },
            value: (b'A' + slot) as char,
            is_target: slot == 0,
            position: Position::new(x, y),
            shape: ShapeKind::Circle,
        }
    }

    #[test]
    fn test_board_area_leaves_room_for_header_and_footer() {
        let board = board_area(Rect::new(0, 0, 80, 24));
        assert_eq!(board.y, HEADER_HEIGHT);
        assert_eq!(board.height, 24 - HEADER_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(board.x, HORIZONTAL_MARGIN);
    }

    #[test]
    fn test_biscuit_rect_corners() {
        let board = Rect::new(2, 4, 70, 18);
        let top_left = biscuit_rect(board, Position::new(0.0, 0.0));
        assert_eq!((top_left.x, top_left.y), (2, 4));
        let bottom_right = biscuit_rect(board, Position::new(1.0, 1.0));
        assert_eq!(bottom_right.x + bottom_right.width, board.x + board.width);
        assert_eq!(bottom_right.y + bottom_right.height, board.y + board.height);
    }

    #[test]
    fn test_letter_at_hits_and_misses() {
        let board = Rect::new(0, 0, 45, 23);
        let letters = vec![letter(0, 0.0, 0.0), letter(1, 1.0, 1.0)];
        assert_eq!(letter_at(board, &letters, 2, 1), Some(letters[0].id));
        assert_eq!(letter_at(board, &letters, 44, 22), Some(letters[1].id));
        assert_eq!(letter_at(board, &letters, 20, 10), None);
    }

    #[test]
    fn test_letter_at_prefers_topmost() {
        let board = Rect::new(0, 0, 40, 20);
        let letters = vec![letter(0, 0.5, 0.5), letter(1, 0.5, 0.5)];
        let r = biscuit_rect(board, letters[0].position);
        assert_eq!(letter_at(board, &letters, r.x, r.y), Some(letters[1].id));
    }

    #[test]
    fn test_centered() {
        let r = centered(Rect::new(0, 0, 80, 24), 20, 4);
        assert_eq!(r, Rect::new(30, 10, 20, 4));
        let clipped = centered(Rect::new(0, 0, 10, 5), 20, 10);
        assert_eq!(clipped, Rect::new(0, 0, 10, 5));
    }
}
