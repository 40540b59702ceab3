//! Terminal UI rendering with ratatui
//!
//! Draws from a `Snapshot` only; nothing here can touch game state.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Cell};
use crate::piece::Piece;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::tetromino::MASK_SIZE;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + next/stats(18) = 40
const GAME_WIDTH: u16 = 40;
/// Board(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, snap: &Snapshot, settings: &Settings) {
    let area = frame.area();
    let glyphs = settings.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(18), // Next + stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snap, glyphs);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next piece
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], &snap.next, glyphs.0);
    render_stats(frame, right_layout[1], snap);

    if snap.over {
        let subtitle = format!("Final score: {}", snap.score);
        render_overlay(frame, area, "GAME OVER", &subtitle, "Press R to restart");
    } else if snap.paused {
        render_overlay(frame, area, "PAUSED", "Press P to resume", "Press R to restart");
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Glyph and style for a cell in a row that is being cleared. Cells fade
/// while a sweep eats the row from both edges toward the center.
fn clearing_cell(
    col: usize,
    color: Color,
    progress: f64,
    glyphs: (&'static str, &'static str),
) -> (&'static str, Style) {
    let from_edge = col.min(BOARD_WIDTH - 1 - col);
    let swept = (progress * (BOARD_WIDTH / 2) as f64).floor() as usize;
    if from_edge < swept {
        return (EMPTY, Style::default());
    }
    if progress < 0.5 {
        (glyphs.0, Style::default().fg(color).bold())
    } else {
        (glyphs.1, Style::default().fg(color).dim())
    }
}

/// Render the game board
fn render_board(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot,
    glyphs: (&'static str, &'static str),
) {
    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);

    for (row, cells) in snap.board.iter().enumerate() {
        let clearing = snap.is_clearing(row);
        let mut spans = Vec::with_capacity(BOARD_WIDTH);

        for (col, cell) in cells.iter().enumerate() {
            let falling = snap.current.as_ref().and_then(|piece| {
                piece
                    .block_positions()
                    .any(|pos| pos == (row as i32, col as i32))
                    .then_some(piece.piece_type.color())
            });

            let (text, style) = match (falling, cell) {
                (Some(color), _) => (glyphs.0, Style::default().fg(color)),
                (None, Cell::Filled(piece)) if clearing => {
                    clearing_cell(col, piece.color(), snap.clear_progress, glyphs)
                }
                (None, Cell::Filled(piece)) => (glyphs.0, Style::default().fg(piece.color())),
                (None, Cell::Empty) => (EMPTY, Style::default()),
            };
            spans.push(Span::styled(text, style));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: &Piece, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Only the rows that hold cells, so the preview sits centered
    let color = next.piece_type.color();
    let lines: Vec<Line> = (0..MASK_SIZE)
        .filter(|&row| (0..MASK_SIZE).any(|col| next.mask.is_set(row, col)))
        .map(|row| {
            let spans: Vec<Span> = (0..MASK_SIZE)
                .map(|col| {
                    if next.mask.is_set(row, col) {
                        Span::styled(block_char.to_string(), Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            format!("{}", snap.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        label("BEST"),
        Line::from(Span::styled(
            format!("{}", snap.high_score),
            Style::default().fg(Color::Magenta),
        )),
        label("LEVEL"),
        Line::from(Span::styled(
            format!("{}", snap.level),
            Style::default().fg(Color::Cyan),
        )),
        label("LINES"),
        Line::from(Span::styled(
            format!("{}", snap.lines),
            Style::default().fg(Color::Green),
        )),
        label("SPEED"),
        Line::from(Span::styled(
            format!("{:.1}x {}ms", snap.speed_multiplier, snap.drop_interval_ms),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::styled(
            if snap.muted { "Sound: off (M)" } else { "Sound: on (M)" },
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, hint: &str) {
    let popup_width = 26u16;
    let popup_height = 6u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
        Line::styled(hint, Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
