//! Layout and drawing: playfield, sidebar, next preview, clear flash, overlays.

use crate::app::Screen;
use crate::game::{CellState, GameState};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each board cell is this many terminal cells wide...
pub const CELL_WIDTH: u16 = 2;
/// ...and this many tall.
pub const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 20;

/// Flash length for the TachyonFX fade in ms; the engine's effect timer keeps
/// the rows marked for the same 0.4 s.
const LINE_CLEAR_FLASH_MS: u32 = 400;

/// Playfield size in terminal cells (grid + border) for given grid dimensions.
fn playfield_pixel_size(width: u16, height: u16) -> (u16, u16) {
    (width * CELL_WIDTH + 2, height * CELL_HEIGHT + 2)
}

/// Playfield inner rect (board only, no border); matches draw_game's layout.
fn playfield_board_rect(area: Rect, state: &GameState) -> Rect {
    let (pw, ph) = playfield_pixel_size(state.board.width as u16, state.board.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(ph) / 2;
    let outer = Rect {
        x,
        y,
        width: pw.min(area.width),
        height: ph.min(area.height),
    };
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (state.board.width as u16 * CELL_WIDTH).min(outer.width.saturating_sub(2)),
        height: (state.board.height as u16 * CELL_HEIGHT).min(outer.height.saturating_sub(2)),
    }
}

/// Draw the current screen. While rows are flashing (and animation is on) the
/// fade effect is created/advanced through `flash_effect` / `flash_time`.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    best_score: u32,
    new_best: bool,
    no_animation: bool,
    flash_effect: &mut Option<Effect>,
    flash_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    draw_game(frame, state, theme, best_score, area);
    if !state.clear_effect.is_empty() && !no_animation {
        apply_clear_flash(frame, state, theme, area, flash_effect, flash_time, now);
    }
    match screen {
        Screen::Playing => {
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::GameOver => draw_game_over(frame, state, theme, best_score, new_best, area),
    }
}

/// Playfield + sidebar, centred in the full area.
fn draw_game(frame: &mut Frame, state: &GameState, theme: &Theme, best_score: u32, area: Rect) {
    let (pw, ph) = playfield_pixel_size(state.board.width as u16, state.board.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let active = vert[1];

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active);

    draw_playfield(frame, state, theme, inner[0]);
    draw_sidebar(frame, state, theme, best_score, inner[1]);
}

/// The colour of the falling piece at board cell (x, y), if it covers it.
fn piece_color_at(state: &GameState, theme: &Theme, x: usize, y: usize) -> Option<Color> {
    let piece = &state.current;
    let px = x as i32 - piece.x;
    let py = y as i32 - piece.y;
    if px < 0 || py < 0 || px >= piece.cells.cols() as i32 || py >= piece.cells.rows() as i32 {
        return None;
    }
    piece
        .cells
        .at(px as usize, py as usize)
        .then(|| theme.piece_color(piece.kind.color_index()))
}

fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" squaretui ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for y in 0..state.board.height {
        for x in 0..state.board.width {
            let color = piece_color_at(state, theme, x, y).unwrap_or_else(|| {
                match state.board.get(x, y) {
                    CellState::Locked(kind) => theme.piece_color(kind.color_index()),
                    CellState::Empty => theme.bg,
                }
            });
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16 * CELL_HEIGHT;
            if ry >= inner.y + inner.height {
                continue;
            }
            for dx in 0..CELL_WIDTH {
                if rx + dx < inner.x + inner.width {
                    buf[(rx + dx, ry)]
                        .set_symbol(" ")
                        .set_style(Style::default().bg(color));
                }
            }
        }
    }
}

/// Create or advance the clear-row flash: rows light up in the flash colour
/// and fade back into the (already compacted) board underneath.
fn apply_clear_flash(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    flash_effect: &mut Option<Effect>,
    flash_time: &mut Option<Instant>,
    now: Instant,
) {
    let board_rect = playfield_board_rect(area, state);
    let delta = flash_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *flash_time = Some(now);

    if flash_effect.is_none() {
        let mut flashing: HashSet<(u16, u16)> = HashSet::new();
        for &row in &state.clear_effect {
            let ry = board_rect.y + row as u16 * CELL_HEIGHT;
            for rx in board_rect.x..board_rect.x + board_rect.width {
                flashing.insert((rx, ry));
            }
        }
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            flashing.contains(&(pos.x, pos.y))
        }));
        let flash = theme.flash;
        let effect = fx::fade_from(flash, flash, (LINE_CLEAR_FLASH_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        *flash_effect = Some(effect);
    }

    if let Some(effect) = flash_effect {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_next_preview(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let buf = frame.buffer_mut();
    let color = theme.piece_color(state.next.kind.color_index());
    for (cx, cy) in state.next.cells.occupied() {
        let rx = area.x + cx as u16 * CELL_WIDTH;
        let ry = area.y + cy as u16;
        if ry >= area.y + area.height {
            continue;
        }
        for dx in 0..CELL_WIDTH {
            if rx + dx < area.x + area.width {
                buf[(rx + dx, ry)]
                    .set_symbol(" ")
                    .set_style(Style::default().bg(color));
            }
        }
    }
}

fn draw_sidebar(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    best_score: u32,
    area: Rect,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // next preview (border + 2 rows + slack)
            Constraint::Length(1), // gap
            Constraint::Length(6), // stats (border + score, best, level, lines)
            Constraint::Length(1), // gap
            Constraint::Length(6), // keys
        ])
        .split(area);

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" next ", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    draw_next_preview(frame, state, theme, next_inner);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" stats ", title_style));
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    Paragraph::new(vec![
        Line::from(Span::styled(format!("score: {}", state.score), fg_style)),
        Line::from(Span::styled(format!("best:  {}", best_score), fg_style)),
        Line::from(Span::styled(format!("level: {}", state.level), fg_style)),
        Line::from(Span::styled(
            format!("lines: {}", state.lines_cleared),
            fg_style,
        )),
    ])
    .render(stats_inner, frame.buffer_mut());

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" keys ", title_style));
    let keys_inner = keys_block.inner(chunks[4]);
    keys_block.render(chunks[4], frame.buffer_mut());
    Paragraph::new(vec![
        Line::from(Span::styled("←/→ move  ↑ rotate", fg_style)),
        Line::from(Span::styled("↓ drop  ⏎ hard drop", fg_style)),
        Line::from(Span::styled("p pause  r reset", fg_style)),
        Line::from(Span::styled("q quit", fg_style)),
    ])
    .render(keys_inner, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — resume    Q — quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    best_score: u32,
    new_best: bool,
    area: Rect,
) {
    let popup_w = 30u16;
    let popup_h = 11u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " game over! ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" score: {} ", state.score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" best:  {} ", best_score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" lines: {} ", state.lines_cleared),
            Style::default().fg(theme.main_fg),
        )),
    ];
    if new_best {
        lines.push(Line::from(Span::styled(
            " new record! ",
            Style::default().fg(Color::Yellow).bold(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R — restart    Q — quit ",
        Style::default().fg(theme.main_fg),
    )));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" squaretui ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}
