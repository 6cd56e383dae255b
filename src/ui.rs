//! Layout and drawing: playfield, ghost, sidebar, line-clear fade, game over.

use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use stacktui::game::{CLEAR_DELAY, GameState, Phase};
use stacktui::grid::{BUFFER_HEIGHT, HEIGHT, WIDTH};
use stacktui::piece::ActivePiece;
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal columns per grid cell; two make cells roughly square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the line-clear fade, matching the clear delay.
const LINE_CLEAR_FADE_MS: u32 = (CLEAR_DELAY * 1000.0) as u32;

const FILLED: &str = "██";
const GHOST: &str = "░░";
const EMPTY: &str = "  ";

/// Rendering switches taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub ghost: bool,
    pub animation: bool,
    /// Draw the overflow rows above the visible playfield.
    pub show_buffer: bool,
}

impl ViewOptions {
    fn first_row(&self) -> usize {
        if self.show_buffer { 0 } else { BUFFER_HEIGHT }
    }
}

/// Line-clear effect state kept across frames by the app.
#[derive(Default)]
pub struct ClearFx {
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl ClearFx {
    pub fn reset(&mut self) {
        self.effect = None;
        self.last_process = None;
    }
}

/// Board size in terminal cells, border included.
fn board_size(view: &ViewOptions) -> (u16, u16) {
    let rows = (HEIGHT - view.first_row()) as u16;
    (WIDTH as u16 * CELL_WIDTH + 2, rows + 2)
}

/// Draw one frame of the game.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: &ViewOptions,
    clear_fx: &mut ClearFx,
    now: Instant,
) {
    let area = frame.area();
    let (bw, bh) = board_size(view);
    let total_w = bw + SIDEBAR_WIDTH;

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
            Constraint::Length(bh),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let (board_area, sidebar_area) = (inner[0], inner[1]);

    let board_rect = draw_board(frame, state, theme, view, board_area);
    draw_sidebar(frame, state, theme, sidebar_area);

    match state.phase() {
        Phase::Clearing if view.animation => {
            apply_line_clear_effect(frame, state, theme, view, board_rect, clear_fx, now);
        }
        Phase::GameOver => draw_game_over(frame, state, theme, board_area),
        _ => {}
    }
}

/// Draws border, settled cells, ghost and active piece. Returns the inner cell rect.
fn draw_board(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: &ViewOptions,
    area: Rect,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(theme.board_bg))
        .title(Span::styled(" stacktui ", theme.accent));
    let board_rect = block.inner(area);
    block.render(area, frame.buffer_mut());

    let first_row = view.first_row();
    let grid = state.grid();
    let clearing = state.phase() == Phase::Clearing;
    let buf = frame.buffer_mut();

    for row in first_row..HEIGHT {
        let bg = if row < BUFFER_HEIGHT { theme.buffer_bg } else { theme.board_bg };
        let flash = clearing && !view.animation && state.clearing_rows()[row];
        for col in 0..WIDTH {
            let value = grid.get(row, col);
            let (symbol, style) = if flash {
                (FILLED, Style::default().fg(Color::White).bg(bg))
            } else if value != 0 {
                (FILLED, Style::default().fg(theme.cell_color(value)).bg(bg))
            } else {
                (EMPTY, Style::default().bg(bg))
            };
            put_cell(buf, board_rect, first_row, row as i32, col as i32, symbol, style);
        }
    }

    // The active piece is only shown while it can move.
    if state.phase() == Phase::Falling {
        let piece = state.piece();
        let color = theme.piece_color(piece.kind);
        if view.ghost {
            let ghost = state.ghost();
            if ghost.row != piece.row {
                draw_piece(buf, board_rect, first_row, &ghost, GHOST, Style::default().fg(color));
            }
        }
        draw_piece(buf, board_rect, first_row, piece, FILLED, Style::default().fg(color));
    }
    board_rect
}

fn draw_piece(
    buf: &mut Buffer,
    board_rect: Rect,
    first_row: usize,
    piece: &ActivePiece,
    symbol: &str,
    style: Style,
) {
    for (row, col, _) in piece.cells() {
        put_cell(buf, board_rect, first_row, row, col, symbol, style);
    }
}

/// Writes one grid cell; cells outside the drawn rows or the rect are skipped.
fn put_cell(
    buf: &mut Buffer,
    board_rect: Rect,
    first_row: usize,
    row: i32,
    col: i32,
    symbol: &str,
    style: Style,
) {
    if row < first_row as i32 || !(0..WIDTH as i32).contains(&col) {
        return;
    }
    let x = board_rect.x + col as u16 * CELL_WIDTH;
    let y = board_rect.y + (row - first_row as i32) as u16;
    if x + CELL_WIDTH > board_rect.x + board_rect.width || y >= board_rect.y + board_rect.height {
        return;
    }
    buf.set_stringn(x, y, symbol, CELL_WIDTH as usize, style);
}

/// Buffer positions covered by the rows being cleared.
fn clearing_buffer_positions(board_rect: Rect, view: &ViewOptions, state: &GameState) -> HashSet<(u16, u16)> {
    let first_row = view.first_row();
    let mut set = HashSet::new();
    for (row, _) in state
        .clearing_rows()
        .iter()
        .enumerate()
        .filter(|&(row, &full)| full && row >= first_row)
    {
        let y = board_rect.y + (row - first_row) as u16;
        if y >= board_rect.y + board_rect.height {
            continue;
        }
        for x in board_rect.x..board_rect.x + board_rect.width {
            set.insert((x, y));
        }
    }
    set
}

/// Create or advance the line-clear fade (TachyonFX: fade clearing rows to bg).
fn apply_line_clear_effect(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: &ViewOptions,
    board_rect: Rect,
    clear_fx: &mut ClearFx,
    now: Instant,
) {
    let delta = clear_fx
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    clear_fx.last_process = Some(now);

    if clear_fx.effect.is_none() {
        let clearing_set = clearing_buffer_positions(board_rect, view, state);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            clearing_set.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(theme.board_bg, theme.board_bg, (LINE_CLEAR_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        clear_fx.effect = Some(effect);
    }

    if let Some(effect) = clear_fx.effect.as_mut() {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.accent);
    let fg_style = Style::default().fg(theme.text);
    let border_style = Style::default().fg(theme.border).bg(theme.board_bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, title_style), Span::styled(value, fg_style)])
    };
    let stats = vec![
        stat("Level:  ", state.level().to_string()),
        stat("Points: ", state.points().to_string()),
        stat("Rows:   ", state.rows_cleared().to_string()),
        stat("Next:   ", format!("{} rows", state.rows_until_next_level())),
        stat("Start:  ", state.start_level().to_string()),
    ];
    Paragraph::new(stats)
        .block(Block::default().borders(Borders::ALL).border_style(border_style))
        .render(chunks[0], frame.buffer_mut());

    let key = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{keys:<10}"), Style::default().fg(theme.pieces[5])),
            Span::styled(what, fg_style),
        ])
    };
    let controls = vec![
        key("← h", "Move left"),
        key("→ l", "Move right"),
        key("↑ k", "Rotate"),
        key("↓ j", "Soft drop"),
        key("Space ⏎", "Hard drop"),
        key("R", "Restart"),
        key("Q Esc", "Quit"),
    ];
    Paragraph::new(controls)
        .block(Block::default().borders(Borders::ALL).border_style(border_style))
        .render(chunks[2], frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, board_area: Rect) {
    let popup_w = board_area.width.saturating_sub(2).max(20);
    let popup_h = 9u16;
    let popup = Rect {
        x: board_area.x + board_area.width.saturating_sub(popup_w) / 2,
        y: board_area.y + board_area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(frame.area().width),
        height: popup_h.min(frame.area().height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " GAME OVER ",
            Style::default().fg(Color::White).bg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Points: {} ", state.points()),
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            format!(" Level {}  Rows {} ", state.level(), state.rows_cleared()),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R Restart  Q Quit ",
            Style::default().fg(theme.muted),
        )),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.board_bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border).bg(theme.board_bg)),
        );
    p.render(popup, frame.buffer_mut());
}
