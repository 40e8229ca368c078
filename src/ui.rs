#![allow(
    // Board coordinates are tiny and checked against the board size before casting
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use crate::app::App;
use crate::components::Piece;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

// Each cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;
const BOARD_AREA_WIDTH: u16 = BOARD_WIDTH as u16 * CELL_WIDTH + 2;
const BOARD_AREA_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;
const INFO_WIDTH: u16 = 20;

/// Side length of the next-piece preview, in cells.
pub const PREVIEW_SIZE: usize = 4;

const BLOCK_COLOR: Color = Color::Rgb(0x4d, 0x6d, 0x4f);
const GHOST_COLOR: Color = Color::Rgb(0xb4, 0xee, 0x7e);
const PREVIEW_COLOR: Color = Color::Rgb(0x85, 0x8d, 0x57);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Ghost,
    Locked,
    Active,
}

/// What each board cell shows this frame, indexed `[row][col]`.
///
/// The ghost is drawn first so locked cells and the active piece cover it.
#[must_use]
pub fn board_view(app: &App, show_ghost: bool) -> Vec<Vec<CellView>> {
    let board = app.board();
    let mut view = vec![vec![CellView::Empty; board.width()]; board.height()];

    if show_ghost && !app.is_game_over() {
        paint_piece(&mut view, &app.ghost_piece(), CellView::Ghost);
    }

    for (y, row) in board.rows().enumerate() {
        for (x, occupied) in row.iter().enumerate() {
            if *occupied {
                view[y][x] = CellView::Locked;
            }
        }
    }

    paint_piece(&mut view, app.current_piece(), CellView::Active);
    view
}

// Cells above the visible board are skipped
fn paint_piece(view: &mut [Vec<CellView>], piece: &Piece, cell: CellView) {
    for (x, y) in piece.cells() {
        if x < 0 || y < 0 {
            continue;
        }
        if let Some(slot) = view
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *slot = cell;
        }
    }
}

/// The next piece centred in a `PREVIEW_SIZE` square.
#[must_use]
pub fn next_preview(piece: &Piece) -> [[bool; PREVIEW_SIZE]; PREVIEW_SIZE] {
    let mut grid = [[false; PREVIEW_SIZE]; PREVIEW_SIZE];
    let offset_x = PREVIEW_SIZE.saturating_sub(piece.shape.width()) / 2;
    let offset_y = PREVIEW_SIZE.saturating_sub(piece.shape.height()) / 2;

    for (col, row) in piece.shape.filled_cells() {
        if let Some(cell) = grid
            .get_mut(row + offset_y)
            .and_then(|r| r.get_mut(col + offset_x))
        {
            *cell = true;
        }
    }
    grid
}

pub fn render(f: &mut Frame, app: &App) {
    let min_total_width = BOARD_AREA_WIDTH + INFO_WIDTH;
    let min_total_height = BOARD_AREA_HEIGHT + 2;

    if f.area().width < min_total_width || f.area().height < min_total_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Blockfall"));

        f.render_widget(warning_text, centered_rect(80, 50, f.area()));
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_AREA_WIDTH),
            Constraint::Min(INFO_WIDTH),
        ])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                 // Title
            Constraint::Length(BOARD_AREA_HEIGHT), // Board
            Constraint::Min(0),
        ])
        .split(main_layout[0]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Spacer matching the title
            Constraint::Length(PREVIEW_SIZE as u16 + 2),
            Constraint::Length(7), // Stats
            Constraint::Min(3),    // Controls
        ])
        .split(main_layout[1]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);

    if app.config.display.show_next {
        render_next_piece(f, app.next_piece(), info_layout[1]);
    }

    render_stats(f, app, info_layout[2]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move\n\
        ↑: Rotate\n\
        ↓ (hold): Fast drop\n\
        Enter: Restart\n\
        Q: Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

fn render_game_board(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let view = board_view(app, app.config.display.show_ghost);
    for (y, row) in view.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (symbol, color) = match cell {
                CellView::Empty => continue,
                CellView::Ghost => ("░", GHOST_COLOR),
                CellView::Locked | CellView::Active => ("█", BLOCK_COLOR),
            };
            let cell_x = inner_area.left() + x as u16 * CELL_WIDTH;
            let cell_y = inner_area.top() + y as u16;
            paint_cell(f, cell_x, cell_y, inner_area, symbol, color);
        }
    }

    if app.is_game_over() {
        let game_over = Paragraph::new("GAME OVER")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

        let game_over_area = Rect {
            x: inner_area.x,
            y: inner_area.y + inner_area.height / 2,
            width: inner_area.width,
            height: 1,
        };
        f.render_widget(game_over, game_over_area);
    }
}

fn render_next_piece(f: &mut Frame, piece: &Piece, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Next");
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    for (y, row) in next_preview(piece).iter().enumerate() {
        for (x, filled) in row.iter().enumerate() {
            if *filled {
                let cell_x = inner_area.left() + x as u16 * CELL_WIDTH;
                let cell_y = inner_area.top() + y as u16;
                paint_cell(f, cell_x, cell_y, inner_area, "█", PREVIEW_COLOR);
            }
        }
    }
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let game_state = app.game_state();
    let stats = format!(
        "Score: {}\nLines: {}\nLevel: {}",
        game_state.score, game_state.lines_cleared, game_state.level,
    );

    let paragraph = if game_state.game_over {
        Paragraph::new(format!("{stats}\n\nGAME OVER!\nPress Enter to restart"))
            .style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(stats).style(Style::default().fg(Color::Cyan))
    };
    f.render_widget(paragraph.wrap(Wrap { trim: true }), area);
}

// Each board cell is two terminal cells wide
fn paint_cell(f: &mut Frame, x: u16, y: u16, clip: Rect, symbol: &str, color: Color) {
    for dx in 0..CELL_WIDTH {
        let cell_x = x + dx;
        if cell_x >= clip.right() || y >= clip.bottom() {
            continue;
        }
        if let Some(cell) = f.buffer_mut().cell_mut((cell_x, y)) {
            cell.set_symbol(symbol);
            cell.set_fg(color);
            cell.set_bg(Color::Black);
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
