#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::components::{Board, GameState, Piece};
    use crate::shapes::ShapeKind;
    use crate::tests::test_utils::{create_test_app, set_board, set_pieces};
    use crate::ui::{self, CellView, board_view, centered_rect, next_preview};
    use ratatui::{backend::TestBackend, layout::Rect, prelude::*};

    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn rendered_text(app: &App, width: u16, height: u16) -> String {
        let mut terminal = create_test_terminal(width, height);
        terminal.draw(|f| ui::render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn cells_of(view: &[Vec<CellView>], kind: CellView) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for (y, row) in view.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if *cell == kind {
                    found.push((x, y));
                }
            }
        }
        found
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 40, area);

        assert_eq!(centered.width, 50);
        assert_eq!(centered.height, 40);
        assert_eq!(centered.x, 25);
        assert_eq!(centered.y, 30);
    }

    #[test]
    fn test_board_view_layers() {
        let mut app = create_test_app(ShapeKind::O, ShapeKind::T);
        let mut board = Board::new();
        board.set(0, 19, true);
        set_board(&mut app.world, board);

        let view = board_view(&app, true);
        assert_eq!(view.len(), 20);
        assert!(view.iter().all(|row| row.len() == 10));

        assert_eq!(cells_of(&view, CellView::Active), vec![(4, 0), (5, 0), (4, 1), (5, 1)]);
        assert_eq!(
            cells_of(&view, CellView::Ghost),
            vec![(4, 18), (5, 18), (4, 19), (5, 19)]
        );
        assert_eq!(cells_of(&view, CellView::Locked), vec![(0, 19)]);
    }

    #[test]
    fn test_board_view_without_ghost() {
        let app = create_test_app(ShapeKind::O, ShapeKind::T);
        let view = board_view(&app, false);
        assert!(cells_of(&view, CellView::Ghost).is_empty());
        assert_eq!(cells_of(&view, CellView::Active).len(), 4);
    }

    #[test]
    fn test_active_piece_covers_ghost() {
        let mut app = create_test_app(ShapeKind::O, ShapeKind::T);
        set_pieces(
            &mut app.world,
            Piece::spawn(ShapeKind::O).moved(0, 18),
            Piece::spawn(ShapeKind::T),
        );

        let view = board_view(&app, true);
        assert!(cells_of(&view, CellView::Ghost).is_empty());
        assert_eq!(cells_of(&view, CellView::Active).len(), 4);
    }

    #[test]
    fn test_cells_above_board_are_hidden() {
        let mut app = create_test_app(ShapeKind::O, ShapeKind::T);
        let vertical = Piece::spawn(ShapeKind::I).rotated().moved(0, -2);
        set_pieces(&mut app.world, vertical, Piece::spawn(ShapeKind::T));

        let view = board_view(&app, false);
        assert_eq!(cells_of(&view, CellView::Active), vec![(4, 0), (4, 1)]);
    }

    #[test]
    fn test_next_preview_is_centered() {
        let i = next_preview(&Piece::spawn(ShapeKind::I));
        assert_eq!(i[1], [true, true, true, true]);
        assert_eq!(i.iter().flatten().filter(|c| **c).count(), 4);

        let o = next_preview(&Piece::spawn(ShapeKind::O));
        assert_eq!(o[1], [false, true, true, false]);
        assert_eq!(o[2], [false, true, true, false]);

        // Three-wide shapes lean left
        let t = next_preview(&Piece::spawn(ShapeKind::T));
        assert_eq!(t[1], [false, true, false, false]);
        assert_eq!(t[2], [true, true, true, false]);
    }

    #[test]
    fn test_render_shows_stats() {
        let app = create_test_app(ShapeKind::T, ShapeKind::O);
        let text = rendered_text(&app, 60, 30);

        assert!(text.contains("BLOCKFALL"));
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Lines: 0"));
        assert!(text.contains("Level: 1"));
        assert!(text.contains("Next"));
        assert!(!text.contains("GAME OVER"));
    }

    #[test]
    fn test_render_game_over() {
        let mut app = create_test_app(ShapeKind::T, ShapeKind::O);
        app.world.resource_mut::<GameState>().game_over = true;

        let text = rendered_text(&app, 60, 30);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Press Enter to restart"));
    }

    #[test]
    fn test_render_with_small_terminal() {
        let app = create_test_app(ShapeKind::T, ShapeKind::O);
        let text = rendered_text(&app, 30, 12);
        assert!(text.contains("Terminal too small!"));
        assert!(!text.contains("Score"));
    }

    #[test]
    fn test_render_does_not_mutate() {
        let app = create_test_app(ShapeKind::S, ShapeKind::Z);
        let piece = app.current_piece().clone();
        let state = app.game_state().clone();

        let _ = rendered_text(&app, 60, 30);
        let _ = rendered_text(&app, 60, 30);

        assert_eq!(app.current_piece(), &piece);
        assert_eq!(app.game_state(), &state);
    }
}
