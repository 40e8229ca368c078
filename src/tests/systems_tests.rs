#[cfg(test)]
mod tests {
    use crate::components::{ActivePiece, Board, GameState, NextPiece, Piece};
    use crate::shapes::ShapeKind;
    use crate::systems::*;
    use crate::tests::test_utils::{create_test_world, fill_row_except, set_board, set_pieces};

    #[test]
    fn test_start_session() {
        let world = create_test_world();

        assert!(world.resource::<Board>().is_empty());
        assert_eq!(*world.resource::<GameState>(), GameState::default());

        let current = &world.resource::<ActivePiece>().0;
        let next = &world.resource::<NextPiece>().0;
        assert_eq!((current.x, current.y), (4, 0));
        assert_eq!((next.x, next.y), (4, 0));
    }

    #[test]
    fn test_move_system() {
        let mut world = create_test_world();
        set_pieces(
            &mut world,
            Piece::spawn(ShapeKind::O),
            Piece::spawn(ShapeKind::T),
        );

        assert!(move_system(&mut world, -1));
        assert_eq!(world.resource::<ActivePiece>().0.x, 3);
        assert!(move_system(&mut world, 1));
        assert!(move_system(&mut world, 1));
        assert_eq!(world.resource::<ActivePiece>().0.x, 5);
    }

    #[test]
    fn test_move_system_rejects_blocked_move() {
        let mut world = create_test_world();
        set_pieces(
            &mut world,
            Piece::spawn(ShapeKind::O),
            Piece::spawn(ShapeKind::T),
        );
        let mut board = Board::new();
        board.set(3, 1, true);
        set_board(&mut world, board);

        assert!(!move_system(&mut world, -1));
        assert_eq!(world.resource::<ActivePiece>().0, Piece::spawn(ShapeKind::O));
    }

    #[test]
    fn test_rotate_system() {
        let mut world = create_test_world();
        set_pieces(
            &mut world,
            Piece::spawn(ShapeKind::T),
            Piece::spawn(ShapeKind::O),
        );

        assert!(rotate_system(&mut world));
        let piece = &world.resource::<ActivePiece>().0;
        assert_eq!((piece.shape.width(), piece.shape.height()), (2, 3));
        assert_eq!((piece.x, piece.y), (4, 0));
    }

    #[test]
    fn test_rotate_system_has_no_wall_kick() {
        let mut world = create_test_world();
        let vertical = Piece::spawn(ShapeKind::I).rotated().moved(5, 3);
        set_pieces(&mut world, vertical.clone(), Piece::spawn(ShapeKind::O));

        // Horizontal I anchored at column 9 would poke through the right wall
        assert!(!rotate_system(&mut world));
        assert_eq!(world.resource::<ActivePiece>().0, vertical);
    }

    #[test]
    fn test_fast_drop_system() {
        let mut world = create_test_world();
        fast_drop_system(&mut world, true);
        assert!(world.resource::<GameState>().fast_drop);

        // No immediate effect on the piece
        assert_eq!(world.resource::<ActivePiece>().0.y, 0);

        fast_drop_system(&mut world, false);
        assert!(!world.resource::<GameState>().fast_drop);
    }

    #[test]
    fn test_tick_system_falls() {
        let mut world = create_test_world();
        assert_eq!(tick_system(&mut world), TickOutcome::Fell);
        assert_eq!(world.resource::<ActivePiece>().0.y, 1);
    }

    #[test]
    fn test_tick_system_locks_and_promotes_next() {
        let mut world = create_test_world();
        set_pieces(
            &mut world,
            Piece::spawn(ShapeKind::O).moved(0, 18),
            Piece::spawn(ShapeKind::L).moved(2, 7),
        );

        assert_eq!(tick_system(&mut world), TickOutcome::Locked { cleared: 0 });

        let board = world.resource::<Board>();
        assert!(board.is_occupied(4, 18));
        assert!(board.is_occupied(5, 19));
        assert_eq!(board.occupied_count(), 4);

        // The preview piece is re-anchored at spawn
        let current = &world.resource::<ActivePiece>().0;
        assert_eq!(current.kind, ShapeKind::L);
        assert_eq!((current.x, current.y), (4, 0));
    }

    #[test]
    fn test_lock_clears_and_scores() {
        let mut world = create_test_world();
        let mut board = Board::new();
        fill_row_except(&mut board, 19, &[4, 5]);
        fill_row_except(&mut board, 18, &[4, 5]);
        set_board(&mut world, board);
        set_pieces(
            &mut world,
            Piece::spawn(ShapeKind::O).moved(0, 18),
            Piece::spawn(ShapeKind::T),
        );

        assert_eq!(tick_system(&mut world), TickOutcome::Locked { cleared: 2 });
        assert!(world.resource::<Board>().is_empty());

        let state = world.resource::<GameState>();
        assert_eq!(state.score, 300);
        assert_eq!(state.lines_cleared, 2);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_systems_are_noops_after_game_over() {
        let mut world = create_test_world();
        world.resource_mut::<GameState>().game_over = true;
        let before = world.resource::<ActivePiece>().0.clone();

        assert!(!move_system(&mut world, 1));
        assert!(!rotate_system(&mut world));
        fast_drop_system(&mut world, true);
        assert_eq!(tick_system(&mut world), TickOutcome::Idle);

        assert_eq!(world.resource::<ActivePiece>().0, before);
        assert!(!world.resource::<GameState>().fast_drop);
        assert!(world.resource::<Board>().is_empty());
    }

    #[test]
    fn test_ghost_system() {
        let world = create_test_world();
        let ghost = ghost_system(&world);
        let current = &world.resource::<ActivePiece>().0;

        assert_eq!(ghost.x, current.x);
        assert_eq!(ghost.shape, current.shape);
        assert_eq!(ghost.y + ghost.shape.height() as i32, 20);
    }
}
