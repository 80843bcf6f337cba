//! Board tests - geometry, gravity, line clears and garbage

use obseris::core::{get_shape, Board};
use obseris::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.cells().len(), BOARD_WIDTH as usize * BOARD_HEIGHT as usize);
    assert_eq!(board.stack_height(), 0);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(false));
        }
    }
    assert!(board.is_empty());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);

    // Off-grid counts as blocked, never as valid.
    assert!(board.is_blocked(-1, 10));
    assert!(!board.is_valid(-1, 10));
    assert!(!board.is_occupied(-1, 10));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, true));
    assert_eq!(board.get(5, 10), Some(true));
    assert!(board.is_occupied(5, 10));

    assert!(board.set(5, 10, false));
    assert_eq!(board.get(5, 10), Some(false));

    assert!(!board.set(10, 0, true));
}

#[test]
fn test_drop_y_lands_on_stack() {
    let board = Board::with_bottom_rows(&["####......"]);
    let shape = get_shape(PieceKind::O, Rotation::North);

    // O occupies (x, y) .. (x+1, y+1) relative to the pivot row above.
    let over_stack = board.drop_y(&shape, 0, 20);
    let over_floor = board.drop_y(&shape, 6, 20);
    assert_eq!(over_floor, over_stack + 1);
    assert!(board.fits(&shape, 6, over_floor));
    assert!(!board.fits(&shape, 6, over_floor + 1));
}

#[test]
fn test_clear_lines_removes_only_full_rows() {
    let board = Board::with_bottom_rows(&["#.........", "##########", "#########.", "##########"]);
    let (cleared, lines) = board.clear_lines();
    assert_eq!(lines, 2);

    // Remaining rows slide down, keeping their order.
    assert!(cleared.is_occupied(0, 39));
    assert!(!cleared.is_occupied(9, 39));
    assert!(cleared.is_occupied(0, 38));
    assert!(!cleared.is_occupied(1, 38));
    assert!((0..10).all(|x| !cleared.is_occupied(x, 37)));

    for y in 0..BOARD_HEIGHT as usize {
        assert!(!cleared.is_row_full(y));
    }
}

#[test]
fn test_clearing_then_placing_never_restores_full_row() {
    let board = Board::with_bottom_rows(&["######....", "######.###"]);
    let shape = get_shape(PieceKind::I, Rotation::East);
    let y = board.drop_y(&shape, 4, 20);
    let (after, lines) = board.place(&shape, 4, y).clear_lines();
    assert_eq!(lines, 0);

    let o = get_shape(PieceKind::O, Rotation::North);
    let oy = after.drop_y(&o, 6, 20);
    let (after, lines) = after.place(&o, 6, oy).clear_lines();
    assert!(lines <= 1);
    for y in 0..BOARD_HEIGHT as usize {
        assert!(!after.is_row_full(y));
    }
}

#[test]
fn test_garbage_push_and_overflow() {
    let mut board = Board::with_bottom_rows(&["#........."]);
    board.push_garbage(2, 3);

    assert!(board.is_occupied(0, 37));
    for y in 38..40 {
        assert!(!board.is_occupied(3, y));
        assert_eq!((0..10).filter(|&x| board.is_occupied(x, y)).count(), 9);
    }

    let mut tall = Board::new();
    tall.set(0, 2, true);
    assert!(!tall.garbage_overflows(2));
    assert!(tall.garbage_overflows(3));
}
