//! Whole-session tests driving the game through its public API.

use stacktui::catalog::PieceKind;
use stacktui::game::{CLEAR_DELAY, GameState, Phase};
use stacktui::grid::{HEIGHT, WIDTH};
use stacktui::input::{InputState, Keys};
use stacktui::piece::ActivePiece;

const FRAME: f64 = 1.0 / 60.0;

fn hard_drop() -> InputState {
    InputState::from_snapshots(
        Keys::default(),
        Keys {
            hard_drop: true,
            ..Keys::default()
        },
    )
}

#[test]
fn test_hard_dropping_every_frame_tops_out() {
    let mut state = GameState::with_seed(0, 2024, 0.0);
    let mut frame = 0;
    while state.phase() != Phase::GameOver && frame < 5_000 {
        frame += 1;
        state.update(f64::from(frame) * FRAME, &hard_drop());
        assert!(state.grid().rows().flatten().all(|&v| v <= 7));
    }
    assert_eq!(state.phase(), Phase::GameOver);
    assert!(!state.grid().row_is_empty(0));
    // Columns left of the spawn point are never reached, so nothing clears.
    assert_eq!((state.rows_cleared(), state.points()), (0, 0));

    let grid = state.grid().clone();
    state.update(f64::from(frame + 100) * FRAME, &hard_drop());
    assert_eq!(state.grid(), &grid);
}

#[test]
fn test_same_seed_same_session() {
    let mut a = GameState::with_seed(5, 77, 0.0);
    let mut b = GameState::with_seed(5, 77, 0.0);
    for frame in 1..600 {
        let input = if frame % 7 == 0 {
            hard_drop()
        } else {
            InputState::default()
        };
        let time = f64::from(frame) * FRAME;
        a.update(time, &input);
        b.update(time, &input);
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.piece(), b.piece());
        assert_eq!(a.phase(), b.phase());
    }
}

#[test]
fn test_single_row_clear_scores_and_respawns() {
    let mut state = GameState::with_seed(0, 1, 0.0);
    state.piece = ActivePiece::spawn(PieceKind::I);
    for col in (0..WIDTH).filter(|c| !(5..9).contains(c)) {
        state.grid.set(HEIGHT - 1, col, 1);
    }

    state.update(FRAME, &hard_drop());
    assert_eq!(state.phase(), Phase::Clearing);
    assert!(state.clearing_rows()[HEIGHT - 1]);

    state.update(FRAME + CLEAR_DELAY, &InputState::default());
    assert_eq!(state.phase(), Phase::Falling);
    assert_eq!(state.points(), 40);
    assert_eq!(state.rows_cleared(), 1);
    assert_eq!(state.grid().occupied_count(), 0);
    assert_eq!((state.piece().row, state.piece().col), (0, 5));
    assert_eq!(state.rows_until_next_level(), 9);
}
