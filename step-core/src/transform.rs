//! Piece transforms.
//!
//! Each user action maps the current [`State`] to a new one. Transforms are
//! pure: randomness is supplied by the caller.

use rand::Rng;
use twostep_types::{Color, State};

/// Exclusive upper bound for randomized coordinates.
pub const RANDOM_BOUND: u32 = 1000;

/// Reason a relative move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    /// The move would put the piece left of zero.
    NegativeX {
        /// The x the move would have produced.
        attempted: i64,
    },
    /// The move would overflow the coordinate range.
    OutOfRange,
}

impl std::fmt::Display for MoveRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRejected::NegativeX { attempted } => {
                write!(f, "move rejected: x would be {}", attempted)
            }
            MoveRejected::OutOfRange => write!(f, "move rejected: coordinate out of range"),
        }
    }
}

impl std::error::Error for MoveRejected {}

/// Move the piece by `(dx, dy)`.
///
/// A negative resulting x rejects the whole move. A negative resulting y is
/// clamped to zero and the move proceeds.
pub fn move_by(state: State, dx: i64, dy: i64) -> Result<State, MoveRejected> {
    let new_x = i64::from(state.x)
        .checked_add(dx)
        .ok_or(MoveRejected::OutOfRange)?;
    if new_x < 0 {
        return Err(MoveRejected::NegativeX { attempted: new_x });
    }
    let new_x = u32::try_from(new_x).map_err(|_| MoveRejected::OutOfRange)?;
    let new_y = i64::from(state.y)
        .checked_add(dy)
        .ok_or(MoveRejected::OutOfRange)?
        .max(0);
    let new_y = u32::try_from(new_y).map_err(|_| MoveRejected::OutOfRange)?;
    Ok(state.with_position(new_x, new_y))
}

/// Move the piece back to the origin, keeping its color.
pub fn reset(state: State) -> State {
    State::origin(state.color)
}

/// Place the piece at a uniformly random position in `[0, 1000)²`.
pub fn randomize<R: Rng>(state: State, rng: &mut R) -> State {
    let x = rng.gen_range(0..RANDOM_BOUND);
    let y = rng.gen_range(0..RANDOM_BOUND);
    state.with_position(x, y)
}

/// Recolor the piece, keeping its position.
pub fn set_color(state: State, color: Color) -> State {
    state.with_color(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn move_adds_deltas() {
        let moved = move_by(State::default(), 10, -5).unwrap();
        assert_eq!(moved, State::new(110, 45, Color::White));
    }

    #[test]
    fn negative_x_rejects_whole_move() {
        let result = move_by(State::default(), -1000, 20);
        assert_eq!(result, Err(MoveRejected::NegativeX { attempted: -900 }));
    }

    #[test]
    fn x_of_exactly_zero_is_allowed() {
        let moved = move_by(State::default(), -100, 0).unwrap();
        assert_eq!(moved.x, 0);
    }

    #[test]
    fn negative_y_clamps_to_zero() {
        let moved = move_by(State::default(), 0, -1000).unwrap();
        assert_eq!(moved, State::new(100, 0, Color::White));
    }

    #[test]
    fn overflowing_x_is_rejected() {
        let state = State::new(u32::MAX, 0, Color::White);
        assert_eq!(move_by(state, 1, 0), Err(MoveRejected::OutOfRange));
    }

    #[test]
    fn extreme_deltas_are_out_of_range() {
        let state = State::default();
        assert_eq!(move_by(state, i64::MAX, 0), Err(MoveRejected::OutOfRange));
        assert_eq!(move_by(state, 0, i64::MAX), Err(MoveRejected::OutOfRange));
        assert_eq!(
            move_by(state, i64::MIN, 0),
            Err(MoveRejected::NegativeX {
                attempted: i64::MIN + 100
            })
        );
        assert_eq!(move_by(state, 0, i64::MIN), Ok(State::new(100, 0, Color::White)));
    }

    #[test]
    fn reset_keeps_color() {
        let state = State::new(3, 4, Color::Red);
        assert_eq!(reset(state), State::new(100, 50, Color::Red));
    }

    #[test]
    fn randomize_stays_in_bounds_and_keeps_color() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = State::new(0, 0, Color::Green);
        for _ in 0..200 {
            let s = randomize(start, &mut rng);
            assert!(s.x < RANDOM_BOUND);
            assert!(s.y < RANDOM_BOUND);
            assert_eq!(s.color, Color::Green);
        }
    }

    #[test]
    fn randomize_is_deterministic_for_seed() {
        let a = randomize(State::default(), &mut StdRng::seed_from_u64(42));
        let b = randomize(State::default(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn set_color_keeps_position() {
        let state = State::new(12, 34, Color::White);
        assert_eq!(set_color(state, Color::Blue), State::new(12, 34, Color::Blue));
    }
}
