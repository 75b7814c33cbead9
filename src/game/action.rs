use serde::{Deserialize, Serialize};

use super::state::Cell;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Resolve a pointer location into a turn, relative to the head.
    ///
    /// Only perpendicular turns are possible: while moving vertically the
    /// point picks Left or Right by its x coordinate, while moving
    /// horizontally it picks Up or Down by its y coordinate. A point level
    /// with the head on the relevant axis yields `None`.
    pub fn turn_toward(&self, head: Cell, point: Cell) -> Option<Direction> {
        if self.is_vertical() {
            match point.x.cmp(&head.x) {
                std::cmp::Ordering::Less => Some(Direction::Left),
                std::cmp::Ordering::Greater => Some(Direction::Right),
                std::cmp::Ordering::Equal => None,
            }
        } else {
            match point.y.cmp(&head.y) {
                std::cmp::Ordering::Less => Some(Direction::Up),
                std::cmp::Ordering::Greater => Some(Direction::Down),
                std::cmp::Ordering::Equal => None,
            }
        }
    }
}

/// Input queued by a driver and applied to the engine before the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pointer input at a board location, in pixels
    Tap(Cell),
    /// Keyboard steering; resolved against the head like a tap one cell away
    Steer(Direction),
    /// Start over regardless of the current state
    Restart,
}
