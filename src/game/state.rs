use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the board, in pixel units (always a multiple of the cell size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move one cell of `cell_size` pixels in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * cell_size,
            y: self.y + dy * cell_size,
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
    /// Direction the next tick moves in
    pub direction: Direction,
    /// Direction of the last completed move; turns are judged against it
    pub heading: Direction,
}

impl Snake {
    /// A one-cell snake
    pub fn new(head: Cell, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
            heading: direction,
        }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_cells(body: Vec<Cell>, direction: Direction) -> Self {
        Self {
            body,
            direction,
            heading: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Segment count, head included
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Engine-built snakes always have a head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What the head would have run into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Playing,
    Lost,
    Won,
}

/// Complete game state, owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` after a reset until the next tick places it
    pub food: Option<Cell>,
    pub exit: Cell,
    pub score: u32,
    pub ticks: u64,
    pub lost: bool,
    pub won: bool,
}

impl GameState {
    /// A game in progress: not lost, not won, no ticks yet
    pub fn new(snake: Snake, food: Option<Cell>, exit: Cell) -> Self {
        Self {
            snake,
            food,
            exit,
            score: 0,
            ticks: 0,
            lost: false,
            won: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.won {
            Phase::Won
        } else if self.lost {
            Phase::Lost
        } else {
            Phase::Playing
        }
    }

    /// Immutable copy handed to renderers and other observers.
    ///
    /// The exit only shows up once the snake is longer than `win_threshold`.
    pub fn snapshot(&self, win_threshold: usize) -> Snapshot {
        Snapshot {
            snake: self.snake.body.clone(),
            direction: self.snake.direction,
            food: self.food,
            exit: (self.snake.len() > win_threshold).then_some(self.exit),
            score: self.score,
            ticks: self.ticks,
            lost: self.lost,
            won: self.won,
        }
    }
}

/// Read-only view of a game after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Head first
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub exit: Option<Cell>,
    pub score: u32,
    pub ticks: u64,
    pub lost: bool,
    pub won: bool,
}

impl Snapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn phase(&self) -> Phase {
        if self.won {
            Phase::Won
        } else if self.lost {
            Phase::Lost
        } else {
            Phase::Playing
        }
    }
}
