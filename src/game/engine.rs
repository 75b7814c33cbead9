use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    grid::Grid,
    state::{Cell, CollisionType, GameState, Snake, Snapshot},
};
use crate::error::ConfigError;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is over (lost or won); nothing moved
    Idle,
    /// The snake advanced one cell
    Moved { ate_food: bool },
    /// The move would have hit a wall or the body; the score is gone
    Lost {
        collision: CollisionType,
        forfeited_score: u32,
    },
    /// The snake reached the open exit
    Won { ate_food: bool },
}

impl TickOutcome {
    pub fn ate_food(&self) -> bool {
        matches!(
            self,
            TickOutcome::Moved { ate_food: true } | TickOutcome::Won { ate_food: true }
        )
    }
}

/// The game engine that owns the state and applies every rule
pub struct GameEngine<R = StdRng> {
    grid: Grid,
    win_threshold: usize,
    food_score: u32,
    state: GameState,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create an engine seeded from `config.seed`, or from entropy when unset
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food positions from `rng`
    pub fn with_rng(config: &GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid()?;
        let state = initial_state(&grid);

        Ok(Self {
            grid,
            win_threshold: config.win_threshold,
            food_score: config.food_score,
            state,
            rng,
        })
    }

    /// Resume from an existing state, e.g. a recorded position or a test setup.
    ///
    /// The snake needs a head and the food must not sit under the body.
    pub fn with_state(config: &GameConfig, state: GameState, rng: R) -> Result<Self, ConfigError> {
        if state.snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        if let Some(food) = state.food.filter(|food| state.snake.contains(*food)) {
            return Err(ConfigError::FoodUnderSnake {
                x: food.x,
                y: food.y,
            });
        }

        let mut engine = Self::with_rng(config, rng)?;
        engine.state = state;
        Ok(engine)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.win_threshold)
    }

    /// Start a fresh game: one-cell snake heading right, no score.
    /// Food is marked eaten and placed on the next tick.
    pub fn reset(&mut self) {
        self.state = initial_state(&self.grid);
        info!("game reset");
    }

    /// Steer toward a board location.
    ///
    /// While lost this restarts the game instead; once won it does nothing.
    pub fn set_direction(&mut self, point: Cell) {
        if self.state.won {
            return;
        }
        if self.state.lost {
            self.reset();
            return;
        }

        let snake = &mut self.state.snake;
        if let Some(turn) = snake.heading.turn_toward(snake.head(), point) {
            snake.direction = turn;
        }
    }

    /// Keyboard steering: same rules as a tap one cell from the head
    pub fn steer(&mut self, direction: Direction) {
        let point = self
            .state
            .snake
            .head()
            .stepped(direction, self.grid.cell_size());
        self.set_direction(point);
    }

    /// Apply a queued driver action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Tap(point) => self.set_direction(point),
            Action::Steer(direction) => self.steer(direction),
            Action::Restart => self.reset(),
        }
    }

    /// Advance the world by one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.food.is_none() {
            self.place_food();
        }

        if self.state.lost || self.state.won {
            return TickOutcome::Idle;
        }

        self.state.ticks += 1;

        let snake = &self.state.snake;
        let new_head = snake.head().stepped(snake.direction, self.grid.cell_size());

        if let Some(collision) = self.check_collision(new_head) {
            let forfeited_score = self.state.score;
            self.state.lost = true;
            self.state.score = 0;
            debug!(?collision, forfeited_score, tick = self.state.ticks, "snake crashed");
            return TickOutcome::Lost {
                collision,
                forfeited_score,
            };
        }

        let length_before = self.state.snake.len();
        let snake = &mut self.state.snake;
        snake.body.insert(0, new_head);
        snake.heading = snake.direction;

        if length_before > self.win_threshold && snake.contains(self.state.exit) {
            self.state.won = true;
        }

        // Food is never under the body, so only the new head can reach it
        let ate_food = self.state.food == Some(new_head);
        if ate_food {
            self.state.score += self.food_score;
            self.state.food = None;
            debug!(score = self.state.score, length = snake.len(), "food eaten");
        } else {
            snake.body.pop();
        }

        if ate_food {
            self.place_food();
        }

        if self.state.won {
            info!(score = self.state.score, tick = self.state.ticks, "reached the exit");
            TickOutcome::Won { ate_food }
        } else {
            TickOutcome::Moved { ate_food }
        }
    }

    /// Check if the new head position causes a collision.
    /// The whole body counts, tail included.
    fn check_collision(&self, head: Cell) -> Option<CollisionType> {
        if self.state.snake.contains(head) {
            return Some(CollisionType::SelfCollision);
        }
        if self.grid.is_wall(head) {
            return Some(CollisionType::Wall);
        }
        None
    }

    /// Put the food on a random candidate cell the snake does not cover
    fn place_food(&mut self) {
        let snake = &self.state.snake;
        let spot = self
            .grid
            .food_candidates()
            .filter(|cell| !snake.contains(*cell))
            .choose(&mut self.rng);

        match spot {
            Some(cell) => self.state.food = Some(cell),
            None => warn!(length = snake.len(), "no free cell left for food"),
        }
    }
}

fn initial_state(grid: &Grid) -> GameState {
    GameState::new(
        Snake::new(grid.seed_cell(), Direction::Right),
        None,
        grid.exit_cell(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(snake: Snake, food: Option<Cell>) -> GameEngine {
        let config = GameConfig::default();
        let exit = config.grid().unwrap().exit_cell();
        let state = GameState::new(snake, food, exit);
        GameEngine::with_state(&config, state, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_reset() {
        let mut engine = engine_with(
            Snake::from_cells(
                vec![Cell::new(100, 100), Cell::new(80, 100)],
                Direction::Down,
            ),
            Some(Cell::new(20, 20)),
        );
        engine.state.score = 40;
        engine.state.lost = true;

        engine.reset();

        let state = engine.state();
        assert!(!state.lost);
        assert!(!state.won);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.body, vec![Cell::new(80, 80)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.food, None);
    }

    #[test]
    fn test_first_tick_places_food() {
        let config = GameConfig {
            seed: Some(3),
            ..Default::default()
        };
        let mut engine = GameEngine::new(&config).unwrap();
        assert_eq!(engine.state().food, None);

        engine.tick();

        let food = engine.state().food.unwrap();
        assert!(engine.grid().food_candidates().any(|cell| cell == food));
        assert!(!engine.state().snake.contains(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine_with(
            Snake::new(Cell::new(80, 80), Direction::Right),
            Some(Cell::new(300, 300)),
        );

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Moved { ate_food: false });
        assert_eq!(engine.state().snake.body, vec![Cell::new(100, 80)]);
        assert_eq!(engine.state().ticks, 1);
        assert_eq!(engine.state().food, Some(Cell::new(300, 300)));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine_with(
            Snake::new(Cell::new(80, 80), Direction::Right),
            Some(Cell::new(100, 80)),
        );

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Moved { ate_food: true });
        assert!(outcome.ate_food());
        assert_eq!(engine.state().score, 10);
        assert_eq!(
            engine.state().snake.body,
            vec![Cell::new(100, 80), Cell::new(80, 80)]
        );
        let food = engine.state().food.unwrap();
        assert_ne!(food, Cell::new(100, 80));
        assert!(!engine.state().snake.contains(food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine_with(
            Snake::new(Cell::new(20, 100), Direction::Left),
            Some(Cell::new(200, 40)),
        );
        engine.state.score = 30;

        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Lost {
                collision: CollisionType::Wall,
                forfeited_score: 30
            }
        );
        assert!(engine.state().lost);
        assert_eq!(engine.state().score, 0);
        // The fatal head is never committed
        assert_eq!(engine.state().snake.body, vec![Cell::new(20, 100)]);
    }

    #[test]
    fn test_bottom_wall_uses_reserved_rows() {
        // 400x400: bottom wall sits at y = 400 - 3 * 20
        let mut engine = engine_with(
            Snake::new(Cell::new(100, 320), Direction::Down),
            Some(Cell::new(20, 20)),
        );

        let outcome = engine.tick();

        assert!(matches!(
            outcome,
            TickOutcome::Lost {
                collision: CollisionType::Wall,
                ..
            }
        ));
    }

    #[test]
    fn test_self_collision_includes_tail() {
        let body = vec![
            Cell::new(100, 100),
            Cell::new(100, 120),
            Cell::new(80, 120),
            Cell::new(80, 100),
        ];
        let mut engine = engine_with(
            Snake::from_cells(body, Direction::Left),
            Some(Cell::new(300, 300)),
        );

        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Lost {
                collision: CollisionType::SelfCollision,
                forfeited_score: 0
            }
        );
    }

    #[test]
    fn test_turn_legality() {
        let mut engine = engine_with(
            Snake::new(Cell::new(80, 80), Direction::Right),
            Some(Cell::new(300, 300)),
        );

        // Straight behind the head on the same row: rejected
        engine.set_direction(Cell::new(0, 80));
        assert_eq!(engine.state().snake.direction, Direction::Right);

        engine.set_direction(Cell::new(80, 300));
        assert_eq!(engine.state().snake.direction, Direction::Down);

        // Judged against the last move, so this is still a vertical choice
        engine.set_direction(Cell::new(200, 20));
        assert_eq!(engine.state().snake.direction, Direction::Up);

        engine.tick();
        assert_eq!(engine.state().snake.head(), Cell::new(80, 60));

        // Now heading up: only left/right count
        engine.set_direction(Cell::new(80, 300));
        assert_eq!(engine.state().snake.direction, Direction::Up);
        engine.set_direction(Cell::new(0, 300));
        assert_eq!(engine.state().snake.direction, Direction::Left);
    }

    #[test]
    fn test_reverse_within_one_tick_is_impossible() {
        let body = vec![Cell::new(100, 100), Cell::new(80, 100), Cell::new(60, 100)];
        let mut engine = engine_with(
            Snake::from_cells(body, Direction::Right),
            Some(Cell::new(300, 300)),
        );

        engine.steer(Direction::Up);
        engine.steer(Direction::Left);
        assert_eq!(engine.state().snake.direction, Direction::Up);

        let outcome = engine.tick();
        assert_eq!(outcome, TickOutcome::Moved { ate_food: false });
        assert_eq!(engine.state().snake.head(), Cell::new(100, 80));
    }

    #[test]
    fn test_input_while_lost_restarts() {
        let mut engine = engine_with(
            Snake::new(Cell::new(20, 100), Direction::Left),
            Some(Cell::new(200, 40)),
        );
        engine.tick();
        assert!(engine.state().lost);

        engine.set_direction(Cell::new(0, 0));

        assert!(!engine.state().lost);
        assert_eq!(engine.state().snake.body, vec![Cell::new(80, 80)]);
        // No turn was applied by the restarting input
        assert_eq!(engine.state().snake.direction, Direction::Right);
    }

    #[test]
    fn test_lost_game_stays_still() {
        let mut engine = engine_with(
            Snake::new(Cell::new(20, 100), Direction::Left),
            Some(Cell::new(200, 40)),
        );
        engine.tick();
        let frozen = engine.state().clone();

        for _ in 0..5 {
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.state(), &frozen);
    }

    #[test]
    fn test_win_needs_length() {
        // Exit at (200, 200) on the default board
        let short = vec![Cell::new(180, 200), Cell::new(160, 200), Cell::new(140, 200)];
        let mut engine = engine_with(
            Snake::from_cells(short, Direction::Right),
            Some(Cell::new(20, 20)),
        );
        assert_eq!(engine.tick(), TickOutcome::Moved { ate_food: false });
        assert!(!engine.state().won);

        let long = vec![
            Cell::new(180, 200),
            Cell::new(160, 200),
            Cell::new(140, 200),
            Cell::new(120, 200),
        ];
        let mut engine = engine_with(
            Snake::from_cells(long, Direction::Right),
            Some(Cell::new(20, 20)),
        );
        assert_eq!(engine.tick(), TickOutcome::Won { ate_food: false });
        assert!(engine.state().won);
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_won_game_ignores_input_and_ticks() {
        let long = vec![
            Cell::new(180, 200),
            Cell::new(160, 200),
            Cell::new(140, 200),
            Cell::new(120, 200),
        ];
        let mut engine = engine_with(
            Snake::from_cells(long, Direction::Right),
            Some(Cell::new(20, 20)),
        );
        engine.tick();
        let frozen = engine.state().clone();

        engine.set_direction(Cell::new(0, 0));
        engine.steer(Direction::Down);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state(), &frozen);

        engine.apply(Action::Restart);
        assert!(!engine.state().won);
    }

    #[test]
    fn test_with_state_rejects_broken_states() {
        let config = GameConfig::default();
        let exit = config.grid().unwrap().exit_cell();

        let headless = GameState::new(
            Snake::from_cells(Vec::new(), Direction::Right),
            Some(Cell::new(20, 20)),
            exit,
        );
        assert_eq!(
            GameEngine::with_state(&config, headless, StdRng::seed_from_u64(3)).err(),
            Some(ConfigError::EmptySnake)
        );

        let buried = GameState::new(
            Snake::from_cells(vec![Cell::new(100, 80), Cell::new(80, 80)], Direction::Right),
            Some(Cell::new(80, 80)),
            exit,
        );
        assert_eq!(
            GameEngine::with_state(&config, buried, StdRng::seed_from_u64(3)).err(),
            Some(ConfigError::FoodUnderSnake { x: 80, y: 80 })
        );

        // Food not yet placed is fine
        let unplaced = GameState::new(Snake::new(Cell::new(80, 80), Direction::Right), None, exit);
        assert!(GameEngine::with_state(&config, unplaced, StdRng::seed_from_u64(3)).is_ok());
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        // Fill every candidate cell but one with the body
        let config = GameConfig::default();
        let grid = config.grid().unwrap();
        let mut cells: Vec<Cell> = grid.food_candidates().collect();
        let free = cells.remove(cells.len() / 2);
        let state = GameState::new(
            Snake::from_cells(cells, Direction::Right),
            None,
            grid.exit_cell(),
        );
        let mut engine =
            GameEngine::with_state(&config, state, StdRng::seed_from_u64(1)).unwrap();

        engine.place_food();

        assert_eq!(engine.state().food, Some(free));
    }

    #[test]
    fn test_same_seed_same_game() {
        let config = GameConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut a = GameEngine::new(&config).unwrap();
        let mut b = GameEngine::new(&config).unwrap();

        for step in 0..40 {
            if step % 7 == 3 {
                a.steer(Direction::Down);
                b.steer(Direction::Down);
            }
            if step % 7 == 5 {
                a.steer(Direction::Right);
                b.steer(Direction::Right);
            }
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }
}
