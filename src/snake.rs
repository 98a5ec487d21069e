// one play-through of the board: the snake moves one tile per tick,
// the head is checked against walls, its own body and the obstacles,
// eating food grows the snake by one segment at the tail
use std::collections::{HashSet, VecDeque};

use log::{debug, info};
use rand::Rng;

use crate::error::SessionError;
use crate::food::place_food;
use crate::geometry::{Coordinates, Geometry, SnakeDirection};
use crate::levels::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverReason {
    Wall,
    SelfCollision,
    Obstacle,
    // the snake filled every free cell
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
    Over(OverReason),
}

/// What a single call to [`Session::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Paused or already over, nothing changed.
    Idle,
    Moved,
    Ate,
    /// Returned once, on the tick that ended the session.
    GameOver(OverReason),
}

#[derive(Debug, Clone)]
pub struct Session {
    geometry: Geometry,
    snake_body: VecDeque<Coordinates>, // the head is the first element
    snake_direction: SnakeDirection,
    // direction of the last committed move
    heading: SnakeDirection,
    food_position: Coordinates,
    obstacles: HashSet<Coordinates>,
    wall_collision: bool,
    points: u32,
    state: GameState,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(
        level: &Level,
        geometry: Geometry,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let wanted = level
            .start
            .clamp_to(geometry.tile_count_x(), geometry.tile_count_y());
        let obstacles: HashSet<Coordinates> = level.obstacles.iter().copied().collect();
        let start = nearest_free_cell(wanted, &geometry, &obstacles)
            .ok_or(SessionError::StartBlocked(wanted))?;
        if start != wanted {
            debug!(
                "start ({}, {}) is blocked, spawning at ({}, {})",
                wanted.x, wanted.y, start.x, start.y
            );
        }
        let mut occupied = obstacles.clone();
        occupied.insert(start);
        let food = place_food(rng, &geometry, &occupied).ok_or(SessionError::NoRoomForFood)?;
        info!(
            "new session on a {}x{} grid, snake at ({}, {}), food at ({}, {})",
            geometry.tile_count_x(),
            geometry.tile_count_y(),
            start.x,
            start.y,
            food.x,
            food.y
        );
        Ok(Session::from_parts(
            geometry,
            vec![start],
            SnakeDirection::Right,
            food,
            level.obstacles.iter().copied(),
            level.wall_collision,
        ))
    }

    /// Builds a running session from an explicit board state.
    pub fn from_parts(
        geometry: Geometry,
        snake: Vec<Coordinates>,
        direction: SnakeDirection,
        food: Coordinates,
        obstacles: impl IntoIterator<Item = Coordinates>,
        wall_collision: bool,
    ) -> Self {
        assert!(!snake.is_empty(), "a snake has at least a head");
        Session {
            geometry,
            snake_body: snake.into(),
            snake_direction: direction,
            heading: direction,
            food_position: food,
            obstacles: obstacles.into_iter().collect(),
            wall_collision,
            points: 0,
            state: GameState::Running,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn snake(&self) -> &VecDeque<Coordinates> {
        &self.snake_body
    }

    pub fn head(&self) -> Coordinates {
        // never empty: a fatal step leaves the body untouched
        self.snake_body[0]
    }

    pub fn food(&self) -> Coordinates {
        self.food_position
    }

    pub fn obstacles(&self) -> &HashSet<Coordinates> {
        &self.obstacles
    }

    pub fn wall_collision(&self) -> bool {
        self.wall_collision
    }

    pub fn score(&self) -> u32 {
        self.points
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn direction(&self) -> SnakeDirection {
        self.snake_direction
    }

    pub fn heading(&self) -> SnakeDirection {
        self.heading
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over(_))
    }

    /// Sets the direction used by the next step. Reversal rules live in the
    /// input controller.
    pub fn steer(&mut self, direction: SnakeDirection) {
        if !self.is_over() {
            self.snake_direction = direction;
        }
    }

    pub fn toggle_pause(&mut self) -> GameState {
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            over => over,
        };
        debug!("pause toggled, now {:?}", self.state);
        self.state
    }

    /// Swaps the grid between two ticks. Food left outside the new grid is
    /// placed again.
    pub fn resize<R: Rng + ?Sized>(&mut self, geometry: Geometry, rng: &mut R) {
        self.geometry = geometry;
        if !self.geometry.contains(&self.food_position) {
            if let Some(food) = place_food(rng, &self.geometry, &self.occupied()) {
                debug!("food moved to ({}, {}) after resize", food.x, food.y);
                self.food_position = food;
            }
        }
    }

    fn occupied(&self) -> HashSet<Coordinates> {
        self.snake_body
            .iter()
            .chain(self.obstacles.iter())
            .copied()
            .collect()
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepOutcome {
        if self.state != GameState::Running {
            return StepOutcome::Idle;
        }
        let columns = self.geometry.tile_count_x();
        let rows = self.geometry.tile_count_y();

        let mut new_head = self.head().neighbour(self.snake_direction);
        if self.wall_collision {
            if !new_head.is_in_bound(columns, rows) {
                return self.finish(OverReason::Wall);
            }
        } else {
            new_head = new_head.wrap(columns, rows);
        }

        // the whole previous body counts, including the tail that would move away
        if self.snake_body.contains(&new_head) {
            return self.finish(OverReason::SelfCollision);
        }
        if self.obstacles.contains(&new_head) {
            return self.finish(OverReason::Obstacle);
        }

        self.snake_body.push_front(new_head);
        self.heading = self.snake_direction;

        if new_head != self.food_position {
            self.snake_body.pop_back();
            return StepOutcome::Moved;
        }

        // the food is eaten, the tail stays so the snake grows by one
        self.points += 1;
        match place_food(rng, &self.geometry, &self.occupied()) {
            Some(food) => {
                debug!(
                    "food eaten at ({}, {}), score {}, next food at ({}, {})",
                    new_head.x, new_head.y, self.points, food.x, food.y
                );
                self.food_position = food;
                StepOutcome::Ate
            }
            None => self.finish(OverReason::BoardFull),
        }
    }

    fn finish(&mut self, reason: OverReason) -> StepOutcome {
        self.state = GameState::Over(reason);
        info!(
            "game over ({:?}) with score {} and length {}",
            reason,
            self.points,
            self.snake_body.len()
        );
        StepOutcome::GameOver(reason)
    }
}

// scans square rings of growing size around `origin`, row by row
fn nearest_free_cell(
    origin: Coordinates,
    geometry: &Geometry,
    blocked: &HashSet<Coordinates>,
) -> Option<Coordinates> {
    let reach = geometry.tile_count_x().max(geometry.tile_count_y());
    for distance in 0..=reach {
        for y in origin.y - distance..=origin.y + distance {
            for x in origin.x - distance..=origin.x + distance {
                if (x - origin.x).abs() != distance && (y - origin.y).abs() != distance {
                    continue;
                }
                let cell = Coordinates::new(x, y);
                if geometry.contains(&cell) && !blocked.contains(&cell) {
                    return Some(cell);
                }
            }
        }
    }
    None
}
