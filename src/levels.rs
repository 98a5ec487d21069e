// built-in boards and the validation of the start parameters
use log::info;

use crate::difficulty::GameDifficulty;
use crate::error::SessionError;
use crate::geometry::Coordinates;

pub const DEFAULT_LEVEL: u32 = 1;
pub const LEVEL_COUNT: u32 = 6;

const DEFAULT_START: Coordinates = Coordinates { x: 10, y: 10 };
// boards with an obstacle on the default start cell
const SHIFTED_START: Coordinates = Coordinates { x: 10, y: 12 };

/// Static layout of one board: obstacles, wall rule and where the snake spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub number: u32,
    pub obstacles: Vec<Coordinates>,
    pub wall_collision: bool,
    pub start: Coordinates,
}

impl Level {
    pub fn open(number: u32) -> Level {
        Level {
            number,
            obstacles: Vec::new(),
            wall_collision: false,
            start: DEFAULT_START,
        }
    }

    pub fn preset(number: u32) -> Option<Level> {
        let level = match number {
            1 => Level::open(1),
            2 => Level {
                obstacles: pillars(),
                start: SHIFTED_START,
                ..Level::open(2)
            },
            3 => Level {
                wall_collision: true,
                ..Level::open(3)
            },
            4 => Level {
                obstacles: three_walls(),
                ..Level::open(4)
            },
            5 => Level {
                obstacles: pillars(),
                wall_collision: true,
                start: SHIFTED_START,
                ..Level::open(5)
            },
            6 => {
                let mut obstacles = three_walls();
                obstacles.push(Coordinates::new(10, 10));
                obstacles.extend(column(10, 5..=7));
                Level {
                    obstacles,
                    wall_collision: true,
                    start: SHIFTED_START,
                    ..Level::open(6)
                }
            }
            _ => return None,
        };
        Some(level)
    }
}

fn pillars() -> Vec<Coordinates> {
    vec![Coordinates::new(5, 5), Coordinates::new(10, 10)]
}

fn column(x: i32, ys: std::ops::RangeInclusive<i32>) -> impl Iterator<Item = Coordinates> {
    ys.map(move |y| Coordinates::new(x, y))
}

fn three_walls() -> Vec<Coordinates> {
    let mut walls: Vec<Coordinates> = column(5, 5..=9).chain(column(19, 5..=9)).collect();
    walls.extend((11..=13).rev().map(|x| Coordinates::new(x, 17)));
    walls
}

/// What the menu hands to the core once both choices are made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub level: Level,
    pub difficulty: GameDifficulty,
}

pub fn start_session(level: Option<u32>, difficulty: Option<&str>) -> Result<SessionPlan, SessionError> {
    let difficulty: GameDifficulty = difficulty.ok_or(SessionError::MissingDifficulty)?.parse()?;
    let number = level.unwrap_or(DEFAULT_LEVEL);
    if number == 0 {
        return Err(SessionError::InvalidLevel);
    }
    let level = Level::preset(number).ok_or(SessionError::UnknownLevel(number))?;
    info!(
        "starting level {} on {} ({} obstacles, walls {})",
        level.number,
        difficulty,
        level.obstacles.len(),
        if level.wall_collision { "kill" } else { "wrap" }
    );
    Ok(SessionPlan { level, difficulty })
}
