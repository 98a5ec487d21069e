use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};

use colored::Colorize;

use crate::geometry::Coordinates;

/// Everything a renderer needs for one picture of the board. Read only.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snake: &'a VecDeque<Coordinates>,
    pub food: Coordinates,
    pub obstacles: &'a HashSet<Coordinates>,
    pub tile_size: u32,
    pub canvas_size: u32,
    pub score: u32,
    pub high_score: u32,
    pub paused: bool,
    pub wall_collision: bool,
}

impl Frame<'_> {
    pub fn tile_count(&self) -> i32 {
        (self.canvas_size / self.tile_size.max(1)) as i32
    }
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Draws the board with two terminal columns per tile.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        TerminalRenderer::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        TerminalRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        write!(self.out, "{}[2J", 27 as char)?;
        write!(self.out, "{}[1;1H", 27 as char)
    }

    fn border(&self, piece: &str, wall_collision: bool) -> String {
        // solid walls kill, dimmed ones wrap around
        if wall_collision {
            piece.green().to_string()
        } else {
            piece.dimmed().to_string()
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let tiles = frame.tile_count();
        let head = frame.snake.front().copied();
        let body: HashSet<Coordinates> = frame.snake.iter().skip(1).copied().collect();
        let walls = frame.wall_collision;

        self.clear_screen()?;
        //border up
        let mut line = self.border("▗", walls);
        for _i in 0..tiles {
            line.push_str(&self.border("▄▄", walls));
        }
        line.push_str(&self.border("▖", walls));
        write!(self.out, "{}\r\n", line)?;

        for y in 0..tiles {
            let mut row = self.border("▐", walls);
            for x in 0..tiles {
                let cell = Coordinates::new(x, y);
                let tile = if Some(cell) == head {
                    "Ӫ ".yellow().to_string()
                } else if body.contains(&cell) {
                    "⏺ ".green().to_string()
                } else if cell == frame.food {
                    "♦ ".red().to_string()
                } else if frame.obstacles.contains(&cell) {
                    "▓▓".bright_black().to_string()
                } else {
                    "  ".to_string()
                };
                row.push_str(&tile);
            }
            row.push_str(&self.border("▌", walls));
            write!(self.out, "{}\r\n", row)?;
        }

        //border down
        let mut line = self.border("▝", walls);
        for _i in 0..tiles {
            line.push_str(&self.border("▀▀", walls));
        }
        line.push_str(&self.border("▘", walls));
        write!(self.out, "{}\r\n", line)?;

        write!(
            self.out,
            "Score: {}    Highest Score: {}\r\n",
            frame.score, frame.high_score
        )?;
        if frame.paused {
            write!(self.out, "{}\r\n", "PAUSED (space to resume)".bold())?;
        } else {
            write!(self.out, "arrows/wasd move, space pauses, q quits\r\n")?;
        }
        self.out.flush()
    }
}
