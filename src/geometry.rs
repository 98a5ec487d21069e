// grid coordinates, directions and the viewport -> grid sizing
use num::Integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SnakeDirection {
    pub fn opposite(&self) -> SnakeDirection {
        match self {
            SnakeDirection::Up => SnakeDirection::Down,
            SnakeDirection::Down => SnakeDirection::Up,
            SnakeDirection::Left => SnakeDirection::Right,
            SnakeDirection::Right => SnakeDirection::Left,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, SnakeDirection::Left | SnakeDirection::Right)
    }

    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }
}

/// A cell of the grid. `(0, 0)` is the top left corner, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub fn new(x: i32, y: i32) -> Coordinates {
        Coordinates { x, y }
    }

    pub fn get_left(&self) -> Coordinates {
        Coordinates::new(self.x - 1, self.y)
    }
    pub fn get_right(&self) -> Coordinates {
        Coordinates::new(self.x + 1, self.y)
    }
    pub fn get_up(&self) -> Coordinates {
        Coordinates::new(self.x, self.y - 1)
    }
    pub fn get_down(&self) -> Coordinates {
        Coordinates::new(self.x, self.y + 1)
    }

    /// The adjacent cell in `direction`, without any boundary handling.
    pub fn neighbour(&self, direction: SnakeDirection) -> Coordinates {
        match direction {
            SnakeDirection::Up => self.get_up(),
            SnakeDirection::Down => self.get_down(),
            SnakeDirection::Left => self.get_left(),
            SnakeDirection::Right => self.get_right(),
        }
    }

    /// Folds the cell back onto a `columns` x `rows` torus.
    pub fn wrap(&self, columns: i32, rows: i32) -> Coordinates {
        // mod_floor never goes negative, so stepping left from x = 0 lands on columns - 1
        Coordinates::new(self.x.mod_floor(&columns), self.y.mod_floor(&rows))
    }

    pub fn is_in_bound(&self, columns: i32, rows: i32) -> bool {
        self.x >= 0 && self.x < columns && self.y >= 0 && self.y < rows
    }

    /// Moves the cell to the nearest position inside the grid.
    pub fn clamp_to(&self, columns: i32, rows: i32) -> Coordinates {
        Coordinates::new(self.x.clamp(0, columns - 1), self.y.clamp(0, rows - 1))
    }
}

/// Playable grid derived from the available viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    tile_size: u32,
    tile_count_x: i32,
    tile_count_y: i32,
}

impl Geometry {
    pub fn new(tile_size: u32, tile_count_x: i32, tile_count_y: i32) -> Geometry {
        assert!(tile_size > 0, "tile size must be positive");
        assert!(
            tile_count_x > 0 && tile_count_y > 0,
            "tile counts must be positive, got {}x{}",
            tile_count_x,
            tile_count_y
        );
        Geometry {
            tile_size,
            tile_count_x,
            tile_count_y,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tile_count_x(&self) -> i32 {
        self.tile_count_x
    }

    pub fn tile_count_y(&self) -> i32 {
        self.tile_count_y
    }

    pub fn capacity(&self) -> usize {
        self.tile_count_x as usize * self.tile_count_y as usize
    }

    // the grid is square, the canvas width is also its height
    pub fn canvas_size(&self) -> u32 {
        self.tile_count_x as u32 * self.tile_size
    }

    pub fn contains(&self, cell: &Coordinates) -> bool {
        cell.is_in_bound(self.tile_count_x, self.tile_count_y)
    }
}

// room for a head and one piece of food
const MIN_TILE_COUNT: i32 = 2;

/// Base dimensions the grid is scaled from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSizing {
    pub base_tile_size: u32,
    pub base_canvas_size: u32,
    pub min_tile_size: u32,
}

impl Default for GridSizing {
    fn default() -> Self {
        GridSizing {
            base_tile_size: 20,
            base_canvas_size: 500,
            min_tile_size: 10,
        }
    }
}

impl GridSizing {
    pub fn compute(&self, viewport_width: f64, viewport_height: f64) -> Geometry {
        let base_canvas = self.base_canvas_size as f64;
        // leave room around the board for the score line and the controls
        let extent = (viewport_width * 0.9)
            .min(viewport_height * 0.7)
            .min(base_canvas)
            .max(0.0);
        let scale = extent / base_canvas;
        let tile_size = ((self.base_tile_size as f64 * scale).floor() as u32)
            .max(self.min_tile_size)
            .max(1);
        // snap the canvas down to a whole number of tiles
        let tile_count = ((extent / tile_size as f64).floor() as i32).max(MIN_TILE_COUNT);
        Geometry::new(tile_size, tile_count, tile_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_DIRECTIONS: [SnakeDirection; 4] = [
        SnakeDirection::Up,
        SnakeDirection::Down,
        SnakeDirection::Left,
        SnakeDirection::Right,
    ];

    #[test]
    fn opposite_pairs() {
        for direction in ALL_DIRECTIONS {
            assert_ne!(direction, direction.opposite());
            assert_eq!(direction, direction.opposite().opposite());
            assert_eq!(direction.is_horizontal(), direction.opposite().is_horizontal());
        }
    }

    #[test]
    fn wrap_from_zero_goes_to_last_column() {
        let cell = Coordinates::new(0, 3).get_left().wrap(10, 10);
        assert_eq!(cell, Coordinates::new(9, 3));
        let cell = Coordinates::new(4, 0).get_up().wrap(10, 7);
        assert_eq!(cell, Coordinates::new(4, 6));
    }

    #[test]
    fn wrap_past_last_column_goes_to_zero() {
        let cell = Coordinates::new(9, 5).get_right().wrap(10, 10);
        assert_eq!(cell, Coordinates::new(0, 5));
    }

    #[test]
    fn large_viewport_keeps_base_dimensions() {
        let geometry = GridSizing::default().compute(1920.0, 1080.0);
        assert_eq!(geometry.tile_size(), 20);
        assert_eq!(geometry.tile_count_x(), 25);
        assert_eq!(geometry.tile_count_y(), 25);
        assert_eq!(geometry.canvas_size(), 500);
    }

    #[test]
    fn narrow_viewport_scales_tiles_down() {
        // extent = min(360, 560, 500) = 360, tile = floor(20 * 0.72) = 14
        let geometry = GridSizing::default().compute(400.0, 800.0);
        assert_eq!(geometry.tile_size(), 14);
        assert_eq!(geometry.tile_count_x(), 25);
        assert_eq!(geometry.canvas_size(), 350);
    }

    #[test]
    fn tiny_viewport_respects_minimum_tile_size() {
        // extent = 180, scaled tile would be 7 which is below the minimum
        let geometry = GridSizing::default().compute(200.0, 300.0);
        assert_eq!(geometry.tile_size(), 10);
        assert_eq!(geometry.tile_count_x(), 18);
        assert_eq!(geometry.canvas_size(), 180);
    }

    #[test]
    fn degenerate_viewport_still_fits_a_head_and_food() {
        let geometry = GridSizing::default().compute(1.0, 1.0);
        assert_eq!(geometry.tile_count_x(), 2);
        assert_eq!(geometry.tile_count_y(), 2);
        assert_eq!(geometry.tile_size(), 10);
    }

    #[test]
    #[should_panic]
    fn zero_tile_count_is_rejected() {
        Geometry::new(10, 0, 5);
    }

    proptest! {
        #[test]
        fn wrap_stays_on_the_grid(
            x in -1i32..64,
            y in -1i32..64,
            columns in 1i32..64,
            rows in 1i32..64,
            index in 0usize..4,
        ) {
            let start = Coordinates::new(x.min(columns - 1), y.min(rows - 1));
            let cell = start.neighbour(ALL_DIRECTIONS[index]).wrap(columns, rows);
            prop_assert!(cell.x >= 0 && cell.x < columns);
            prop_assert!(cell.y >= 0 && cell.y < rows);
        }

        #[test]
        fn canvas_never_exceeds_target_extent(
            width in 120.0f64..4000.0,
            height in 120.0f64..4000.0,
        ) {
            let sizing = GridSizing::default();
            let geometry = sizing.compute(width, height);
            let extent = (width * 0.9).min(height * 0.7).min(500.0);
            prop_assert!(geometry.canvas_size() as f64 <= extent);
            prop_assert!(geometry.tile_size() >= sizing.min_tile_size);
            prop_assert_eq!(geometry.canvas_size() % geometry.tile_size(), 0);
        }
    }
}
