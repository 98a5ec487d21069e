use std::collections::HashSet;

use rand::Rng;

use crate::geometry::{Coordinates, Geometry};

/// Picks a random free cell of the grid, `None` when every cell is taken.
///
/// While the grid is mostly free the cell is found by rejection sampling.
/// Once more than 80% of the grid is occupied the free cells are collected
/// and one of them is chosen, so the search always terminates.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: &Geometry,
    occupied: &HashSet<Coordinates>,
) -> Option<Coordinates> {
    let capacity = geometry.capacity();
    // cells outside the grid (e.g. obstacles after a shrink) do not take room
    let taken = occupied.iter().filter(|cell| geometry.contains(cell)).count();
    if taken >= capacity {
        return None;
    }

    if taken > (capacity * 4) / 5 {
        let free: Vec<Coordinates> = (0..geometry.tile_count_x())
            .flat_map(|x| (0..geometry.tile_count_y()).map(move |y| Coordinates::new(x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();
        let index = rng.random_range(0..free.len());
        return Some(free[index]);
    }

    loop {
        let candidate = Coordinates::new(
            rng.random_range(0..geometry.tile_count_x()),
            rng.random_range(0..geometry.tile_count_y()),
        );
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }
}
