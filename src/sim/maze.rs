//! Maze grid and collectible layers
//!
//! The layout is compiled in. Tiles live in a single row-major array;
//! dots and power pellets sit in separate boolean layers so eating a
//! collectible never touches the tile map itself.

use crate::consts::*;

/// One cell of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Open floor
    Empty,
    /// Solid wall, blocks all agents
    Wall,
    /// Interior of the ghost house (walkable)
    GhostHouse,
}

/// Compiled-in layout, `LAYOUT[y][x]`.
///
/// Codes: 0 floor, 1 wall, 2 dot, 3 power pellet, 4 ghost house.
/// Row 14 is the wrap corridor; it runs open off both edges.
#[rustfmt::skip]
const LAYOUT: [[u8; MAZE_WIDTH as usize]; MAZE_HEIGHT as usize] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,1,1,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,3,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,3,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,2,1],
    [1,2,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,2,2,1],
    [1,1,1,1,1,1,2,1,1,1,1,1,0,1,1,0,1,1,1,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,1,1,1,0,1,1,0,1,1,1,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,0,0,0,0,0,0,0,0,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,1,1,1,4,4,1,1,1,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,1,4,4,4,4,4,4,1,0,1,1,2,1,1,1,1,1,1],
    [0,0,0,0,0,0,2,0,0,0,1,4,4,4,4,4,4,1,0,0,0,2,0,0,0,0,0,0],
    [1,1,1,1,1,1,2,1,1,0,1,4,4,4,4,4,4,1,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,0,0,0,0,0,0,0,0,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,1,1,1,1,1],
    [1,1,1,1,1,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,1,1,1,1,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,1,1,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,3,2,2,1,1,2,2,2,2,2,2,2,0,0,2,2,2,2,2,2,2,1,1,2,2,3,1],
    [1,1,1,2,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,2,1,1,1],
    [1,1,1,2,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,2,1,1,1],
    [1,2,2,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,1,1,2,1],
    [1,2,1,1,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

/// The maze: tile grid plus collectible layers and progress counters
#[derive(Debug, Clone)]
pub struct Maze {
    tiles: Vec<Tile>,
    dots: Vec<bool>,
    pellets: Vec<bool>,
    /// Collectibles eaten since the last reset
    collected: u32,
    /// Dots + pellets present in a fresh maze
    total: u32,
}

impl Maze {
    pub fn new() -> Self {
        let cells = (MAZE_WIDTH * MAZE_HEIGHT) as usize;
        let mut maze = Self {
            tiles: vec![Tile::Empty; cells],
            dots: vec![false; cells],
            pellets: vec![false; cells],
            collected: 0,
            total: 0,
        };

        for (y, row) in LAYOUT.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let idx = y * MAZE_WIDTH as usize + x;
                maze.tiles[idx] = match code {
                    1 => Tile::Wall,
                    4 => Tile::GhostHouse,
                    _ => Tile::Empty,
                };
                maze.dots[idx] = code == 2;
                maze.pellets[idx] = code == 3;
                if code == 2 || code == 3 {
                    maze.total += 1;
                }
            }
        }

        maze
    }

    /// Restore every layer to the compiled-in layout
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..MAZE_WIDTH).contains(&x) && (0..MAZE_HEIGHT).contains(&y) {
            Some((y * MAZE_WIDTH + x) as usize)
        } else {
            None
        }
    }

    /// Tile at `(x, y)`, `Tile::Empty` outside the grid
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        Self::index(x, y).map_or(Tile::Empty, |i| self.tiles[i])
    }

    /// Whether an agent may occupy `(x, y)`.
    ///
    /// Out-of-range cells count as walkable so movement through the
    /// wrap corridor is never rejected at the edges.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_none_or(|i| self.tiles[i] != Tile::Wall)
    }

    /// Whether a dot remains at `(x, y)` (false outside the grid)
    pub fn has_dot(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some_and(|i| self.dots[i])
    }

    /// Whether a power pellet remains at `(x, y)` (false outside the grid)
    pub fn has_pellet(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some_and(|i| self.pellets[i])
    }

    /// Remove the dot at `(x, y)` if one remains. Idempotent.
    pub fn remove_dot(&mut self, x: i32, y: i32) {
        if let Some(i) = Self::index(x, y)
            && self.dots[i]
        {
            self.dots[i] = false;
            self.collected += 1;
        }
    }

    /// Remove the power pellet at `(x, y)` if one remains. Idempotent.
    pub fn remove_pellet(&mut self, x: i32, y: i32) {
        if let Some(i) = Self::index(x, y)
            && self.pellets[i]
        {
            self.pellets[i] = false;
            self.collected += 1;
        }
    }

    /// True once every dot and pellet has been eaten
    pub fn all_collected(&self) -> bool {
        self.collected >= self.total
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}
