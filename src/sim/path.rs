//! Grid pathfinding
//!
//! Three searches over a walkability grid: Dijkstra (uniform cost), A*
//! (Manhattan heuristic) and a depth-limited greedy backtracker. The heap
//! searches return start-exclusive, goal-inclusive paths and resolve
//! frontier ties by insertion order, so equal-length routes come out
//! identical run to run. The backtracker includes the start cell and
//! trades optimality for a bounded search depth.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use glam::IVec2;

use super::maze::Maze;
use crate::consts::*;

/// Expansion order for equal-cost neighbors: up, down, left, right
const DIRECTIONS: [IVec2; 4] = [
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
];

/// Minimal grid view the searches consume.
///
/// [`Maze`] is the live implementation; tests substitute small fixture
/// grids. Searches never query outside `0..width` x `0..height`.
pub trait PathGrid {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn is_walkable(&self, x: i32, y: i32) -> bool;
}

impl PathGrid for Maze {
    fn width(&self) -> i32 {
        MAZE_WIDTH
    }

    fn height(&self) -> i32 {
        MAZE_HEIGHT
    }

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        Maze::is_walkable(self, x, y)
    }
}

/// Manhattan distance between two cells
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    cost: i32,
    seq: u32,
    cell: IVec2,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; seq keeps equal-cost pops in
        // insertion order
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path by uniform-cost search.
///
/// Start-exclusive, goal-inclusive. Empty when the goal is unreachable
/// or equals the start.
pub fn dijkstra(grid: &impl PathGrid, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    best_first(grid, start, goal, |_, _| 0)
}

/// Shortest path by A* with a Manhattan heuristic.
///
/// Same contract as [`dijkstra`]; the heuristic never overestimates on a
/// unit-cost 4-connected grid, so path lengths match.
pub fn astar(grid: &impl PathGrid, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    best_first(grid, start, goal, manhattan)
}

fn best_first(
    grid: &impl PathGrid,
    start: IVec2,
    goal: IVec2,
    heuristic: fn(IVec2, IVec2) -> i32,
) -> Vec<IVec2> {
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, i32> = HashMap::new();
    let mut seq = 0u32;

    g_score.insert(start, 0);
    open.push(Node {
        cost: heuristic(start, goal),
        seq,
        cell: start,
    });

    while let Some(Node { cell, .. }) = open.pop() {
        if cell == goal {
            return reconstruct(&came_from, start, goal);
        }

        let base_g = *g_score.get(&cell).unwrap_or(&i32::MAX);

        for dir in DIRECTIONS {
            let next = cell + dir;
            if !in_bounds(grid, next) || !grid.is_walkable(next.x, next.y) {
                continue;
            }

            let tentative = base_g.saturating_add(1);
            if tentative < *g_score.get(&next).unwrap_or(&i32::MAX) {
                came_from.insert(next, cell);
                g_score.insert(next, tentative);
                seq += 1;
                open.push(Node {
                    cost: tentative + heuristic(next, goal),
                    seq,
                    cell: next,
                });
            }
        }
    }

    Vec::new()
}

fn in_bounds(grid: &impl PathGrid, cell: IVec2) -> bool {
    (0..grid.width()).contains(&cell.x) && (0..grid.height()).contains(&cell.y)
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    let mut path = Vec::new();
    let mut cur = goal;
    while cur != start {
        path.push(cur);
        let Some(&prev) = came_from.get(&cur) else {
            return Vec::new();
        };
        cur = prev;
    }
    path.reverse();
    path
}

/// Depth-limited DFS that tries the four directions nearest the goal
/// first and unwinds on dead ends.
///
/// Unlike the heap searches the returned path includes the start cell.
/// Empty when no route exists within `max_depth` steps.
pub fn backtrack(grid: &impl PathGrid, start: IVec2, goal: IVec2, max_depth: u32) -> Vec<IVec2> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    if backtrack_step(grid, start, goal, 0, max_depth, &mut visited, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn backtrack_step(
    grid: &impl PathGrid,
    cell: IVec2,
    goal: IVec2,
    depth: u32,
    max_depth: u32,
    visited: &mut HashSet<IVec2>,
    path: &mut Vec<IVec2>,
) -> bool {
    if cell == goal {
        path.push(cell);
        return true;
    }
    if depth >= max_depth {
        return false;
    }
    if !in_bounds(grid, cell) {
        return false;
    }
    if visited.contains(&cell) {
        return false;
    }
    if !grid.is_walkable(cell.x, cell.y) {
        return false;
    }

    visited.insert(cell);
    path.push(cell);

    // Stable sort keeps up/down/left/right order on ties
    let mut dirs = DIRECTIONS;
    dirs.sort_by_key(|d| manhattan(cell + *d, goal));

    for dir in dirs {
        if backtrack_step(grid, cell + dir, goal, depth + 1, max_depth, visited, path) {
            return true;
        }
    }

    path.pop();
    false
}
