//! Pathfinding engine.
//!
//! This module runs Dijkstra's algorithm over a [`Grid`] with unit edge weights and records the
//! order in which cells are settled, so the user interface can replay the exploration and the
//! resulting shortest path.

use std::{cmp::Reverse, collections::BinaryHeap};

use clap::ValueEnum;
use color_eyre::eyre::{ensure, eyre, OptionExt as _, Result};
use tracing::debug;

use crate::grid::{Coord, Grid};

/// Policy applied when a settled cell relaxes one of its neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Relaxation {
    /// Always overwrite the neighbour's distance and predecessor.
    ///
    /// This is only correct because every edge weighs one and cells are settled in
    /// non-decreasing distance order, which means the distance never actually changes once it
    /// is finite. The predecessor ends up being the last settled neighbour.
    #[default]
    Overwrite,
    /// Update the neighbour only when the candidate distance is strictly smaller.
    ///
    /// The predecessor ends up being the first settled neighbour. Visitation order and
    /// distances are identical to [`Relaxation::Overwrite`].
    Improve,
}

impl Relaxation {
    /// Returns the name of the policy as accepted on the command line.
    #[must_use]
    pub const fn repr(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Improve => "improve",
        }
    }

    /// Returns the other policy.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Overwrite => Self::Improve,
            Self::Improve => Self::Overwrite,
        }
    }
}

/// Per-cell state of a single search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeState {
    /// Tentative distance from the start; `None` stands for infinity.
    pub distance: Option<usize>,
    /// Whether the cell has been settled.
    pub visited: bool,
    /// Predecessor on the best known path from the start.
    pub previous: Option<Coord>,
}

/// Outcome of a search run.
///
/// The search owns all scratch state, so the grid it ran over is left untouched and can be
/// searched again without any reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Search {
    /// Number of rows of the searched grid.
    height: usize,
    /// Number of columns of the searched grid.
    width: usize,
    /// Coordinate the search started from.
    start: Coord,
    /// Coordinate the search was looking for.
    finish: Coord,
    /// Scratch state indexed in row-major order.
    nodes: Vec<NodeState>,
    /// Cells in the order they were settled.
    visited_in_order: Vec<Coord>,
}

impl Search {
    /// Returns the coordinate the search started from.
    #[must_use]
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// Returns the coordinate the search was looking for.
    #[must_use]
    pub const fn finish(&self) -> Coord {
        self.finish
    }

    /// Returns the settled cells in settlement order.
    ///
    /// When the finish was reached it is the last element.
    #[must_use]
    pub fn visited_in_order(&self) -> &[Coord] {
        &self.visited_in_order
    }

    /// Returns whether the finish cell was settled.
    #[must_use]
    pub fn reached_finish(&self) -> bool {
        self.node(self.finish).is_some_and(|node| node.visited)
    }

    /// Returns the scratch state recorded for a cell.
    #[must_use]
    pub fn node(&self, coord: Coord) -> Option<&NodeState> {
        if coord.row < self.height && coord.col < self.width {
            self.nodes.get(coord.row * self.width + coord.col)
        } else {
            None
        }
    }

    /// Returns the tentative distance of a cell, `None` meaning unreachable or never relaxed.
    #[must_use]
    pub fn distance(&self, coord: Coord) -> Option<usize> {
        self.node(coord).and_then(|node| node.distance)
    }

    /// Follows predecessor links back from `target` and returns them earliest-first.
    ///
    /// A cell that never received a predecessor yields a single-element path holding just that
    /// cell, and a coordinate outside the grid yields an empty path.
    #[must_use]
    pub fn path_to(&self, target: Coord) -> Vec<Coord> {
        if self.node(target).is_none() {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(coord) = current {
            path.push(coord);
            current = self.node(coord).and_then(|node| node.previous);
        }
        path.reverse();

        path
    }

    /// Returns the shortest path from the start to the finish.
    ///
    /// Check [`Search::reached_finish`] first: when the finish was never reached this returns
    /// `[finish]` alone.
    #[must_use]
    pub fn shortest_path(&self) -> Vec<Coord> {
        self.path_to(self.finish)
    }
}

/// Entry of the search frontier.
///
/// Entries order by distance first and by discovery order second, which keeps cells of equal
/// distance first-in first-out.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    /// Distance of the cell when the entry was pushed.
    distance: usize,
    /// Discovery counter at the time of the push.
    order: usize,
    /// Row-major index of the cell.
    index: usize,
}

/// Dijkstra's shortest-path algorithm over unit-weight grids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dijkstra {
    /// Relaxation policy applied to neighbours of settled cells.
    relaxation: Relaxation,
}

impl Dijkstra {
    /// Builds an engine using the given relaxation policy.
    #[must_use]
    pub const fn new(relaxation: Relaxation) -> Self {
        Self { relaxation }
    }

    /// Returns the engine with another relaxation policy.
    #[must_use]
    pub const fn with_relaxation(mut self, relaxation: Relaxation) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Returns the relaxation policy of the engine.
    #[must_use]
    pub const fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    /// Searches from the grid's own start cell to its own finish cell.
    ///
    /// # Errors
    ///
    /// See [`Dijkstra::run`].
    pub fn solve(&self, grid: &Grid) -> Result<Search> {
        self.run(grid, grid.start(), grid.finish())
    }

    /// Settles cells outwards from `start` until `finish` is settled or nothing reachable is
    /// left.
    ///
    /// Among cells of equal distance, the one discovered first is settled first, and cells
    /// discovered by the same settled cell are taken in row-major order. Walls are never
    /// settled nor expanded. An unreachable finish is not an error: the search simply holds
    /// every reachable cell and [`Search::reached_finish`] is `false`.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - The start or the finish lies outside the grid
    /// - The start and the finish are the same cell
    /// - The start or the finish is a wall
    pub fn run(&self, grid: &Grid, start: Coord, finish: Coord) -> Result<Search> {
        let start_index = grid
            .index(start)
            .ok_or_else(|| eyre!("start {start} lies outside the grid"))?;
        ensure!(
            grid.contains(finish),
            "finish {finish} lies outside the grid"
        );
        ensure!(
            start != finish,
            "start and finish must be different cells, both are {start}"
        );
        ensure!(!grid.is_wall(start), "start {start} is a wall");
        ensure!(!grid.is_wall(finish), "finish {finish} is a wall");

        let mut nodes = vec![NodeState::default(); grid.len()];
        let mut visited_in_order = Vec::new();
        let mut frontier = BinaryHeap::new();
        let mut discovered = 0_usize;

        nodes
            .get_mut(start_index)
            .ok_or_eyre("failed to retrieve start node")?
            .distance = Some(0);
        frontier.push(Reverse(FrontierEntry {
            distance: 0,
            order: discovered,
            index: start_index,
        }));

        while let Some(Reverse(entry)) = frontier.pop() {
            let Some(node) = nodes.get_mut(entry.index) else {
                continue;
            };
            // Stale entries left behind by a relaxation that changed the distance.
            if node.visited || node.distance != Some(entry.distance) {
                continue;
            }
            node.visited = true;

            let current = grid
                .coord_at(entry.index)
                .ok_or_eyre("frontier entry points outside the grid")?;
            visited_in_order.push(current);
            if current == finish {
                break;
            }

            let candidate = entry.distance + 1;
            for neighbor in grid.neighbors(current) {
                if grid.is_wall(neighbor) {
                    continue;
                }
                let Some(index) = grid.index(neighbor) else {
                    continue;
                };
                let Some(state) = nodes.get_mut(index) else {
                    continue;
                };
                if state.visited {
                    continue;
                }

                let improves = !matches!(state.distance, Some(distance) if distance <= candidate);
                if self.relaxation == Relaxation::Improve && !improves {
                    continue;
                }

                let changed = state.distance != Some(candidate);
                state.distance = Some(candidate);
                state.previous = Some(current);
                if changed {
                    discovered += 1;
                    frontier.push(Reverse(FrontierEntry {
                        distance: candidate,
                        order: discovered,
                        index,
                    }));
                }
            }
        }

        let search = Search {
            height: grid.height(),
            width: grid.width(),
            start,
            finish,
            nodes,
            visited_in_order,
        };
        debug!(
            visited = search.visited_in_order.len(),
            reached_finish = search.reached_finish(),
            relaxation = self.relaxation.repr(),
            "dijkstra run finished"
        );

        Ok(search)
    }
}
