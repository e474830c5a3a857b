//! Animation replay of a finished search.
//!
//! The engine settles the whole grid at once. This module paces the result for display: settled
//! cells are revealed one after another at a fixed interval, then the shortest path is traced at
//! a slower interval once the last settled cell is on screen.

use std::time::{Duration, Instant};

use crate::{grid::Coord, pathfinding::Search};

/// Stage reached by the replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Nothing is being replayed.
    Idle,
    /// Settled cells are still being revealed.
    Visiting,
    /// The shortest path is still being revealed.
    Tracing,
    /// Everything has been revealed.
    Finished,
}

/// Animation state manager for the search replay.
///
/// This structure keeps the two sequences produced by a search and derives from the time elapsed
/// since the replay started how much of each is visible. Progress is recomputed from the start
/// time on every update, so a late frame catches up instead of slowing the replay down.
#[derive(Debug)]
pub(crate) struct AnimationManager {
    /// Settled cells in settlement order.
    visited: Vec<Coord>,
    /// Shortest path from start to finish, empty when the finish was not reached.
    path: Vec<Coord>,
    /// Whether the replayed search reached the finish.
    reached_finish: bool,
    /// Interval between two settled cells.
    visited_delay: Duration,
    /// Interval between two path cells.
    path_delay: Duration,
    /// Moment the replay started, `None` while idle.
    started_at: Option<Instant>,
    /// Number of settled cells currently revealed.
    shown_visited: usize,
    /// Number of path cells currently revealed.
    shown_path: usize,
}

impl AnimationManager {
    /// Creates an idle animation manager with the given pacing.
    pub(crate) const fn new(visited_delay: Duration, path_delay: Duration) -> Self {
        Self {
            visited: Vec::new(),
            path: Vec::new(),
            reached_finish: false,
            visited_delay,
            path_delay,
            started_at: None,
            shown_visited: 0,
            shown_path: 0,
        }
    }

    /// Starts replaying a search from now.
    pub(crate) fn start(&mut self, search: &Search) {
        self.start_at(search, Instant::now());
    }

    /// Starts replaying a search from the given moment.
    ///
    /// The path is only replayed when the search reached the finish; otherwise the replay ends
    /// with the last settled cell.
    pub(crate) fn start_at(&mut self, search: &Search, now: Instant) {
        self.visited = search.visited_in_order().to_vec();
        self.reached_finish = search.reached_finish();
        self.path = if self.reached_finish {
            search.shortest_path()
        } else {
            Vec::new()
        };
        self.started_at = Some(now);
        self.update_at(now);
    }

    /// Drops the current replay and returns to idle.
    pub(crate) fn clear(&mut self) {
        self.visited.clear();
        self.path.clear();
        self.reached_finish = false;
        self.started_at = None;
        self.shown_visited = 0;
        self.shown_path = 0;
    }

    /// Updates the revealed cells based on the current time.
    pub(crate) fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Updates the revealed cells based on the given moment.
    ///
    /// Settled cell `i` shows up at `i * visited_delay`. The path starts right after the last
    /// settled cell's slot, at `visited.len() * visited_delay`, and path cell `j` shows up
    /// `j * path_delay` later.
    pub(crate) fn update_at(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(started_at);

        self.shown_visited = frames_due(elapsed, self.visited_delay, self.visited.len());

        let slots = u32::try_from(self.visited.len()).unwrap_or(u32::MAX);
        let path_start = self.visited_delay.saturating_mul(slots);
        self.shown_path = elapsed.checked_sub(path_start).map_or(0, |since| {
            frames_due(since, self.path_delay, self.path.len())
        });
    }

    /// Returns the stage the replay is in.
    pub(crate) fn phase(&self) -> Phase {
        if self.started_at.is_none() {
            Phase::Idle
        } else if self.shown_visited < self.visited.len() {
            Phase::Visiting
        } else if self.shown_path < self.path.len() {
            Phase::Tracing
        } else {
            Phase::Finished
        }
    }

    /// Returns whether cells are still being revealed.
    pub(crate) fn is_running(&self) -> bool {
        matches!(self.phase(), Phase::Visiting | Phase::Tracing)
    }

    /// Returns the settled cells revealed so far.
    pub(crate) fn visible_visited(&self) -> &[Coord] {
        self.visited.get(..self.shown_visited).unwrap_or_default()
    }

    /// Returns the path cells revealed so far.
    pub(crate) fn visible_path(&self) -> &[Coord] {
        self.path.get(..self.shown_path).unwrap_or_default()
    }

    /// Returns the number of settled cells in the replay.
    pub(crate) fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns the number of path cells in the replay.
    pub(crate) fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Returns whether the replayed search reached the finish.
    pub(crate) const fn reached_finish(&self) -> bool {
        self.reached_finish
    }
}

/// Returns how many frames of a sequence are due after `elapsed`, frame `i` being due at
/// `i * delay`. A zero delay reveals the whole sequence at once.
fn frames_due(elapsed: Duration, delay: Duration, len: usize) -> usize {
    if delay.is_zero() {
        return len;
    }

    let passed = usize::try_from(elapsed.as_nanos() / delay.as_nanos()).unwrap_or(usize::MAX);
    passed.saturating_add(1).min(len)
}
