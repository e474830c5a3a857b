//! Terminal visualizer for Dijkstra's shortest-path algorithm on an editable grid.
//!
//! The [`grid`] module holds the four-connected grid model, the [`pathfinding`] module runs the
//! search over a snapshot of it, and the [`App`] replays the settled cells and the shortest path
//! in the terminal while the user draws walls.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
mod events;
pub mod grid;
pub mod logging;
pub mod pathfinding;
mod replay;
mod types;
mod ui;

pub use app::App;
