//! Core application state and logic for the visualizer.

use color_eyre::eyre::Result;
use ratatui::{layout::Rect, DefaultTerminal};
use tracing::{debug, info};

use crate::{
    config::Settings,
    events,
    grid::{Coord, Grid},
    pathfinding::Dijkstra,
    replay::AnimationManager,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the visualizer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the grid and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Grid being edited.
    ///
    /// Every edit replaces this value with a new grid, so a search started earlier keeps working
    /// on the snapshot it was given.
    pub(crate) grid: Grid,
    /// Cell under the keyboard cursor.
    pub(crate) cursor: Coord,
    /// Engine used to search the grid.
    pub(crate) dijkstra: Dijkstra,
    /// Last cell toggled by the mouse while its button is held down.
    ///
    /// This field is `None` while the button is up. Dragging only toggles a cell when the pointer
    /// enters a cell other than this one.
    pub(crate) drawing: Option<Coord>,
    /// Terminal area covered by the grid during the last redraw.
    ///
    /// This field is used to map mouse positions back to grid cells. It is `None` when the grid
    /// did not fit in the terminal or has not been drawn yet.
    pub(crate) grid_area: Option<Rect>,
    /// Animation manager replaying the last search.
    pub(crate) animation_manager: AnimationManager,
}

impl App {
    /// Creates a new instance of the App structure from the given settings.
    ///
    /// # Errors
    ///
    /// This function returns an error if the settings do not describe a valid grid, see
    /// [`Grid::new`].
    pub fn new(settings: Settings) -> Result<Self> {
        let grid = Grid::new(
            settings.height,
            settings.width,
            settings.start,
            settings.finish,
        )?;

        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::Start),
            grid,
            cursor: Coord::new(0, 0),
            dijkstra: Dijkstra::new(settings.relaxation),
            drawing: None,
            grid_area: None,
            animation_manager: AnimationManager::new(settings.visited_delay, settings.path_delay),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(
            height = self.grid.height(),
            width = self.grid.width(),
            start = %self.grid.start(),
            finish = %self.grid.finish(),
            "starting visualizer"
        );

        while !self.exit {
            let _ = terminal
                .try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Toggles the wall flag of a cell on behalf of the user.
    ///
    /// The start and finish cells cannot become walls, and nothing changes while a replay is
    /// still running. A finished replay no longer matches the edited grid, so it is dropped.
    ///
    /// # Errors
    ///
    /// This function returns an error if the coordinate lies outside the grid.
    pub(crate) fn toggle_wall(&mut self, coord: Coord) -> Result<()> {
        if self.animation_manager.is_running() {
            debug!(%coord, "ignoring wall edit during replay");
            return Ok(());
        }
        if coord == self.grid.start() || coord == self.grid.finish() {
            debug!(%coord, "ignoring wall edit on an endpoint");
            return Ok(());
        }

        self.animation_manager.clear();
        self.grid = self.grid.with_wall_toggled(coord)?;
        debug!(%coord, wall = self.grid.is_wall(coord), "toggled wall");

        Ok(())
    }

    /// Searches the current grid and starts replaying the result.
    ///
    /// A request made while a replay is still running is ignored.
    ///
    /// # Errors
    ///
    /// This function returns an error if the engine rejects the grid, see [`Dijkstra::run`].
    pub(crate) fn visualize(&mut self) -> Result<()> {
        if self.animation_manager.is_running() {
            return Ok(());
        }

        let search = self.dijkstra.solve(&self.grid)?;
        info!(
            visited = search.visited_in_order().len(),
            reached_finish = search.reached_finish(),
            walls = self.grid.walls().count(),
            "visualizing search"
        );
        self.animation_manager.start(&search);

        Ok(())
    }

    /// Drops the replay overlay, keeping the walls.
    pub(crate) fn clear_overlay(&mut self) {
        self.animation_manager.clear();
    }

    /// Removes every wall and the replay overlay.
    pub(crate) fn reset(&mut self) {
        self.animation_manager.clear();
        self.grid = self.grid.without_walls();
        debug!("grid reset");
    }

    /// Moves the keyboard cursor by the given offsets, staying inside the grid.
    pub(crate) fn move_cursor(&mut self, rows: isize, cols: isize) {
        let max_row = self.grid.height().saturating_sub(1);
        let max_col = self.grid.width().saturating_sub(1);

        self.cursor = Coord::new(
            self.cursor.row.saturating_add_signed(rows).min(max_row),
            self.cursor.col.saturating_add_signed(cols).min(max_col),
        );
    }

    /// Maps a terminal position to the grid cell drawn there during the last redraw.
    pub(crate) fn cell_at(&self, column: u16, row: u16) -> Option<Coord> {
        let area = self.grid_area?;
        let col = column.checked_sub(area.x)?;
        let row = row.checked_sub(area.y)?;
        let coord = Coord::new(usize::from(row), usize::from(col));

        (col < area.width && row < area.height && self.grid.contains(coord)).then_some(coord)
    }
}
