//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    grid::Coord,
    pathfinding::Relaxation,
    replay::Phase,
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
    App,
};

/// Color of open cells.
const OPEN_COLOR: Color = Color::DarkGray;
/// Color of wall cells.
const WALL_COLOR: Color = Color::White;
/// Color of settled cells revealed by the replay.
const VISITED_COLOR: Color = Color::Cyan;
/// Color of shortest path cells revealed by the replay.
const PATH_COLOR: Color = Color::Yellow;
/// Color of the start cell.
const START_COLOR: Color = Color::Green;
/// Color of the finish cell.
const FINISH_COLOR: Color = Color::Red;
/// Color of the keyboard cursor.
const CURSOR_COLOR: Color = Color::Magenta;

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    match &app.screen {
        Screen::MainMenu(item) => main_menu(frame, *item),
        Screen::OptionsMenu(item) => options_menu(frame, *item, app.dijkstra.relaxation()),
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the generic layout structure for the main and options menus.
///
/// This function creates the common layout and block structure used by both main and options menus.
/// The generic part includes the centered positioning and border styling, while the specific menu
/// content is handled by the caller using the [`MenuType`] parameter.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: MenuType) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(u16::from(menu.value() + 2))])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); menu.value().into()]).split(inner_space)
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start", "Options", and "Quit". It
/// highlights the currently selected option and provides visual feedback for user navigation.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
#[expect(
    clippy::missing_asserts_for_indexing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, MenuType::MainMenu(3));

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    let mut opt1 = Line::raw("Start").centered();
    let mut opt2 = Line::raw("Options").centered();
    let mut opt3 = Line::raw("Quit").centered();
    match item {
        MainMenuItem::Start => {
            opt1 = opt1.style(active_content_style);
            opt2 = opt2.style(content_style);
            opt3 = opt3.style(content_style);
        }
        MainMenuItem::Options => {
            opt1 = opt1.style(content_style);
            opt2 = opt2.style(active_content_style);
            opt3 = opt3.style(content_style);
        }
        MainMenuItem::Quit => {
            opt1 = opt1.style(content_style);
            opt2 = opt2.style(content_style);
            opt3 = opt3.style(active_content_style);
        }
    }

    frame.render_widget(opt1, inner_layout[0]);
    frame.render_widget(opt2, inner_layout[1]);
    frame.render_widget(opt3, inner_layout[2]);
}

/// Renders the options menu screen with configuration choices.
///
/// This function displays the current relaxation policy of the engine, which selecting flips, and
/// a "Back" entry returning to the main menu.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
#[expect(
    clippy::missing_asserts_for_indexing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn options_menu(frame: &mut Frame, item: OptionsMenuItem, relaxation: Relaxation) {
    clear(frame);

    let inner_layout = init_menu(frame, MenuType::OptionsMenu(2));

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    let mut opt1 = Line::raw(format!("Relaxation: {}", relaxation.repr())).centered();
    let mut opt2 = Line::raw("Back").centered();
    match item {
        OptionsMenuItem::Relaxation => {
            opt1 = opt1.style(active_content_style);
            opt2 = opt2.style(content_style);
        }
        OptionsMenuItem::Back => {
            opt1 = opt1.style(content_style);
            opt2 = opt2.style(active_content_style);
        }
    }

    frame.render_widget(opt1, inner_layout[0]);
    frame.render_widget(opt2, inner_layout[1]);
}

/// Renders the grid screen with walls, the replayed search and the keyboard cursor.
///
/// The grid is drawn on a [`Canvas`] covering exactly one terminal cell per grid cell, and the
/// covered area is stored in the [`App`] so mouse positions can be mapped back to grid cells.
/// When the terminal is too small to hold the grid a notice is rendered instead.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion operations.
pub(crate) fn in_game(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let rows = u16::try_from(app.grid.height())?;
    let columns = u16::try_from(app.grid.width())?;

    // Create overall layout: grid area + tooltip at bottom
    let overall_layout =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(frame.area());
    let grid_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get grid content area from layout")?;
    let tooltip_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get tooltip area from layout")?;

    tooltip(app, frame, tooltip_area);

    if grid_content_area.width < columns || grid_content_area.height < rows {
        app.grid_area = None;

        let notice_area = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .split(grid_content_area)
            .first()
            .copied()
            .ok_or_eyre("failed to get notice area from layout")?;
        let notice = Line::styled(
            format!("terminal too small for a {rows}x{columns} grid"),
            Style::default().fg(Color::Red),
        )
        .centered();
        frame.render_widget(notice, notice_area);

        return Ok(());
    }

    let space = Layout::vertical([Constraint::Length(rows)])
        .flex(Flex::Center)
        .split(grid_content_area)
        .first()
        .copied()
        .ok_or_eyre("failed to get grid rows from vertical layout")?;
    let space = Layout::horizontal([Constraint::Length(columns)])
        .flex(Flex::Center)
        .split(space)
        .first()
        .copied()
        .ok_or_eyre("failed to get grid space from horizontal layout")?;
    app.grid_area = Some(space);

    // Pre-compute canvas coordinates to handle errors before closures
    let height = app.grid.height();
    let open: Vec<Coord> = app
        .grid
        .cells()
        .filter(|cell| !cell.is_wall)
        .map(|cell| cell.coord)
        .collect();
    let walls: Vec<Coord> = app.grid.walls().collect();
    let open_coords = to_canvas_coords(&open, height)?;
    let wall_coords = to_canvas_coords(&walls, height)?;
    let visited_coords = to_canvas_coords(app.animation_manager.visible_visited(), height)?;
    let path_coords = to_canvas_coords(app.animation_manager.visible_path(), height)?;
    let start_coords = to_canvas_coords(&[app.grid.start()], height)?;
    let finish_coords = to_canvas_coords(&[app.grid.finish()], height)?;
    let cursor_coords = to_canvas_coords(&[app.cursor], height)?;

    let grid = Canvas::default()
        .x_bounds([0.0, canvas_extent(columns)])
        .y_bounds([0.0, canvas_extent(rows)])
        .marker(Marker::Block)
        .paint(|ctx| {
            let layers = [
                (&open_coords, OPEN_COLOR),
                (&wall_coords, WALL_COLOR),
                (&visited_coords, VISITED_COLOR),
                (&path_coords, PATH_COLOR),
                // Endpoints go above the cursor so they stay visible under it.
                (&cursor_coords, CURSOR_COLOR),
                (&start_coords, START_COLOR),
                (&finish_coords, FINISH_COLOR),
            ];
            for (coords, color) in layers {
                ctx.draw(&Points { coords, color });
                ctx.layer();
            }
        });

    frame.render_widget(grid, space);

    Ok(())
}

/// Renders the key bindings and the replay status below the grid.
pub(crate) fn tooltip(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .title("(arrows) move / (space) wall / (v) run / (c) clear / (r) reset / (h) menu")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(Line::raw(status(app)).centered(), inner);
}

/// Describes the state of the replay in a single line.
pub(crate) fn status(app: &App) -> String {
    let manager = &app.animation_manager;

    match manager.phase() {
        Phase::Idle => format!(
            "cursor {} / relaxation: {}",
            app.cursor,
            app.dijkstra.relaxation().repr()
        ),
        Phase::Visiting => format!(
            "settling {}/{} cells",
            manager.visible_visited().len(),
            manager.visited_len()
        ),
        Phase::Tracing => format!(
            "tracing path {}/{} cells",
            manager.visible_path().len(),
            manager.path_len()
        ),
        Phase::Finished if manager.reached_finish() => format!(
            "settled {} cells, shortest path {} cells",
            manager.visited_len(),
            manager.path_len()
        ),
        Phase::Finished => format!(
            "settled {} cells, finish unreachable",
            manager.visited_len()
        ),
    }
}

/// Returns the upper canvas bound for an axis covering `cells` terminal cells.
///
/// Points sit on integer positions from zero to `cells - 1`, which the canvas maps one to one onto
/// terminal cells. A single cell axis still needs a non-empty range.
fn canvas_extent(cells: u16) -> f64 {
    f64::from(cells.saturating_sub(1).max(1))
}

/// Transforms grid coordinates to canvas coordinates.
///
/// This function converts grid coordinates (row, col) to canvas coordinates (x, y). Columns map
/// straight onto x, while rows are flipped because the canvas y axis points upwards: the top row
/// of a grid with `rows` rows sits at `y = rows - 1`.
///
/// # Errors
///
/// This function may return errors if a coordinate does not fit the terminal or lies below the
/// last row.
pub(crate) fn to_canvas_coords(coords: &[Coord], rows: usize) -> Result<Vec<(f64, f64)>> {
    coords
        .iter()
        .map(|coord| {
            let flipped = rows
                .checked_sub(coord.row + 1)
                .ok_or_eyre("cell row lies below the grid")?;

            Ok((
                f64::from(u16::try_from(coord.col)?),
                f64::from(u16::try_from(flipped)?),
            ))
        })
        .collect()
}
