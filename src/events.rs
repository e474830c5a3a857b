//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::{
    types::{MainMenuItem, OptionsMenuItem, Screen},
    App,
};

/// Time to wait for an input event before redrawing.
///
/// This is also the frame period of the replay, so it is kept well below the default interval
/// between two settled cells.
const EVENT_POLL_MS: u64 = 16;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard and mouse events and dispatches them to the appropriate
/// handler functions. It uses a timeout to avoid blocking the replay.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_events(app, key.code)?,
            Event::Mouse(mouse) => handle_mouse_events(app, mouse)?,
            _ => {}
        }
    }

    // Update animation if in-game
    if matches!(app.screen, Screen::InGame) {
        app.animation_manager.update();
    }

    Ok(())
}

/// Dispatches a key press to the handler of the current screen.
pub(crate) fn handle_key_events(app: &mut App, code: KeyCode) -> Result<()> {
    if code == KeyCode::Char('q') {
        app.exit = true;
        return Ok(());
    }

    if matches!(app.screen, Screen::InGame) {
        return handle_in_game_events(app, code);
    }

    match code {
        KeyCode::Char('j') => handle_j_events(app),
        KeyCode::Char('k') => handle_k_events(app),
        KeyCode::Char('l') => handle_l_events(app),
        KeyCode::Char('h') => handle_h_events(app),
        _ => {}
    }

    Ok(())
}

/// Handles 'j' key press events for downward navigation in menus.
pub(crate) fn handle_j_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::Start) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::Quit);
        }
        Screen::OptionsMenu(OptionsMenuItem::Relaxation) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Back);
        }
        _ => {}
    }
}

/// Handles 'k' key press events for upward navigation in menus.
pub(crate) fn handle_k_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::Start);
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Relaxation);
        }
        _ => {}
    }
}

/// Handles 'l' key press events for selection and forward navigation.
///
/// This function processes the 'l' key press which is used for selecting menu items. It handles
/// screen transitions, quitting and flipping the relaxation policy in the options menu.
pub(crate) fn handle_l_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::Start) => {
            app.screen = Screen::InGame;
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Relaxation);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Relaxation) => {
            app.dijkstra = app.dijkstra.with_relaxation(app.dijkstra.relaxation().toggled());
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::Start);
        }
        Screen::InGame => {}
    }
}

/// Handles 'h' key press events for backward navigation.
///
/// This function processes the 'h' key press which is used for moving back or returning to
/// previous screens. It handles returning from the grid and from the options menu to the main
/// menu.
pub(crate) fn handle_h_events(app: &mut App) {
    match app.screen {
        Screen::InGame => {
            app.drawing = None;
            app.screen = Screen::MainMenu(MainMenuItem::Start);
        }
        Screen::OptionsMenu(_) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(_) => {}
    }
}

/// Handles key presses on the grid screen.
///
/// Arrow keys move the cursor, space toggles the wall under it, 'v' or enter runs the search,
/// 'c' clears the replay, 'r' removes every wall and 'h' leaves for the main menu.
pub(crate) fn handle_in_game_events(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Up => app.move_cursor(-1, 0),
        KeyCode::Down => app.move_cursor(1, 0),
        KeyCode::Left => app.move_cursor(0, -1),
        KeyCode::Right => app.move_cursor(0, 1),
        KeyCode::Char(' ') => app.toggle_wall(app.cursor)?,
        KeyCode::Char('v') | KeyCode::Enter => app.visualize()?,
        KeyCode::Char('c') => app.clear_overlay(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('h') => handle_h_events(app),
        _ => {}
    }

    Ok(())
}

/// Handles mouse events on the grid screen.
///
/// Pressing the left button toggles the cell under the pointer and starts drawing, dragging
/// toggles every newly entered cell and releasing the button stops drawing.
pub(crate) fn handle_mouse_events(app: &mut App, mouse: MouseEvent) -> Result<()> {
    if !matches!(app.screen, Screen::InGame) {
        return Ok(());
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(coord) = app.cell_at(mouse.column, mouse.row) {
                app.cursor = coord;
                app.toggle_wall(coord)?;
                app.drawing = Some(coord);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(last) = app.drawing else {
                return Ok(());
            };
            if let Some(coord) = app.cell_at(mouse.column, mouse.row) {
                if coord != last {
                    app.cursor = coord;
                    app.toggle_wall(coord)?;
                    app.drawing = Some(coord);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.drawing = None;
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ratatui::{crossterm::event::KeyModifiers, layout::Rect};

    use super::*;
    use crate::{config::Settings, grid::Coord, pathfinding::Relaxation, replay::Phase};

    /// Creates an app with the default settings.
    fn create_test_app() -> App {
        App::new(Settings::default()).expect("default settings should build an app")
    }

    /// Creates an app already showing the grid.
    fn in_game_app() -> App {
        let mut app = create_test_app();
        app.screen = Screen::InGame;
        app.grid_area = Some(Rect::new(0, 0, 50, 20));
        app
    }

    /// Builds a mouse event of the given kind at a terminal position.
    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut app = create_test_app();

        handle_j_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Options));
        handle_j_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        handle_j_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));

        handle_k_events(&mut app);
        handle_k_events(&mut app);
        handle_k_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Start));

        handle_l_events(&mut app);
        assert_eq!(app.screen, Screen::InGame);
    }

    #[test]
    fn test_quit_from_menu_and_key() {
        let mut app = create_test_app();
        app.screen = Screen::MainMenu(MainMenuItem::Quit);

        handle_l_events(&mut app);
        assert!(app.exit);

        let mut app = in_game_app();
        handle_key_events(&mut app, KeyCode::Char('q')).expect("key should be handled");
        assert!(app.exit);
    }

    #[test]
    fn test_options_menu_flips_relaxation() {
        let mut app = create_test_app();
        app.screen = Screen::MainMenu(MainMenuItem::Options);

        handle_l_events(&mut app);
        assert_eq!(app.screen, Screen::OptionsMenu(OptionsMenuItem::Relaxation));

        handle_l_events(&mut app);
        assert_eq!(app.dijkstra.relaxation(), Relaxation::Improve);
        handle_l_events(&mut app);
        assert_eq!(app.dijkstra.relaxation(), Relaxation::Overwrite);

        handle_j_events(&mut app);
        handle_l_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Start));
    }

    #[test]
    fn test_h_returns_to_main_menu() {
        let mut app = in_game_app();
        app.drawing = Some(Coord::new(0, 0));

        handle_key_events(&mut app, KeyCode::Char('h')).expect("key should be handled");

        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Start));
        assert_eq!(app.drawing, None);

        app.screen = Screen::OptionsMenu(OptionsMenuItem::Back);
        handle_h_events(&mut app);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Options));
    }

    #[test]
    fn test_in_game_keys() {
        let mut app = in_game_app();

        handle_key_events(&mut app, KeyCode::Right).expect("key should be handled");
        handle_key_events(&mut app, KeyCode::Down).expect("key should be handled");
        assert_eq!(app.cursor, Coord::new(1, 1));

        handle_key_events(&mut app, KeyCode::Char(' ')).expect("key should be handled");
        assert!(app.grid.is_wall(Coord::new(1, 1)));

        handle_key_events(&mut app, KeyCode::Char('v')).expect("key should be handled");
        assert_eq!(app.animation_manager.phase(), Phase::Visiting);

        handle_key_events(&mut app, KeyCode::Char('c')).expect("key should be handled");
        assert_eq!(app.animation_manager.phase(), Phase::Idle);
        assert!(app.grid.is_wall(Coord::new(1, 1)));

        handle_key_events(&mut app, KeyCode::Char('r')).expect("key should be handled");
        assert_eq!(app.grid.walls().count(), 0);
    }

    #[test]
    fn test_in_game_ignores_menu_keys() {
        let mut app = in_game_app();

        handle_key_events(&mut app, KeyCode::Char('j')).expect("key should be handled");
        handle_key_events(&mut app, KeyCode::Char('l')).expect("key should be handled");

        assert_eq!(app.screen, Screen::InGame);
    }

    #[test]
    fn test_mouse_press_drag_release_draws_walls() {
        let mut app = in_game_app();

        handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2, 3))
            .expect("mouse should be handled");
        assert!(app.grid.is_wall(Coord::new(3, 2)));
        assert_eq!(app.drawing, Some(Coord::new(3, 2)));

        // Repeated drag events inside the same cell do not toggle it back.
        handle_mouse_events(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 2, 3))
            .expect("mouse should be handled");
        assert!(app.grid.is_wall(Coord::new(3, 2)));

        handle_mouse_events(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 3, 3))
            .expect("mouse should be handled");
        assert!(app.grid.is_wall(Coord::new(3, 3)));
        assert_eq!(app.cursor, Coord::new(3, 3));

        handle_mouse_events(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 3, 3))
            .expect("mouse should be handled");
        assert_eq!(app.drawing, None);

        handle_mouse_events(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 4, 3))
            .expect("mouse should be handled");
        assert!(!app.grid.is_wall(Coord::new(3, 4)));
        assert_eq!(app.grid.walls().count(), 2);
    }

    #[test]
    fn test_mouse_outside_grid_is_ignored() {
        let mut app = in_game_app();

        handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60, 3))
            .expect("mouse should be handled");

        assert_eq!(app.drawing, None);
        assert_eq!(app.grid.walls().count(), 0);
    }

    #[test]
    fn test_mouse_ignored_in_menus() {
        let mut app = create_test_app();
        app.grid_area = Some(Rect::new(0, 0, 50, 20));

        handle_mouse_events(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1))
            .expect("mouse should be handled");

        assert_eq!(app.grid.walls().count(), 0);
    }
}
