//! Type definitions and enums for the application state and navigation.

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the application. This is used
/// to determine which screen to render and what actions to take based on user input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen.
    ///
    /// This variant represents the menu shown on startup and when leaving the grid.
    MainMenu(MainMenuItem),
    /// Options configuration screen.
    ///
    /// This variant represents the options menu, where the engine's relaxation policy is chosen.
    OptionsMenu(OptionsMenuItem),
    /// Grid editing and visualization screen.
    ///
    /// This variant represents the screen where walls are drawn and the search is replayed.
    InGame,
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which
/// items can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start" menu option, opening the grid.
    Start,
    /// "Options" menu option.
    Options,
    /// "Quit" menu option.
    Quit,
}

/// Options menu navigation choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OptionsMenuItem {
    /// Relaxation policy switch.
    ///
    /// Selecting this item flips the policy between overwriting and improving relaxation.
    Relaxation,
    /// "Back" navigation option.
    Back,
}

/// Generic menu type configuration.
///
/// This enumeration holds the different specifics particular to each generic menu type in the
/// application's interface. Generic here means they share enough features to be considered worth
/// joining together part of their functionality.
pub(crate) enum MenuType {
    /// Main menu configuration, carrying its number of items.
    MainMenu(u8),
    /// Options menu configuration, carrying its number of items.
    OptionsMenu(u8),
}

impl MenuType {
    /// Returns the string representation of the menu type.
    ///
    /// This function provides the display name for each menu variant, used as the title in the
    /// menu's border when rendering the interface.
    pub(crate) const fn repr(&self) -> &str {
        match self {
            Self::MainMenu(_) => "Dijkstra's Algorithm",
            Self::OptionsMenu(_) => "Options",
        }
    }

    /// Returns the numeric value stored by the menu type variant.
    ///
    /// This function provides access to the number of menu items for layout calculations, allowing
    /// the UI to properly size the menu containers.
    pub(crate) const fn value(&self) -> u8 {
        match self {
            Self::MainMenu(value) | Self::OptionsMenu(value) => *value,
        }
    }
}
