//! This crate contains the source code for the binary of the visualizer dijkstrui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use std::io::{self, stdout};

use clap::Parser as _;
use color_eyre::{
    eyre::{Report, Result},
    install,
};
use dijkstrui::{config::Cli, logging, App};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    let mut app = App::new(cli.settings())?;

    let mut terminal = ratatui::init();
    let result = with_mouse_capture(
        || execute!(stdout(), EnableMouseCapture),
        || app.run(&mut terminal),
        || execute!(stdout(), DisableMouseCapture),
    );
    ratatui::restore();

    result
}

/// Runs `session` between enabling and disabling mouse capture.
///
/// Capture is released even when enabling it or the session fails, so the caller can always
/// restore the terminal afterwards. The first failure is reported.
fn with_mouse_capture<E, S, D>(enable: E, session: S, disable: D) -> Result<()>
where
    E: FnOnce() -> io::Result<()>,
    S: FnOnce() -> Result<()>,
    D: FnOnce() -> io::Result<()>,
{
    let result = enable().map_err(Report::from).and_then(|()| session());
    let released = disable();

    result?;
    released?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use color_eyre::eyre::bail;

    use super::*;

    #[test]
    fn test_capture_released_after_session_error() {
        let released = Cell::new(false);

        let result = with_mouse_capture(
            || Ok(()),
            || bail!("session failed"),
            || {
                released.set(true);
                Ok(())
            },
        );

        assert!(result.is_err());
        assert!(released.get(), "capture must be released after a failed session");
    }

    #[test]
    fn test_capture_released_when_enabling_fails() {
        let ran = Cell::new(false);
        let released = Cell::new(false);

        let result = with_mouse_capture(
            || Err(io::Error::other("no mouse")),
            || {
                ran.set(true);
                Ok(())
            },
            || {
                released.set(true);
                Ok(())
            },
        );

        assert!(result.is_err());
        assert!(!ran.get(), "the session must not run without capture");
        assert!(released.get(), "capture must be released after a failed enable");
    }

    #[test]
    fn test_release_failure_is_reported() {
        let result = with_mouse_capture(
            || Ok(()),
            || Ok(()),
            || Err(io::Error::other("release failed")),
        );

        assert!(result.is_err());
    }
}
