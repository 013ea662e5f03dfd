//! Terminal front end
//!
//! A search box on top, the latest result set below, a status bar at the
//! bottom. All state lives in [`app::App`]; the controller does the rest.

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crate::controller::SearchController;

/// Take over the terminal and run the interactive search until the user quits
pub fn run(controller: SearchController, backend_label: &str) -> crate::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let mut app = app::App::new(controller, backend_label);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
