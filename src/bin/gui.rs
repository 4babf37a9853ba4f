//! GUI entry point for the coding helper.
//!
//! Run with: cargo run --bin coding-helper-gui

use iced::Size;

use coding_helper::gui::CodingHelperApp;

fn main() -> iced::Result {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    iced::application(
        CodingHelperApp::title,
        CodingHelperApp::update,
        CodingHelperApp::view,
    )
    .subscription(CodingHelperApp::subscription)
    .theme(CodingHelperApp::theme)
    .window_size(Size::new(900.0, 800.0))
    .run_with(|| (CodingHelperApp::new(), iced::Task::none()))
}
