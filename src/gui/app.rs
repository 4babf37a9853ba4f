//! Main Iced application for the coding helper GUI.

use iced::widget::{
    button, canvas, column, container, horizontal_rule, horizontal_space, image, pick_list,
    progress_bar, row, scrollable, stack, text, text_editor, text_input, vertical_space,
};
use iced::{
    event, keyboard, time, window, ContentFit, Element, Event, Length, Subscription, Task, Theme,
};
use std::sync::Arc;
use std::time::Duration;

use crate::capture::{Region, Screenshot, Selection};
use crate::config::{get_messages, Messages};
use crate::solver::{freeze_screen, Answer, Solver};

use super::logger::Logger;
use super::selector::RegionSelector;
use super::AppSettings;

/// Current view/tab of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    Selecting,
    Settings,
    Logs,
}

/// Language options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    fn as_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "cn",
        }
    }

    fn from_code(code: &str) -> Self {
        match code {
            "cn" | "zh" => Language::Chinese,
            _ => Language::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Chinese => write!(f, "中文"),
        }
    }
}

/// Image detail options sent with the screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

impl ImageDetail {
    const ALL: [ImageDetail; 3] = [ImageDetail::Auto, ImageDetail::Low, ImageDetail::High];

    fn as_str(&self) -> &'static str {
        match self {
            ImageDetail::Auto => "auto",
            ImageDetail::Low => "low",
            ImageDetail::High => "high",
        }
    }

    fn from_str(s: &str) -> Self {
        match s {
            "low" => ImageDetail::Low,
            "high" => ImageDetail::High,
            _ => ImageDetail::Auto,
        }
    }
}

impl std::fmt::Display for ImageDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Idle,
    Capturing,
    Selecting,
    Analyzing,
}

impl AppState {
    fn is_busy(&self) -> bool {
        matches!(self, AppState::Capturing | AppState::Analyzing)
    }
}

/// Messages for the Iced application.
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    SwitchView(View),

    // Settings - Model
    BaseUrlChanged(String),
    ApiKeyChanged(String),
    ModelNameChanged(String),
    MaxTokensChanged(String),
    ImageDetailSelected(ImageDetail),

    // Settings - Retry
    MaxRetriesChanged(String),
    RetryDelayChanged(String),

    // Settings - Capture
    CaptureDelayChanged(String),
    MaxImageWidthChanged(String),
    SolutionLanguageChanged(String),
    LanguageSelected(Language),

    // Settings actions
    SaveSettings,
    ResetSettings,
    SettingsSaved(Result<(), String>),

    // Screenshot flow
    StartSelection,
    ScreenFrozen(Result<Arc<Screenshot>, String>),
    SelectionFinished(Selection),
    CancelSelection,
    AnalysisCompleted(Result<Answer, String>),
    Tick,

    // Output pane
    OutputAction(text_editor::Action),

    // Logs
    ClearLogs,
}

/// Main application struct.
pub struct CodingHelperApp {
    view: View,
    settings: AppSettings,

    // Parsed settings for pick_list
    language: Language,
    image_detail: ImageDetail,

    // Input fields as strings
    max_tokens_input: String,
    max_retries_input: String,
    retry_delay_input: String,
    capture_delay_input: String,
    max_image_width_input: String,

    state: AppState,
    output: text_editor::Content,
    progress: f32,

    // Frozen screen shown while selecting
    frozen: Option<Arc<Screenshot>>,
    frozen_handle: Option<image::Handle>,

    logger: Logger,
    status: String,
}

impl Default for CodingHelperApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CodingHelperApp {
    /// Create a new application instance.
    pub fn new() -> Self {
        let mut logger = Logger::new();
        logger.info("Coding helper GUI started");
        Self::with_parts(AppSettings::load_with_env(), logger)
    }

    fn with_parts(settings: AppSettings, mut logger: Logger) -> Self {
        if !settings.has_api_key() {
            logger.warning("OPENAI_API_KEY is not set, configure it in Settings or .env");
        }

        let msgs = get_messages(&settings.lang);

        Self {
            view: View::Main,
            language: Language::from_code(&settings.lang),
            image_detail: ImageDetail::from_str(&settings.image_detail),
            max_tokens_input: settings.max_tokens.to_string(),
            max_retries_input: settings.max_retries.to_string(),
            retry_delay_input: settings.retry_delay.to_string(),
            capture_delay_input: settings.capture_delay_ms.to_string(),
            max_image_width_input: settings.max_image_width.to_string(),
            state: AppState::Idle,
            output: text_editor::Content::with_text(msgs.monitoring_active),
            progress: 0.0,
            frozen: None,
            frozen_handle: None,
            logger,
            status: msgs.ready.to_string(),
            settings,
        }
    }

    fn msgs(&self) -> &'static Messages {
        get_messages(&self.settings.lang)
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        self.msgs().window_title.to_string()
    }

    /// Get the theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// PgUp and Esc, plus an animation tick while busy.
    ///
    /// Listens to raw events so the keys still work while the output pane
    /// has focus and captures them for its own scrolling.
    pub fn subscription(&self) -> Subscription<Message> {
        let hotkeys = event::listen_with(hotkey_event);

        if self.state.is_busy() {
            Subscription::batch([
                hotkeys,
                time::every(Duration::from_millis(30)).map(|_| Message::Tick),
            ])
        } else {
            hotkeys
        }
    }

    /// Back to defaults, with the environment (`OPENAI_API_KEY` and friends)
    /// layered on top again.
    fn reset_settings(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let mut settings = AppSettings::default();
        settings.apply_env_overrides(lookup);

        self.language = Language::from_code(&settings.lang);
        self.image_detail = ImageDetail::from_str(&settings.image_detail);
        self.max_tokens_input = settings.max_tokens.to_string();
        self.max_retries_input = settings.max_retries.to_string();
        self.retry_delay_input = settings.retry_delay.to_string();
        self.capture_delay_input = settings.capture_delay_ms.to_string();
        self.max_image_width_input = settings.max_image_width.to_string();
        self.settings = settings;
        self.logger.info("Settings reset to defaults");
    }

    /// Replace the output pane text.
    fn show_output_text(&mut self, text: impl AsRef<str>) {
        self.output = text_editor::Content::with_text(text.as_ref());
    }

    fn finish_with_error(&mut self, error: String) {
        let msgs = self.msgs();
        self.state = AppState::Idle;
        self.logger.error(format!("{}: {}", msgs.analysis_error, error));
        self.show_output_text(format!("{}: {}", msgs.analysis_error, error));
        self.status = msgs.ready.to_string();
    }

    /// Update the application state based on messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Navigation
            Message::SwitchView(view) => {
                if self.state == AppState::Selecting {
                    return Task::none();
                }
                self.view = view;
                Task::none()
            }

            // Settings - Model
            Message::BaseUrlChanged(value) => {
                self.settings.base_url = value;
                Task::none()
            }
            Message::ApiKeyChanged(value) => {
                self.settings.api_key = value;
                Task::none()
            }
            Message::ModelNameChanged(value) => {
                self.settings.model_name = value;
                Task::none()
            }
            Message::MaxTokensChanged(value) => {
                self.max_tokens_input = value.clone();
                if let Ok(v) = value.parse() {
                    self.settings.max_tokens = v;
                }
                Task::none()
            }
            Message::ImageDetailSelected(detail) => {
                self.image_detail = detail;
                self.settings.image_detail = detail.as_str().to_string();
                Task::none()
            }

            // Settings - Retry
            Message::MaxRetriesChanged(value) => {
                self.max_retries_input = value.clone();
                if let Ok(v) = value.parse() {
                    self.settings.max_retries = v;
                }
                Task::none()
            }
            Message::RetryDelayChanged(value) => {
                self.retry_delay_input = value.clone();
                if let Ok(v) = value.parse() {
                    self.settings.retry_delay = v;
                }
                Task::none()
            }

            // Settings - Capture
            Message::CaptureDelayChanged(value) => {
                self.capture_delay_input = value.clone();
                if let Ok(v) = value.parse() {
                    self.settings.capture_delay_ms = v;
                }
                Task::none()
            }
            Message::MaxImageWidthChanged(value) => {
                self.max_image_width_input = value.clone();
                if let Ok(v) = value.parse() {
                    self.settings.max_image_width = v;
                }
                Task::none()
            }
            Message::SolutionLanguageChanged(value) => {
                self.settings.solution_language = value;
                Task::none()
            }
            Message::LanguageSelected(lang) => {
                self.language = lang;
                self.settings.lang = lang.as_code().to_string();
                Task::none()
            }

            // Settings actions
            Message::SaveSettings => {
                let settings = self.settings.clone();
                Task::perform(async move { settings.save() }, Message::SettingsSaved)
            }
            Message::ResetSettings => {
                self.reset_settings(|key| std::env::var(key).ok());
                Task::none()
            }
            Message::SettingsSaved(result) => {
                match result {
                    Ok(()) => {
                        let saved = self.msgs().settings_saved;
                        self.logger.success(saved);
                        self.status = saved.to_string();
                    }
                    Err(e) => {
                        self.logger.error(format!("Failed to save settings: {}", e));
                        self.status = format!("Failed to save settings: {}", e);
                    }
                }
                Task::none()
            }

            // Screenshot flow
            Message::StartSelection => {
                if self.state != AppState::Idle {
                    return Task::none();
                }

                let msgs = self.msgs();
                self.state = AppState::Capturing;
                self.show_output_text(msgs.select_area);
                self.status = msgs.busy.to_string();

                // Get our own window out of the way before freezing the screen
                let delay = Duration::from_millis(self.settings.capture_delay_ms);
                window::get_latest()
                    .and_then(|id| window::minimize(id, true))
                    .chain(Task::perform(freeze(delay), Message::ScreenFrozen))
            }
            Message::ScreenFrozen(Ok(shot)) => {
                self.logger
                    .capture(format!("Screen frozen at {}x{}", shot.width(), shot.height()));
                self.frozen_handle = Some(image::Handle::from_rgba(
                    shot.width(),
                    shot.height(),
                    shot.image.as_raw().clone(),
                ));
                self.frozen = Some(shot);
                self.state = AppState::Selecting;
                self.view = View::Selecting;

                window::get_latest().and_then(|id| {
                    Task::batch([
                        window::minimize(id, false),
                        window::change_mode(id, window::Mode::Fullscreen),
                        window::gain_focus(id),
                    ])
                })
            }
            Message::ScreenFrozen(Err(e)) => {
                self.finish_with_error(e);
                restore_window()
            }
            Message::SelectionFinished(selection) => {
                let Some(shot) = self.frozen.take() else {
                    return Task::none();
                };
                self.frozen_handle = None;
                self.view = View::Main;

                let msgs = self.msgs();
                let region = selection.to_region(shot.width(), shot.height());
                if region.is_empty() {
                    self.state = AppState::Idle;
                    self.logger.warning(msgs.empty_selection);
                    self.show_output_text(msgs.empty_selection);
                    self.status = msgs.ready.to_string();
                    return restore_window();
                }

                self.state = AppState::Analyzing;
                self.progress = 0.0;
                self.logger.capture(format!("Selected region {}", region));
                self.show_output_text(msgs.analyzing);

                let settings = self.settings.clone();
                Task::batch([
                    restore_window(),
                    Task::perform(analyze(settings, shot, region), Message::AnalysisCompleted),
                ])
            }
            Message::CancelSelection => {
                if self.state != AppState::Selecting {
                    return Task::none();
                }
                let msgs = self.msgs();
                self.frozen = None;
                self.frozen_handle = None;
                self.state = AppState::Idle;
                self.view = View::Main;
                self.logger.info(msgs.selection_canceled);
                self.show_output_text(msgs.selection_canceled);
                self.status = msgs.ready.to_string();
                restore_window()
            }
            Message::AnalysisCompleted(Ok(answer)) => {
                let msgs = self.msgs();
                self.state = AppState::Idle;
                self.logger.answer(answer_summary(&answer));
                println!("{}", answer);
                self.show_output_text(format!("{}:\n{}", msgs.result, answer.content));
                self.status = msgs.ready.to_string();
                Task::none()
            }
            Message::AnalysisCompleted(Err(e)) => {
                self.finish_with_error(e);
                Task::none()
            }
            Message::Tick => {
                self.progress = (self.progress + 2.0) % 100.0;
                Task::none()
            }

            // Output pane is read-only, only selection and scrolling apply
            Message::OutputAction(action) => {
                if !action.is_edit() {
                    self.output.perform(action);
                }
                Task::none()
            }

            // Logs
            Message::ClearLogs => {
                self.logger.clear();
                self.logger.info("Logs cleared");
                Task::none()
            }
        }
    }

    /// Build the view.
    pub fn view(&self) -> Element<'_, Message> {
        if self.view == View::Selecting {
            return self.view_selecting();
        }

        let content = match self.view {
            View::Main | View::Selecting => self.view_main(),
            View::Settings => self.view_settings(),
            View::Logs => self.view_logs(),
        };

        let nav_bar = self.view_nav_bar();
        let status_bar = self.view_status_bar();

        column![nav_bar, content, status_bar]
            .spacing(10)
            .padding(20)
            .into()
    }

    /// Navigation bar.
    fn view_nav_bar(&self) -> Element<'_, Message> {
        let msgs = self.msgs();
        let nav_button = |label: &'static str, view: View| {
            button(text(label))
                .on_press(Message::SwitchView(view))
                .style(if self.view == view {
                    button::primary
                } else {
                    button::secondary
                })
        };

        row![
            nav_button(msgs.main, View::Main),
            nav_button(msgs.settings, View::Settings),
            nav_button(msgs.logs, View::Logs),
        ]
        .spacing(10)
        .into()
    }

    /// Status bar.
    fn view_status_bar(&self) -> Element<'_, Message> {
        let msgs = self.msgs();
        let state_text = if self.state == AppState::Idle {
            format!("🟢 {}", msgs.ready)
        } else {
            format!("🔵 {}", msgs.busy)
        };

        row![
            text(state_text).size(14),
            horizontal_space(),
            text(&self.status).size(14),
        ]
        .padding(10)
        .into()
    }

    /// Main view with instructions, output and the Screenshot button.
    fn view_main(&self) -> Element<'_, Message> {
        let msgs = self.msgs();

        let output = text_editor(&self.output)
            .on_action(Message::OutputAction)
            .height(Length::Fill)
            .size(14);

        let capture_btn = button(text(msgs.screenshot).size(16))
            .on_press_maybe((self.state == AppState::Idle).then_some(Message::StartSelection))
            .padding([10, 20]);

        let mut content = column![
            text(msgs.instructions).size(18),
            vertical_space().height(10),
            text(msgs.output).size(16),
            container(output)
                .width(Length::Fill)
                .height(Length::Fill),
            capture_btn,
        ]
        .spacing(10)
        .height(Length::Fill);

        if self.state.is_busy() {
            content = content.push(progress_bar(0.0..=100.0, self.progress).height(8));
        }

        content.into()
    }

    /// Fullscreen frozen screenshot with the drag overlay on top.
    fn view_selecting(&self) -> Element<'_, Message> {
        let Some(handle) = &self.frozen_handle else {
            return text(self.msgs().select_area).into();
        };

        let screen = image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Fill);

        let overlay = canvas(RegionSelector)
            .width(Length::Fill)
            .height(Length::Fill);

        stack![screen, overlay].into()
    }

    /// Settings view.
    fn view_settings(&self) -> Element<'_, Message> {
        let msgs = self.msgs();
        let title = text(msgs.settings).size(28);

        let save_btn = button(text(msgs.save_settings))
            .on_press(Message::SaveSettings)
            .style(button::success)
            .padding([10, 20]);

        let reset_btn = button(text(msgs.reset_settings))
            .on_press(Message::ResetSettings)
            .style(button::secondary)
            .padding([10, 20]);

        let content = column![
            title,
            vertical_space().height(10),
            self.view_model_settings(),
            horizontal_rule(1),
            self.view_retry_settings(),
            horizontal_rule(1),
            self.view_capture_settings(),
            vertical_space().height(20),
            row![save_btn, reset_btn].spacing(10),
        ]
        .spacing(15)
        .padding(10);

        scrollable(content).height(Length::Fill).into()
    }

    fn view_model_settings(&self) -> Element<'_, Message> {
        let section_title = text("Model").size(18);

        let base_url = labeled_input(
            "API base URL",
            &self.settings.base_url,
            "https://api.openai.com/v1",
            Message::BaseUrlChanged,
        );

        let api_key = row![
            text("API key").width(160),
            text_input("sk-...", &self.settings.api_key)
                .on_input(Message::ApiKeyChanged)
                .secure(true)
                .width(300),
        ]
        .spacing(10);

        let model_name = labeled_input(
            "Model name",
            &self.settings.model_name,
            "gpt-4o-mini",
            Message::ModelNameChanged,
        );

        let max_tokens = labeled_input(
            "Max tokens",
            &self.max_tokens_input,
            "4096",
            Message::MaxTokensChanged,
        );

        let detail_picker = row![
            text("Image detail").width(160),
            pick_list(
                ImageDetail::ALL,
                Some(self.image_detail),
                Message::ImageDetailSelected,
            )
            .width(200),
        ]
        .spacing(10);

        column![
            section_title,
            base_url,
            api_key,
            model_name,
            max_tokens,
            detail_picker
        ]
        .spacing(10)
        .into()
    }

    fn view_retry_settings(&self) -> Element<'_, Message> {
        let section_title = text("Retry").size(18);

        let max_retries = labeled_input(
            "Max retries",
            &self.max_retries_input,
            "3",
            Message::MaxRetriesChanged,
        );

        let retry_delay = labeled_input(
            "Retry delay (s)",
            &self.retry_delay_input,
            "2",
            Message::RetryDelayChanged,
        );

        column![section_title, max_retries, retry_delay]
            .spacing(10)
            .into()
    }

    fn view_capture_settings(&self) -> Element<'_, Message> {
        let section_title = text("Capture").size(18);

        let capture_delay = labeled_input(
            "Capture delay (ms)",
            &self.capture_delay_input,
            "500",
            Message::CaptureDelayChanged,
        );

        let max_width = labeled_input(
            "Max image width",
            &self.max_image_width_input,
            "2048 (0 = no limit)",
            Message::MaxImageWidthChanged,
        );

        let solution_language = labeled_input(
            "Solution language",
            &self.settings.solution_language,
            "Python",
            Message::SolutionLanguageChanged,
        );

        let lang_picker = row![
            text("UI language").width(160),
            pick_list(
                [Language::English, Language::Chinese],
                Some(self.language),
                Message::LanguageSelected,
            )
            .width(200),
        ]
        .spacing(10);

        column![
            section_title,
            capture_delay,
            max_width,
            solution_language,
            lang_picker
        ]
        .spacing(10)
        .into()
    }

    /// Logs view.
    fn view_logs(&self) -> Element<'_, Message> {
        let msgs = self.msgs();
        let title = text(msgs.logs).size(28);

        let clear_btn = button(text(msgs.clear_logs))
            .on_press(Message::ClearLogs)
            .style(button::secondary);

        let header = row![title, horizontal_space(), clear_btn];

        let log_view = scrollable(text(self.logger.format_all()).size(13)).height(Length::Fill);

        let log_container = container(log_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        let log_path = self
            .logger
            .log_file_path()
            .map(|p| format!("Log file: {}", p.display()))
            .unwrap_or_else(|| "Log file: not created".to_string());

        column![
            header,
            vertical_space().height(10),
            log_container,
            text(log_path).size(12),
        ]
        .spacing(10)
        .height(Length::Fill)
        .into()
    }
}

/// Keyboard events count even when a focused widget already handled them.
fn hotkey_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            hotkey_message(key, modifiers)
        }
        _ => None,
    }
}

/// Map key presses to messages.
fn hotkey_message(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(keyboard::key::Named::PageUp) => Some(Message::StartSelection),
        keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::CancelSelection),
        _ => None,
    }
}

/// One log line per answer, e.g. `gpt-4o-mini answered 812x430 capture in 4.2s (14:02:11)`.
fn answer_summary(answer: &Answer) -> String {
    format!(
        "{} answered {}x{} capture in {:.1}s ({})",
        answer.model,
        answer.image_width,
        answer.image_height,
        answer.elapsed.as_secs_f64(),
        answer.timestamp.format("%H:%M:%S")
    )
}

/// Helper function to create a labeled input row.
fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).width(160),
        text_input(placeholder, value)
            .on_input(on_change)
            .width(300),
    ]
    .spacing(10)
    .into()
}

/// Leave fullscreen and bring the window back.
fn restore_window() -> Task<Message> {
    window::get_latest().and_then(|id| {
        Task::batch([
            window::change_mode(id, window::Mode::Windowed),
            window::minimize(id, false),
            window::gain_focus(id),
        ])
    })
}

/// Capture the full screen after `delay`.
async fn freeze(delay: Duration) -> Result<Arc<Screenshot>, String> {
    freeze_screen(delay)
        .await
        .map(Arc::new)
        .map_err(|e| e.to_string())
}

/// Crop the selection out of the frozen screen and ask the model.
async fn analyze(
    settings: AppSettings,
    shot: Arc<Screenshot>,
    region: Region,
) -> Result<Answer, String> {
    Solver::from_settings(&settings)
        .solve_selection(&shot, region)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkeys() {
        let none = keyboard::Modifiers::default();
        assert!(matches!(
            hotkey_message(keyboard::Key::Named(keyboard::key::Named::PageUp), none),
            Some(Message::StartSelection)
        ));
        assert!(matches!(
            hotkey_message(keyboard::Key::Named(keyboard::key::Named::Escape), none),
            Some(Message::CancelSelection)
        ));
        assert!(hotkey_message(keyboard::Key::Character("a".into()), none).is_none());
    }

    fn key_pressed(named: keyboard::key::Named, code: keyboard::key::Code) -> Event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(named),
            modified_key: keyboard::Key::Named(named),
            physical_key: keyboard::key::Physical::Code(code),
            location: keyboard::Location::Standard,
            modifiers: keyboard::Modifiers::default(),
            text: None,
        })
    }

    #[test]
    fn test_page_up_captured_by_output_pane_still_starts_selection() {
        use keyboard::key::{Code, Named};
        let id = window::Id::unique();

        assert!(matches!(
            hotkey_event(key_pressed(Named::PageUp, Code::PageUp), event::Status::Captured, id),
            Some(Message::StartSelection)
        ));
        assert!(matches!(
            hotkey_event(key_pressed(Named::Escape, Code::Escape), event::Status::Ignored, id),
            Some(Message::CancelSelection)
        ));
        assert!(hotkey_event(
            key_pressed(Named::PageDown, Code::PageDown),
            event::Status::Captured,
            id
        )
        .is_none());
    }

    #[test]
    fn test_reset_keeps_environment_api_key() {
        let settings = AppSettings {
            api_key: "sk-saved".to_string(),
            max_tokens: 128,
            ..AppSettings::default()
        };
        let mut app = CodingHelperApp::with_parts(settings, Logger::in_memory(16));

        app.reset_settings(|key| (key == "OPENAI_API_KEY").then(|| "sk-from-env".to_string()));

        assert!(app.settings.has_api_key());
        assert_eq!(app.settings.api_key, "sk-from-env");
        assert_eq!(app.settings.max_tokens, AppSettings::default().max_tokens);
        assert_eq!(app.max_tokens_input, "4096");
    }

    #[test]
    fn test_reset_without_environment_clears_key() {
        let settings = AppSettings {
            api_key: "sk-saved".to_string(),
            ..AppSettings::default()
        };
        let mut app = CodingHelperApp::with_parts(settings, Logger::in_memory(16));
        app.reset_settings(|_| None);
        assert!(!app.settings.has_api_key());
    }

    #[test]
    fn test_answer_summary() {
        let answer = Answer {
            content: "Use a hash map".to_string(),
            model: "gpt-4o-mini".to_string(),
            image_width: 812,
            image_height: 430,
            elapsed: Duration::from_millis(4200),
            timestamp: chrono::Local::now(),
        };
        let line = answer_summary(&answer);
        assert!(line.starts_with("gpt-4o-mini answered 812x430 capture in 4.2s ("));
    }

    #[test]
    fn test_option_codes_roundtrip() {
        for detail in ImageDetail::ALL {
            assert_eq!(ImageDetail::from_str(detail.as_str()), detail);
        }
        assert_eq!(Language::from_code(Language::Chinese.as_code()), Language::Chinese);
        assert_eq!(Language::from_code("de"), Language::English);
    }

    #[test]
    fn test_busy_states() {
        assert!(AppState::Capturing.is_busy());
        assert!(AppState::Analyzing.is_busy());
        assert!(!AppState::Selecting.is_busy());
        assert!(!AppState::Idle.is_busy());
    }
}
