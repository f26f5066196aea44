use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use rpm_generator::config::AppConfig;
use rpm_generator::core::credentials::resolve_api_key_from_system;
use rpm_generator::core::document::{DocumentRenderer, Exporter};
use rpm_generator::core::lesson::{AiGateway, GatewayOptions, LessonPlanController, LessonPlanRequest};
use rpm_generator::core::llm::GoogleProvider;
use rpm_generator::tui::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (file only, stdout belongs to the terminal UI)
    let _log_guard = rpm_generator::core::logging::init_tui();
    log::info!("{} v{} starting", rpm_generator::NAME, rpm_generator::VERSION);

    let config = AppConfig::load();

    let api_key = match resolve_api_key_from_system(config.ai.api_key.as_deref()) {
        Some((key, source)) => {
            log::info!("Gemini API key resolved from {source:?}");
            key
        }
        None => {
            log::warn!("No Gemini API key configured; AI features will be unavailable");
            String::new()
        }
    };

    // One HTTP exchange never outlives the longest per-call deadline
    let http_timeout = config
        .ai
        .content_timeout()
        .max(config.ai.image_timeout())
        .max(config.ai.suggestion_timeout());
    let backend = GoogleProvider::with_base_url(api_key, config.ai.api_base.clone(), http_timeout)?;
    let gateway = AiGateway::new(
        Arc::new(backend),
        GatewayOptions::from_config(&config.ai, &config.suggest),
    );

    let controller = LessonPlanController::new(
        Arc::new(gateway),
        LessonPlanRequest::from_school(&config.school),
        config.suggest.clone(),
    );
    let renderer = DocumentRenderer::new(config.school.signing_place.clone());
    let exporter = Arc::new(Exporter::from_config(config.output_dir(), &config.export));
    if !exporter.pdf_available() {
        log::warn!(
            "PDF tool '{}' not found on PATH; PDF export disabled",
            config.export.pdf_command
        );
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut app = AppState::new(
        controller,
        renderer,
        exporter,
        config.school.teachers.clone(),
        event_rx,
        event_tx,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("Terminal UI failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("Exiting");
    Ok(())
}
