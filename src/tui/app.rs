use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Notification, NotificationLevel, Pane};
use super::layout::AppLayout;
use super::theme;
use super::views::form::{FormOutcome, FormState};
use super::views::preview::PreviewState;
use crate::core::document::{DocumentRenderer, ExportFormat, Exporter};
use crate::core::lesson::{
    GenerationSession, LessonPlanController, SubmitOutcome, SubmitRejection,
    GENERATION_FAILED_MESSAGE,
};

const NOTIFICATION_TTL_TICKS: u32 = 100;
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Pane receiving keyboard input.
    pub pane: Pane,
    pub form: FormState,
    pub preview: PreviewState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Exports currently running in the background.
    exports_in_flight: usize,
    /// Drives the spinners.
    tick: u64,
    controller: LessonPlanController,
    renderer: DocumentRenderer,
    exporter: Arc<Exporter>,
    /// Receiver for background events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender handed to background tasks.
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl AppState {
    pub fn new(
        controller: LessonPlanController,
        renderer: DocumentRenderer,
        exporter: Arc<Exporter>,
        teachers: Vec<String>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            running: true,
            pane: Pane::Form,
            form: FormState::new(teachers),
            preview: PreviewState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            exports_in_flight: 0,
            tick: 0,
            controller,
            renderer,
            exporter,
            event_rx,
            event_tx,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.controller.start();

        while self.running {
            let session = self.controller.snapshot();
            terminal.draw(|frame| self.render(frame, &session))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Focused pane
                match self.pane {
                    Pane::Form => match self.form.handle_input(&crossterm_event, &self.controller) {
                        FormOutcome::Consumed => return,
                        FormOutcome::Action(action) => {
                            self.handle_action(action);
                            return;
                        }
                        FormOutcome::Ignored => {}
                    },
                    Pane::Preview => {
                        if self.preview.handle_input(&crossterm_event) {
                            return;
                        }
                    }
                }

                // Priority 3: Global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::GenerationFinished(outcome) => self.on_generation_finished(outcome),
            AppEvent::ExportFinished { format, result } => {
                self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
                match result {
                    Ok(path) => self.push_notification(
                        format!("{} tersimpan: {}", format_label(format), path.display()),
                        NotificationLevel::Success,
                    ),
                    Err(e) => self.push_notification(
                        format!("{} gagal: {e}", format_label(format)),
                        NotificationLevel::Error,
                    ),
                }
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Esc => Some(Action::Dismiss),
                KeyCode::Tab => Some(Action::PaneNext),
                KeyCode::BackTab => Some(Action::PanePrev),
                KeyCode::Char('g') => Some(Action::Generate),
                KeyCode::Char('w') => Some(Action::Export(ExportFormat::Word)),
                KeyCode::Char('p') => Some(Action::Export(ExportFormat::Pdf)),
                KeyCode::Char('c') => Some(Action::Export(ExportFormat::Print)),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::PaneNext => self.pane = self.pane.next(),
            Action::PanePrev => self.pane = self.pane.prev(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::Dismiss => {
                self.notifications.clear();
                self.controller.clear_error();
            }
            Action::Generate => self.start_generation(),
            Action::Export(format) => self.start_export(format),
        }
    }

    // ── Background work ─────────────────────────────────────────────────

    fn start_generation(&mut self) {
        let Some(handle) = self.controller.submit_in_background() else {
            log::warn!("Generate requested outside an async runtime");
            return;
        };
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match handle.await {
                Ok(outcome) => {
                    let _ = tx.send(AppEvent::GenerationFinished(outcome));
                }
                Err(e) => log::error!("Generation task failed: {e}"),
            }
        });
    }

    fn on_generation_finished(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Completed => {
                self.preview.reset();
                self.pane = Pane::Preview;
                self.push_notification("RPM berhasil dibuat".to_string(), NotificationLevel::Success);
            }
            SubmitOutcome::Failed => {
                let message = self
                    .controller
                    .session()
                    .with(|s| s.error.clone())
                    .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string());
                self.push_notification(message, NotificationLevel::Error);
            }
            SubmitOutcome::Rejected(SubmitRejection::MissingMaterial) => {
                self.push_notification(
                    "Isi Materi Pokok terlebih dahulu".to_string(),
                    NotificationLevel::Warning,
                );
            }
            SubmitOutcome::Rejected(SubmitRejection::AlreadyGenerating) => {
                self.push_notification(
                    "RPM sedang disusun, mohon tunggu".to_string(),
                    NotificationLevel::Info,
                );
            }
        }
    }

    fn start_export(&mut self, format: ExportFormat) {
        let session = self.controller.snapshot();
        let Some(content) = session.content.as_ref() else {
            self.push_notification(
                "Belum ada RPM untuk diekspor".to_string(),
                NotificationLevel::Warning,
            );
            return;
        };
        if session.generating {
            self.push_notification(
                "Tunggu hingga RPM selesai disusun".to_string(),
                NotificationLevel::Info,
            );
            return;
        }
        if format == ExportFormat::Pdf && !self.exporter.pdf_available() {
            self.push_notification(
                "Alat PDF tidak ditemukan; gunakan Word (w) atau cetak (c)".to_string(),
                NotificationLevel::Warning,
            );
            return;
        }

        let doc = self
            .renderer
            .render_today(&session.request, content, session.image.as_ref());
        let request = session.request.clone();
        let exporter = Arc::clone(&self.exporter);
        let tx = self.event_tx.clone();

        self.exports_in_flight += 1;
        tokio::spawn(async move {
            let result = match format {
                ExportFormat::Word => exporter.export_word(&request, &doc).await,
                ExportFormat::Pdf => exporter.export_pdf(&request, &doc).await,
                ExportFormat::Print => exporter.print(&request, &doc).await,
            };
            if let Err(ref e) = result {
                log::error!("{format:?} export failed: {e}");
            }
            let _ = tx.send(AppEvent::ExportFinished {
                format,
                result: result.map_err(|e| e.to_string()),
            });
        });
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: advance the spinner, decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame, session: &GenerationSession) {
        let area = frame.area();
        let layout = AppLayout::compute(area, self.pane);

        if let Some(form_area) = layout.form {
            self.form
                .render(frame, form_area, session, self.pane == Pane::Form, self.tick);
        }
        if let Some(preview_area) = layout.preview {
            self.preview
                .render(frame, preview_area, session, self.pane == Pane::Preview, self.tick);
        }

        self.render_status_bar(frame, layout.status, session);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, session: &GenerationSession) {
        let ai_status = if session.generating {
            Span::styled("menyusun RPM", Style::default().fg(theme::ACCENT))
        } else if session.prefilling {
            Span::styled("mengisi CP/TP", Style::default().fg(theme::SUGGESTED))
        } else if session.fetching_topics {
            Span::styled("memuat topik", Style::default().fg(theme::PRIMARY_LIGHT))
        } else if self.exports_in_flight > 0 {
            Span::styled("mengekspor", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("siap", Style::default().fg(theme::TEXT_MUTED))
        };

        let mode_indicator = if self.form.is_editing() && self.pane == Pane::Form {
            Span::styled(" EDIT ", theme::insert_badge())
        } else {
            Span::raw("")
        };

        let status = Line::from(vec![
            Span::styled(" RPM ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.pane.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("AI:", theme::key_hint()),
            Span::raw(" "),
            ai_status,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":panel "),
            Span::styled("g", theme::key_hint()),
            Span::raw(":buat "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":bantuan "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":keluar"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Umum:", ""),
            ("q / Ctrl+C", "Keluar"),
            ("?", "Buka/tutup bantuan"),
            ("Tab / Shift+Tab", "Pindah panel"),
            ("g", "Buat RPM"),
            ("w", "Simpan sebagai Word (.doc)"),
            ("p", "Simpan sebagai PDF"),
            ("c", "Cetak lewat peramban"),
            ("Esc", "Tutup notifikasi dan pesan galat"),
            ("", ""),
            ("Formulir:", ""),
            ("j/k", "Baris berikut / sebelumnya"),
            ("h/l, ◀/▶", "Ganti pilihan (mapel, kelas, guru, pertemuan, topik)"),
            ("Enter / e", "Ubah isian, atau pakai saran topik"),
            ("Spasi", "Centang praktik pedagogis / dimensi"),
            ("Esc", "Selesai mengubah isian"),
            ("", ""),
            ("Pratinjau:", ""),
            ("j/k", "Gulir"),
            ("PgUp / PgDn", "Gulir per halaman"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Tombol",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Tekan "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD)),
            Span::raw(" atau "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD)),
            Span::raw(" untuk menutup"),
        ]));

        let block = Block::default()
            .title(" Bantuan ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

fn format_label(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Word => "Dokumen Word",
        ExportFormat::Pdf => "PDF",
        ExportFormat::Print => "Halaman cetak",
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
