//! Read-only text preview of the generated lesson plan.
//!
//! Follows the section order of the printed document so the teacher can
//! check it before exporting.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::spinner;
use crate::core::lesson::{GenerationSession, ImageRef, LearningStep, LessonPlanContent, LessonPlanRequest};
use crate::tui::theme;

#[derive(Debug, Default)]
pub struct PreviewState {
    scroll: u16,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Back to the top, e.g. after a new plan arrives.
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        session: &GenerationSession,
        focused: bool,
        tick: u64,
    ) {
        let block = theme::pane_block("Pratinjau RPM", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        match (&session.content, session.generating) {
            (_, true) => {
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled(
                        format!("{} Menyusun RPM dan ilustrasi…", spinner(tick)),
                        Style::default().fg(theme::ACCENT),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled("Proses ini bisa memakan waktu hingga beberapa menit.", theme::muted())),
                ];
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
            }
            (Some(content), false) => {
                let lines = preview_lines(&session.request, content, session.image.as_ref());
                frame.render_widget(
                    Paragraph::new(lines)
                        .wrap(Wrap { trim: false })
                        .scroll((self.scroll, 0)),
                    body,
                );
            }
            (None, false) => {
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled("Belum ada RPM.", theme::muted())),
                    Line::raw(""),
                    Line::from(Span::styled(
                        "Isi Materi Pokok, lalu tekan g untuk membuat RPM.",
                        theme::dim(),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
            }
        }

        let hints = Line::from(vec![
            Span::raw("  "),
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":gulir "),
            Span::styled("w", theme::key_hint()),
            Span::raw(":Word "),
            Span::styled("p", theme::key_hint()),
            Span::raw(":PDF "),
            Span::styled("c", theme::key_hint()),
            Span::raw(":cetak"),
        ]);
        frame.render_widget(Paragraph::new(hints), footer);
    }
}

/// Short description of the illustration for a text-only view.
pub fn describe_image(image: &ImageRef) -> String {
    match image {
        ImageRef::Inline(data) => match data.byte_len() {
            Some(len) => format!("Ilustrasi AI ({}, {} KB)", data.mime_type, len.div_ceil(1024)),
            None => format!("Ilustrasi AI ({})", data.mime_type),
        },
        ImageRef::Placeholder { url } => format!("Gambar pengganti: {url}"),
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(title.to_string(), theme::heading())));
}

fn entry(lines: &mut Vec<Line<'static>>, label: &str, value: &str) {
    let mut parts = value.split('\n');
    lines.push(Line::from(vec![
        Span::styled(format!("  {label}: "), theme::muted()),
        Span::raw(parts.next().unwrap_or_default().to_string()),
    ]));
    for rest in parts {
        lines.push(Line::raw(format!("    {rest}")));
    }
}

fn step(lines: &mut Vec<Line<'static>>, phase: &str, step: &LearningStep) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {phase} "), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("({})", step.kind), theme::muted()),
    ]));
    for text in step.steps.lines() {
        lines.push(Line::raw(format!("    {text}")));
    }
}

/// Lines of the preview, one section per printed section.
pub fn preview_lines(
    request: &LessonPlanRequest,
    content: &LessonPlanContent,
    image: Option<&ImageRef>,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "RENCANA PEMBELAJARAN MENDALAM (RPM)",
        theme::title(),
    ))];

    section(&mut lines, "1. IDENTITAS");
    entry(&mut lines, "Satuan Pendidikan", &request.school_name);
    entry(&mut lines, "Mata Pelajaran", &request.subject);
    entry(&mut lines, "Kelas", &request.grade);
    entry(&mut lines, "Materi Pokok", &request.material);
    entry(
        &mut lines,
        "Alokasi Waktu",
        &format!("{} Pertemuan ({})", request.meeting_count, request.duration),
    );

    section(&mut lines, "2. IDENTIFIKASI");
    entry(&mut lines, "Peserta Didik", &content.students);
    entry(&mut lines, "Dimensi Profil Lulusan", &request.dimension_labels());

    section(&mut lines, "3. DESAIN PEMBELAJARAN");
    entry(&mut lines, "Capaian Pembelajaran", &request.cp);
    entry(&mut lines, "Tujuan Pembelajaran", &request.tp);
    entry(&mut lines, "Lintas Disiplin", &content.interdisciplinary);
    entry(&mut lines, "Praktik Pedagogis", &request.pedagogy_labels());
    entry(&mut lines, "Kemitraan", &content.partnership);
    entry(&mut lines, "Lingkungan Belajar", &content.environment);
    entry(&mut lines, "Pemanfaatan Digital", &content.digital_tools);

    section(&mut lines, "4. PENGALAMAN BELAJAR");
    for (i, meeting) in content.meetings.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!(" PERTEMUAN KE-{}", i + 1),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )));
        step(&mut lines, "Memahami", &meeting.understand);
        step(&mut lines, "Mengaplikasi", &meeting.apply);
        step(&mut lines, "Merefleksi", &meeting.reflect);
    }

    section(&mut lines, "5. ASESMEN PEMBELAJARAN");
    entry(&mut lines, "Awal", &content.assessments.initial);
    entry(&mut lines, "Proses", &content.assessments.process);
    entry(&mut lines, "Akhir", &content.assessments.final_);

    section(&mut lines, "MATERI ESENSIAL");
    for text in content.summary.lines() {
        lines.push(Line::raw(format!("  {text}")));
    }
    if let Some(image) = image {
        lines.push(Line::from(Span::styled(
            format!("  [{}]", describe_image(image)),
            theme::dim(),
        )));
    }

    section(&mut lines, "LEMBAR KERJA PESERTA DIDIK (LKPD)");
    for text in content.lkpd.lines() {
        lines.push(Line::raw(format!("  {text}")));
    }

    section(&mut lines, "SOAL FORMATIF");
    for (i, q) in content.formative_questions.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {}. {}", i + 1, q.question),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, option) in q.options.iter() {
            lines.push(Line::raw(format!("     {}. {option}", key.as_str().to_uppercase())));
        }
    }

    if !content.formative_questions.is_empty() {
        let key = content
            .formative_questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}-{}", i + 1, q.answer.as_str().to_uppercase()))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("  Kunci Jawaban: ", theme::muted()),
            Span::raw(key),
        ]));
    }

    lines
}
