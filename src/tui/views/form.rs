//! Lesson plan form: identity, material, curriculum, design and selections.
//!
//! Rows are navigated with j/k. Text rows open an edit buffer, list rows
//! cycle with ◀/▶, selection rows toggle with Space. Every write goes through
//! `LessonPlanController` so the autosuggest watchers see it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::spinner;
use crate::core::lesson::{
    FormField, GenerationSession, GraduateDimension, LessonPlanController, PedagogicalPractice,
    Selection, SD_GRADES, SD_SUBJECTS,
};
use crate::tui::events::Action;
use crate::tui::theme;
use crate::tui::widgets::InputBuffer;

const LABEL_WIDTH: usize = 17;

/// One navigable line of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Field(FormField),
    /// Advisory topic list for the current subject and grade
    Topics,
    Choice(Selection),
    Generate,
}

/// Rows in display order.
pub fn form_rows() -> Vec<FormRow> {
    use FormField::*;

    let mut rows: Vec<FormRow> = [
        SchoolName,
        TeacherName,
        TeacherNip,
        PrincipalName,
        PrincipalNip,
        AcademicYear,
        Subject,
        Grade,
        Material,
    ]
    .into_iter()
    .map(FormRow::Field)
    .collect();

    rows.push(FormRow::Topics);
    rows.extend([Cp, Tp, MeetingCount, Duration].into_iter().map(FormRow::Field));
    rows.extend(
        PedagogicalPractice::ALL
            .into_iter()
            .map(|p| FormRow::Choice(Selection::Pedagogy(p))),
    );
    rows.extend(
        GraduateDimension::ALL
            .into_iter()
            .map(|d| FormRow::Choice(Selection::Dimension(d))),
    );
    rows.push(FormRow::Generate);
    rows
}

fn group(row: FormRow) -> &'static str {
    match row {
        FormRow::Field(FormField::Material | FormField::Cp | FormField::Tp) | FormRow::Topics => {
            "Materi & Kurikulum"
        }
        FormRow::Field(FormField::MeetingCount | FormField::Duration) => "Desain Pembelajaran",
        FormRow::Field(_) => "Identitas",
        FormRow::Choice(Selection::Pedagogy(_)) => "Praktik Pedagogis",
        FormRow::Choice(Selection::Dimension(_)) => "Dimensi Profil Lulusan",
        FormRow::Generate => "",
    }
}

fn short_label(field: FormField) -> &'static str {
    match field {
        FormField::SchoolName => "Sekolah",
        FormField::TeacherName => "Guru Kelas",
        FormField::TeacherNip => "NIP Guru",
        FormField::PrincipalName => "Kepala Sekolah",
        FormField::PrincipalNip => "NIP Kepsek",
        FormField::AcademicYear => "Tahun Pelajaran",
        FormField::Subject => "Mata Pelajaran",
        FormField::Grade => "Kelas",
        FormField::Material => "Materi Pokok",
        FormField::Cp => "CP",
        FormField::Tp => "TP",
        FormField::MeetingCount => "Pertemuan",
        FormField::Duration => "Alokasi Waktu",
    }
}

/// Fields edited only by cycling through a fixed list.
fn is_list_only(field: FormField) -> bool {
    matches!(field, FormField::Subject | FormField::Grade)
}

/// Step through `options` from `current`. An unknown current value jumps to the first option.
pub fn cycle_value<'a>(options: &[&'a str], current: &str, forward: bool) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next])
}

/// What the form did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Ignored,
    Consumed,
    Action(Action),
}

pub struct FormState {
    rows: Vec<FormRow>,
    focus: usize,
    editing: Option<FormField>,
    input: InputBuffer,
    topic_idx: usize,
    teachers: Vec<String>,
}

impl FormState {
    pub fn new(teachers: Vec<String>) -> Self {
        Self {
            rows: form_rows(),
            focus: 0,
            editing: None,
            input: InputBuffer::new(),
            topic_idx: 0,
            teachers,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn focused_row(&self) -> FormRow {
        self.rows[self.focus]
    }

    /// Put the cursor on `row` if the form has it.
    pub fn focus_row(&mut self, row: FormRow) {
        if let Some(idx) = self.rows.iter().position(|r| *r == row) {
            self.focus = idx;
        }
    }

    // ── Input handling ──────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, controller: &LessonPlanController) -> FormOutcome {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return FormOutcome::Ignored;
        };

        match self.editing {
            Some(field) => self.handle_edit_input(field, *code, *modifiers, controller),
            None => self.handle_nav_input(*code, *modifiers, controller),
        }
    }

    fn handle_edit_input(
        &mut self,
        field: FormField,
        code: KeyCode,
        modifiers: KeyModifiers,
        controller: &LessonPlanController,
    ) -> FormOutcome {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return FormOutcome::Ignored,
            (_, KeyCode::Esc) => self.commit(controller),
            (_, KeyCode::Enter) if field.is_multiline() => self.input.insert_newline(),
            (_, KeyCode::Enter) => self.commit(controller),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.input.insert_char(c),
            (_, KeyCode::Backspace) => self.input.backspace(),
            (_, KeyCode::Delete) => self.input.delete(),
            (_, KeyCode::Left) => self.input.move_left(),
            (_, KeyCode::Right) => self.input.move_right(),
            (_, KeyCode::Home) => self.input.move_home(),
            (_, KeyCode::End) => self.input.move_end(),
            _ => {}
        }
        // Absorb everything else so global bindings stay quiet while typing
        FormOutcome::Consumed
    }

    fn handle_nav_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        controller: &LessonPlanController,
    ) -> FormOutcome {
        if !matches!(modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT) {
            return FormOutcome::Ignored;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.focus = (self.focus + 1).min(self.rows.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.focus = self.focus.saturating_sub(1);
            }
            KeyCode::Home => self.focus = 0,
            KeyCode::End => self.focus = self.rows.len() - 1,
            KeyCode::Char('h') | KeyCode::Left => self.cycle(false, controller),
            KeyCode::Char('l') | KeyCode::Right => self.cycle(true, controller),
            KeyCode::Char(' ') => {
                if let FormRow::Choice(selection) = self.focused_row() {
                    controller.toggle_selection(selection);
                }
            }
            KeyCode::Char('i') | KeyCode::Char('e') => {
                if let FormRow::Field(field) = self.focused_row() {
                    if !is_list_only(field) {
                        self.begin_edit(field, controller);
                    }
                }
            }
            KeyCode::Enter => return self.activate(controller),
            _ => return FormOutcome::Ignored,
        }
        FormOutcome::Consumed
    }

    fn activate(&mut self, controller: &LessonPlanController) -> FormOutcome {
        match self.focused_row() {
            FormRow::Field(field) if is_list_only(field) => self.cycle(true, controller),
            FormRow::Field(field) => self.begin_edit(field, controller),
            FormRow::Topics => self.apply_topic(controller),
            FormRow::Choice(selection) => controller.toggle_selection(selection),
            FormRow::Generate => return FormOutcome::Action(Action::Generate),
        }
        FormOutcome::Consumed
    }

    fn begin_edit(&mut self, field: FormField, controller: &LessonPlanController) {
        let value = controller.session().with(|s| s.request.field_value(field));
        self.input.set_text(value);
        self.editing = Some(field);
    }

    fn commit(&mut self, controller: &LessonPlanController) {
        if let Some(field) = self.editing.take() {
            controller.update_field(field, self.input.take());
        }
    }

    fn cycle(&mut self, forward: bool, controller: &LessonPlanController) {
        let row = self.focused_row();
        let (current, topic_count) = controller.session().with(|s| {
            let current = match row {
                FormRow::Field(field) => s.request.field_value(field),
                _ => String::new(),
            };
            (current, s.topics.len())
        });

        match row {
            FormRow::Field(FormField::Subject) => {
                if let Some(next) = cycle_value(SD_SUBJECTS, &current, forward) {
                    controller.update_field(FormField::Subject, next);
                }
            }
            FormRow::Field(FormField::Grade) => {
                if let Some(next) = cycle_value(SD_GRADES, &current, forward) {
                    controller.update_field(FormField::Grade, next);
                }
            }
            FormRow::Field(FormField::TeacherName) => {
                let options: Vec<&str> = self.teachers.iter().map(String::as_str).collect();
                if let Some(next) = cycle_value(&options, &current, forward) {
                    controller.update_field(FormField::TeacherName, next);
                }
            }
            FormRow::Field(FormField::MeetingCount) => {
                let count = current.parse::<u32>().unwrap_or(1);
                let next = if forward {
                    count.saturating_add(1)
                } else {
                    count.saturating_sub(1).max(1)
                };
                controller.update_field(FormField::MeetingCount, next.to_string());
            }
            FormRow::Topics if topic_count > 0 => {
                let idx = self.topic_idx.min(topic_count - 1);
                self.topic_idx = if forward {
                    (idx + 1) % topic_count
                } else {
                    (idx + topic_count - 1) % topic_count
                };
            }
            _ => {}
        }
    }

    /// Copy the highlighted topic suggestion into the material field.
    fn apply_topic(&mut self, controller: &LessonPlanController) {
        let topic = controller.session().with(|s| {
            let idx = self.topic_idx.min(s.topics.len().saturating_sub(1));
            s.topics.get(idx).cloned()
        });
        if let Some(topic) = topic {
            controller.update_field(FormField::Material, topic);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        session: &GenerationSession,
        focused: bool,
        tick: u64,
    ) {
        let block = theme::pane_block("Formulir RPM", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut focus_line = 0usize;

        for (i, row) in self.rows.iter().enumerate() {
            let heading = group(*row);
            if i == 0 || group(self.rows[i - 1]) != heading {
                lines.push(Line::raw(""));
                if !heading.is_empty() {
                    lines.push(Line::from(Span::styled(format!("  {heading}"), theme::heading())));
                }
            }
            if i == self.focus {
                focus_line = lines.len();
            }
            let is_focused = focused && i == self.focus;
            lines.extend(self.render_row(*row, session, is_focused, tick));
        }

        // Keep the cursor row around the middle once the form overflows
        let scroll = focus_line.saturating_sub(body.height as usize / 2) as u16;
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), body);

        self.render_footer(frame, footer, session, tick);
    }

    fn render_row(
        &self,
        row: FormRow,
        session: &GenerationSession,
        is_focused: bool,
        tick: u64,
    ) -> Vec<Line<'static>> {
        let marker = if is_focused { "▸" } else { " " };
        let label_style = if is_focused {
            theme::highlight()
        } else {
            theme::muted()
        };
        let value_style = if is_focused {
            Style::default().fg(theme::TEXT)
        } else {
            Style::default()
        };
        let labelled = |label: &str, value: Span<'static>| {
            Line::from(vec![
                Span::raw(format!("  {marker} ")),
                Span::styled(format!("{:<LABEL_WIDTH$}", format!("{label}:")), label_style),
                value,
            ])
        };

        match row {
            FormRow::Field(field) => {
                let editing = self.editing == Some(field);
                let text = if editing {
                    self.input.with_caret('▎')
                } else {
                    session.request.field_value(field)
                };

                if !editing && text.trim().is_empty() {
                    let placeholder = match field {
                        FormField::Cp | FormField::Tp if session.prefilling => Span::styled(
                            format!("{} mengisi otomatis…", spinner(tick)),
                            Style::default().fg(theme::SUGGESTED),
                        ),
                        FormField::Material => Span::styled(
                            "(wajib diisi)",
                            Style::default().fg(theme::WARNING),
                        ),
                        _ => Span::styled("(kosong)", theme::dim()),
                    };
                    return vec![labelled(short_label(field), placeholder)];
                }

                let cyclable = is_list_only(field)
                    || field == FormField::MeetingCount
                    || (field == FormField::TeacherName && self.teachers.len() > 1);
                if cyclable && !editing {
                    let value = Span::styled(format!("◀ {text} ▶"), value_style);
                    return vec![labelled(short_label(field), value)];
                }

                let value_style = if editing {
                    Style::default().fg(theme::PRIMARY_LIGHT)
                } else {
                    value_style
                };
                let mut parts = text.split('\n');
                let first = parts.next().unwrap_or_default().to_string();
                let mut out = vec![labelled(short_label(field), Span::styled(first, value_style))];
                let indent = " ".repeat(LABEL_WIDTH + 4);
                out.extend(
                    parts.map(|rest| Line::from(Span::styled(format!("{indent}{rest}"), value_style))),
                );
                out
            }
            FormRow::Topics => {
                let value = if session.fetching_topics {
                    Span::styled(format!("{} memuat…", spinner(tick)), theme::muted())
                } else if session.topics.is_empty() {
                    Span::styled("(tidak ada saran)", theme::dim())
                } else {
                    let idx = self.topic_idx.min(session.topics.len() - 1);
                    let hint = if is_focused { "  Enter:pakai" } else { "" };
                    Span::styled(
                        format!(
                            "◀ {} ▶  ({}/{}){hint}",
                            session.topics[idx],
                            idx + 1,
                            session.topics.len()
                        ),
                        Style::default().fg(theme::SUGGESTED),
                    )
                };
                vec![labelled("Saran Topik", value)]
            }
            FormRow::Choice(selection) => {
                let (label, selected) = match selection {
                    Selection::Pedagogy(p) => (p.label(), session.request.pedagogy.contains(&p)),
                    Selection::Dimension(d) => (d.label(), session.request.dimensions.contains(&d)),
                };
                let (mark, style) = if selected {
                    ("[✓]", theme::chip_on())
                } else {
                    ("[ ]", value_style)
                };
                vec![Line::from(vec![
                    Span::raw(format!("  {marker} ")),
                    Span::styled(format!("{mark} "), style),
                    Span::styled(label.to_string(), if is_focused { label_style } else { value_style }),
                ])]
            }
            FormRow::Generate => {
                let button = if session.generating {
                    Span::styled(
                        format!("{} Menyusun RPM…", spinner(tick)),
                        Style::default().fg(theme::ACCENT),
                    )
                } else if !session.request.is_ready() {
                    Span::styled("[ Buat RPM ]  isi Materi Pokok dulu", theme::dim())
                } else if is_focused {
                    Span::styled("[ Buat RPM ]", theme::brand_badge())
                } else {
                    Span::styled("[ Buat RPM ]", theme::title())
                };
                vec![Line::from(vec![Span::raw(format!("  {marker} ")), button])]
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, session: &GenerationSession, tick: u64) {
        let status = if let Some(ref err) = session.error {
            Line::from(Span::styled(format!("  ✗ {err}"), Style::default().fg(theme::ERROR)))
        } else if session.prefilling {
            Line::from(Span::styled(
                format!("  {} Menyusun saran CP/TP…", spinner(tick)),
                Style::default().fg(theme::SUGGESTED),
            ))
        } else {
            Line::raw("")
        };

        let hints: &[(&str, &str)] = match self.editing {
            Some(field) if field.is_multiline() => &[("Enter", "baris baru"), ("Esc", "simpan")],
            Some(_) => &[("Enter/Esc", "simpan")],
            None => &[
                ("j/k", "pindah"),
                ("◀▶", "pilih"),
                ("Enter", "ubah"),
                ("Spasi", "centang"),
                ("g", "buat"),
            ],
        };
        let mut spans = vec![Span::raw("  ")];
        for (key, desc) in hints {
            spans.push(Span::styled(*key, theme::key_hint()));
            spans.push(Span::raw(format!(":{desc} ")));
        }

        frame.render_widget(Paragraph::new(vec![status, Line::from(spans)]), area);
    }
}
