//! Lesson plan document renderer
//!
//! Turns a request + generated content pair into the printable HTML
//! fragment used by every exporter. Sections always appear in this order:
//! identity, identification, instructional design, learning experience per
//! meeting, assessment, essential content with illustration, signatures,
//! worksheet, formative quiz with answer key.

use chrono::{Datelike, NaiveDate};

use crate::core::lesson::{ImageRef, LessonPlanContent, LessonPlanRequest};

const ANSWER_KEY_COLUMNS: usize = 5;

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Rendered print area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub title: String,
    /// Inner HTML of the print area, without `<html>`/`<head>`
    pub body_html: String,
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `17 Oktober 2026`
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

pub struct DocumentRenderer {
    signing_place: String,
}

impl DocumentRenderer {
    pub fn new(signing_place: impl Into<String>) -> Self {
        Self {
            signing_place: signing_place.into(),
        }
    }

    /// Render with today's date in the signature block.
    pub fn render_today(
        &self,
        request: &LessonPlanRequest,
        content: &LessonPlanContent,
        image: Option<&ImageRef>,
    ) -> RenderedDocument {
        self.render(request, content, image, chrono::Local::now().date_naive())
    }

    pub fn render(
        &self,
        request: &LessonPlanRequest,
        content: &LessonPlanContent,
        image: Option<&ImageRef>,
        signed_on: NaiveDate,
    ) -> RenderedDocument {
        let mut html = String::new();

        html.push_str("<h2 class=\"doc-title\">RENCANA PEMBELAJARAN MENDALAM (RPM)</h2>\n");

        // 1. Identity
        section_table(
            &mut html,
            "1. IDENTITAS",
            &[
                ("Satuan Pendidikan", Cell::text(&request.school_name)),
                ("Mata Pelajaran", Cell::text(&request.subject)),
                ("Kelas / Semester", Cell::owned(format!("{} / 2 (Genap)", request.grade))),
                ("Tahun Pelajaran", Cell::text(&request.academic_year)),
                ("Alokasi Waktu", Cell::text(&request.duration)),
                (
                    "Jumlah Pertemuan",
                    Cell::owned(format!("{} Pertemuan", request.meeting_count)),
                ),
            ],
        );

        // 2. Identification
        section_table(
            &mut html,
            "2. IDENTIFIKASI",
            &[
                ("Profil Siswa SD", Cell::pre(&content.students)),
                ("Materi Pokok (Kurmer 2025)", Cell::text(&request.material)),
                ("Dimensi Profil Lulusan", Cell::owned(request.dimension_labels())),
            ],
        );

        // 3. Instructional design
        section_table(
            &mut html,
            "3. DESAIN PEMBELAJARAN",
            &[
                ("Capaian Pembelajaran (CP)", Cell::pre(&request.cp)),
                ("Integrasi Antar Disiplin", Cell::pre(&content.interdisciplinary)),
                ("Tujuan Pembelajaran (TP)", Cell::strong_pre(&request.tp)),
                ("Praktik Pedagogis Terpilih", Cell::owned(request.pedagogy_labels())),
                ("Kemitraan & Kolaborasi", Cell::pre(&content.partnership)),
                ("Kondisi Lingkungan Belajar", Cell::pre(&content.environment)),
                ("Integrasi Teknologi Digital", Cell::pre(&content.digital_tools)),
            ],
        );

        // 4. Learning experience
        html.push_str("<table class=\"section\">\n<thead><tr><th colspan=\"2\" class=\"table-header-pink\">4. PENGALAMAN BELAJAR</th></tr></thead>\n<tbody>\n");
        for (index, meeting) in content.meetings.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td colspan=\"2\" class=\"meeting-header\">PERTEMUAN KE-{}</td></tr>\n",
                index + 1
            ));
            for (label, step) in [
                ("Understand (Memahami)", &meeting.understand),
                ("Apply (Mengaplikasi)", &meeting.apply),
                ("Reflect (Refleksi)", &meeting.reflect),
            ] {
                html.push_str(&format!(
                    "<tr><td class=\"label\">{}<br/><span class=\"step-type\">({})</span></td><td class=\"whitespace-pre-line\">{}</td></tr>\n",
                    label,
                    escape_html(&step.kind),
                    escape_html(&step.steps)
                ));
            }
        }
        html.push_str("</tbody>\n</table>\n");

        // 5. Assessment
        section_table(
            &mut html,
            "5. ASESMEN PEMBELAJARAN (TEKNIK, INSTRUMEN & RUBRIK)",
            &[
                ("Asesmen Awal (Diagnostic)", Cell::pre(&content.assessments.initial)),
                ("Asesmen Proses (Formative)", Cell::pre(&content.assessments.process)),
                ("Asesmen Akhir (Summative)", Cell::strong_pre(&content.assessments.final_)),
            ],
        );

        self.essential_content(&mut html, request, content, image);
        self.signatures(&mut html, request, signed_on);
        Self::worksheet(&mut html, request, content);
        Self::quiz(&mut html, request, content);

        RenderedDocument {
            title: format!("RPM 2025 - {}", request.subject),
            body_html: html,
        }
    }

    fn essential_content(
        &self,
        html: &mut String,
        request: &LessonPlanRequest,
        content: &LessonPlanContent,
        image: Option<&ImageRef>,
    ) {
        html.push_str("<div class=\"essential\">\n<h3 class=\"subsection\">RINGKASAN MATERI (ESSENTIAL CONTENT)</h3>\n");
        html.push_str("<table class=\"borderless\"><tbody><tr>\n");
        html.push_str(&format!(
            "<td class=\"summary\" style=\"width:60%\"><div class=\"whitespace-pre-line\">{}</div></td>\n",
            escape_html(&content.summary)
        ));
        html.push_str("<td style=\"width:40%\">");
        if let Some(image) = image {
            html.push_str(&format!(
                "<div class=\"figure\"><img src=\"{}\" alt=\"Visualisasi Materi\" style=\"width:100%;height:auto\"/><p class=\"caption\">Media Visual Pembelajaran: {}</p></div>",
                escape_html(&image.src()),
                escape_html(&request.material)
            ));
        }
        html.push_str("</td>\n</tr></tbody></table>\n</div>\n");
    }

    fn signatures(&self, html: &mut String, request: &LessonPlanRequest, signed_on: NaiveDate) {
        html.push_str("<table class=\"borderless signatures\"><tbody><tr>\n");
        html.push_str(&format!(
            "<td class=\"signature\"><p>Mengetahui,</p><p>Kepala Sekolah</p><div class=\"signature-space\"></div><p class=\"signer\">{}</p><p>NIP. {}</p></td>\n",
            escape_html(&request.principal_name),
            escape_html(&request.principal_nip)
        ));
        html.push_str(&format!(
            "<td class=\"signature\"><p>{}, {}</p><p>Guru Kelas</p><div class=\"signature-space\"></div><p class=\"signer\">{}</p><p>NIP. {}</p></td>\n",
            escape_html(&self.signing_place),
            format_date_id(signed_on),
            escape_html(&request.teacher_name),
            escape_html(&request.teacher_nip)
        ));
        html.push_str("</tr></tbody></table>\n");
    }

    fn worksheet(html: &mut String, request: &LessonPlanRequest, content: &LessonPlanContent) {
        html.push_str("<div class=\"page-break\"></div>\n<div class=\"lkpd-section\">\n");
        html.push_str(&format!(
            "<div class=\"part-header\"><h2>LEMBAR KERJA PESERTA DIDIK (LKPD)</h2><p class=\"part-subtitle\">{} - {}</p></div>\n",
            escape_html(&request.subject),
            escape_html(&request.material)
        ));
        html.push_str(&format!(
            "<div class=\"whitespace-pre-line worksheet\">{}</div>\n</div>\n",
            escape_html(&content.lkpd)
        ));
    }

    fn quiz(html: &mut String, request: &LessonPlanRequest, content: &LessonPlanContent) {
        html.push_str("<div class=\"page-break\"></div>\n<div class=\"questions-section\">\n");
        html.push_str(&format!(
            "<div class=\"part-header\"><h2>SOAL FORMATIF PILIHAN GANDA</h2><p class=\"part-subtitle\">Kelas: {} | Topik: {}</p></div>\n",
            escape_html(&request.grade),
            escape_html(&request.material)
        ));

        for (idx, q) in content.formative_questions.iter().enumerate() {
            html.push_str(&format!(
                "<div class=\"question-block\"><p class=\"question\">{}. {}</p>\n<table class=\"borderless options\"><tbody>\n",
                idx + 1,
                escape_html(&q.question)
            ));
            for (key, text) in q.options.iter() {
                html.push_str(&format!(
                    "<tr><td class=\"option-key\">{}.</td><td>{}</td></tr>\n",
                    key.as_str().to_uppercase(),
                    escape_html(text)
                ));
            }
            html.push_str("</tbody></table></div>\n");
        }

        html.push_str("<div class=\"answer-key\"><p class=\"answer-key-title\">Kunci Jawaban &amp; Evaluasi:</p>\n");
        html.push_str("<table class=\"answer-grid\"><tbody>\n");
        let numbered: Vec<_> = content.formative_questions.iter().enumerate().collect();
        for row in numbered.chunks(ANSWER_KEY_COLUMNS) {
            html.push_str("<tr>");
            for (idx, q) in row {
                html.push_str(&format!(
                    "<td class=\"answer-cell\"><span class=\"answer-no\">{}</span> <b>{}</b></td>",
                    idx + 1,
                    q.answer.as_str().to_uppercase()
                ));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody></table>\n</div>\n</div>\n");
    }
}

/// Value column of a two-column section row.
struct Cell {
    html: String,
    class: &'static str,
}

impl Cell {
    fn text(value: &str) -> Self {
        Self::owned(value.to_string())
    }

    fn owned(value: String) -> Self {
        Self {
            html: escape_html(&value),
            class: "",
        }
    }

    fn pre(value: &str) -> Self {
        Self {
            html: escape_html(value),
            class: "whitespace-pre-line",
        }
    }

    fn strong_pre(value: &str) -> Self {
        Self {
            html: escape_html(value),
            class: "whitespace-pre-line font-bold",
        }
    }
}

fn section_table(html: &mut String, heading: &str, rows: &[(&str, Cell)]) {
    html.push_str(&format!(
        "<table class=\"section\">\n<thead><tr><th colspan=\"2\" class=\"table-header-pink\">{}</th></tr></thead>\n<tbody>\n",
        escape_html(heading)
    ));
    for (label, cell) in rows {
        html.push_str(&format!(
            "<tr><td class=\"label\">{}</td><td class=\"{}\">{}</td></tr>\n",
            escape_html(label),
            cell.class,
            cell.html
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}
