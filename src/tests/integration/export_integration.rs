//! Export Integration Tests
//!
//! Rendering a generated plan and writing it out through the exporter into a
//! temporary directory.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::core::document::{DocumentRenderer, ExportError, Exporter, PageSetup, RenderedDocument};
use crate::core::lesson::{
    FormField, GraduateDimension, ImageRef, PedagogicalPractice, Selection, SubmitOutcome,
};
use crate::tests::common::{
    controller_sharing, sample_content, sample_request, FakePdf, StubAssistant,
};

fn rendered() -> RenderedDocument {
    let request = sample_request();
    let content = sample_content(2, 10);
    let image = ImageRef::placeholder(&request.material);
    DocumentRenderer::new("Andopan").render(
        &request,
        &content,
        Some(&image),
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
    )
}

fn answer_grid(html: &str) -> &str {
    let start = html.find("class=\"answer-grid\"").unwrap();
    let end = start + html[start..].find("</table>").unwrap();
    &html[start..end]
}

#[test]
fn test_rendered_document_structure() {
    let doc = rendered();
    let html = &doc.body_html;

    assert_eq!(html.matches("PERTEMUAN KE-").count(), 2);
    assert_eq!(html.matches("class=\"question\"").count(), 10);
    assert_eq!(html.matches("class=\"answer-cell\"").count(), 10);
    // Five answers per row
    assert_eq!(answer_grid(html).matches("<tr>").count(), 2);

    assert!(html.contains("17 Oktober 2026"));
    assert!(html.contains("https://picsum.photos/seed/Pecahan%20Senilai/800/450"));
}

#[tokio::test]
async fn test_submitted_plan_renders_in_section_order() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Subject, "Matematika");
    controller.update_field(FormField::Grade, "Kelas 4");
    controller.update_field(FormField::Cp, "Peserta didik memahami pecahan.");
    controller.update_field(FormField::Tp, "1. Mengenal pecahan");
    controller.update_field(FormField::Material, "Pecahan");
    controller.update_field(FormField::MeetingCount, "2");
    controller.toggle_selection(Selection::Pedagogy(PedagogicalPractice::ProjectBased));
    for d in [
        GraduateDimension::CriticalReasoning,
        GraduateDimension::Creativity,
        GraduateDimension::Collaboration,
    ] {
        controller.toggle_selection(Selection::Dimension(d));
    }

    assert_eq!(controller.submit().await, SubmitOutcome::Completed);
    let session = controller.snapshot();
    let doc = DocumentRenderer::new("Andopan").render(
        &session.request,
        session.content.as_ref().unwrap(),
        session.image.as_ref(),
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
    );
    let html = &doc.body_html;

    assert_eq!(html.matches("PERTEMUAN KE-").count(), 2);
    assert_eq!(html.matches("class=\"question\"").count(), 10);
    let grid = answer_grid(html);
    assert_eq!(grid.matches("class=\"answer-cell\"").count(), 10);
    for row in grid.split("<tr>").skip(1) {
        assert_eq!(row.matches("class=\"answer-cell\"").count(), 5);
    }
    assert!(html.contains("PjBL (Project Based Learning)"));

    let markers = [
        "1. IDENTITAS",
        "2. IDENTIFIKASI",
        "3. DESAIN PEMBELAJARAN",
        "4. PENGALAMAN BELAJAR",
        "5. ASESMEN PEMBELAJARAN",
        "RINGKASAN MATERI (ESSENTIAL CONTENT)",
        "class=\"borderless signatures\"",
        "LEMBAR KERJA PESERTA DIDIK (LKPD)",
        "SOAL FORMATIF PILIHAN GANDA",
        "class=\"answer-grid\"",
    ];
    let positions: Vec<usize> = markers
        .iter()
        .map(|m| html.find(m).unwrap_or_else(|| panic!("missing section {m}")))
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "sections out of order: {positions:?}"
    );
}

#[tokio::test]
async fn test_word_export_writes_bom_document() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(
        dir.path().join("out"),
        PageSetup::default(),
        Arc::new(FakePdf::default()),
    );

    let path = exporter
        .export_word(&sample_request(), &rendered())
        .await
        .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "RPM_2025_Matematika_Pecahan_Senilai.doc"
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("urn:schemas-microsoft-com:office:word"));
    assert!(text.contains("PERTEMUAN KE-2"));
}

#[tokio::test]
async fn test_pdf_export_cleans_up_staging_page() {
    let dir = TempDir::new().unwrap();
    let pdf = Arc::new(FakePdf::default());
    let exporter = Exporter::new(dir.path().to_path_buf(), PageSetup::default(), pdf.clone());

    let path = exporter
        .export_pdf(&sample_request(), &rendered())
        .await
        .unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4\n");
    let rendered = pdf.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    assert!(!rendered[0].0.exists());

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".html"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_pdf_tool_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let pdf = Arc::new(FakePdf {
        fail: true,
        ..FakePdf::default()
    });
    let exporter = Exporter::new(dir.path().to_path_buf(), PageSetup::default(), pdf);

    let err = exporter
        .export_pdf(&sample_request(), &rendered())
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::PdfToolMissing(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_print_opens_self_printing_page() {
    let dir = TempDir::new().unwrap();
    let opened = Arc::new(Mutex::new(Vec::<PathBuf>::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let exporter = {
        let opened = Arc::clone(&opened);
        let calls = Arc::clone(&calls);
        Exporter::new(
            dir.path().to_path_buf(),
            PageSetup::default(),
            Arc::new(FakePdf::default()),
        )
        .with_opener(move |path| {
            calls.fetch_add(1, Ordering::SeqCst);
            opened.lock().unwrap().push(path.to_path_buf());
            Ok(())
        })
    };

    let path = exporter.print(&sample_request(), &rendered()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(opened.lock().unwrap().as_slice(), &[path.clone()]);
    let page = std::fs::read_to_string(&path).unwrap();
    assert!(page.contains("window.print()"));
}

#[tokio::test]
async fn test_print_reports_opener_failure() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(
        dir.path().to_path_buf(),
        PageSetup::default(),
        Arc::new(FakePdf::default()),
    )
    .with_opener(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no browser")));

    let err = exporter
        .print(&sample_request(), &rendered())
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::Open { .. }));
}
