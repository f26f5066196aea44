//! Prompt construction
//!
//! Text prompts are formal Indonesian; the illustration prompt is English
//! because image models follow it more reliably.

use super::models::{GraduateDimension, LessonPlanRequest};

pub fn topics_prompt(subject: &str, grade: &str, max_topics: usize) -> String {
    format!(
        "Sebagai pakar pendidikan Indonesia, berikan daftar {max_topics} topik materi pelajaran utama yang SANGAT SPESIFIK dan SESUAI dengan Capaian Pembelajaran (CP) Kurikulum Merdeka TERBARU tahun 2025 untuk Semester 2 (Genap):\n\
         Mata Pelajaran: {subject}\n\
         Kelas: {grade} SD\n\
         Output harus berupa JSON array of strings yang berisi judul-judul bab atau materi pokok yang profesional."
    )
}

pub fn curriculum_prompt(subject: &str, material: &str, grade: &str) -> String {
    let dimensions = GraduateDimension::label_list();
    format!(
        "Sebagai pakar Kurikulum Merdeka Indonesia versi 2025, buatkan detail berikut untuk:\n\
         Mata Pelajaran: {subject}\n\
         Materi: {material}\n\
         Kelas: {grade} SD (Semester 2)\n\n\
         1. Capaian Pembelajaran (CP) sesuai regulasi Kemdikbudristek No. 12 Tahun 2024.\n\
         2. Minimal 3 Tujuan Pembelajaran (TP) yang berurutan (sequence).\n\
         3. Daftar Dimensi Profil Lulusan (Pilih yang paling relevan dari daftar ini saja: {dimensions}). Pilih minimal 3 dimensi.\n\
         4. Saran jumlah pertemuan yang ideal.\n\
         5. Saran Praktik Pedagogis (Inquiry, PjBL, PBL, Game Based, atau Station Learning).\n\n\
         Output dalam format JSON."
    )
}

pub fn content_prompt(request: &LessonPlanRequest) -> String {
    format!(
        "Buatkan konten otomatis untuk Rencana Pembelajaran Mendalam (RPM) Sekolah Dasar (SD) berstandar Kurikulum Merdeka 2025:\n\
         - Mata Pelajaran: {subject}\n\
         - Kelas/Semester: {grade} / Semester 2 (Tahun {year})\n\
         - Materi Pokok: {material}\n\
         - CP: {cp}\n\
         - TP: {tp}\n\
         - Praktik Pedagogis: {pedagogy}\n\
         - Dimensi Lulusan: {dimensions}\n\
         - Jumlah Pertemuan: {meetings}\n\n\
         Persyaratan Output JSON:\n\
         1. students: Deskripsi profil siswa SD.\n\
         2. interdisciplinary: Hubungan materi dengan disiplin lain.\n\
         3. partnership: Kemitraan pembelajaran.\n\
         4. environment: Lingkungan belajar.\n\
         5. digitalTools: Referensi tools digital.\n\
         6. summary: Ringkasan Materi yang mendalam.\n\
         7. meetings: Langkah pembelajaran per pertemuan ({meetings} pertemuan), masing-masing dengan tahap understand, apply, dan reflect.\n\
         8. assessments: Detail asesmen AWAL, PROSES, dan AKHIR dengan format Teknik, Instrumen, dan Rubrik.\n\
         9. lkpd: Lembar Kerja Peserta Didik (LKPD) lengkap.\n\
         10. formativeQuestions: 10 soal pilihan ganda formatif dengan kunci jawaban (a, b, c, atau d).\n\n\
         Gunakan Bahasa Indonesia formal.",
        subject = request.subject,
        grade = request.grade,
        year = request.academic_year,
        material = request.material,
        cp = request.cp,
        tp = request.tp,
        pedagogy = request.pedagogy_labels(),
        dimensions = request.dimension_labels(),
        meetings = request.meeting_count,
    )
}

pub fn illustration_prompt(topic: &str) -> String {
    format!(
        "Professional educational illustration for elementary school students (SD) about the topic: \"{topic}\".\n\
         Style: high-quality clean vector art, vibrant classroom-friendly colors, clear and simple educational focus, modern flat design.\n\
         Strictly no text, labels, or watermarks in the image."
    )
}
