//! Lesson Plan Data Model
//!
//! Form input (`LessonPlanRequest`), the structured content produced by the
//! model (`LessonPlanContent`) and the fixed enumerations they draw from.
//! Wire names follow the camelCase keys used in prompts and response schemas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SchoolConfig;

/// Subjects offered in Sekolah Dasar under Kurikulum Merdeka.
pub const SD_SUBJECTS: &[&str] = &[
    "Bahasa Indonesia",
    "Matematika",
    "Ilmu Pengetahuan Alam dan Sosial (IPAS)",
    "Pendidikan Pancasila",
    "Pendidikan Agama dan Budi Pekerti",
    "Seni Rupa",
    "Bahasa Inggris",
    "PJOK",
];

pub const SD_GRADES: &[&str] = &["Kelas 1", "Kelas 2", "Kelas 3", "Kelas 4", "Kelas 5", "Kelas 6"];

// ============================================================================
// Enumerations
// ============================================================================

/// Pedagogical practice ("Praktik Pedagogis") applied in the lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PedagogicalPractice {
    #[serde(rename = "Inquiry-Discovery Learning")]
    InquiryDiscovery,
    #[serde(rename = "PjBL (Project Based Learning)")]
    ProjectBased,
    #[serde(rename = "Problem Based Learning")]
    ProblemBased,
    #[serde(rename = "Game Based Learning")]
    GameBased,
    #[serde(rename = "Station Learning")]
    Station,
}

impl PedagogicalPractice {
    pub const ALL: [PedagogicalPractice; 5] = [
        Self::InquiryDiscovery,
        Self::ProjectBased,
        Self::ProblemBased,
        Self::GameBased,
        Self::Station,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::InquiryDiscovery => "Inquiry-Discovery Learning",
            Self::ProjectBased => "PjBL (Project Based Learning)",
            Self::ProblemBased => "Problem Based Learning",
            Self::GameBased => "Game Based Learning",
            Self::Station => "Station Learning",
        }
    }
}

impl fmt::Display for PedagogicalPractice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PedagogicalPractice {
    type Err = UnknownLabel;

    /// Accepts the full label or the short names the model tends to answer with.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(p) = Self::ALL.iter().find(|p| p.label().to_lowercase() == normalized) {
            return Ok(*p);
        }
        match normalized.replace(['-', '_'], " ").as_str() {
            "inquiry" | "inquiry discovery" | "discovery learning" => Ok(Self::InquiryDiscovery),
            "pjbl" | "project based learning" => Ok(Self::ProjectBased),
            "pbl" | "problem based" | "problem solving" => Ok(Self::ProblemBased),
            "game based" | "gbl" => Ok(Self::GameBased),
            "station" | "station rotation" => Ok(Self::Station),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Graduate profile dimension ("Dimensi Profil Lulusan")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GraduateDimension {
    #[serde(rename = "Keimanan & Ketakwaan")]
    Faith,
    #[serde(rename = "Kewargaan")]
    Citizenship,
    #[serde(rename = "Penalaran Kritis")]
    CriticalReasoning,
    #[serde(rename = "Kreativitas")]
    Creativity,
    #[serde(rename = "Kolaborasi")]
    Collaboration,
    #[serde(rename = "Kemandirian")]
    Independence,
    #[serde(rename = "Kesehatan")]
    Health,
    #[serde(rename = "Komunikasi")]
    Communication,
}

impl GraduateDimension {
    pub const ALL: [GraduateDimension; 8] = [
        Self::Faith,
        Self::Citizenship,
        Self::CriticalReasoning,
        Self::Creativity,
        Self::Collaboration,
        Self::Independence,
        Self::Health,
        Self::Communication,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Faith => "Keimanan & Ketakwaan",
            Self::Citizenship => "Kewargaan",
            Self::CriticalReasoning => "Penalaran Kritis",
            Self::Creativity => "Kreativitas",
            Self::Collaboration => "Kolaborasi",
            Self::Independence => "Kemandirian",
            Self::Health => "Kesehatan",
            Self::Communication => "Komunikasi",
        }
    }

    /// Comma separated label list, as quoted in prompts.
    pub fn label_list() -> String {
        Self::ALL.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for GraduateDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GraduateDimension {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(" dan ", " & ");
        Self::ALL
            .iter()
            .find(|d| d.label().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised label: {0}")]
pub struct UnknownLabel(pub String);

// ============================================================================
// Form Input
// ============================================================================

/// Everything the teacher enters in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanRequest {
    pub school_name: String,
    pub teacher_name: String,
    pub teacher_nip: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub grade: String,
    pub academic_year: String,
    pub subject: String,
    /// Capaian Pembelajaran
    pub cp: String,
    /// Tujuan Pembelajaran, one numbered objective per line
    pub tp: String,
    /// Topic / material ("Materi Pokok")
    pub material: String,
    pub meeting_count: u32,
    pub duration: String,
    pub pedagogy: Vec<PedagogicalPractice>,
    pub dimensions: Vec<GraduateDimension>,
}

impl LessonPlanRequest {
    /// Blank form seeded from the school profile.
    pub fn from_school(school: &SchoolConfig) -> Self {
        Self {
            school_name: school.school_name.clone(),
            teacher_name: school.teachers.first().cloned().unwrap_or_default(),
            teacher_nip: school.teacher_nip.clone(),
            principal_name: school.principal_name.clone(),
            principal_nip: school.principal_nip.clone(),
            grade: school.default_grade.clone(),
            academic_year: school.academic_year.clone(),
            subject: school.default_subject.clone(),
            cp: String::new(),
            tp: String::new(),
            material: String::new(),
            meeting_count: school.default_meeting_count.max(1),
            duration: school.default_duration.clone(),
            pedagogy: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    /// Generation is only allowed once the topic has been entered.
    pub fn is_ready(&self) -> bool {
        !self.material.trim().is_empty()
    }

    pub fn pedagogy_labels(&self) -> String {
        self.pedagogy.iter().map(|p| p.label()).collect::<Vec<_>>().join(", ")
    }

    pub fn dimension_labels(&self) -> String {
        self.dimensions.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ")
    }

    /// Read a field as text, for display in the form.
    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::SchoolName => self.school_name.clone(),
            FormField::TeacherName => self.teacher_name.clone(),
            FormField::TeacherNip => self.teacher_nip.clone(),
            FormField::PrincipalName => self.principal_name.clone(),
            FormField::PrincipalNip => self.principal_nip.clone(),
            FormField::Grade => self.grade.clone(),
            FormField::AcademicYear => self.academic_year.clone(),
            FormField::Subject => self.subject.clone(),
            FormField::Cp => self.cp.clone(),
            FormField::Tp => self.tp.clone(),
            FormField::Material => self.material.clone(),
            FormField::MeetingCount => self.meeting_count.to_string(),
            FormField::Duration => self.duration.clone(),
        }
    }

    /// Write a text field. `MeetingCount` input that is not a positive integer becomes 1.
    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::SchoolName => self.school_name = value,
            FormField::TeacherName => self.teacher_name = value,
            FormField::TeacherNip => self.teacher_nip = value,
            FormField::PrincipalName => self.principal_name = value,
            FormField::PrincipalNip => self.principal_nip = value,
            FormField::Grade => self.grade = value,
            FormField::AcademicYear => self.academic_year = value,
            FormField::Subject => self.subject = value,
            FormField::Cp => self.cp = value,
            FormField::Tp => self.tp = value,
            FormField::Material => self.material = value,
            FormField::MeetingCount => {
                self.meeting_count = value.trim().parse::<u32>().ok().filter(|n| *n > 0).unwrap_or(1)
            }
            FormField::Duration => self.duration = value,
        }
    }
}

/// Editable scalar fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    SchoolName,
    TeacherName,
    TeacherNip,
    PrincipalName,
    PrincipalNip,
    Grade,
    AcademicYear,
    Subject,
    Cp,
    Tp,
    Material,
    MeetingCount,
    Duration,
}

impl FormField {
    /// camelCase wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SchoolName => "schoolName",
            Self::TeacherName => "teacherName",
            Self::TeacherNip => "teacherNip",
            Self::PrincipalName => "principalName",
            Self::PrincipalNip => "principalNip",
            Self::Grade => "grade",
            Self::AcademicYear => "academicYear",
            Self::Subject => "subject",
            Self::Cp => "cp",
            Self::Tp => "tp",
            Self::Material => "material",
            Self::MeetingCount => "meetingCount",
            Self::Duration => "duration",
        }
    }

    /// Form label shown to the teacher
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SchoolName => "Nama Sekolah",
            Self::TeacherName => "Guru Kelas",
            Self::TeacherNip => "NIP Guru",
            Self::PrincipalName => "Kepala Sekolah",
            Self::PrincipalNip => "NIP Kepala Sekolah",
            Self::Grade => "Kelas",
            Self::AcademicYear => "Tahun Pelajaran",
            Self::Subject => "Mata Pelajaran",
            Self::Cp => "Capaian Pembelajaran (CP)",
            Self::Tp => "Tujuan Pembelajaran (TP)",
            Self::Material => "Materi Pokok",
            Self::MeetingCount => "Jumlah Pertemuan",
            Self::Duration => "Alokasi Waktu",
        }
    }

    /// Edits to these fields re-arm the curriculum prefill.
    pub fn triggers_prefill(&self) -> bool {
        matches!(self, Self::Material | Self::Subject | Self::Grade)
    }

    /// Edits to these fields refresh the advisory topic list.
    pub fn triggers_topics(&self) -> bool {
        matches!(self, Self::Subject | Self::Grade)
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Cp | Self::Tp)
    }
}

impl FromStr for FormField {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const FIELDS: [FormField; 13] = [
            FormField::SchoolName,
            FormField::TeacherName,
            FormField::TeacherNip,
            FormField::PrincipalName,
            FormField::PrincipalNip,
            FormField::Grade,
            FormField::AcademicYear,
            FormField::Subject,
            FormField::Cp,
            FormField::Tp,
            FormField::Material,
            FormField::MeetingCount,
            FormField::Duration,
        ];
        FIELDS
            .iter()
            .find(|f| f.name() == s.trim())
            .copied()
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A toggleable selection: which set and which member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Pedagogy(PedagogicalPractice),
    Dimension(GraduateDimension),
}

// ============================================================================
// Generated Content
// ============================================================================

/// Structured lesson plan returned by the content generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanContent {
    pub students: String,
    pub interdisciplinary: String,
    pub partnership: String,
    pub environment: String,
    pub digital_tools: String,
    pub summary: String,
    pub meetings: Vec<Meeting>,
    pub assessments: Assessment,
    pub lkpd: String,
    pub formative_questions: Vec<FormativeQuestion>,
}

/// One scheduled session: understand → apply → reflect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub understand: LearningStep,
    pub apply: LearningStep,
    pub reflect: LearningStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStep {
    /// Pedagogy label, e.g. "Berkesadaran"
    #[serde(rename = "type")]
    pub kind: String,
    pub steps: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub initial: String,
    pub process: String,
    #[serde(rename = "final")]
    pub final_: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormativeQuestion {
    pub question: String,
    pub options: AnswerOptions,
    pub answer: AnswerKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl AnswerOptions {
    /// Options in display order with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (AnswerKey, &str)> {
        [
            (AnswerKey::A, self.a.as_str()),
            (AnswerKey::B, self.b.as_str()),
            (AnswerKey::C, self.c.as_str()),
            (AnswerKey::D, self.d.as_str()),
        ]
        .into_iter()
    }
}

/// Correct option of a formative question.
///
/// Deserialisation is lenient about case, whitespace and a trailing period
/// ("A", " c ", "b.") but rejects anything outside a-d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerKey {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(['.', ')']).trim();
        match trimmed.to_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl TryFrom<String> for AnswerKey {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnswerKey> for String {
    fn from(key: AnswerKey) -> Self {
        key.as_str().to_string()
    }
}

/// CP/TP prefill suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSuggestion {
    pub cp: String,
    pub tp: Vec<String>,
    pub dimensions: Vec<GraduateDimension>,
    pub suggested_meetings: u32,
    pub suggested_pedagogy: Vec<String>,
}
