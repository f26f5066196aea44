//! Property tests for form editing, prefill merging and export naming.

use proptest::prelude::*;

use crate::config::SchoolConfig;
use crate::core::document::{export_filename, ExportFormat};
use crate::core::lesson::{
    apply_curriculum_suggestion, number_objectives, toggle_in, GraduateDimension,
    LessonPlanRequest, PedagogicalPractice,
};
use crate::tests::common::sample_suggestion;
use crate::tui::views::form::cycle_value;

fn dimensions() -> impl Strategy<Value = Vec<GraduateDimension>> {
    proptest::sample::subsequence(GraduateDimension::ALL.to_vec(), 0..=GraduateDimension::ALL.len())
}

fn pedagogy() -> impl Strategy<Value = Vec<PedagogicalPractice>> {
    proptest::sample::subsequence(PedagogicalPractice::ALL.to_vec(), 0..=PedagogicalPractice::ALL.len())
}

proptest! {
    #[test]
    fn toggle_twice_restores_selection(
        selected in dimensions(),
        idx in 0..GraduateDimension::ALL.len(),
    ) {
        let value = GraduateDimension::ALL[idx];
        let mut items = selected.clone();
        toggle_in(&mut items, value);
        prop_assert_eq!(items.contains(&value), !selected.contains(&value));
        toggle_in(&mut items, value);
        prop_assert_eq!(items, selected);
    }

    #[test]
    fn toggle_keeps_canonical_order(
        selected in pedagogy(),
        toggles in proptest::collection::vec(0..PedagogicalPractice::ALL.len(), 0..12),
    ) {
        let mut items = selected;
        for idx in toggles {
            toggle_in(&mut items, PedagogicalPractice::ALL[idx]);
        }
        prop_assert!(items.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prefill_never_overwrites_typed_text(
        cp in "[A-Za-z ]{0,40}",
        tp in "[A-Za-z ]{0,40}",
        meetings in 1u32..8,
    ) {
        let mut request = LessonPlanRequest::from_school(&SchoolConfig::default());
        request.cp = cp.clone();
        request.tp = tp.clone();
        request.meeting_count = meetings;

        apply_curriculum_suggestion(&mut request, &sample_suggestion(), 2);

        if !cp.trim().is_empty() {
            prop_assert_eq!(&request.cp, &cp);
        }
        if !tp.trim().is_empty() {
            prop_assert_eq!(&request.tp, &tp);
        }
        if meetings != 2 {
            prop_assert_eq!(request.meeting_count, meetings);
        }
    }

    #[test]
    fn numbered_objectives_one_line_each(
        objectives in proptest::collection::vec("[a-z][a-z ]{0,20}", 1..10),
    ) {
        let text = number_objectives(&objectives);
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), objectives.len());
        for (i, line) in lines.iter().enumerate() {
            let prefix = format!("{}. ", i + 1);
            prop_assert!(line.starts_with(&prefix));
        }
    }

    #[test]
    fn export_filename_is_a_single_component(
        subject in "\\PC{0,20}",
        material in "\\PC{0,30}",
    ) {
        let name = export_filename(&subject, &material, ExportFormat::Word);
        prop_assert!(!name.contains('/'));
        prop_assert!(!name.contains('\\'));
        prop_assert!(name.starts_with("RPM_2025_"));
        prop_assert!(name.ends_with(".doc"));
    }

    #[test]
    fn cycle_value_stays_within_options(
        options in proptest::collection::vec("[a-z]{1,6}", 1..8),
        current in "[a-z]{0,6}",
        forward in any::<bool>(),
    ) {
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let next = cycle_value(&refs, &current, forward);
        prop_assert!(next.is_some_and(|v| refs.contains(&v)));
    }
}
