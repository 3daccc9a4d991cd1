// Property tests for the pure timetable logic: filtering, grid building and
// subject colors.

use plangrid::api::ScheduleEntry;
use plangrid::timetable::{
    build_matrix, color_index, filter_entries, filter_entries_with, ClassFilter, ClassMatch, SubjectTone,
    PALETTE_SIZE,
};
use proptest::prelude::*;
use std::borrow::Cow;

static DAYS: [&str; 5] = ["Mo", "Di", "Mi", "Do", "Fr"];
static PERIODS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

fn labels(all: &[&str], count: usize) -> Vec<String> {
    all.iter().take(count).map(|s| s.to_string()).collect()
}

prop_compose! {
    fn entry()(
        day in prop::sample::select(&DAYS[..]),
        period in prop::sample::select(&PERIODS[..]),
        subject in "[A-Za-z]{0,8}",
        room in "[A-Z0-9]{0,4}",
        text in prop::option::of("(5a|10c|11A|Q1|Q2)? ?[A-Za-z ]{0,12}"),
    ) -> ScheduleEntry {
        ScheduleEntry {
            day: day.to_string(),
            period: period.to_string(),
            subject,
            room,
            text,
        }
    }
}

fn entries() -> impl Strategy<Value = Vec<ScheduleEntry>> {
    prop::collection::vec(entry(), 0..40)
}

fn class_match() -> impl Strategy<Value = ClassMatch> {
    prop_oneof![Just(ClassMatch::Substring), Just(ClassMatch::Token), Just(ClassMatch::Prefix)]
}

proptest! {
    /// Property: "all" hands back the input untouched
    #[test]
    fn prop_all_is_identity(entries in entries(), mode in class_match()) {
        let filtered = filter_entries_with(&entries, &ClassFilter::All, mode);
        prop_assert!(matches!(filtered, Cow::Borrowed(_)));
        prop_assert_eq!(filtered.as_ref(), entries.as_slice());
    }

    /// Property: filtered entries are an order-preserving subsequence of the input
    #[test]
    fn prop_filter_is_ordered_subset(
        entries in entries(),
        selector in "(5a|10c|11a|q|[a-z]{1,3})",
        mode in class_match(),
    ) {
        let filtered = filter_entries_with(&entries, &ClassFilter::parse(&selector), mode);
        let mut rest = entries.iter();
        for kept in filtered.iter() {
            prop_assert!(rest.any(|e| e == kept));
        }
    }

    /// Property: substring matching keeps exactly the entries containing the selector
    #[test]
    fn prop_substring_filter_matches_case_insensitively(
        entries in entries(),
        selector in "(5A|10c|11a|Q1|[a-z]{1,2})",
    ) {
        let filtered = filter_entries(&entries, &ClassFilter::parse(&selector));
        let needle = selector.to_lowercase();
        let expected: Vec<_> = entries
            .iter()
            .filter(|e| e.text.as_deref().is_some_and(|t| t.to_lowercase().contains(&needle)))
            .cloned()
            .collect();
        prop_assert_eq!(filtered.into_owned(), expected);
    }

    /// Property: filtering twice with the same selector changes nothing
    #[test]
    fn prop_filter_is_idempotent(entries in entries(), selector in "[a-z0-9]{1,3}", mode in class_match()) {
        let filter = ClassFilter::parse(&selector);
        let once = filter_entries_with(&entries, &filter, mode).into_owned();
        let twice = filter_entries_with(&once, &filter, mode).into_owned();
        prop_assert_eq!(once, twice);
    }

    /// Property: the grid is always days × periods, however many entries land on it
    #[test]
    fn prop_grid_has_axis_dimensions(
        entries in entries(),
        day_count in 0..=DAYS.len(),
        period_count in 0..=PERIODS.len(),
    ) {
        let days = labels(&DAYS, day_count);
        let periods = labels(&PERIODS, period_count);
        let matrix = build_matrix(&days, &periods, &entries);

        prop_assert_eq!(matrix.cell_count(), day_count * period_count);
        prop_assert_eq!(matrix.is_empty(), day_count == 0 || period_count == 0);

        let empty = build_matrix(&days, &periods, &[]);
        prop_assert_eq!(empty.cell_count(), day_count * period_count);
        prop_assert_eq!(empty.filled_cells(), 0);
    }

    /// Property: each cell shows the last entry scheduled there, or nothing
    #[test]
    fn prop_last_entry_wins(entries in entries()) {
        let days = labels(&DAYS, DAYS.len());
        let periods = labels(&PERIODS, PERIODS.len());
        let matrix = build_matrix(&days, &periods, &entries);

        for day in &days {
            for period in &periods {
                let cell = matrix.get(day, period).expect("cell on axis");
                match entries.iter().rev().find(|e| &e.day == day && &e.period == period) {
                    Some(last) => {
                        prop_assert_eq!(&cell.subject, &last.subject);
                        prop_assert_eq!(&cell.room, &last.room);
                    }
                    None => prop_assert!(cell.subject.is_empty() && cell.room.is_empty()),
                }
            }
        }
    }

    /// Property: every subject maps into the palette, the same way every time
    #[test]
    fn prop_color_index_in_range_and_stable(subject in "\\PC{0,24}") {
        let index = color_index(&subject);
        prop_assert!(index < PALETTE_SIZE);
        prop_assert_eq!(index, color_index(&subject.clone()));
        prop_assert_eq!(SubjectTone::for_subject(&subject), SubjectTone::ALL[index]);
    }
}
