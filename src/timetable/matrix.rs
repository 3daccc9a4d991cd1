use std::collections::HashMap;

use crate::api::ScheduleEntry;

/// Subject and room shown in one grid cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub subject: String,
    pub room: String,
}

impl Cell {
    pub fn new(subject: &str, room: &str) -> Self {
        Self {
            subject: subject.to_string(),
            room: room.to_string(),
        }
    }

    /// No lesson scheduled. Only the subject decides this.
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
    }
}

/// Dense day × period grid framed by the declared axes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableMatrix {
    days: Vec<String>,
    periods: Vec<String>,
    // row-major: one row per day, one column per period
    cells: Vec<Cell>,
}

impl TimetableMatrix {
    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Always `days × periods`, populated or not
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Nothing to draw; callers show the "no timetable available" state
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, day: &str, period: &str) -> Option<&Cell> {
        let d = self.days.iter().position(|d| d == day)?;
        let p = self.periods.iter().position(|p| p == period)?;
        self.cell(d, p)
    }

    /// Cell by axis position
    pub fn cell(&self, day: usize, period: usize) -> Option<&Cell> {
        if period >= self.periods.len() {
            return None;
        }
        self.cells.get(day * self.periods.len() + period)
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Lay entries onto the grid.
///
/// Every axis cell starts empty. Entries whose day or period is not on an
/// axis are dropped. When several entries share a cell the last one wins.
/// Repeated axis labels resolve to their first occurrence.
pub fn build_matrix(days: &[String], periods: &[String], entries: &[ScheduleEntry]) -> TimetableMatrix {
    let mut cells = vec![Cell::default(); days.len() * periods.len()];

    let mut day_index: HashMap<&str, usize> = HashMap::new();
    for (i, day) in days.iter().enumerate() {
        day_index.entry(day.as_str()).or_insert(i);
    }
    let mut period_index: HashMap<&str, usize> = HashMap::new();
    for (i, period) in periods.iter().enumerate() {
        period_index.entry(period.as_str()).or_insert(i);
    }

    let mut dropped = 0usize;
    for entry in entries {
        match (day_index.get(entry.day.as_str()), period_index.get(entry.period.as_str())) {
            (Some(&d), Some(&p)) => {
                cells[d * periods.len() + p] = Cell::new(&entry.subject, &entry.room);
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!("{} entries fall outside the timetable axes", dropped);
    }

    TimetableMatrix {
        days: days.to_vec(),
        periods: periods.to_vec(),
        cells,
    }
}

/// First entry scheduled at `(day, period)`, for cell tooltips
pub fn entry_detail<'a>(entries: &'a [ScheduleEntry], day: &str, period: &str) -> Option<&'a ScheduleEntry> {
    entries.iter().find(|e| e.day == day && e.period == period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn axis(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_entries_give_full_empty_grid() {
        let matrix = build_matrix(&axis(&["Mon", "Tue", "Wed"]), &axis(&["1", "2"]), &[]);
        assert_eq!(matrix.cell_count(), 6);
        assert_eq!(matrix.filled_cells(), 0);
        assert_eq!(matrix.get("Wed", "2"), Some(&Cell::default()));
    }

    #[test]
    fn places_entry_in_its_cell() {
        let entries = vec![ScheduleEntry::new("Mon", "1", "Math", "101", "10c Math")];
        let matrix = build_matrix(&axis(&["Mon", "Tue"]), &axis(&["1", "2"]), &entries);

        assert_eq!(matrix.get("Mon", "1"), Some(&Cell::new("Math", "101")));
        assert_eq!(matrix.get("Mon", "2"), Some(&Cell::default()));
        assert_eq!(matrix.get("Tue", "1"), Some(&Cell::default()));
        assert_eq!(matrix.get("Tue", "2"), Some(&Cell::default()));
    }

    #[test]
    fn later_entry_overwrites_earlier() {
        let entries = vec![
            ScheduleEntry::new("Mon", "1", "Math", "101", "first"),
            ScheduleEntry::new("Mon", "1", "Physics", "P1", "second"),
        ];
        let matrix = build_matrix(&axis(&["Mon"]), &axis(&["1"]), &entries);
        assert_eq!(matrix.get("Mon", "1"), Some(&Cell::new("Physics", "P1")));
    }

    #[test]
    fn off_axis_entries_are_dropped() {
        let entries = vec![
            ScheduleEntry::new("Sat", "1", "Chess", "", ""),
            ScheduleEntry::new("Mon", "9", "Choir", "", ""),
        ];
        let matrix = build_matrix(&axis(&["Mon"]), &axis(&["1"]), &entries);
        assert_eq!(matrix.filled_cells(), 0);
        assert_eq!(matrix.get("Sat", "1"), None);
    }

    #[test]
    fn empty_subject_cell_counts_as_empty() {
        let entries = vec![ScheduleEntry::new("Mon", "1", "", "101", "room only")];
        let matrix = build_matrix(&axis(&["Mon"]), &axis(&["1"]), &entries);
        let cell = matrix.get("Mon", "1").unwrap();
        assert!(cell.is_empty());
        assert_eq!(cell.room, "101");
    }

    #[test]
    fn missing_axis_means_empty_grid() {
        let entries = vec![ScheduleEntry::new("Mon", "1", "Math", "101", "")];
        assert!(build_matrix(&[], &axis(&["1"]), &entries).is_empty());
        assert!(build_matrix(&axis(&["Mon"]), &[], &entries).is_empty());
    }

    #[test]
    fn cell_by_position_is_row_major_per_day() {
        let entries = vec![ScheduleEntry::new("Tue", "1", "Art", "A2", "")];
        let matrix = build_matrix(&axis(&["Mon", "Tue"]), &axis(&["1", "2"]), &entries);
        assert_eq!(matrix.cell(1, 0), Some(&Cell::new("Art", "A2")));
        assert_eq!(matrix.cell(0, 2), None);
        assert_eq!(matrix.cell(2, 0), None);
    }

    #[test]
    fn tooltip_detail_is_first_match() {
        let entries = vec![
            ScheduleEntry::new("Mon", "1", "Math", "101", "first"),
            ScheduleEntry::new("Mon", "1", "Physics", "P1", "second"),
        ];
        let detail = entry_detail(&entries, "Mon", "1").unwrap();
        assert_eq!(detail.text.as_deref(), Some("first"));
        assert!(entry_detail(&entries, "Tue", "1").is_none());
    }
}
