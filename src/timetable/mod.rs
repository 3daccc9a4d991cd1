//! Pure timetable presentation logic: class filtering, grid building and
//! subject colors. Nothing here touches the network or mutates its input.

mod color;
mod filter;
mod matrix;

pub use color::{color_index, color_index_in, subject_hash, SubjectTone, PALETTE_SIZE};
pub use filter::{filter_entries, filter_entries_with, ClassFilter, ClassMatch, ALL_CLASSES};
pub use matrix::{build_matrix, entry_detail, Cell, TimetableMatrix};
