//! Deterministic subject → palette mapping.
//!
//! Subjects are hashed with the `acc = unit + ((acc << 5) - acc)` string hash
//! over UTF-16 code units. Only the shift wraps to 32 bits; the running sum is
//! kept exact, so long subjects grow past the `i32` range. Collisions are
//! expected; the palette only groups subjects visually.

/// Number of subject colors
pub const PALETTE_SIZE: usize = 10;

/// Visual category a subject falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectTone {
    Blue,
    Green,
    Purple,
    Amber,
    Rose,
    Cyan,
    Indigo,
    Emerald,
    Fuchsia,
    Orange,
}

impl SubjectTone {
    pub const ALL: [SubjectTone; PALETTE_SIZE] = [
        SubjectTone::Blue,
        SubjectTone::Green,
        SubjectTone::Purple,
        SubjectTone::Amber,
        SubjectTone::Rose,
        SubjectTone::Cyan,
        SubjectTone::Indigo,
        SubjectTone::Emerald,
        SubjectTone::Fuchsia,
        SubjectTone::Orange,
    ];

    pub fn for_subject(subject: &str) -> Self {
        Self::ALL[color_index(subject)]
    }
}

/// `acc = unit + ((acc << 5) - acc)` folded left to right, seeded at 0.
///
/// `acc << 5` truncates `acc` to `i32` before shifting and wraps the result;
/// the subtraction and addition do not wrap.
pub fn subject_hash(subject: &str) -> i64 {
    subject.encode_utf16().fold(0i64, |acc, unit| {
        let shifted = i64::from((acc as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted.wrapping_sub(acc))
    })
}

/// Palette index for a subject in `[0, PALETTE_SIZE)`
pub fn color_index(subject: &str) -> usize {
    color_index_in(subject, PALETTE_SIZE)
}

/// Palette index for an arbitrary palette size. A zero-sized palette maps to 0.
pub fn color_index_in(subject: &str, palette_size: usize) -> usize {
    if palette_size == 0 {
        return 0;
    }
    (subject_hash(subject).unsigned_abs() % palette_size as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Math", 2390824, 4)]
    #[test_case("Sport", 80099156, 6)]
    #[test_case("Deutsch", -1071093480, 0)]
    #[test_case("Mathematik", -4662178203, 3)]
    #[test_case("Geschichte", -3926100123, 3)]
    #[test_case("Informatik", -2237999202, 2)]
    #[test_case("Biologie", 1040956280, 0)]
    #[test_case("", 0, 0)]
    fn known_subjects(subject: &str, hash: i64, index: usize) {
        assert_eq!(subject_hash(subject), hash);
        assert_eq!(color_index(subject), index);
    }

    #[test]
    fn hashes_utf16_code_units() {
        // U+00C4 is one unit, U+1F600 is a surrogate pair
        assert_eq!(subject_hash("Ä"), 196);
        assert_eq!(subject_hash("😀"), 0xD83D * 31 + 0xDE00);
    }

    #[test]
    fn long_subjects_leave_the_i32_range() {
        let hash = subject_hash("Mathematik");
        assert!(hash < i64::from(i32::MIN));
        assert_eq!(color_index("Mathematik"), 3);
    }

    #[test]
    fn very_long_subject_stays_in_palette() {
        let subject = "Naturwissenschaften und Technik ".repeat(64);
        assert!(color_index(&subject) < PALETTE_SIZE);
    }

    #[test]
    fn tone_follows_index() {
        assert_eq!(SubjectTone::for_subject("Math"), SubjectTone::Rose);
        assert_eq!(SubjectTone::for_subject("Deutsch"), SubjectTone::Blue);
    }

    #[test]
    fn repeated_calls_agree() {
        let first = color_index("Informatik");
        for _ in 0..10 {
            assert_eq!(color_index("Informatik"), first);
        }
    }

    #[test]
    fn zero_palette_is_total() {
        assert_eq!(color_index_in("Math", 0), 0);
    }
}
