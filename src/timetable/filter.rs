use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::ScheduleEntry;

/// Sentinel selector that disables filtering
pub const ALL_CLASSES: &str = "all";

/// Class selector applied to entry free text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ClassFilter {
    #[default]
    All,
    Class(String),
}

impl ClassFilter {
    /// Any string is accepted; only the exact sentinel `"all"` disables filtering
    pub fn parse(selector: &str) -> Self {
        if selector == ALL_CLASSES {
            ClassFilter::All
        } else {
            ClassFilter::Class(selector.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClassFilter::All => ALL_CLASSES,
            ClassFilter::Class(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ClassFilter::All)
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ClassFilter {
    fn from(selector: &str) -> Self {
        ClassFilter::parse(selector)
    }
}

/// How a class selector is compared against entry text (both case-folded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassMatch {
    #[default]
    Substring,   // "5" also matches "15a"
    Token,       // whole alphanumeric tokens, in sequence
    Prefix,      // like Token, but the last token may be a prefix
}

impl ClassMatch {
    fn matches(self, text: &str, selector: &str) -> bool {
        match self {
            ClassMatch::Substring => text.contains(selector),
            ClassMatch::Token | ClassMatch::Prefix => {
                let wanted = tokens(selector);
                let Some((last, init)) = wanted.split_last() else {
                    return false;
                };
                tokens(text).windows(wanted.len()).any(|window| {
                    let tail = window[init.len()];
                    let tail_matches = match self {
                        ClassMatch::Prefix => tail.starts_with(last),
                        _ => tail == *last,
                    };
                    tail_matches && window[..init.len()] == *init
                })
            }
        }
    }
}

fn tokens(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Entries whose text contains the selector, case-insensitively.
///
/// `All` returns the input untouched. Entries without text never match a
/// class selector.
pub fn filter_entries<'a>(entries: &'a [ScheduleEntry], filter: &ClassFilter) -> Cow<'a, [ScheduleEntry]> {
    filter_entries_with(entries, filter, ClassMatch::Substring)
}

pub fn filter_entries_with<'a>(
    entries: &'a [ScheduleEntry],
    filter: &ClassFilter,
    mode: ClassMatch,
) -> Cow<'a, [ScheduleEntry]> {
    let selector = match filter {
        ClassFilter::All => return Cow::Borrowed(entries),
        ClassFilter::Class(name) => name.to_lowercase(),
    };

    Cow::Owned(
        entries
            .iter()
            .filter(|entry| {
                entry
                    .text
                    .as_deref()
                    .map(|text| mode.matches(&text.to_lowercase(), &selector))
                    .unwrap_or(false)
            })
            .cloned()
            .collect(),
    )
}
