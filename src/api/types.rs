use serde::{Deserialize, Serialize};

/// One scheduled lesson as delivered by the retrieval service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub room: String,
    // Absent text never matches a class filter
    #[serde(default)]
    pub text: Option<String>,
}

impl ScheduleEntry {
    pub fn new(day: &str, period: &str, subject: &str, room: &str, text: &str) -> Self {
        Self {
            day: day.to_string(),
            period: period.to_string(),
            subject: subject.to_string(),
            room: room.to_string(),
            text: Some(text.to_string()),
        }
    }
}

/// Day and period axes plus every entry of one plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimetableData {
    pub days: Vec<String>,
    pub periods: Vec<String>,
    pub entries: Vec<ScheduleEntry>,
    pub last_updated: Option<String>,
}

impl TimetableData {
    /// False when either axis is empty and the grid cannot be drawn
    pub fn has_axes(&self) -> bool {
        !self.days.is_empty() && !self.periods.is_empty()
    }
}

/// Timetable as it appears on the wire. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawTimetable {
    days: Option<Vec<String>>,
    periods: Option<Vec<String>>,
    entries: Option<Vec<ScheduleEntry>>,
    last_updated: Option<String>,
}

impl<'de> Deserialize<'de> for TimetableData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<RawTimetable>::deserialize(deserializer)?.unwrap_or_default();

        let mut missing = Vec::new();
        if raw.days.is_none() {
            missing.push("days");
        }
        if raw.periods.is_none() {
            missing.push("periods");
        }
        if raw.entries.is_none() {
            missing.push("entries");
        }
        if !missing.is_empty() {
            log::warn!("Malformed timetable, missing fields: {}", missing.join(", "));
        }

        Ok(Self {
            days: raw.days.unwrap_or_default(),
            periods: raw.periods.unwrap_or_default(),
            entries: raw.entries.unwrap_or_default(),
            last_updated: raw.last_updated,
        })
    }
}

/// An alternate published schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl Plan {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    /// Title for selectors, falling back to "Plan N" (1-based)
    pub fn display_title(&self, index: usize) -> String {
        if self.title.trim().is_empty() {
            format!("Plan {}", index + 1)
        } else {
            self.title.clone()
        }
    }
}

/// Username and password for the retrieval service
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct SpecificPlanRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub plan_url: &'a str,
}

/// Response of the login-and-fetch call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanBundle {
    #[serde(default)]
    pub timetable: TimetableData,
    #[serde(default)]
    pub available_plans: Vec<Plan>,
    #[serde(default)]
    pub available_classes: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub from_cache: bool,
}

/// Response of the plan switch call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub timetable: TimetableData,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Error body sent with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}
