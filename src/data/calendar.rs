//! Contribution calendar formats and window trimming.

use serde::{Deserialize, Serialize};

use crate::city::grid::DailyActivity;
use crate::data::DataError;

/// One day as it appears in the source JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    /// Missing or `null` counts read as zero.
    #[serde(default)]
    pub contribution_count: Option<f64>,
    #[serde(default)]
    pub date: String,
}

impl ContributionDay {
    pub fn new(count: f64, date: impl Into<String>) -> Self {
        Self {
            contribution_count: Some(count),
            date: date.into(),
        }
    }
}

impl DailyActivity for ContributionDay {
    fn raw_count(&self) -> f64 {
        self.contribution_count.unwrap_or(0.0)
    }

    fn date(&self) -> &str {
        &self.date
    }
}

/// Chronological activity for one user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserActivity {
    pub name: Option<String>,
    pub days: Vec<ContributionDay>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Week {
    contribution_days: Vec<ContributionDay>,
}

#[derive(Deserialize)]
struct ContributionCalendar {
    weeks: Vec<Week>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUser {
    #[serde(default)]
    name: Option<String>,
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
struct ResponseData {
    user: Option<ApiUser>,
}

#[derive(Deserialize)]
struct ApiResponse {
    data: ResponseData,
}

/// Accepted top-level shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum CalendarDocument {
    Days(Vec<ContributionDay>),
    Calendar(ContributionCalendar),
    Response(ApiResponse),
}

impl ContributionCalendar {
    fn flatten(self) -> Vec<ContributionDay> {
        self.weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .collect()
    }
}

/// Parse saved activity JSON.
///
/// With `window` set, the sequence is trimmed with [`trim_to_window`].
pub fn parse_activity(json: &str, window: Option<usize>) -> Result<UserActivity, DataError> {
    let (name, mut days) = match serde_json::from_str::<CalendarDocument>(json)? {
        CalendarDocument::Days(days) => (None, days),
        CalendarDocument::Calendar(calendar) => (None, calendar.flatten()),
        CalendarDocument::Response(response) => {
            let user = response.data.user.ok_or(DataError::UserNotFound)?;
            (
                user.name,
                user.contributions_collection.contribution_calendar.flatten(),
            )
        }
    };

    if days.is_empty() {
        return Err(DataError::EmptyCalendar);
    }

    if let Some(window) = window {
        trim_to_window(&mut days, window);
    }

    Ok(UserActivity { name, days })
}

/// Keep the last `window` days.
///
/// A trailing zero-count day is today and still filling up, so it is
/// dropped before counting.
pub fn trim_to_window(days: &mut Vec<ContributionDay>, window: usize) {
    if days.last().is_some_and(|day| day.raw_count() == 0.0) {
        days.pop();
    }
    let extra = days.len().saturating_sub(window);
    days.drain(..extra);
}
