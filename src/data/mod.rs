//! Activity data intake.
//!
//! The city only needs an ordered list of daily counts. This module reads
//! that list from saved JSON (a flat day list, a weekly calendar, or a
//! full API response), trims it to the requested window, or synthesizes a
//! demo year when no file is given. Fetching from the network is left to
//! whatever produced the file.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use thiserror::Error;

pub mod calendar;
pub mod demo;
pub mod username;

pub use calendar::{parse_activity, trim_to_window, ContributionDay, UserActivity};
pub use username::validate_username;

/// Default number of days shown.
pub const DEFAULT_WINDOW_DAYS: usize = 365;

/// Errors raised while obtaining activity data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid contribution JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("user not found, check the username")]
    UserNotFound,

    #[error("invalid username {0:?}")]
    InvalidUsername(String),

    #[error("contribution calendar is empty")]
    EmptyCalendar,
}

/// Where activity comes from and how much of it to keep.
#[derive(Resource, Clone, Debug)]
pub struct ActivitySourceConfig {
    /// Saved JSON to load; `None` generates a demo year.
    pub input: Option<PathBuf>,
    /// Display name, used when the data carries none.
    pub user: Option<String>,
    /// Days kept from the end of the sequence; `None` keeps everything.
    pub window: Option<usize>,
    /// Seed for the demo year.
    pub seed: u64,
}

impl Default for ActivitySourceConfig {
    fn default() -> Self {
        Self {
            input: None,
            user: None,
            window: Some(DEFAULT_WINDOW_DAYS),
            seed: 42,
        }
    }
}

impl ActivitySourceConfig {
    /// Check the configured username, if any.
    pub fn validated(self) -> Result<Self, DataError> {
        if let Some(user) = &self.user {
            if !validate_username(user) {
                return Err(DataError::InvalidUsername(user.clone()));
            }
        }
        Ok(self)
    }
}

/// Load activity according to `config`.
pub fn load_activity(config: &ActivitySourceConfig) -> Result<UserActivity, DataError> {
    let mut activity = match &config.input {
        Some(path) => load_file(path, config.window)?,
        None => {
            let days = config.window.unwrap_or(DEFAULT_WINDOW_DAYS);
            info!("Generating demo activity: {} days, seed {}", days, config.seed);
            UserActivity {
                name: None,
                days: demo::demo_year(config.seed, days),
            }
        }
    };

    if activity.name.is_none() {
        activity.name = config.user.clone();
    }
    Ok(activity)
}

fn load_file(path: &Path, window: Option<usize>) -> Result<UserActivity, DataError> {
    let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let activity = parse_activity(&json, window)?;
    info!(
        "Loaded {} days of activity from {}",
        activity.days.len(),
        path.display()
    );
    Ok(activity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_source_respects_window() {
        let config = ActivitySourceConfig {
            window: Some(100),
            user: Some("octocat".into()),
            ..default()
        };
        let activity = load_activity(&config).unwrap();
        assert_eq!(activity.days.len(), 100);
        assert_eq!(activity.name.as_deref(), Some("octocat"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let config = ActivitySourceConfig {
            input: Some(PathBuf::from("/definitely/not/here.json")),
            ..default()
        };
        assert!(matches!(load_activity(&config), Err(DataError::Io { .. })));
    }

    #[test]
    fn file_source_is_parsed_and_trimmed() {
        let path = std::env::temp_dir().join(format!(
            "contrib-city-{}-{}.json",
            std::process::id(),
            "file_source"
        ));
        std::fs::write(
            &path,
            r#"[{"contributionCount": 1, "date": "2024-01-01"},
                {"contributionCount": 2, "date": "2024-01-02"},
                {"contributionCount": 3, "date": "2024-01-03"}]"#,
        )
        .unwrap();

        let config = ActivitySourceConfig {
            input: Some(path.clone()),
            window: Some(2),
            ..default()
        };
        let activity = load_activity(&config);
        std::fs::remove_file(&path).unwrap();

        let activity = activity.unwrap();
        assert_eq!(activity.days.len(), 2);
        assert_eq!(activity.days[0].date, "2024-01-02");
    }

    #[test]
    fn invalid_username_is_rejected() {
        let config = ActivitySourceConfig {
            user: Some("-bad-".into()),
            ..default()
        };
        assert!(matches!(
            config.validated(),
            Err(DataError::InvalidUsername(name)) if name == "-bad-"
        ));
    }
}
