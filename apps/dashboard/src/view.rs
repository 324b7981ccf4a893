use chrono::{DateTime, Local, Utc};

use crate::client::{FetchError, Reading};

const NO_MEASUREMENT: &str = "(no measurement)";

/// What the dashboard is currently showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Displaying(Reading),
    Empty,
    Unavailable,
}

impl ViewState {
    /// State after a fetch completes. Does not depend on the previous state:
    /// whichever response arrives last decides what is shown.
    pub fn from_outcome(outcome: Result<Option<Reading>, FetchError>) -> Self {
        match outcome {
            Ok(Some(reading)) => ViewState::Displaying(reading),
            Ok(None) => ViewState::Empty,
            Err(_) => ViewState::Unavailable,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ViewState::Loading => "Loading...\n".to_string(),
            ViewState::Empty => "No data available.\n".to_string(),
            ViewState::Unavailable => "Sensor API unavailable.\n".to_string(),
            ViewState::Displaying(reading) => render_reading(reading),
        }
    }
}

fn render_reading(reading: &Reading) -> String {
    let rows = reading.measurements();
    let label_width = rows
        .iter()
        .map(|(info, _)| info.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Sensor".len());

    let mut out = String::new();
    out.push_str("Sensor Data Dashboard\n");
    out.push_str(&format!(
        "Recorded at: {}\n\n",
        format_timestamp(reading.created_at)
    ));
    out.push_str(&format!("{:<label_width$}  Value\n", "Sensor"));

    for (info, value) in rows {
        let cell = match value {
            None => NO_MEASUREMENT.to_string(),
            Some(v) if info.unit.is_empty() => v,
            Some(v) => format!("{v} {}", info.unit),
        };
        out.push_str(&format!("{:<label_width$}  {cell}\n", info.name));
    }

    out
}

/// Local wall-clock time; a missing timestamp renders as nothing.
pub fn format_timestamp(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}
