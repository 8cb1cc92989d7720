use chrono::{DateTime, Datelike, Utc};

use crate::models::{Hemisphere, Season, SeasonContext};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolves the seasonal context for a household
///
/// A missing latitude yields an unknown season and hemisphere; the month is
/// always taken from `now`.
pub fn resolve_season(latitude: Option<f64>, now: DateTime<Utc>) -> SeasonContext {
    let month_number = now.month();
    let month = MONTH_NAMES[(month_number - 1) as usize].to_string();

    let Some(latitude) = latitude else {
        return SeasonContext {
            season: Season::Unknown,
            hemisphere: Hemisphere::Unknown,
            month,
            has_location: false,
        };
    };

    let hemisphere = if latitude >= 0.0 {
        Hemisphere::Northern
    } else {
        Hemisphere::Southern
    };

    SeasonContext {
        season: season_for_month(month_number, hemisphere),
        hemisphere,
        month,
        has_location: true,
    }
}

fn season_for_month(month: u32, hemisphere: Hemisphere) -> Season {
    let northern = match month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => return Season::Unknown,
    };

    match hemisphere {
        Hemisphere::Northern => northern,
        Hemisphere::Southern => match northern {
            Season::Winter => Season::Summer,
            Season::Spring => Season::Autumn,
            Season::Summer => Season::Winter,
            Season::Autumn => Season::Spring,
            Season::Unknown => Season::Unknown,
        },
        Hemisphere::Unknown => Season::Unknown,
    }
}
