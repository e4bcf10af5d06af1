use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COMPETITION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"frmcompetition=(\d+)").expect("valid regex"));

/// A competition session found on the season listing. Identified by `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub url: String,
    pub competition_id: Option<String>,
}

impl Event {
    pub fn new(date: String, name: String, location: String, event_type: String, url: String) -> Self {
        let competition_id = competition_id(&url);
        Self {
            date,
            name,
            location,
            event_type,
            url,
            competition_id,
        }
    }
}

pub fn competition_id(url: &str) -> Option<String> {
    COMPETITION_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteResult {
    pub rank: String,
    pub time: String,
    pub athlete_name: String,
    pub athlete_page: String,
}

/// One `(athlete_name, athlete_page)` row of the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub athlete_name: String,
    pub athlete_page: String,
}

impl From<&AthleteResult> for RegistryEntry {
    fn from(result: &AthleteResult) -> Self {
        Self {
            athlete_name: result.athlete_name.clone(),
            athlete_page: result.athlete_page.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteSummary {
    pub name: String,
    pub club: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub date: String,
    pub competition: String,
    pub place: String,
    pub performance: String,
    pub wind: String,
    pub points: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Label/value pairs in the order the site lists them.
    pub personal_info: Vec<(String, String)>,
    pub results: Vec<ProfileResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub year: i32,
    pub events_found: usize,
    pub events_visited: usize,
    pub events_unavailable: usize,
    pub events_faulted: usize,
    pub results_extracted: usize,
    pub registry_size: usize,
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            events_found: 0,
            events_visited: 0,
            events_unavailable: 0,
            events_faulted: 0,
            results_extracted: 0,
            registry_size: 0,
            interrupted: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competition_id_extracted() {
        let event = Event::new(
            "12/03/23".into(),
            "Semi de Paris".into(),
            "PARIS".into(),
            "Route".into(),
            "https://bases.athle.fr/asp.net/liste.aspx?frmbase=resultats&frmcompetition=271345".into(),
        );
        assert_eq!(event.competition_id, Some("271345".to_string()));
    }

    #[test]
    fn test_competition_id_absent() {
        assert_eq!(competition_id("https://bases.athle.fr/asp.net/liste.aspx"), None);
    }

    #[test]
    fn test_event_serializes_type_field() {
        let event = Event::new(
            "d".into(),
            "n".into(),
            "l".into(),
            "Cross".into(),
            "u".into(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Cross");
        assert!(json["competition_id"].is_null());
    }

    #[test]
    fn test_registry_entry_from_result() {
        let result = AthleteResult {
            rank: "1".into(),
            time: "29'45''".into(),
            athlete_name: "DUPONT Jean".into(),
            athlete_page: "https://bases.athle.fr/fiche?id=1".into(),
        };
        let entry = RegistryEntry::from(&result);
        assert_eq!(entry.athlete_name, "DUPONT Jean");
        assert_eq!(entry.athlete_page, "https://bases.athle.fr/fiche?id=1");
    }
}
