pub mod merge;
pub mod registry;

use crate::{Result, models::AthleteResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub use merge::{MergeReport, merge_partials};
pub use registry::AthleteRegistry;

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes `rank,time,athlete_name,athlete_page` rows with a header.
pub fn write_results_csv(path: &Path, results: &[AthleteResult]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if results.is_empty() {
        writer.write_record(["rank", "time", "athlete_name", "athlete_page"])?;
    }
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    ensure_parent(path)?;
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_results_csv_with_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/results.csv");
        let results = vec![AthleteResult {
            rank: "1".into(),
            time: "31'02''".into(),
            athlete_name: "MARTIN Paul".into(),
            athlete_page: "https://bases.athle.fr/fiche?seq=1".into(),
        }];

        write_results_csv(&path, &results).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("rank,time,athlete_name,athlete_page"));
        assert_eq!(
            lines.next(),
            Some("1,31'02'',MARTIN Paul,https://bases.athle.fr/fiche?seq=1")
        );
    }

    #[test]
    fn test_write_results_csv_empty_keeps_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");

        write_results_csv(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "rank,time,athlete_name,athlete_page");
    }

    #[test]
    fn test_write_json_pretty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.json");
        write_json(&path, &vec!["a", "b"]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        let parsed: Vec<String> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }
}
