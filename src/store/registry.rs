use super::ensure_parent;
use crate::{
    Result,
    models::{AthleteResult, RegistryEntry},
    output::{self, OutputFormatter},
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Known `(athlete_name, athlete_page)` pairs, persisted across runs.
///
/// Entries are appended freely; exact duplicates are removed by `dedup` and on
/// every `save`. Two entries may share a name as long as their pages differ.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AthleteRegistry {
    entries: Vec<RegistryEntry>,
}

impl AthleteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A missing file yields an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let entries = reader
            .deserialize::<RegistryEntry>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::info!("Loaded {} registry entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }

    pub fn extend_results(&mut self, results: &[AthleteResult]) {
        self.entries.extend(results.iter().map(RegistryEntry::from));
    }

    pub fn merge_from(&mut self, other: &AthleteRegistry) {
        self.entries.extend(other.entries.iter().cloned());
        self.dedup();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.athlete_name.as_str())
    }

    /// Drops exact duplicates, keeping the first occurrence. Returns the
    /// number of entries removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.entries.len();
        let mut seen = HashSet::with_capacity(before);
        self.entries.retain(|e| seen.insert(e.clone()));
        before - self.entries.len()
    }

    /// Deduplicates, then overwrites `path`. Returns the number of entries
    /// written.
    pub fn save(&mut self, path: &Path) -> Result<usize> {
        let removed = self.dedup();
        if removed > 0 {
            tracing::debug!("Removed {} duplicate registry entries", removed);
        }

        ensure_parent(path)?;
        let mut writer = csv::Writer::from_path(path)?;
        if self.entries.is_empty() {
            writer.write_record(["athlete_name", "athlete_page"])?;
        }
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} registry entries to {}", self.entries.len(), path.display());
        Ok(self.entries.len())
    }
}

#[derive(Debug, Serialize)]
pub struct RegistryStats {
    pub path: String,
    pub entries: usize,
    pub distinct_names: usize,
    pub duplicates_removed: usize,
}

impl RegistryStats {
    pub fn new(path: &Path, registry: &AthleteRegistry, duplicates_removed: usize) -> Self {
        Self {
            path: path.display().to_string(),
            entries: registry.len(),
            distinct_names: registry.names().collect::<HashSet<_>>().len(),
            duplicates_removed,
        }
    }
}

impl OutputFormatter for RegistryStats {
    fn format_text(&self) -> String {
        use crate::output::text;
        let mut lines = vec![
            text::section("Athlete registry"),
            text::key_value("File", &self.path),
            text::key_value("Entries", &self.entries.to_string()),
            text::key_value("Distinct names", &self.distinct_names.to_string()),
        ];
        if self.duplicates_removed > 0 {
            lines.push(text::success(&format!(
                "Removed {} duplicate entries",
                self.duplicates_removed
            )));
        }
        lines.join("\n")
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(self, pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, page: &str) -> RegistryEntry {
        RegistryEntry {
            athlete_name: name.to_string(),
            athlete_page: page.to_string(),
        }
    }

    fn pairs(registry: &AthleteRegistry) -> HashSet<RegistryEntry> {
        registry.entries().iter().cloned().collect()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = AthleteRegistry::load(&temp.path().join("none.csv")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dedup_keeps_same_name_with_different_pages() {
        let mut registry = AthleteRegistry::new();
        registry.push(entry("MARTIN Paul", "p1"));
        registry.push(entry("MARTIN Paul", "p2"));
        registry.push(entry("MARTIN Paul", "p1"));

        assert_eq!(registry.dedup(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[0], entry("MARTIN Paul", "p1"));
        assert_eq!(registry.entries()[1], entry("MARTIN Paul", "p2"));
    }

    #[test]
    fn test_merge_with_self_is_idempotent() {
        let mut registry = AthleteRegistry::new();
        registry.push(entry("A", "pa"));
        registry.push(entry("B", "pb"));
        registry.push(entry("A", "pa"));

        let snapshot = registry.clone();
        registry.merge_from(&snapshot);
        let once = pairs(&registry);
        let len_once = registry.len();

        let snapshot = registry.clone();
        registry.merge_from(&snapshot);
        assert_eq!(pairs(&registry), once);
        assert_eq!(registry.len(), len_once);
        assert_eq!(len_once, 2);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/athletes_pages.csv");

        let mut registry = AthleteRegistry::new();
        registry.push(entry("DURAND, Léa", "https://bases.athle.fr/a?seq=1"));
        registry.push(entry("DURAND, Léa", "https://bases.athle.fr/a?seq=1"));
        registry.push(entry("ROUX Marc", "https://bases.athle.fr/a?seq=2"));

        assert_eq!(registry.save(&path).unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("athlete_name,athlete_page\n"));

        let reloaded = AthleteRegistry::load(&path).unwrap();
        assert_eq!(reloaded.entries(), registry.entries());
    }

    #[test]
    fn test_save_empty_registry_writes_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.csv");
        AthleteRegistry::new().save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "athlete_name,athlete_page");
        assert!(AthleteRegistry::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_extend_results_and_names() {
        let mut registry = AthleteRegistry::new();
        registry.extend_results(&[AthleteResult {
            rank: "3".into(),
            time: "1h02'11''".into(),
            athlete_name: "PETIT Zoé".into(),
            athlete_page: "p".into(),
        }]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["PETIT Zoé"]);
    }

    #[test]
    fn test_stats_counts_distinct_names() {
        let mut registry = AthleteRegistry::new();
        registry.push(entry("A", "1"));
        registry.push(entry("A", "2"));
        registry.push(entry("B", "3"));
        let stats = RegistryStats::new(Path::new("r.csv"), &registry, 0);
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.distinct_names, 2);
        assert!(stats.format_text().contains("Distinct names"));
    }
}
