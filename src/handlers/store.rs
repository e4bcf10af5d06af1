use crate::{
    Result,
    config::Config,
    store::{AthleteRegistry, MergeReport, merge_partials, registry::RegistryStats},
};
use std::path::PathBuf;

pub fn handle_merge(
    config: &Config,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    backup: Option<PathBuf>,
) -> Result<MergeReport> {
    let inputs = if inputs.is_empty() {
        config.storage.merge_inputs.clone()
    } else {
        inputs
    };
    let output = output.unwrap_or_else(|| config.storage.merged_output.clone());
    let backup = backup.unwrap_or_else(|| config.storage.merged_backup.clone());

    merge_partials(&inputs, &output, &backup)
}

fn registry_path(config: &Config, registry: Option<PathBuf>) -> PathBuf {
    registry.unwrap_or_else(|| config.storage.registry_path.clone())
}

pub fn handle_registry_show(config: &Config, registry: Option<PathBuf>) -> Result<RegistryStats> {
    let path = registry_path(config, registry);
    let registry = AthleteRegistry::load(&path)?;
    Ok(RegistryStats::new(&path, &registry, 0))
}

pub fn handle_registry_dedup(config: &Config, registry: Option<PathBuf>) -> Result<RegistryStats> {
    let path = registry_path(config, registry);
    let mut registry = AthleteRegistry::load(&path)?;
    let removed = registry.dedup();
    registry.save(&path)?;
    Ok(RegistryStats::new(&path, &registry, removed))
}
