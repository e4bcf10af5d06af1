use super::{
    Cli,
    commands::{Command, ConfigCommand, RegistryCommand},
};
use crate::{
    Result,
    config::Config,
    handlers::{self, scrape::ScrapeOptions},
    output,
};

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Command::Events {
            year,
            skip,
            output: events_path,
        } => {
            let year = year.unwrap_or(config.scrape.year);
            let result = handlers::scrape::handle_events(&config, year, skip, events_path).await?;
            output::print_output(&result, json, true)
        }
        Command::Scrape {
            year,
            registry,
            results,
            events_output,
            limit,
        } => {
            let opts = ScrapeOptions {
                year,
                registry,
                results,
                events_output,
                limit,
            };
            let result = handlers::scrape::handle_scrape(&config, opts).await?;
            output::print_output(&result, json, true)
        }
        Command::Merge {
            inputs,
            output: merged,
            backup,
        } => {
            let result = handlers::store::handle_merge(&config, inputs, merged, backup)?;
            output::print_output(&result, json, true)
        }
        Command::Registry { subcommand } => handle_registry_command(subcommand, json, &config),
        Command::Search { name, max_pages } => {
            let result = handlers::athletes::handle_search(&config, &name, max_pages).await?;
            output::print_output(&result, json, true)
        }
        Command::Profile { url, years } => {
            let result = handlers::athletes::handle_profile(&config, &url, years).await?;
            output::print_output(&result, json, true)
        }
        Command::Config { subcommand } => handle_config_command(subcommand, json, &config),
    }
}

fn handle_registry_command(subcommand: RegistryCommand, json: bool, config: &Config) -> Result<()> {
    let result = match subcommand {
        RegistryCommand::Show { registry } => handlers::store::handle_registry_show(config, registry)?,
        RegistryCommand::Dedup { registry } => {
            handlers::store::handle_registry_dedup(config, registry)?
        }
    };
    output::print_output(&result, json, true)
}

fn handle_config_command(subcommand: ConfigCommand, json: bool, config: &Config) -> Result<()> {
    match subcommand {
        ConfigCommand::Init => {
            let result = handlers::config_handler::handle_config_init()?;
            output::print_output(&result, json, true)
        }
        ConfigCommand::Show => {
            let result = handlers::config_handler::handle_config_show(config);
            output::print_output(&result, json, true)
        }
        ConfigCommand::Path => {
            let result = handlers::config_handler::handle_config_path()?;
            output::print_output(&result, json, true)
        }
    }
}
