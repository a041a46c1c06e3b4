use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use flashlight::cli::{Cli, LogLevel, OutputFormat};
use flashlight::config::Config;
use flashlight::pipeline;
use flashlight::report::AggregatedReport;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    setup_logging(cli.log_level);

    let config = Config::from_cli(&cli);
    let outcome = pipeline::run(&cli.paths, &config).context("scan aborted")?;
    let content = render(&outcome.report, cli.format, &config)?;
    write_output(&content, cli.output.as_deref())
}

fn setup_logging(log_level: LogLevel) {
    let level = Level::from(log_level);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flashlight={}", level.as_str().to_lowercase())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn render(report: &AggregatedReport, format: OutputFormat, config: &Config) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report.render_text(&config.property_name, &config.env_var_name),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Property => report.render_property(&config.property_name),
        OutputFormat::Env => report.render_env(&config.env_var_name),
    })
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display()))?;
    } else {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
