use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_BRANCH_COUNT_THRESHOLD, DEFAULT_CALL_COUNT_THRESHOLD, DEFAULT_ENV_VAR_NAME,
    DEFAULT_PROPERTY_NAME,
};

const USAGE_EXAMPLES: &str = "\
Gradle example:
  flashlight **/build/classes/java/main/
Maven example:
  flashlight **/target/classes/";

#[derive(Debug, Clone, Parser)]
#[command(name = "flashlight", version)]
#[command(about = "Scan compiled classes and list methods worth instrumenting")]
#[command(after_help = USAGE_EXAMPLES)]
pub struct Cli {
    /// Class roots (directories) or archives (jar/zip) to scan.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_CALL_COUNT_THRESHOLD)]
    pub call_threshold: u32,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_BRANCH_COUNT_THRESHOLD)]
    pub branch_threshold: u32,

    /// Additional method name to leave out of every category.
    #[arg(long = "exclude", value_name = "NAME")]
    pub excludes: Vec<String>,

    /// Do not exclude constructors, static initializers, toString, hashCode and equals.
    #[arg(long)]
    pub no_default_exclusions: bool,

    /// Exclude get*/set*/is* accessors.
    #[arg(long)]
    pub exclude_accessors: bool,

    /// Exclude synthetic lambda bodies (lambda$*).
    #[arg(long)]
    pub exclude_lambdas: bool,

    /// Also scan nested and anonymous classes.
    #[arg(long)]
    pub include_nested: bool,

    /// Warn about and skip classes that fail to decode instead of aborting.
    #[arg(long)]
    pub skip_invalid: bool,

    #[arg(long = "property", value_name = "NAME", default_value = DEFAULT_PROPERTY_NAME)]
    pub property_name: String,

    #[arg(long = "env-var", value_name = "NAME", default_value = DEFAULT_ENV_VAR_NAME)]
    pub env_var_name: String,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, value_name = "LEVEL", default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Property,
    Env,
}
