use std::collections::BTreeSet;

use crate::cli::Cli;

pub const DEFAULT_CALL_COUNT_THRESHOLD: u32 = 10;
pub const DEFAULT_BRANCH_COUNT_THRESHOLD: u32 = 5;
pub const DEFAULT_PROPERTY_NAME: &str = "otel.instrumentation.methods.include";
pub const DEFAULT_ENV_VAR_NAME: &str = "OTEL_INSTRUMENTATION_METHODS_INCLUDE";
pub const DEFAULT_EXCLUDED_METHODS: [&str; 5] =
    ["<init>", "<clinit>", "toString", "hashCode", "equals"];

const ACCESSOR_PREFIXES: [&str; 3] = ["get", "set", "is"];
const LAMBDA_PREFIX: &str = "lambda$";

/// Decides which method names are never reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFilter {
    pub excluded_names: BTreeSet<String>,
    pub exclude_accessors: bool,
    pub exclude_lambdas: bool,
}

impl MethodFilter {
    pub fn none() -> Self {
        Self {
            excluded_names: BTreeSet::new(),
            exclude_accessors: false,
            exclude_lambdas: false,
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
            || (self.exclude_accessors && ACCESSOR_PREFIXES.iter().any(|p| name.starts_with(p)))
            || (self.exclude_lambdas && name.starts_with(LAMBDA_PREFIX))
    }
}

impl Default for MethodFilter {
    fn default() -> Self {
        Self {
            excluded_names: DEFAULT_EXCLUDED_METHODS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_accessors: false,
            exclude_lambdas: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    #[default]
    Abort,
    Skip,
}

/// Settings for one run. Built once and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub call_count_threshold: u32,
    pub branch_count_threshold: u32,
    pub filter: MethodFilter,
    pub include_nested: bool,
    pub on_decode_error: DecodePolicy,
    pub property_name: String,
    pub env_var_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            call_count_threshold: DEFAULT_CALL_COUNT_THRESHOLD,
            branch_count_threshold: DEFAULT_BRANCH_COUNT_THRESHOLD,
            filter: MethodFilter::default(),
            include_nested: false,
            on_decode_error: DecodePolicy::Abort,
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
            env_var_name: DEFAULT_ENV_VAR_NAME.to_string(),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut filter = if cli.no_default_exclusions {
            MethodFilter::none()
        } else {
            MethodFilter::default()
        };
        filter.excluded_names.extend(cli.excludes.iter().cloned());
        filter.exclude_accessors = cli.exclude_accessors;
        filter.exclude_lambdas = cli.exclude_lambdas;

        Self {
            call_count_threshold: cli.call_threshold,
            branch_count_threshold: cli.branch_threshold,
            filter,
            include_nested: cli.include_nested,
            on_decode_error: if cli.skip_invalid {
                DecodePolicy::Skip
            } else {
                DecodePolicy::Abort
            },
            property_name: cli.property_name.clone(),
            env_var_name: cli.env_var_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn default_filter_excludes_object_methods_only() {
        let filter = MethodFilter::default();
        for name in DEFAULT_EXCLUDED_METHODS {
            assert!(filter.is_excluded(name));
        }
        assert!(!filter.is_excluded("getName"));
        assert!(!filter.is_excluded("lambda$run$0"));
        assert!(!filter.is_excluded("process"));
    }

    #[test]
    fn optional_prefix_exclusions() {
        let filter = MethodFilter {
            exclude_accessors: true,
            exclude_lambdas: true,
            ..MethodFilter::none()
        };
        assert!(filter.is_excluded("getName"));
        assert!(filter.is_excluded("setName"));
        assert!(filter.is_excluded("isReady"));
        assert!(filter.is_excluded("lambda$run$0"));
        assert!(!filter.is_excluded("toString"));
    }

    #[test]
    fn cli_overrides_are_applied() {
        let cli = Cli::parse_from([
            "flashlight",
            "--no-default-exclusions",
            "--exclude",
            "close",
            "--branch-threshold",
            "2",
            "--skip-invalid",
            "classes",
        ]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.branch_count_threshold, 2);
        assert_eq!(config.call_count_threshold, 10);
        assert_eq!(config.on_decode_error, DecodePolicy::Skip);
        assert!(config.filter.is_excluded("close"));
        assert!(!config.filter.is_excluded("<init>"));
    }
}
