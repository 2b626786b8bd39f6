//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "fleet.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "fleet.yaml";

/// Program run when none is given
pub const DEFAULT_COMMAND: &str = "git";

/// Default number of parallel jobs
pub const DEFAULT_JOBS: i32 = 100;

/// Default warm-up before the progress indicator appears
pub const DEFAULT_PROGRESS_DELAY_MS: u64 = 1000;

/// Default make program
pub const DEFAULT_MAKE: &str = "make";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".fleet.toml",
        ".fleet.yaml",
    ]
}
