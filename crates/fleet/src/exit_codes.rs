//! Exit codes for the CLI

use fleet_core::{FleetError, GitError};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Target discovery error
pub const DISCOVERY_ERROR: i32 = 4;

/// Map a command failure to the process exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<FleetError>() {
        return match err {
            FleetError::Config(_) => CONFIG_ERROR,
            FleetError::Discovery(_) => DISCOVERY_ERROR,
        };
    }
    if err.downcast_ref::<GitError>().is_some() {
        GIT_ERROR
    } else {
        ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::config::load_config;
    use fleet_core::SourceDiscovery;

    #[test]
    fn test_exit_code_mapping() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("fleet.toml");
        std::fs::write(&path, "[exec]\ncommand = \"\"\n").unwrap();
        let config: anyhow::Error = load_config(&path).unwrap_err().into();
        assert_eq!(for_error(&config), CONFIG_ERROR);

        let discovery: anyhow::Error = SourceDiscovery::new(temp.path(), Default::default())
            .discover()
            .unwrap_err()
            .into();
        assert_eq!(for_error(&discovery), DISCOVERY_ERROR);

        let git: anyhow::Error = GitError::NoUpstream("refs/heads/main".to_string()).into();
        assert_eq!(for_error(&git), GIT_ERROR);

        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
