use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Node settings read from the environment (after `dotenvy` has loaded `.env`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// `BLOCKCHAIN_PARAMS`; bundled dev params when unset.
    pub params_path: Option<PathBuf>,
    /// `BLOCKS_MINTED_ADJUSTMENT_SOURCE`; bundled dataset when unset.
    pub dataset_path: Option<PathBuf>,
    /// `ADJUSTMENT_STRICT_DIGEST`
    pub strict_digest: bool,
    /// `SIMULATE_BLOCKS`
    pub simulate_blocks: Option<u64>,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        let strict_digest = match lookup("ADJUSTMENT_STRICT_DIGEST") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "" | "0" | "false" | "no" => false,
                "1" | "true" | "yes" => true,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        name: "ADJUSTMENT_STRICT_DIGEST",
                        value: v,
                    });
                }
            },
        };

        let simulate_blocks = match lookup("SIMULATE_BLOCKS") {
            None => None,
            Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "SIMULATE_BLOCKS",
                value: v.clone(),
            })?),
        };

        Ok(Self {
            params_path: path("BLOCKCHAIN_PARAMS"),
            dataset_path: path("BLOCKS_MINTED_ADJUSTMENT_SOURCE"),
            strict_digest,
            simulate_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(NodeConfig::from_lookup(lookup(&[])).unwrap(), NodeConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = NodeConfig::from_lookup(lookup(&[
            ("BLOCKCHAIN_PARAMS", "/etc/node/params.json"),
            ("BLOCKS_MINTED_ADJUSTMENT_SOURCE", "adj.json"),
            ("ADJUSTMENT_STRICT_DIGEST", "TRUE"),
            ("SIMULATE_BLOCKS", " 12 "),
        ]))
        .unwrap();
        assert_eq!(cfg.params_path, Some(PathBuf::from("/etc/node/params.json")));
        assert_eq!(cfg.dataset_path, Some(PathBuf::from("adj.json")));
        assert!(cfg.strict_digest);
        assert_eq!(cfg.simulate_blocks, Some(12));
    }

    #[test]
    fn blank_paths_fall_back_to_bundled() {
        let cfg = NodeConfig::from_lookup(lookup(&[("BLOCKCHAIN_PARAMS", "  ")])).unwrap();
        assert_eq!(cfg.params_path, None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            NodeConfig::from_lookup(lookup(&[("ADJUSTMENT_STRICT_DIGEST", "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            NodeConfig::from_lookup(lookup(&[("SIMULATE_BLOCKS", "-1")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
