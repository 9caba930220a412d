use std::fs::read_to_string;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::errors::{IndexError, Result};
use crate::persist::IndexFormat;

///
/// Settings for building and storing an index, usually read from a `.toml` file:
///
/// ```toml
/// seed = 42
/// format = "bincode"
/// ```
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct IndexConfig {
    /// Seed for the randomized insertion. Unset means OS entropy.
    pub seed: Option<u64>,
    /// Storage format. Unset means infer from the index file name.
    pub format: Option<IndexFormat>,
}

impl TryFrom<&Path> for IndexConfig {
    type Error = IndexError;

    ///
    /// Read a config file.
    ///
    /// # Arguments
    /// - path: Path to the config file (a .toml file).
    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config: IndexConfig = toml::from_str(&toml_str)?;

        Ok(config)
    }
}

impl IndexConfig {
    pub fn new(seed: Option<u64>, format: Option<IndexFormat>) -> IndexConfig {
        IndexConfig { seed, format }
    }

    /// The random source used for insertion.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
