//! Loading of configurations from JSON.  The JSON is a serialized
//! [`ConfigSpec`], any of whose fields may be omitted to use the standard
//! notation's.  Every loaded configuration is validated before it is returned.
//!
//! [`ConfigSpec`]: ../../knit_core/struct.ConfigSpec.html

use std::{fs::File, io::{self, BufReader, Read}, path::Path};

use crate::{Config, ConfigError, ConfigSpec};


/// The possible errors of loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),
    /// The JSON is malformed or does not describe a `ConfigSpec`
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The described configuration is invalid
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}


/// Load a configuration from a JSON string.
pub fn from_json_str(json: &str) -> Result<Config, LoadError> {
    let spec: ConfigSpec = serde_json::from_str(json)?;
    Ok(Config::new(spec)?)
}

/// Load a configuration from a reader of JSON.
pub fn from_json_reader<R>(reader: R) -> Result<Config, LoadError>
    where R: Read,
{
    let spec: ConfigSpec = serde_json::from_reader(reader)?;
    Ok(Config::new(spec)?)
}

/// Load a configuration from a JSON file.
pub fn from_json_path<P>(path: P) -> Result<Config, LoadError>
    where P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading configuration");
    from_json_reader(BufReader::new(File::open(path)?))
}
