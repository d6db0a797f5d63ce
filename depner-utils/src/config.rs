use std::io::Read;
use std::path::Path;

use failure::{err_msg, Error};
use serde_derive::{Deserialize, Serialize};

use crate::Result;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub parser: Parser,
    pub train: Train,
    pub model: Model,
}

impl Config {
    /// Make configuration paths relative to the configuration file.
    pub fn relativize_paths<P>(&mut self, config_path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let config_path = config_path.as_ref();

        self.model.filename = relativize_path(config_path, &self.model.filename)?;
        if let Some(ref weights) = self.model.weights {
            self.model.weights = Some(relativize_path(config_path, weights)?);
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Parser {
    /// The transition system: `joint` or `labeling`.
    pub system: String,

    /// Re-encode IOB tags as IOBES.
    #[serde(default)]
    pub iobes: bool,

    /// Require exactly one token to be attached to the root.
    #[serde(default = "default_true")]
    pub single_root: bool,

    /// Keep the dependency relations of the corpus.
    #[serde(default)]
    pub relations: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub iterations: usize,

    /// Evaluate on the development data every `eval_interval` epochs,
    /// `0` disables evaluation.
    #[serde(default = "default_eval_interval")]
    pub eval_interval: usize,

    #[serde(default)]
    pub seed: u64,

    #[serde(default = "default_true")]
    pub shuffle: bool,

    /// Write the model whenever its development score improves, rather
    /// than the model of the last epoch.
    #[serde(default)]
    pub save_best: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub filename: String,

    /// File to write the averaged weights to.
    #[serde(default)]
    pub weights: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_eval_interval() -> usize {
    1
}

fn relativize_path(config_path: &Path, filename: &str) -> Result<String> {
    if filename.is_empty() {
        return Ok(filename.to_owned());
    }

    let path = Path::new(filename);

    // Don't touch absolute paths.
    if path.is_absolute() {
        return Ok(filename.to_owned());
    }

    let abs_config_path = config_path.canonicalize()?;
    Ok(abs_config_path
        .parent()
        .ok_or_else(|| {
            err_msg(format!(
                "Cannot get parent path of the configuration file: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .join(path)
        .to_str()
        .ok_or_else(|| {
            err_msg(format!(
                "Cannot convert parent path to string: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .to_owned())
}

pub trait TomlRead
where
    Self: Sized,
{
    fn from_toml_read<R>(read: R) -> Result<Self>
    where
        R: Read;
}

impl TomlRead for Config {
    fn from_toml_read<R>(mut read: R) -> Result<Self>
    where
        R: Read,
    {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let config: Config = toml::from_str(&data).map_err(Error::from)?;

        match config.parser.system.as_str() {
            "joint" | "labeling" => Ok(config),
            system => Err(err_msg(format!("Unsupported transition system: {}", system))),
        }
    }
}
