//! # Folder Naming
//!
//! An experiment folder's name carries its parameters. A `FolderNaming`
//! decides whether a directory name is a candidate at all and, if it is,
//! decodes its parameters.
//!
//! | Naming            | Example                                | Params        |
//! |-------------------|----------------------------------------|---------------|
//! | `DimensionNaming` | `10D`                                  | `u32`         |
//! | `TspNaming`       | `results_50_500_0.8_0.1_1000_0.99_50`  | `TspParams`   |
//! | `SuffixNaming`    | `PSO_data`                             | `String`      |

use std::fmt::{self, Debug};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{parse_error, AnalysisError, Result};

/// Predicate and decoder for experiment folder names.
pub trait FolderNaming: Debug + Send + Sync {
    /// Parameters decoded from a matching name.
    type Params: Debug + Clone + Send + Sync;

    /// Returns `None` if `name` is not a candidate, otherwise the decoded
    /// parameters or the reason they could not be decoded.
    fn decode(&self, name: &str) -> Option<Result<Self::Params>>;
}

/// Folders named `<int>D`, e.g. `2D` or `30D`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionNaming;

impl FolderNaming for DimensionNaming {
    type Params = u32;

    fn decode(&self, name: &str) -> Option<Result<u32>> {
        let digits = name.strip_suffix('D')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(
            digits
                .parse::<u32>()
                .map_err(|_| parse_error(digits, "a dimension", name)),
        )
    }
}

/// Folders named `<stem><suffix>`, decoded to the stem, e.g. `GA_data` to `GA`.
#[derive(Debug, Clone)]
pub struct SuffixNaming {
    suffix: String,
}

impl SuffixNaming {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for SuffixNaming {
    fn default() -> Self {
        Self::new("_data")
    }
}

impl FolderNaming for SuffixNaming {
    type Params = String;

    fn decode(&self, name: &str) -> Option<Result<String>> {
        name.strip_suffix(self.suffix.as_str())
            .filter(|stem| !stem.is_empty())
            .map(|stem| Ok(stem.to_string()))
    }
}

/// Parameters of one TSP experiment, as encoded in its folder name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TspParams {
    pub pop_size: u32,
    pub generations: u32,
    pub cross_rate: f64,
    pub mutation_rate: f64,
    pub initial_temp: f64,
    pub cooling_rate: f64,
    pub cities: u32,
}

impl TspParams {
    pub const ARITY: usize = 7;

    /// Decodes an underscore-delimited tuple such as `50_500_0.8_0.1_1000_0.99_50`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Parse` if the tuple does not have seven fields
    /// or a field does not parse as its type.
    pub fn parse(encoded: &str) -> Result<Self> {
        let fields: Vec<&str> = encoded.split('_').collect();
        if fields.len() != Self::ARITY {
            return Err(AnalysisError::Parse(format!(
                "{:?}: expected {} parameters, found {}",
                encoded,
                Self::ARITY,
                fields.len()
            )));
        }

        fn field<T: FromStr>(token: &str, what: &str, encoded: &str) -> Result<T> {
            token
                .parse::<T>()
                .map_err(|_| parse_error(token, what, format!("{:?}", encoded)))
        }

        Ok(Self {
            pop_size: field(fields[0], "a population size", encoded)?,
            generations: field(fields[1], "a generation count", encoded)?,
            cross_rate: field(fields[2], "a crossover rate", encoded)?,
            mutation_rate: field(fields[3], "a mutation rate", encoded)?,
            initial_temp: field(fields[4], "an initial temperature", encoded)?,
            cooling_rate: field(fields[5], "a cooling rate", encoded)?,
            cities: field(fields[6], "a city count", encoded)?,
        })
    }
}

impl fmt::Display for TspParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}_{}_{}",
            self.pop_size,
            self.generations,
            self.cross_rate,
            self.mutation_rate,
            self.initial_temp,
            self.cooling_rate,
            self.cities
        )
    }
}

/// Folders named `<prefix><pop>_<gens>_<cr>_<mr>_<t0>_<cool>_<cities>`.
#[derive(Debug, Clone)]
pub struct TspNaming {
    prefix: String,
}

impl TspNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TspNaming {
    fn default() -> Self {
        Self::new("results_")
    }
}

impl FolderNaming for TspNaming {
    type Params = TspParams;

    fn decode(&self, name: &str) -> Option<Result<TspParams>> {
        let encoded = name.strip_prefix(self.prefix.as_str())?;
        Some(TspParams::parse(encoded))
    }
}
