use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::{DaiError, DaiResult, ErrorKind, PropertySet};

/// Order in which belief propagation messages are updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    /// Sequential updates in a fixed order
    #[serde(rename = "SEQFIX")]
    SeqFix,
    /// Sequential updates in an order reshuffled every pass
    #[serde(rename = "SEQRND")]
    SeqRnd,
    /// Sequential updates of the message with the largest residual
    #[serde(rename = "SEQMAX")]
    SeqMax,
    /// All messages are computed from the previous ones and updated at once
    #[serde(rename = "PARALL")]
    Parall,
}

impl UpdateType {
    pub const NAMES: [&'static str; 4] = ["SEQFIX", "SEQRND", "SEQMAX", "PARALL"];

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            UpdateType::SeqFix => "SEQFIX",
            UpdateType::SeqRnd => "SEQRND",
            UpdateType::SeqMax => "SEQMAX",
            UpdateType::Parall => "PARALL",
        }
    }
}

impl Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UpdateType {
    type Err = DaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SEQFIX" => Ok(UpdateType::SeqFix),
            "SEQRND" => Ok(UpdateType::SeqRnd),
            "SEQMAX" => Ok(UpdateType::SeqMax),
            "PARALL" => Ok(UpdateType::Parall),
            other => Err(DaiError::new(
                ErrorKind::UnknownEnumValue,
                format!("`{}` is not one of {:?}", other, UpdateType::NAMES),
            )),
        }
    }
}

// ------------------------------------------------------------------------------------------

/// Parameters of belief propagation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BPProperties {
    /// Verbosity of logging, 0 is silent
    pub verbose: usize,

    /// Maximal number of passes
    pub maxiter: usize,

    /// Convergence threshold on the maximal change of single variable beliefs
    pub tol: f64,

    /// Whether messages are kept as logarithms
    pub logdomain: bool,

    /// Damping of message updates in [0, 1), 0 means no damping
    pub damping: f64,

    /// Message update schedule
    pub updates: UpdateType,
}

impl BPProperties {
    /// Keys recognized in a property set
    pub const KEYS: [&'static str; 6] = [
        "verbose",
        "maxiter",
        "tol",
        "logdomain",
        "damping",
        "updates",
    ];

    /// Reads parameters from a property set
    ///
    /// # Notes
    ///
    /// `maxiter`, `tol`, `logdomain` and `updates` are mandatory,
    /// `verbose` and `damping` default to zero
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::bp::{BPProperties, UpdateType};
    /// use dairs::core::{ErrorKind, PropertySet};
    ///
    /// let opts: PropertySet = "[maxiter=100,tol=1e-9,logdomain=0,updates=SEQMAX]".parse().unwrap();
    /// let props = BPProperties::from_property_set(&opts).unwrap();
    /// assert_eq!(props.updates, UpdateType::SeqMax);
    /// assert_eq!(props.damping, 0.);
    ///
    /// let bad = opts.clone().with("updates", "SEQ");
    /// let err = BPProperties::from_property_set(&bad).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
    /// ```
    pub fn from_property_set(opts: &PropertySet) -> DaiResult<Self> {
        opts.check_keys(&Self::KEYS)?;
        let verbose = opts.get_as("verbose")?.unwrap_or(0);
        let maxiter = opts.require("maxiter")?;
        let tol: f64 = opts.require("tol")?;
        let logdomain = match opts.get("logdomain") {
            Some(value) => parse_bool("logdomain", value)?,
            None => {
                return Err(DaiError::new(
                    ErrorKind::PropertyNotSpecified,
                    "property `logdomain` is mandatory",
                ))
            }
        };
        let damping: f64 = opts.get_as("damping")?.unwrap_or(0f64);
        let updates = match opts.get("updates") {
            Some(value) => value.parse()?,
            None => {
                return Err(DaiError::new(
                    ErrorKind::PropertyNotSpecified,
                    "property `updates` is mandatory",
                ))
            }
        };
        if !(tol >= 0f64 && tol.is_finite()) {
            return Err(DaiError::new(
                ErrorKind::MalformedProperty,
                format!("tol must be a non-negative number, got {}", tol),
            ));
        }
        if !(0f64..1f64).contains(&damping) {
            return Err(DaiError::new(
                ErrorKind::MalformedProperty,
                format!("damping must lie in [0, 1), got {}", damping),
            ));
        }
        Ok(BPProperties {
            verbose,
            maxiter,
            tol,
            logdomain,
            damping,
            updates,
        })
    }

    /// Writes parameters into a property set
    pub fn to_property_set(&self) -> PropertySet {
        PropertySet::new()
            .with("verbose", self.verbose)
            .with("maxiter", self.maxiter)
            .with("tol", self.tol)
            .with("logdomain", u8::from(self.logdomain))
            .with("damping", self.damping)
            .with("updates", self.updates)
    }
}

impl Display for BPProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_property_set())
    }
}

#[inline]
fn parse_bool(key: &str, value: &str) -> DaiResult<bool> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(DaiError::new(
            ErrorKind::MalformedProperty,
            format!("cannot parse value `{}` of property `{}` as a boolean", other, key),
        )),
    }
}
