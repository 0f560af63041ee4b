use std::{error::Error, fmt::Display};

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Kinds of errors that could appear while configuring or querying inference algorithms
pub enum ErrorKind {
    /// An algorithm does not support a requested query
    NotImplemented,
    /// An algorithm name is not known to the factory
    UnknownAlgorithm,
    /// A property key is not recognized by an algorithm
    UnknownPropertyType,
    /// A property value could not be parsed or is out of range
    MalformedProperty,
    /// An enumeration value is not one of the allowed names
    UnknownEnumValue,
    CannotReadFile,
    CannotWriteFile,
    InvalidFactorGraphFile,
    /// A mandatory property is missing
    PropertyNotSpecified,
    MultipleUndo,
    GraphNotConnected,
    ImpossibleTypecast,
    /// An invariant violation, it is a bug
    InternalError,
    /// A vector sums to zero and can not be normalized
    NotNormalizable,
    /// A requested belief is not representable by the local beliefs of an algorithm
    BeliefNotAvailable,
    /// A variable (or other object) is not present where it was looked up
    ObjectNotFound,
    /// A table size does not match the state space of its variables
    DimensionMismatch,
}

impl ErrorKind {
    /// Returns a human readable description of an error kind
    #[inline]
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::NotImplemented => "This feature is not implemented",
            ErrorKind::UnknownAlgorithm => "Unknown inference algorithm",
            ErrorKind::UnknownPropertyType => "Unknown property type",
            ErrorKind::MalformedProperty => "Malformed property",
            ErrorKind::UnknownEnumValue => "Unknown enum value",
            ErrorKind::CannotReadFile => "Cannot read file",
            ErrorKind::CannotWriteFile => "Cannot write file",
            ErrorKind::InvalidFactorGraphFile => "Invalid factor graph file",
            ErrorKind::PropertyNotSpecified => "Not all mandatory properties specified",
            ErrorKind::MultipleUndo => "Multiple undo levels unsupported",
            ErrorKind::GraphNotConnected => "Factor graph is not connected",
            ErrorKind::ImpossibleTypecast => "Impossible typecast",
            ErrorKind::InternalError => "Internal error",
            ErrorKind::NotNormalizable => "Quantity not normalizable",
            ErrorKind::BeliefNotAvailable => "Quantity not representable by local beliefs",
            ErrorKind::ObjectNotFound => "Object not found",
            ErrorKind::DimensionMismatch => "Dimension mismatch",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An error returned by factor graphs, cluster graphs and inference algorithms
pub struct DaiError {
    /// Kind of an error
    pub kind: ErrorKind,

    /// Details about the particular failure
    pub context: String,
}

impl DaiError {
    #[inline]
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        DaiError {
            kind,
            context: context.into(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for DaiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.context)
        }
    }
}

impl Error for DaiError {}

impl From<ErrorKind> for DaiError {
    fn from(kind: ErrorKind) -> Self {
        DaiError::new(kind, "")
    }
}

/// Result type of the crate's fallible methods
pub type DaiResult<T> = Result<T, DaiError>;
