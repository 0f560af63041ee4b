use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::error::{DaiError, DaiResult, ErrorKind};

/// A set of named options of an inference algorithm. Values are kept
/// as strings and parsed on demand by the algorithm that consumes them.
///
/// # Notes
///
/// The textual form is `[key1=value1,key2=value2]`
///
/// # Example
///
/// ```
/// use dairs::core::PropertySet;
///
/// let props: PropertySet = "[maxiter=100,tol=1e-9]".parse().unwrap();
/// assert_eq!(props.get_as::<usize>("maxiter").unwrap(), Some(100));
/// assert_eq!(props.get("updates"), None);
/// assert_eq!(props.to_string(), "[maxiter=100,tol=1e-9]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    props: BTreeMap<String, String>,
}

impl PropertySet {
    #[inline]
    pub fn new() -> Self {
        PropertySet {
            props: BTreeMap::new(),
        }
    }

    /// Sets a property, overriding a previous value
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.props.insert(key.into(), value.to_string());
        self
    }

    /// Builder-style version of [`PropertySet::set`]
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Copies all properties of `other` into `self`, values of `other` win
    #[inline]
    pub fn merge(&mut self, other: PropertySet) -> &mut Self {
        self.props.extend(other.props);
        self
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(|x| x.as_str())
    }

    #[inline]
    pub fn has_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(|x| x.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Parses an optional property
    pub fn get_as<T: FromStr>(&self, key: &str) -> DaiResult<Option<T>> {
        match self.props.get(key) {
            None => Ok(None),
            Some(value) => value.trim().parse().map(Some).map_err(|_| {
                DaiError::new(
                    ErrorKind::MalformedProperty,
                    format!("cannot parse value `{}` of property `{}`", value, key),
                )
            }),
        }
    }

    /// Parses a mandatory property
    pub fn require<T: FromStr>(&self, key: &str) -> DaiResult<T> {
        self.get_as(key)?.ok_or_else(|| {
            DaiError::new(
                ErrorKind::PropertyNotSpecified,
                format!("property `{}` is mandatory", key),
            )
        })
    }

    /// Fails on the first key that is not in `allowed`
    pub fn check_keys(&self, allowed: &[&str]) -> DaiResult<()> {
        match self.keys().find(|key| !allowed.contains(key)) {
            Some(key) => Err(DaiError::new(
                ErrorKind::UnknownPropertyType,
                format!("unknown property `{}`, expected one of {:?}", key, allowed),
            )),
            None => Ok(()),
        }
    }
}

impl Display for PropertySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (pos, (key, value)) in self.props.iter().enumerate() {
            if pos > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "]")
    }
}

impl FromStr for PropertySet {
    type Err = DaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |details: String| DaiError::new(ErrorKind::MalformedProperty, details);
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|x| x.strip_suffix(']'))
            .ok_or_else(|| malformed(format!("`{}` is not enclosed in brackets", s)))?;
        let mut props = PropertySet::new();
        for item in inner.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| malformed(format!("`{}` is not of the form key=value", item)))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed(format!("`{}` has an empty key", item)));
            }
            props.set(key, value.trim());
        }
        Ok(props)
    }
}
