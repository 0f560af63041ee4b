//! Construction of inference algorithms by name.

use crate::{
    bp::BP,
    core::{DaiError, DaiResult, ErrorKind, FactorGraph, InferenceAlgorithm, PropertySet},
};

/// Names of the algorithms [`new_inference_algorithm`] knows about
pub const ALGORITHM_NAMES: [&str; 1] = [BP::NAME];

/// Creates an inference algorithm
///
/// # Arguments
///
/// * `name` - A name of an algorithm, e.g. `BP`
/// * `fg` - A factor graph
/// * `opts` - Properties of an algorithm
///
/// # Example
///
/// ```
/// use dairs::algorithms::new_inference_algorithm;
/// use dairs::core::{ErrorKind, FactorGraph, PropertySet};
///
/// let fg = FactorGraph::new(Vec::new()).unwrap();
/// let err = new_inference_algorithm("XYZ", fg, &PropertySet::new()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::UnknownAlgorithm);
/// ```
pub fn new_inference_algorithm(
    name: &str,
    fg: FactorGraph,
    opts: &PropertySet,
) -> DaiResult<Box<dyn InferenceAlgorithm>> {
    match name {
        BP::NAME => Ok(Box::new(BP::new(fg, opts)?)),
        other => Err(DaiError::new(
            ErrorKind::UnknownAlgorithm,
            format!("`{}` is not one of {:?}", other, ALGORITHM_NAMES),
        )),
    }
}

/// Creates an inference algorithm from a string `NAME[key=value,...]`
///
/// # Example
///
/// ```
/// use dairs::algorithms::new_inference_algorithm_from_string;
/// use dairs::core::{Factor, FactorGraph, Var};
///
/// let fg = FactorGraph::new(vec![Factor::uniform(Var::new(0, 2).into())]).unwrap();
/// let mut alg = new_inference_algorithm_from_string(
///     "BP[maxiter=10,tol=1e-9,logdomain=1,updates=SEQFIX]",
///     fg,
/// )
/// .unwrap();
/// alg.run().unwrap();
/// assert!(alg.identify().starts_with("BP["));
/// ```
pub fn new_inference_algorithm_from_string(
    description: &str,
    fg: FactorGraph,
) -> DaiResult<Box<dyn InferenceAlgorithm>> {
    let (name, opts) = parse_algorithm_string(description)?;
    new_inference_algorithm(name, fg, &opts)
}

/// Splits a string `NAME[key=value,...]` into the name and its properties
///
/// # Example
///
/// ```
/// use dairs::algorithms::parse_algorithm_string;
///
/// let (name, opts) = parse_algorithm_string("BP[maxiter=10]").unwrap();
/// assert_eq!(name, "BP");
/// assert_eq!(opts.get("maxiter"), Some("10"));
/// assert!(parse_algorithm_string("BP").unwrap().1.is_empty());
/// ```
pub fn parse_algorithm_string(description: &str) -> DaiResult<(&str, PropertySet)> {
    let description = description.trim();
    match description.find('[') {
        Some(pos) => Ok((description[..pos].trim(), description[pos..].parse()?)),
        None => Ok((description, PropertySet::new())),
    }
}
