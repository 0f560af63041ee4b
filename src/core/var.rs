use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
    ops::{BitOr, Div},
};

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------

/// A discrete random variable: an integer label (its unique ID)
/// and the number of values the variable can take.
///
/// # Notes
///
/// Equality, ordering and hashing only take the label into account,
/// two variables with the same label are assumed to have the same number of states
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Var {
    label: i64,
    states: usize,
}

impl Var {
    /// Creates a new variable
    ///
    /// # Arguments
    ///
    /// * `label` - A unique ID of a variable
    /// * `states` - A number of possible values of a variable, must be positive
    #[inline]
    pub fn new(label: i64, states: usize) -> Self {
        assert!(states > 0, "Variable x{label} must have at least one state");
        Var { label, states }
    }

    #[inline(always)]
    pub fn label(&self) -> i64 {
        self.label
    }

    #[inline(always)]
    pub fn states(&self) -> usize {
        self.states
    }
}

impl PartialEq for Var {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Var {}

impl PartialOrd for Var {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.label.cmp(&other.label)
    }
}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.label)
    }
}

// ------------------------------------------------------------------------------------------

/// A set of variables kept sorted by label
///
/// # Example
///
/// ```
/// use dairs::core::{Var, VarSet};
///
/// let x0 = Var::new(0, 2);
/// let x1 = Var::new(1, 3);
/// let ns: VarSet = [x1, x0, x1].into_iter().collect();
/// assert_eq!(ns.len(), 2);
/// assert_eq!(ns.nr_states(), 6);
/// assert_eq!(ns.vars()[0], x0);
/// assert_eq!(&ns / &x1, VarSet::from(x0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarSet {
    vars: Vec<Var>,
}

impl VarSet {
    /// Creates an empty set
    #[inline]
    pub fn new() -> Self {
        VarSet { vars: Vec::new() }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns variables ordered by label
    #[inline(always)]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Var> {
        self.vars.iter()
    }

    #[inline]
    pub fn contains(&self, var: &Var) -> bool {
        self.vars.binary_search(var).is_ok()
    }

    /// Adds a variable, returns false if it is already present
    #[inline]
    pub fn insert(&mut self, var: Var) -> bool {
        match self.vars.binary_search(&var) {
            Ok(_) => false,
            Err(pos) => {
                self.vars.insert(pos, var);
                true
            }
        }
    }

    /// Removes a variable if it is present, returns true if the set changed
    #[inline]
    pub fn remove(&mut self, var: &Var) -> bool {
        match self.vars.binary_search(var) {
            Ok(pos) => {
                self.vars.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns true if every variable of `self` is in `other`
    #[inline]
    pub fn is_subset_of(&self, other: &VarSet) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut other_iter = other.vars.iter();
        'outer: for var in &self.vars {
            for candidate in other_iter.by_ref() {
                match candidate.cmp(var) {
                    Ordering::Less => continue,
                    Ordering::Equal => continue 'outer,
                    Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    #[inline]
    pub fn is_superset_of(&self, other: &VarSet) -> bool {
        other.is_subset_of(self)
    }

    /// Returns true if both sets share at least one variable
    #[inline]
    pub fn intersects(&self, other: &VarSet) -> bool {
        self.vars.iter().any(|v| other.contains(v))
    }

    /// Number of joint states, i.e. the product of the variables' state counts
    ///
    /// # Notes
    ///
    /// Saturates at `usize::MAX`, no table of that size can be allocated anyway
    #[inline]
    pub fn nr_states(&self) -> usize {
        self.vars
            .iter()
            .fold(1usize, |acc, v| acc.saturating_mul(v.states()))
    }
}

impl From<Var> for VarSet {
    #[inline]
    fn from(var: Var) -> Self {
        VarSet { vars: vec![var] }
    }
}

impl FromIterator<Var> for VarSet {
    fn from_iter<T: IntoIterator<Item = Var>>(iter: T) -> Self {
        let mut vars: Vec<Var> = iter.into_iter().collect();
        vars.sort();
        vars.dedup();
        VarSet { vars }
    }
}

impl<'a> IntoIterator for &'a VarSet {
    type Item = &'a Var;
    type IntoIter = std::slice::Iter<'a, Var>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

impl BitOr for &VarSet {
    type Output = VarSet;

    /// Union of two sets
    fn bitor(self, rhs: Self) -> VarSet {
        let mut vars = Vec::with_capacity(self.len() + rhs.len());
        let (mut lhs_iter, mut rhs_iter) = (self.vars.iter().peekable(), rhs.vars.iter().peekable());
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(l), Some(r)) => match l.cmp(r) {
                    Ordering::Less => vars.extend(lhs_iter.next()),
                    Ordering::Greater => vars.extend(rhs_iter.next()),
                    Ordering::Equal => {
                        vars.extend(lhs_iter.next());
                        rhs_iter.next();
                    }
                },
                (Some(_), None) => vars.extend(lhs_iter.next()),
                (None, Some(_)) => vars.extend(rhs_iter.next()),
                (None, None) => break,
            }
        }
        VarSet { vars }
    }
}

impl Div<&Var> for &VarSet {
    type Output = VarSet;

    /// A copy of the set without `rhs`
    fn div(self, rhs: &Var) -> VarSet {
        let mut result = self.clone();
        result.remove(rhs);
        result
    }
}

impl Display for VarSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (pos, var) in self.vars.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", var)?;
        }
        write!(f, "}}")
    }
}
