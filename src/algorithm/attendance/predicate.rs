//! Per-field term matching and boolean reduction

use super::vocabulary::TermSet;

/// Binary operator used to fold a group of flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    #[inline]
    #[must_use]
    pub const fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
        }
    }
}

/// Left fold of `values` with `op`, starting from the first element.
///
/// Returns `None` for an empty sequence; there is no identity fallback, so
/// callers decide what a zero-width group means.
#[inline]
pub fn reduce_bools<I>(op: BoolOp, values: I) -> Option<bool>
where
    I: IntoIterator<Item = bool>,
{
    let mut values = values.into_iter();
    let first = values.next()?;
    Some(values.fold(first, |acc, v| op.apply(acc, v)))
}

/// Check whether a field value is one of `terms`.
///
/// A present value matches when it equals any term exactly; `negate` then
/// flips that outcome. An absent value yields `include_missing` and is never
/// negated.
#[inline]
#[must_use]
pub fn string_in_terms(
    value: Option<&str>,
    terms: &TermSet,
    include_missing: bool,
    negate: bool,
) -> bool {
    match value {
        Some(value) => {
            let matched = terms.contains(value);
            if negate { !matched } else { matched }
        }
        None => include_missing,
    }
}
