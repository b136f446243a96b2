//! Case-identifier derivation and validation.
//!
//! A case id becomes part of a generated test name, so it must be a valid
//! bare identifier suffix: non-empty, ASCII letters, digits, and
//! underscores only. A suffix may begin with a digit because it is always
//! appended after an underscore (`test_square_0`).
//!
//! Derivation is deterministic: the same index, values, and policy always
//! produce the same id.

use crate::declare::IdPolicy;
use crate::errors::ParamError;
use crate::value::Value;

/// Checks a candidate id against the identifier-suffix grammar.
///
/// # Examples
///
/// ```rust
/// use parametrize::ident::is_valid_id_suffix;
/// assert!(is_valid_id_suffix("one"));
/// assert!(is_valid_id_suffix("0"));
/// assert!(is_valid_id_suffix("big_input_2"));
/// assert!(!is_valid_id_suffix(""));
/// assert!(!is_valid_id_suffix("not ok"));
/// ```
pub fn is_valid_id_suffix(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Derives the id for the case at `index`.
///
/// With a per-value policy, the callable runs once per value; absent results
/// fall back to the value's plain textual form, and the fragments are joined
/// with `_`. The joined id is validated against the suffix grammar. With a
/// sequence policy, a present entry at `index` is used verbatim (the
/// declaration component has already validated it). Otherwise the id is the
/// decimal form of `index`.
pub fn derive_id(
    index: usize,
    case_values: &[Value],
    id_policy: Option<&IdPolicy>,
) -> Result<String, ParamError> {
    match id_policy {
        Some(IdPolicy::PerValue(f)) => {
            let fragments: Vec<String> = case_values
                .iter()
                .map(|v| f(v).unwrap_or_else(|| v.to_string()))
                .collect();
            let joined = fragments.join("_");
            if !is_valid_id_suffix(&joined) {
                return Err(ParamError::InvalidId { id: joined });
            }
            Ok(joined)
        }
        Some(IdPolicy::Sequence(ids)) => match ids.get(index).and_then(|entry| entry.as_deref()) {
            Some(id) => Ok(id.to_string()),
            None => Ok(index.to_string()),
        },
        None => Ok(index.to_string()),
    }
}
