//! Unified configuration-error type for the parametrization pipeline.
//!
//! Every misuse of the declaration or expansion API surfaces as a
//! [`ParamError`], raised synchronously at declaration time or at suite
//! build time, never during a test run. Message texts are part of the
//! crate's contract: tests match on them verbatim, so changing one is a
//! breaking change.
//!
//! Failures raised by a test body itself are not configuration errors; they
//! travel as [`crate::suite::TestFailure`] and are never converted into
//! `ParamError`.

use miette::Diagnostic;
use thiserror::Error;

/// Configuration errors raised by `parametrize` declaration and suite
/// expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParamError {
    #[error("argnames must contain at least one element")]
    #[diagnostic(code(parametrize::empty_argnames))]
    EmptyArgnames,

    #[error("ids must have the same length as argvalues")]
    #[diagnostic(
        code(parametrize::ids_length),
        help("supply exactly one id entry per case; entries left as None fall back to derived ids")
    )]
    IdsLengthMismatch { ids: usize, cases: usize },

    #[error("tuple at index {index} has wrong number of arguments ({actual} != {expected})")]
    #[diagnostic(code(parametrize::tuple_arity))]
    TupleArity {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("case at index {index} has wrong number of arguments ({actual} != {expected})")]
    #[diagnostic(code(parametrize::case_arity))]
    CaseArity {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("case at index {index} is not a tuple or case instance: {value}")]
    #[diagnostic(
        code(parametrize::unsupported_case),
        help("bare values are only accepted when exactly one argname is declared")
    )]
    UnsupportedCase { index: usize, value: String },

    #[error("id must be a valid identifier suffix: {id:?}")]
    #[diagnostic(
        code(parametrize::invalid_id),
        help("valid suffixes are non-empty and contain only ASCII letters, digits, and underscores")
    )]
    InvalidId { id: String },

    #[error("duplicate case id {id:?}")]
    #[diagnostic(code(parametrize::duplicate_id))]
    DuplicateId { id: String },

    #[error("duplicate test name {name} in {suite}")]
    #[diagnostic(code(parametrize::duplicate_test_name))]
    DuplicateTestName { name: String, suite: String },

    #[error("argname {name:?} is not accepted by test method {method:?}")]
    #[diagnostic(code(parametrize::unknown_argname))]
    UnknownArgname { name: String, method: String },

    #[error("parametrize cannot be stacked on {method}")]
    #[diagnostic(
        code(parametrize::stacked),
        help("apply parametrize exactly once per test method")
    )]
    Stacked { method: String },

    #[error("parametrize must be the outermost decorator on {method}")]
    #[diagnostic(code(parametrize::not_outermost))]
    NotOutermost { method: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // The fixed messages below are matched verbatim by downstream tests.
    #[test]
    fn messages_are_stable() {
        assert_eq!(
            ParamError::EmptyArgnames.to_string(),
            "argnames must contain at least one element"
        );
        assert_eq!(
            ParamError::TupleArity {
                index: 1,
                actual: 3,
                expected: 2
            }
            .to_string(),
            "tuple at index 1 has wrong number of arguments (3 != 2)"
        );
        assert_eq!(
            ParamError::InvalidId {
                id: "not ok".to_string()
            }
            .to_string(),
            "id must be a valid identifier suffix: \"not ok\""
        );
        assert_eq!(
            ParamError::DuplicateTestName {
                name: "test_square_0".to_string(),
                suite: "MathSuite".to_string()
            }
            .to_string(),
            "duplicate test name test_square_0 in MathSuite"
        );
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = ParamError::DuplicateId {
            id: "one".to_string(),
        };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("parametrize::duplicate_id"));
    }
}
