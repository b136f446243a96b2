//! Parametrized test-case expansion for suite-based test registries.
//!
//! A test method is declared once with a table of named argument
//! combinations; building the enclosing suite replaces it with one
//! independently discoverable test per case. Declaration
//! ([`parametrize`]) validates eagerly; expansion
//! ([`SuiteBuilder::build`]) installs the generated tests and surfaces
//! every misconfiguration before anything runs.

pub use crate::declare::{
    parametrize, ArgNames, Case, CaseSpec, IdPolicy, Parametrization, Parametrize, ResolvedCase,
};
pub use crate::errors::ParamError;
pub use crate::suite::{
    Bindings, GeneratedTest, Suite, SuiteBuilder, TestFailure, TestFn, TestMethod,
};
pub use crate::value::Value;

pub mod declare;
pub mod errors;
pub mod ident;
pub mod runner;
pub mod suite;
pub mod value;
