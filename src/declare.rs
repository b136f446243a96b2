//! Declaration component: the `parametrize` factory and its record types.
//!
//! `parametrize(argnames, cases, ids)` validates a case table eagerly, at
//! factory-call time, and returns a [`Parametrize`] decorator. Applying the
//! decorator to a [`TestMethod`](crate::suite::TestMethod) checks the
//! argnames against the method's declared parameters and attaches the
//! validated [`Parametrization`] record; the method's behavior is otherwise
//! unchanged. The record is consumed once, by suite expansion.
//!
//! All validation failures here are configuration errors surfaced before
//! any suite is built; see [`crate::errors::ParamError`] for the message
//! contract.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::ParamError;
use crate::ident::{derive_id, is_valid_id_suffix};
use crate::suite::TestMethod;
use crate::value::Value;

// =============================================================================
// CASE AND POLICY TYPES
// =============================================================================

/// One concrete argument combination, optionally carrying an explicit id.
///
/// # Examples
///
/// ```rust
/// use parametrize::Case;
/// let case = Case::new([3.into(), 9.into()]).with_id("three");
/// assert_eq!(case.id(), Some("three"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub(crate) values: Vec<Value>,
    pub(crate) id: Option<String>,
}

impl Case {
    /// Creates a case from its positional values, with no explicit id.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            values: values.into_iter().collect(),
            id: None,
        }
    }

    /// Sets the explicit id. The id grammar is checked by `parametrize`,
    /// together with every other id in the declaration.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// One element of a case table: a fixed-length tuple of values, a [`Case`],
/// or a bare value (legal only for single-argname declarations).
#[derive(Debug, Clone)]
pub enum CaseSpec {
    Values(Vec<Value>),
    Case(Case),
    Bare(Value),
}

impl From<Case> for CaseSpec {
    fn from(case: Case) -> Self {
        CaseSpec::Case(case)
    }
}

impl From<Vec<Value>> for CaseSpec {
    fn from(values: Vec<Value>) -> Self {
        CaseSpec::Values(values)
    }
}

macro_rules! impl_bare_casespec {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for CaseSpec {
                fn from(value: $ty) -> Self {
                    CaseSpec::Bare(Value::from(value))
                }
            }
        )+
    };
}

impl_bare_casespec!(bool, i32, i64, f64, &str, String);

macro_rules! impl_tuple_casespec {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for CaseSpec {
            #[allow(non_snake_case)]
            fn from(tuple: ($($name,)+)) -> Self {
                let ($($name,)+) = tuple;
                CaseSpec::Values(vec![$($name.into()),+])
            }
        }
    };
}

impl_tuple_casespec!(A);
impl_tuple_casespec!(A, B);
impl_tuple_casespec!(A, B, C);
impl_tuple_casespec!(A, B, C, D);
impl_tuple_casespec!(A, B, C, D, E);
impl_tuple_casespec!(A, B, C, D, E, F);

/// Builds a `Vec<CaseSpec>` from mixed tuple, [`Case`], and bare-value
/// literals.
///
/// # Examples
///
/// ```rust
/// use parametrize::cases;
/// let table = cases![(1, 1), (2, 4), (3, 9)];
/// assert_eq!(table.len(), 3);
/// ```
#[macro_export]
macro_rules! cases {
    ($($spec:expr),* $(,)?) => {
        vec![$($crate::CaseSpec::from($spec)),*]
    };
}

/// Per-value id callable for [`IdPolicy::PerValue`].
pub type IdFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// How absent case ids are derived.
#[derive(Clone)]
pub enum IdPolicy {
    /// Positionally aligned with the case table; `None` entries fall back
    /// to derived ids. Must match the table length exactly.
    Sequence(Vec<Option<String>>),
    /// Invoked once per value within a case; the results are joined with
    /// `_` to form the case id.
    PerValue(IdFn),
}

impl IdPolicy {
    /// A sequence policy with every entry present.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IdPolicy::Sequence(ids.into_iter().map(|s| Some(s.into())).collect())
    }

    pub fn per_value<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        IdPolicy::PerValue(Arc::new(f))
    }
}

impl fmt::Debug for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::Sequence(ids) => f.debug_tuple("Sequence").field(ids).finish(),
            IdPolicy::PerValue(_) => f.write_str("PerValue(..)"),
        }
    }
}

// =============================================================================
// ARGNAME SPECIFICATION
// =============================================================================

/// Argument-name specification: either one comma-delimited string or an
/// explicit sequence of names.
#[derive(Debug, Clone)]
pub enum ArgNames {
    Joined(String),
    Listed(Vec<String>),
}

impl ArgNames {
    /// Parses into the ordered name list. Delimited strings are split on
    /// commas with surrounding whitespace trimmed. Empty tokens survive the
    /// split (`"x,"` yields `["x", ""]`) and fail the partial-binding check
    /// at decoration time; only a wholly empty string parses to an empty
    /// sequence.
    pub(crate) fn into_names(self) -> Vec<String> {
        match self {
            ArgNames::Joined(joined) => {
                if joined.trim().is_empty() {
                    return Vec::new();
                }
                joined.split(',').map(|token| token.trim().to_string()).collect()
            }
            ArgNames::Listed(names) => names,
        }
    }
}

impl From<&str> for ArgNames {
    fn from(joined: &str) -> Self {
        ArgNames::Joined(joined.to_string())
    }
}

impl From<String> for ArgNames {
    fn from(joined: String) -> Self {
        ArgNames::Joined(joined)
    }
}

impl From<Vec<String>> for ArgNames {
    fn from(names: Vec<String>) -> Self {
        ArgNames::Listed(names)
    }
}

impl From<Vec<&str>> for ArgNames {
    fn from(names: Vec<&str>) -> Self {
        ArgNames::Listed(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArgNames {
    fn from(names: [&str; N]) -> Self {
        ArgNames::Listed(names.into_iter().map(str::to_string).collect())
    }
}

// =============================================================================
// PARAMETRIZATION RECORD
// =============================================================================

/// A case with its id fully resolved. Every id in a record is distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCase {
    pub(crate) values: Vec<Value>,
    pub(crate) id: String,
}

impl ResolvedCase {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The validated, normalized specification attached to one test method.
#[derive(Debug, Clone, PartialEq)]
pub struct Parametrization {
    pub(crate) argnames: Vec<String>,
    pub(crate) cases: Vec<ResolvedCase>,
}

impl Parametrization {
    pub fn argnames(&self) -> &[String] {
        &self.argnames
    }

    pub fn cases(&self) -> &[ResolvedCase] {
        &self.cases
    }
}

/// The decorator value returned by [`parametrize`]. Apply it to a
/// [`TestMethod`] to attach the record.
#[derive(Debug, Clone)]
pub struct Parametrize {
    record: Parametrization,
}

impl Parametrize {
    pub fn record(&self) -> &Parametrization {
        &self.record
    }

    /// Attaches the record to `method` and returns it otherwise unchanged.
    ///
    /// Fails at decoration time if an argname is not among the method's
    /// declared parameters, or if the method already carries a record.
    pub fn apply(&self, method: TestMethod) -> Result<TestMethod, ParamError> {
        for name in &self.record.argnames {
            if !method.params().iter().any(|p| p == name) {
                return Err(ParamError::UnknownArgname {
                    name: name.clone(),
                    method: method.name().to_string(),
                });
            }
        }
        if method.parametrization().is_some() {
            return Err(ParamError::Stacked {
                method: method.name().to_string(),
            });
        }
        Ok(method.with_parametrization(self.record.clone()))
    }
}

// =============================================================================
// DECLARATION FACTORY
// =============================================================================

/// Validates a case table against `argnames` and returns a [`Parametrize`]
/// decorator.
///
/// Validation happens here, not when the decorator is applied: arity of
/// every case, element kinds, id grammar, id-sequence length, and duplicate
/// resolved ids (explicit and derived ids share one namespace).
///
/// # Examples
///
/// ```rust
/// use parametrize::{cases, parametrize};
/// let decorator = parametrize("x, expected", cases![(1, 1), (2, 4)], None).unwrap();
/// assert_eq!(decorator.record().cases().len(), 2);
/// assert_eq!(decorator.record().cases()[0].id(), "0");
/// ```
pub fn parametrize<N>(
    argnames: N,
    cases: Vec<CaseSpec>,
    ids: Option<IdPolicy>,
) -> Result<Parametrize, ParamError>
where
    N: Into<ArgNames>,
{
    let argnames = argnames.into().into_names();
    if argnames.is_empty() {
        return Err(ParamError::EmptyArgnames);
    }

    if let Some(IdPolicy::Sequence(entries)) = &ids {
        if entries.len() != cases.len() {
            return Err(ParamError::IdsLengthMismatch {
                ids: entries.len(),
                cases: cases.len(),
            });
        }
        for entry in entries.iter().flatten() {
            if !is_valid_id_suffix(entry) {
                return Err(ParamError::InvalidId { id: entry.clone() });
            }
        }
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut resolved = Vec::with_capacity(cases.len());
    for (index, spec) in cases.into_iter().enumerate() {
        let case = normalize_case(index, spec, &argnames)?;
        let id = match case.id {
            Some(id) => {
                if !is_valid_id_suffix(&id) {
                    return Err(ParamError::InvalidId { id });
                }
                id
            }
            None => derive_id(index, &case.values, ids.as_ref())?,
        };
        if !seen_ids.insert(id.clone()) {
            return Err(ParamError::DuplicateId { id });
        }
        resolved.push(ResolvedCase {
            values: case.values,
            id,
        });
    }

    Ok(Parametrize {
        record: Parametrization {
            argnames,
            cases: resolved,
        },
    })
}

/// Checks one table element's kind and arity, yielding a `Case` whose id
/// may still be absent.
fn normalize_case(index: usize, spec: CaseSpec, argnames: &[String]) -> Result<Case, ParamError> {
    match spec {
        CaseSpec::Values(values) => {
            if values.len() != argnames.len() {
                return Err(ParamError::TupleArity {
                    index,
                    actual: values.len(),
                    expected: argnames.len(),
                });
            }
            Ok(Case { values, id: None })
        }
        CaseSpec::Case(case) => {
            if case.values.len() != argnames.len() {
                return Err(ParamError::CaseArity {
                    index,
                    actual: case.values.len(),
                    expected: argnames.len(),
                });
            }
            Ok(case)
        }
        CaseSpec::Bare(value) => {
            if argnames.len() == 1 {
                Ok(Case {
                    values: vec![value],
                    id: None,
                })
            } else {
                Err(ParamError::UnsupportedCase {
                    index,
                    value: value.repr(),
                })
            }
        }
    }
}
