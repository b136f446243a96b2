//! Expansion component: suites, test methods, and generated tests.
//!
//! A [`SuiteBuilder`] plays the role of a test-class body: methods are
//! registered in declaration order, and [`SuiteBuilder::build`] is the
//! one-shot construction hook that materializes the suite. Building scans
//! the member table for attached [`Parametrization`] records, removes each
//! annotated member, and installs one [`GeneratedTest`] per case under the
//! derived name `{base}_{id}`. A failed build yields no suite at all.
//!
//! Generated tests are immutable once installed. Each invocation receives
//! its own bindings captured by value at expansion time, so a parallel
//! runner may invoke them concurrently without shared state.

use std::fmt;
use std::sync::Arc;

use crate::declare::Parametrization;
use crate::errors::ParamError;
use crate::value::Value;

// =============================================================================
// FAILURES AND BINDINGS
// =============================================================================

/// A test-body failure: a message plus supplementary notes appended after
/// the fact. Parameter context arrives as a note, so the original failure
/// value is re-raised unchanged apart from the appended text.
#[derive(Debug, Clone, PartialEq)]
pub struct TestFailure {
    message: String,
    notes: Vec<String>,
}

impl TestFailure {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Appends a supplementary note. Notes render after the message, each
    /// on its own line.
    pub fn note<S: Into<String>>(&mut self, note: S) {
        self.notes.push(note.into());
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for note in &self.notes {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TestFailure {}

impl From<String> for TestFailure {
    fn from(message: String) -> Self {
        TestFailure::new(message)
    }
}

impl From<&str> for TestFailure {
    fn from(message: &str) -> Self {
        TestFailure::new(message)
    }
}

/// Ordered name-to-value bindings for one invocation. Order follows the
/// declared argnames, which keeps the rendered context stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(Vec<(String, Value)>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips argnames with one case's values. Lengths are equal by record
    /// invariant.
    pub(crate) fn zip(names: &[String], values: &[Value]) -> Self {
        Bindings(
            names
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect(),
        )
    }

    /// Builds bindings from explicit pairs, for call-time extras.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Bindings(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the bindings as `key=value, key=value` in declaration order,
    /// values in representation form.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.repr()))
            .collect();
        parts.join(", ")
    }

    /// Appends call-time extras after the bound parameters. A name bound by
    /// the case may not be supplied again at call time.
    pub fn merged(&self, extra: &Bindings) -> Result<Bindings, TestFailure> {
        let mut merged = self.0.clone();
        for (name, value) in &extra.0 {
            if self.get(name).is_some() {
                return Err(TestFailure::new(format!(
                    "got multiple values for argument {name:?}"
                )));
            }
            merged.push((name.clone(), value.clone()));
        }
        Ok(Bindings(merged))
    }
}

// =============================================================================
// TEST METHODS
// =============================================================================

/// Test body type: receives the bound parameters, reports failure by value.
pub type TestFn = Arc<dyn Fn(&Bindings) -> Result<(), TestFailure> + Send + Sync>;

/// A declared test method: its name, its declared parameter names (the
/// signature used by the partial-binding check), and its body.
///
/// Decorators are modeled as method-to-method transforms.
/// [`TestMethod::wrapping`] layers a new body over an inner method while
/// preserving its metadata, which is what lets suite expansion detect a
/// parametrize annotation buried under another decorator.
#[derive(Clone)]
pub struct TestMethod {
    name: String,
    params: Vec<String>,
    body: TestFn,
    parametrization: Option<Parametrization>,
    wrapped: Option<Box<TestMethod>>,
}

impl TestMethod {
    pub fn new<N, F>(name: N, params: &[&str], body: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Bindings) -> Result<(), TestFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Arc::new(body),
            parametrization: None,
            wrapped: None,
        }
    }

    /// Wraps `inner` with a new body, carrying over name, parameters, and
    /// any attached record (the metadata-preserving wrap of a well-behaved
    /// decorator). The inner method stays reachable for the
    /// outermost-decorator check at build time.
    pub fn wrapping<F>(inner: TestMethod, body: F) -> Self
    where
        F: Fn(&Bindings) -> Result<(), TestFailure> + Send + Sync + 'static,
    {
        Self {
            name: inner.name.clone(),
            params: inner.params.clone(),
            body: Arc::new(body),
            parametrization: inner.parametrization.clone(),
            wrapped: Some(Box::new(inner)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn parametrization(&self) -> Option<&Parametrization> {
        self.parametrization.as_ref()
    }

    /// The wrapped inner method, if this one was built by [`Self::wrapping`].
    pub fn wrapped(&self) -> Option<&TestMethod> {
        self.wrapped.as_deref()
    }

    /// Invokes the body directly, outside any suite.
    pub fn call(&self, bindings: &Bindings) -> Result<(), TestFailure> {
        (self.body)(bindings)
    }

    pub(crate) fn with_parametrization(mut self, record: Parametrization) -> Self {
        self.parametrization = Some(record);
        self
    }
}

impl fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("parametrized", &self.parametrization.is_some())
            .field("wrapped", &self.wrapped.is_some())
            .finish()
    }
}

// =============================================================================
// GENERATED TESTS AND SUITES
// =============================================================================

/// One installed suite entry: a name, the bindings captured at expansion
/// time, and the body to invoke. Plain (non-parametrized) members install
/// with empty bindings.
#[derive(Clone)]
pub struct GeneratedTest {
    name: String,
    bindings: Bindings,
    body: TestFn,
}

impl GeneratedTest {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Invokes the body with the captured bindings. On failure the bound
    /// parameters are appended to the failure as a
    /// `Test parameters: key=value, ...` note and the same failure value is
    /// returned.
    pub fn invoke(&self) -> Result<(), TestFailure> {
        self.run(&self.bindings)
    }

    /// Invokes with call-time extras merged in after the bound parameters.
    pub fn invoke_with(&self, extra: &Bindings) -> Result<(), TestFailure> {
        let merged = self.bindings.merged(extra)?;
        self.run(&merged)
    }

    fn run(&self, bindings: &Bindings) -> Result<(), TestFailure> {
        match (self.body)(bindings) {
            Ok(()) => Ok(()),
            Err(mut failure) => {
                if !self.bindings.is_empty() {
                    failure.note(format!("Test parameters: {}", self.bindings.render()));
                }
                Err(failure)
            }
        }
    }
}

impl fmt::Debug for GeneratedTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedTest")
            .field("name", &self.name)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// An immutable, fully expanded test suite.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    tests: Vec<GeneratedTest>,
}

impl Suite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// All installed entries, in installation order.
    pub fn tests(&self) -> &[GeneratedTest] {
        &self.tests
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(GeneratedTest::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedTest> {
        self.tests.iter().find(|t| t.name == name)
    }
}

// Member table slot during expansion: registered members start Plain and
// parametrized ones are replaced by their Expanded entries.
enum Slot {
    Plain(TestMethod),
    Expanded(GeneratedTest),
}

impl Slot {
    fn name(&self) -> &str {
        match self {
            Slot::Plain(method) => method.name(),
            Slot::Expanded(test) => test.name(),
        }
    }
}

/// Collects test methods in declaration order; [`Self::build`] runs the
/// expansion and yields the suite.
///
/// # Examples
///
/// ```rust
/// use parametrize::{cases, parametrize, SuiteBuilder, TestMethod, Value};
///
/// let decorator = parametrize("x, expected", cases![(1, 1), (2, 4)], None).unwrap();
/// let method = decorator
///     .apply(TestMethod::new("test_square", &["x", "expected"], |b| {
///         let (Some(Value::Int(x)), Some(Value::Int(e))) = (b.get("x"), b.get("expected"))
///         else {
///             return Err("missing bindings".into());
///         };
///         if x * x == *e { Ok(()) } else { Err(format!("{} != {}", x * x, e).into()) }
///     }))
///     .unwrap();
/// let suite = SuiteBuilder::new("MathSuite").register(method).build().unwrap();
/// assert!(suite.contains("test_square_0"));
/// assert!(suite.contains("test_square_1"));
/// assert!(!suite.contains("test_square"));
/// ```
#[derive(Debug)]
pub struct SuiteBuilder {
    name: String,
    members: Vec<TestMethod>,
}

impl SuiteBuilder {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Registers a member. Re-registering a name replaces the earlier
    /// member in place, mirroring shadowing inside a class body.
    pub fn register(mut self, method: TestMethod) -> Self {
        match self
            .members
            .iter()
            .position(|m| m.name() == method.name())
        {
            Some(index) => self.members[index] = method,
            None => self.members.push(method),
        }
        self
    }

    /// The one-shot expansion hook. Installs every member, then replaces
    /// each parametrized member with one generated test per case. All
    /// failures surface here, before any test can run.
    pub fn build(self) -> Result<Suite, ParamError> {
        let mut table: Vec<Slot> = self.members.into_iter().map(Slot::Plain).collect();

        let mut index = 0;
        while index < table.len() {
            let is_parametrized = matches!(
                &table[index],
                Slot::Plain(method) if method.parametrization.is_some()
            );
            if !is_parametrized {
                index += 1;
                continue;
            }
            let Slot::Plain(method) = table.remove(index) else {
                unreachable!("slot kind checked above");
            };
            if let Some(inner) = method.wrapped() {
                if inner.parametrization.is_some() {
                    return Err(ParamError::NotOutermost {
                        method: method.name.clone(),
                    });
                }
            }
            let Some(record) = method.parametrization else {
                unreachable!("record presence checked above");
            };
            for case in &record.cases {
                let name = format!("{}_{}", method.name, case.id);
                if table.iter().any(|slot| slot.name() == name) {
                    return Err(ParamError::DuplicateTestName {
                        name,
                        suite: self.name,
                    });
                }
                table.push(Slot::Expanded(GeneratedTest {
                    name,
                    bindings: Bindings::zip(&record.argnames, &case.values),
                    body: method.body.clone(),
                }));
            }
        }

        let tests = table
            .into_iter()
            .map(|slot| match slot {
                Slot::Plain(method) => GeneratedTest {
                    name: method.name,
                    bindings: Bindings::new(),
                    body: method.body,
                },
                Slot::Expanded(test) => test,
            })
            .collect();

        Ok(Suite {
            name: self.name,
            tests,
        })
    }
}
