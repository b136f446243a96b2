//! Declaration-time validation contract: every misconfiguration surfaces
//! before a suite is built, with a fixed, matchable message.

use parametrize::{cases, parametrize, Case, IdPolicy, ParamError, SuiteBuilder, TestMethod};

fn noop_method(name: &str, params: &[&str]) -> TestMethod {
    TestMethod::new(name, params, |_| Ok(()))
}

#[test]
fn empty_argnames_fails_with_the_fixed_message() {
    let err = parametrize("", cases![1], None).unwrap_err();
    assert_eq!(err.to_string(), "argnames must contain at least one element");
}

#[test]
fn id_and_case_lengths_must_agree() {
    let err = parametrize("x", cases![1, 2, 3], Some(IdPolicy::ids(["a", "b"]))).unwrap_err();
    assert_eq!(err.to_string(), "ids must have the same length as argvalues");
    assert_eq!(err, ParamError::IdsLengthMismatch { ids: 2, cases: 3 });
}

#[test]
fn arity_errors_identify_the_offending_index() {
    let err = parametrize("x,expected", cases![(1, 1), (2,)], None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "tuple at index 1 has wrong number of arguments (1 != 2)"
    );

    let table = cases![Case::new([1.into(), 2.into(), 3.into()])];
    let err = parametrize("x,expected", table, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "case at index 0 has wrong number of arguments (3 != 2)"
    );
}

#[test]
fn bare_value_with_multiple_argnames_is_unrecognized() {
    let err = parametrize("x,expected", cases![(1, 1), "oops"], None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "case at index 1 is not a tuple or case instance: \"oops\""
    );
}

#[test]
fn invalid_ids_are_quoted_in_the_error() {
    let err = parametrize("x", cases![1], Some(IdPolicy::ids(["white space"]))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "id must be a valid identifier suffix: \"white space\""
    );

    let table = cases![Case::new([1.into()]).with_id("")];
    let err = parametrize("x", table, None).unwrap_err();
    assert_eq!(err.to_string(), "id must be a valid identifier suffix: \"\"");
}

#[test]
fn duplicate_ids_fail_before_any_suite_exists() {
    let err = parametrize("x", cases![1, 2], Some(IdPolicy::ids(["same", "same"]))).unwrap_err();
    assert_eq!(err.to_string(), "duplicate case id \"same\"");
}

#[test]
fn trailing_comma_in_argnames_fails_at_decoration_time() {
    let decorator = parametrize("x,", cases![(1, 2)], None).unwrap();
    assert_eq!(decorator.record().argnames().len(), 2);
    let err = decorator
        .apply(noop_method("test_known", &["x"]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argname \"\" is not accepted by test method \"test_known\""
    );
}

#[test]
fn unknown_argname_fails_at_decoration_time() {
    let decorator = parametrize("x,missing", cases![(1, 2)], None).unwrap();
    let err = decorator
        .apply(noop_method("test_known", &["x"]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argname \"missing\" is not accepted by test method \"test_known\""
    );
}

#[test]
fn stacking_two_declarations_is_rejected() {
    let first = parametrize("x", cases![1], None).unwrap();
    let second = parametrize("x", cases![2], None).unwrap();
    let method = first.apply(noop_method("test_once", &["x"])).unwrap();
    let err = second.apply(method).unwrap_err();
    assert_eq!(err.to_string(), "parametrize cannot be stacked on test_once");
}

#[test]
fn duplicate_generated_names_across_declarations_fail_the_build() {
    // two parametrized members whose generated names collide
    let a = parametrize("x", cases![Case::new([1.into()]).with_id("shared")], None)
        .unwrap()
        .apply(noop_method("test_thing", &["x"]))
        .unwrap();
    let b = parametrize("x", cases![Case::new([2.into()]).with_id("0")], None)
        .unwrap()
        .apply(noop_method("test_thing_shared", &["x"]))
        .unwrap();
    // `test_thing` expands to `test_thing_shared`, which collides with the
    // base name of the second member still present in the table.
    let err = SuiteBuilder::new("CollisionSuite")
        .register(a)
        .register(b)
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "duplicate test name test_thing_shared in CollisionSuite"
    );
}
