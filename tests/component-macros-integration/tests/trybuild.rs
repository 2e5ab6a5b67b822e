//! trybuild UI tests for component_macros

#[test]
fn ui_injectable() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/injectable_generic_ok.rs");
    t.compile_fail("tests/trybuild/injectable_bad_qualifier.rs");
}
