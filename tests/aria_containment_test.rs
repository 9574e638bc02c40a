//! Role-containment checks: immediate failure without an id, deferred
//! `aria-owns` rescue with one, and the structural exemptions.

use htmlvet::{Attributes, Checker, Locator, Namespace, Severity};
use pretty_assertions::assert_eq;

fn at(line: usize) -> Locator {
    Locator::new(line, 1)
}

fn open(checker: &mut Checker, name: &str, pairs: &[(&str, &str)], line: usize) {
    let attributes = Attributes::from_pairs(pairs.iter().copied());
    checker
        .start_element(name, Namespace::Html, &attributes, &at(line))
        .unwrap();
}

fn close(checker: &mut Checker, name: &str, line: usize) {
    checker.end_element(name, Namespace::Html, &at(line)).unwrap();
}

fn errors(checker: &Checker) -> Vec<&str> {
    checker
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message.as_str())
        .collect()
}

#[test]
fn option_inside_listbox_role_is_contained() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "listbox")], 1);
    open(&mut checker, "div", &[("role", "option")], 2);
    close(&mut checker, "div", 2);
    close(&mut checker, "div", 3);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker), Vec::<&str>::new());
}

#[test]
fn implicit_ancestor_role_satisfies_containment() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    // a select implies the listbox role without any role attribute
    open(&mut checker, "select", &[], 1);
    open(&mut checker, "div", &[("role", "option")], 2);
    close(&mut checker, "div", 2);
    close(&mut checker, "select", 3);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker), Vec::<&str>::new());
}

#[test]
fn explicit_ancestor_role_does_not_mask_the_implied_one() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    // the ul still implies list even with an unrelated explicit role
    open(&mut checker, "ul", &[("role", "navigation")], 1);
    open(&mut checker, "li", &[("role", "listitem")], 2);
    close(&mut checker, "li", 2);
    close(&mut checker, "ul", 3);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker), Vec::<&str>::new());
}

#[test]
fn uncontained_option_without_id_fails_at_open() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "option")], 4);
    // the failure is already recorded before the document ends
    assert_eq!(checker.diagnostics().len(), 1);
    close(&mut checker, "div", 4);
    checker.end_document().unwrap();
    assert_eq!(
        errors(&checker),
        vec![
            "An element with “role=option” must be contained in, or owned by, \
             an element with “role=combobox” or “role=listbox” or \
             “role=radiogroup” or “role=menu” or “role=tree”."
        ]
    );
    assert_eq!(checker.diagnostics()[0].locator.line, 4);
}

#[test]
fn aria_owns_rescues_an_identified_option() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "option"), ("id", "opt-a")], 1);
    close(&mut checker, "div", 1);
    // the owner appears later and is unrelated in the tree
    open(&mut checker, "div", &[("role", "listbox"), ("aria-owns", "opt-a")], 2);
    close(&mut checker, "div", 2);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker), Vec::<&str>::new());
}

#[test]
fn owner_with_non_qualifying_role_does_not_rescue() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "option"), ("id", "opt-b")], 1);
    close(&mut checker, "div", 1);
    open(&mut checker, "div", &[("role", "group"), ("aria-owns", "opt-b")], 2);
    close(&mut checker, "div", 2);
    checker.end_document().unwrap();
    // deferred failure, attributed to the option element
    assert_eq!(errors(&checker).len(), 1);
    assert_eq!(checker.diagnostics()[0].locator.line, 1);
    assert!(checker.diagnostics()[0].message.contains("“role=option”"));
}

#[test]
fn identified_option_fails_at_document_end_not_at_open() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "option"), ("id", "opt-c")], 1);
    close(&mut checker, "div", 1);
    assert_eq!(checker.diagnostics().len(), 0);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker).len(), 1);
}

#[test]
fn presentation_parent_is_structurally_transparent() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "presentation")], 1);
    open(&mut checker, "div", &[("role", "option")], 2);
    close(&mut checker, "div", 2);
    close(&mut checker, "div", 3);
    checker.end_document().unwrap();
    assert_eq!(errors(&checker), Vec::<&str>::new());
}

#[test]
fn table_section_elements_are_exempt() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "table", &[], 1);
    open(&mut checker, "tbody", &[("role", "rowgroup")], 2);
    close(&mut checker, "tbody", 2);
    close(&mut checker, "table", 3);
    checker.end_document().unwrap();
    // no containment error; the explicit role still draws the redundancy
    // warning because tbody already carries it implicitly
    assert_eq!(errors(&checker), Vec::<&str>::new());
    let warnings: Vec<&str> = checker
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        warnings,
        vec!["The “rowgroup” role is unnecessary for element “tbody”."]
    );
}
