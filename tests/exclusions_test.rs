//! Interactive-content and special-ancestor exclusion rules, driven through
//! the public event API.

use htmlvet::{Attributes, Checker, Locator, Namespace};
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

fn messages(checker: &Checker) -> Vec<&str> {
    checker
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

#[test]
fn hyperlink_inside_hyperlink_names_the_anchor() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "/outer")], 1);
    open(&mut checker, "a", &[("href", "/inner")], 2);
    close(&mut checker, "a", 2);
    close(&mut checker, "a", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “a” must not appear as a descendant of the “a” element."]
    );
    assert_eq!(checker.diagnostics()[0].locator.line, 2);
}

#[test]
fn anchor_without_href_is_not_interactive() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "/outer")], 1);
    open(&mut checker, "a", &[], 2);
    close(&mut checker, "a", 2);
    close(&mut checker, "a", 3);
    checker.end_document().unwrap();
    assert_eq!(messages(&checker), Vec::<&str>::new());
}

#[test]
fn button_inside_hyperlink() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    open(&mut checker, "button", &[], 2);
    close(&mut checker, "button", 2);
    close(&mut checker, "a", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “button” must not appear as a descendant of the “a” element."]
    );
}

#[test]
fn every_offending_ancestor_is_named() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    open(&mut checker, "button", &[], 2);
    open(&mut checker, "select", &[], 3);
    close(&mut checker, "select", 3);
    close(&mut checker, "button", 4);
    close(&mut checker, "a", 5);
    checker.end_document().unwrap();
    // the button is already flagged inside the anchor; the select is then
    // flagged once per interactive ancestor category
    assert_eq!(
        messages(&checker),
        vec![
            "The element “button” must not appear as a descendant of the “a” element.",
            "The element “select” must not appear as a descendant of the “a” element.",
            "The element “select” must not appear as a descendant of the “button” element.",
        ]
    );
}

#[test]
fn form_inside_form() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "form", &[], 1);
    open(&mut checker, "form", &[], 2);
    close(&mut checker, "form", 2);
    close(&mut checker, "form", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “form” must not appear as a descendant of the “form” element."]
    );
}

#[test]
fn label_inside_label() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "label", &[], 1);
    open(&mut checker, "label", &[], 2);
    close(&mut checker, "label", 2);
    close(&mut checker, "label", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “label” must not appear as a descendant of the “label” element."]
    );
}

#[test]
fn hidden_input_is_exempt_but_text_input_is_not() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    open(&mut checker, "input", &[("type", "hidden")], 2);
    close(&mut checker, "input", 2);
    open(&mut checker, "input", &[("type", "text")], 3);
    close(&mut checker, "input", 3);
    close(&mut checker, "a", 4);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “input” must not appear as a descendant of the “a” element."]
    );
    assert_eq!(checker.diagnostics()[0].locator.line, 3);
}

#[test]
fn tabindex_makes_any_element_interactive() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    open(&mut checker, "span", &[("tabindex", "0")], 2);
    close(&mut checker, "span", 2);
    close(&mut checker, "a", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec![
            "An element with the attribute “tabindex” must not appear as a \
             descendant of the “a” element."
        ]
    );
}

#[test]
fn media_with_controls_inside_button() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "button", &[], 1);
    open(&mut checker, "video", &[("controls", "")], 2);
    close(&mut checker, "video", 2);
    close(&mut checker, "button", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec![
            "The element “video” with the attribute “controls” must not appear \
             as a descendant of the “button” element."
        ]
    );
}

#[test]
fn interactive_role_inside_role_button() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "div", &[("role", "button")], 1);
    open(&mut checker, "span", &[("role", "checkbox")], 2);
    close(&mut checker, "span", 2);
    close(&mut checker, "div", 3);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec![
            "An element with the attribute “role=checkbox” must not appear as a \
             descendant of an element with the attribute “role=button”."
        ]
    );
}

#[test]
fn exclusion_stops_at_the_ancestor_boundary() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    close(&mut checker, "a", 1);
    // sibling after the anchor closed: the mask bit is gone
    open(&mut checker, "button", &[], 2);
    close(&mut checker, "button", 2);
    checker.end_document().unwrap();
    assert_eq!(messages(&checker), Vec::<&str>::new());
}

#[test]
fn mask_propagates_through_inert_intermediates() {
    let mut checker = Checker::new();
    checker.start_document().unwrap();
    open(&mut checker, "a", &[("href", "#")], 1);
    open(&mut checker, "span", &[], 2);
    open(&mut checker, "div", &[], 3);
    open(&mut checker, "textarea", &[], 4);
    close(&mut checker, "textarea", 4);
    close(&mut checker, "div", 5);
    close(&mut checker, "span", 6);
    close(&mut checker, "a", 7);
    checker.end_document().unwrap();
    assert_eq!(
        messages(&checker),
        vec!["The element “textarea” must not appear as a descendant of the “a” element."]
    );
    assert_eq!(checker.diagnostics()[0].locator.line, 4);
}
