//! ARIA role data: implicit roles by element name, containment requirements,
//! and the interactive-role sets used by the exclusion rules.
//!
//! The containment *logic* (immediate ancestor check, deferred "needs owner"
//! obligations) lives in the checker and the reference ledger; this module is
//! the data those consult, all of it immutable after first use.

use itertools::Itertools;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Roles that demand a containing (or `aria-owns`-owning) role, mapped to
/// the roles that satisfy them. Order within each list is preserved for
/// deterministic diagnostics.
static REQUIRED_ANCESTOR_ROLES: LazyLock<HashMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        const PAIRS: &[(&str, &str)] = &[
            ("combobox", "option"),
            ("listbox", "option"),
            ("radiogroup", "option"),
            ("menu", "option"),
            ("menu", "menuitem"),
            ("menu", "menuitemcheckbox"),
            ("menu", "menuitemradio"),
            ("menubar", "menuitem"),
            ("menubar", "menuitemcheckbox"),
            ("menubar", "menuitemradio"),
            ("tablist", "tab"),
            ("tree", "treeitem"),
            ("tree", "option"),
            ("group", "treeitem"),
            ("group", "listitem"),
            ("group", "menuitemradio"),
            ("list", "listitem"),
            ("row", "cell"),
            ("row", "gridcell"),
            ("row", "columnheader"),
            ("row", "rowheader"),
            ("grid", "row"),
            ("grid", "rowgroup"),
            ("rowgroup", "row"),
            ("treegrid", "row"),
            ("treegrid", "rowgroup"),
            ("table", "rowgroup"),
            ("table", "row"),
        ];
        let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for &(ancestor, descendant) in PAIRS {
            let ancestors = map.entry(descendant).or_default();
            if !ancestors.contains(&ancestor) {
                ancestors.push(ancestor);
            }
        }
        map
    });

/// Implicit ARIA role an element has by virtue of its name alone.
static IMPLICIT_ROLE_BY_ELEMENT: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("a", "link"),
            ("address", "contentinfo"),
            ("area", "link"),
            ("article", "article"),
            ("aside", "complementary"),
            ("body", "document"),
            ("button", "button"),
            ("datalist", "listbox"),
            ("dd", "definition"),
            ("details", "group"),
            ("dialog", "dialog"),
            ("dt", "term"),
            ("fieldset", "group"),
            ("figure", "figure"),
            ("form", "form"),
            ("footer", "contentinfo"),
            ("h1", "heading"),
            ("h2", "heading"),
            ("h3", "heading"),
            ("h4", "heading"),
            ("h5", "heading"),
            ("h6", "heading"),
            ("header", "banner"),
            ("img", "img"),
            ("li", "listitem"),
            ("link", "link"),
            ("main", "main"),
            ("math", "math"),
            ("menu", "menu"),
            ("nav", "navigation"),
            ("ol", "list"),
            ("optgroup", "group"),
            ("option", "option"),
            ("output", "status"),
            ("progress", "progressbar"),
            ("section", "region"),
            ("select", "listbox"),
            ("summary", "button"),
            ("table", "table"),
            ("tbody", "rowgroup"),
            ("textarea", "textbox"),
            ("tfoot", "rowgroup"),
            ("thead", "rowgroup"),
            ("td", "cell"),
            ("tr", "row"),
            ("ul", "list"),
        ])
    });

/// `th` is the one element with two possible implicit roles. Sorted.
pub const TH_IMPLICIT_ROLES: [&str; 2] = ["columnheader", "rowheader"];

/// Elements whose named role is so strongly implied that an explicit `role`
/// attribute repeating it draws no comment at all (not even the
/// "unnecessary role" warning).
static NEVER_NEEDS_ROLE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("body", "document"),
        ("datalist", "listbox"),
        ("details", "group"),
        ("form", "form"),
        ("hr", "separator"),
        ("main", "main"),
        ("math", "math"),
        ("meter", "progressbar"),
        ("nav", "navigation"),
        ("option", "option"),
        ("progress", "progressbar"),
        ("select", "listbox"),
        ("summary", "button"),
        ("textarea", "textbox"),
    ])
});

/// Implicit role of `input` by `type` keyword.
static INPUT_TYPE_IMPLICIT_ROLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("button", "button"),
            ("checkbox", "checkbox"),
            ("image", "button"),
            ("number", "spinbutton"),
            ("radio", "radio"),
            ("range", "slider"),
            ("reset", "button"),
            ("submit", "button"),
        ])
    });

/// Roles that make an element interactive for the exclusion rules. Sorted.
pub const INTERACTIVE_ROLES: [&str; 21] = [
    "button",
    "checkbox",
    "combobox",
    "grid",
    "gridcell",
    "listbox",
    "menu",
    "menubar",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "scrollbar",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "textbox",
    "treeitem",
];

/// Ancestor roles no interactive descendant may appear under. Sorted.
pub const PROHIBITED_INTERACTIVE_ANCESTOR_ROLES: [&str; 2] = ["button", "link"];

/// ARIA attributes whose idref tokens must resolve somewhere in the document.
pub const IDREF_ATTRIBUTES: [&str; 5] = [
    "aria-controls",
    "aria-describedby",
    "aria-flowto",
    "aria-labelledby",
    "aria-owns",
];

pub fn implicit_role(element: &str) -> Option<&'static str> {
    IMPLICIT_ROLE_BY_ELEMENT.get(element).copied()
}

pub fn never_needs_role(element: &str, role: &str) -> bool {
    NEVER_NEEDS_ROLE.get(element) == Some(&role)
}

pub fn input_type_implicit_role(input_type: &str) -> Option<&'static str> {
    INPUT_TYPE_IMPLICIT_ROLE.get(input_type).copied()
}

pub fn is_interactive_role(role: &str) -> bool {
    INTERACTIVE_ROLES.binary_search(&role).is_ok()
}

/// Containing/owning roles required by `role`, or `None` when the role has
/// no containment requirement.
pub fn required_ancestor_roles(role: &str) -> Option<&'static [&'static str]> {
    REQUIRED_ANCESTOR_ROLES.get(role).map(Vec::as_slice)
}

/// Whether `element` carries `role` implicitly (single- or multi-role table).
pub fn element_implies_role(element: &str, role: &str) -> bool {
    implicit_role(element) == Some(role)
        || (element == "th" && TH_IMPLICIT_ROLES.binary_search(&role).is_ok())
}

/// Render a role set for a diagnostic, e.g. `“role=listbox” or “role=combobox”`.
pub fn render_role_set(roles: &[&str]) -> String {
    roles.iter().map(|role| format!("\u{201c}role={role}\u{201d}")).join(" or ")
}
