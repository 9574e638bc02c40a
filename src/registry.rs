//! Static registry of "special" ancestor categories and the prohibition
//! masks derived from them.
//!
//! A fixed set of element categories participates in ancestor-sensitive
//! rules. Each gets one bit in a `u32` ancestor mask; two high bits are
//! reserved for conditions that propagate like ancestors but are not element
//! names ("anchor with `href` in scope", "inside a `label[for]` chain").
//! Everything in this module is immutable data computed once at startup and
//! safe for unsynchronized concurrent reads.

use std::collections::HashMap;
use std::sync::LazyLock;

/// One bit per category; see [`SpecialAncestor::mask`].
///
/// The discriminant is the bit position. Adding a category means appending a
/// variant and its entry in [`SpecialAncestor::ALL`]; the `const` assertion
/// below catches overflow into the reserved bits at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SpecialAncestor {
    A = 0,
    Address,
    Body,
    Button,
    Caption,
    Dfn,
    Dt,
    Figcaption,
    Figure,
    Footer,
    Form,
    Header,
    Label,
    Map,
    Noscript,
    Th,
    Time,
    Progress,
    Meter,
    Article,
    Section,
    Aside,
    Nav,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

/// Mask bit flagging "an `a` element with an `href` attribute is open".
pub const HREF_MASK: u32 = 1 << 30;

/// Mask bit flagging "a `label` element with a `for` attribute is open".
pub const LABEL_FOR_MASK: u32 = 1 << 29;

// Categories may only use bits 0..=28; 29 and 30 are reserved above.
const _: () = assert!(
    SpecialAncestor::ALL.len() <= 29,
    "special ancestor categories exceed the ancestor mask width"
);

impl SpecialAncestor {
    pub const ALL: [SpecialAncestor; 29] = [
        Self::A,
        Self::Address,
        Self::Body,
        Self::Button,
        Self::Caption,
        Self::Dfn,
        Self::Dt,
        Self::Figcaption,
        Self::Figure,
        Self::Footer,
        Self::Form,
        Self::Header,
        Self::Label,
        Self::Map,
        Self::Noscript,
        Self::Th,
        Self::Time,
        Self::Progress,
        Self::Meter,
        Self::Article,
        Self::Section,
        Self::Aside,
        Self::Nav,
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
    ];

    pub const fn mask(self) -> u32 {
        1 << self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::Address => "address",
            Self::Body => "body",
            Self::Button => "button",
            Self::Caption => "caption",
            Self::Dfn => "dfn",
            Self::Dt => "dt",
            Self::Figcaption => "figcaption",
            Self::Figure => "figure",
            Self::Footer => "footer",
            Self::Form => "form",
            Self::Header => "header",
            Self::Label => "label",
            Self::Map => "map",
            Self::Noscript => "noscript",
            Self::Th => "th",
            Self::Time => "time",
            Self::Progress => "progress",
            Self::Meter => "meter",
            Self::Article => "article",
            Self::Section => "section",
            Self::Aside => "aside",
            Self::Nav => "nav",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }
}

/// Union of all six heading-level bits.
pub const HEADING_MASK: u32 = SpecialAncestor::H1.mask()
    | SpecialAncestor::H2.mask()
    | SpecialAncestor::H3.mask()
    | SpecialAncestor::H4.mask()
    | SpecialAncestor::H5.mask()
    | SpecialAncestor::H6.mask();

/// Bits for the interactive-container element categories.
pub const A_BUTTON_MASK: u32 = SpecialAncestor::A.mask() | SpecialAncestor::Button.mask();

/// Interactive-by-markup element names. Also prohibited inside `a`/`button`.
/// Sorted for binary search.
pub const INTERACTIVE_ELEMENTS: [&str; 8] = [
    "a", "button", "details", "embed", "iframe", "label", "select", "textarea",
];

/// `(prohibited ancestor category, descendant element name)` pairs.
///
/// Extended at map build time with one (`a`, e) and (`button`, e) entry per
/// interactive element. Keyed by descendant in [`prohibited_ancestor_mask`].
const PROHIBITED_ANCESTORS: &[(SpecialAncestor, &str)] = &[
    (SpecialAncestor::Form, "form"),
    (SpecialAncestor::Progress, "progress"),
    (SpecialAncestor::Meter, "meter"),
    (SpecialAncestor::Dfn, "dfn"),
    (SpecialAncestor::Noscript, "noscript"),
    (SpecialAncestor::Label, "label"),
    (SpecialAncestor::Address, "address"),
    (SpecialAncestor::Address, "section"),
    (SpecialAncestor::Address, "nav"),
    (SpecialAncestor::Address, "article"),
    (SpecialAncestor::Header, "header"),
    (SpecialAncestor::Footer, "header"),
    (SpecialAncestor::Address, "header"),
    (SpecialAncestor::Header, "footer"),
    (SpecialAncestor::Footer, "footer"),
    (SpecialAncestor::Dt, "header"),
    (SpecialAncestor::Dt, "footer"),
    (SpecialAncestor::Dt, "article"),
    (SpecialAncestor::Dt, "nav"),
    (SpecialAncestor::Dt, "section"),
    (SpecialAncestor::Dt, "h1"),
    (SpecialAncestor::Dt, "h2"),
    (SpecialAncestor::Dt, "h3"),
    (SpecialAncestor::Dt, "h4"),
    (SpecialAncestor::Dt, "h5"),
    (SpecialAncestor::Dt, "h6"),
    (SpecialAncestor::Dt, "hgroup"),
    (SpecialAncestor::Th, "header"),
    (SpecialAncestor::Th, "footer"),
    (SpecialAncestor::Th, "article"),
    (SpecialAncestor::Th, "nav"),
    (SpecialAncestor::Th, "section"),
    (SpecialAncestor::Th, "h1"),
    (SpecialAncestor::Th, "h2"),
    (SpecialAncestor::Th, "h3"),
    (SpecialAncestor::Th, "h4"),
    (SpecialAncestor::Th, "h5"),
    (SpecialAncestor::Th, "h6"),
    (SpecialAncestor::Th, "hgroup"),
    (SpecialAncestor::Address, "footer"),
    (SpecialAncestor::Address, "h1"),
    (SpecialAncestor::Address, "h2"),
    (SpecialAncestor::Address, "h3"),
    (SpecialAncestor::Address, "h4"),
    (SpecialAncestor::Address, "h5"),
    (SpecialAncestor::Address, "h6"),
    (SpecialAncestor::Caption, "table"),
];

static ANCESTOR_MASK_BY_DESCENDANT: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    let mut by_descendant: HashMap<&'static str, u32> = HashMap::new();
    for &(ancestor, descendant) in PROHIBITED_ANCESTORS {
        *by_descendant.entry(descendant).or_insert(0) |= ancestor.mask();
    }
    for name in INTERACTIVE_ELEMENTS {
        *by_descendant.entry(name).or_insert(0) |= A_BUTTON_MASK;
    }
    by_descendant
});

/// Mask of ancestor categories inside which `descendant` must not appear.
/// Zero for elements with no name-keyed prohibition.
pub fn prohibited_ancestor_mask(descendant: &str) -> u32 {
    ANCESTOR_MASK_BY_DESCENDANT.get(descendant).copied().unwrap_or(0)
}

/// Category names for every set bit in `mask_hit`, in bit order, so a
/// diagnostic can name the violated ancestor without re-scanning the stack.
pub fn category_names(mask_hit: u32) -> impl Iterator<Item = &'static str> {
    SpecialAncestor::ALL
        .into_iter()
        .filter(move |a| mask_hit & a.mask() != 0)
        .map(|a| a.name())
}

/// Element names barred from containing `main` (not mask-based: `main`'s
/// restriction covers many ordinary elements that have no category bit).
pub const PROHIBITED_MAIN_ANCESTORS: [&str; 29] = [
    "a", "address", "article", "aside", "audio", "blockquote", "canvas", "caption", "dd", "del",
    "details", "dialog", "dt", "fieldset", "figure", "footer", "header", "ins", "li", "main",
    "map", "nav", "noscript", "object", "section", "slot", "td", "th", "video",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_unique_and_in_range() {
        let mut seen = 0u32;
        for a in SpecialAncestor::ALL {
            assert_eq!(seen & a.mask(), 0, "duplicate bit for {}", a.name());
            seen |= a.mask();
            assert_eq!(seen & (HREF_MASK | LABEL_FOR_MASK), 0);
        }
    }

    #[test]
    fn name_round_trip() {
        for a in SpecialAncestor::ALL {
            assert_eq!(SpecialAncestor::from_name(a.name()), Some(a));
        }
        assert_eq!(SpecialAncestor::from_name("div"), None);
    }

    #[test]
    fn form_in_form_is_prohibited() {
        let mask = prohibited_ancestor_mask("form");
        assert_ne!(mask & SpecialAncestor::Form.mask(), 0);
        assert_eq!(mask & SpecialAncestor::Label.mask(), 0);
    }

    #[test]
    fn interactive_elements_get_anchor_and_button_bits() {
        for name in INTERACTIVE_ELEMENTS {
            let mask = prohibited_ancestor_mask(name);
            assert_eq!(mask & A_BUTTON_MASK, A_BUTTON_MASK, "{name}");
        }
    }

    #[test]
    fn category_names_maps_bits_back() {
        let mask = SpecialAncestor::A.mask() | SpecialAncestor::Figure.mask();
        let names: Vec<_> = category_names(mask).collect();
        assert_eq!(names, vec!["a", "figure"]);
    }

    #[test]
    fn interactive_elements_are_sorted() {
        let mut sorted = INTERACTIVE_ELEMENTS;
        sorted.sort_unstable();
        assert_eq!(sorted, INTERACTIVE_ELEMENTS);
    }

    #[test]
    fn main_ancestors_are_sorted() {
        let mut sorted = PROHIBITED_MAIN_ANCESTORS;
        sorted.sort_unstable();
        assert_eq!(sorted, PROHIBITED_MAIN_ANCESTORS);
    }
}
