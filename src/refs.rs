//! Deferred cross-reference resolution.
//!
//! Idref-bearing attributes (`label[for]`, `form`, `input[list]`, the ARIA
//! idref attributes) may legally point forward in the document, so nothing is
//! resolved while the stream is in flight. Every reference is recorded with
//! the locator of the referencing element, and the whole ledger is settled
//! once the document ends, category by category, each category in insertion
//! order.

use crate::aria;
use crate::diagnostic::Diagnostic;
use crate::locator::Locator;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct PendingRef {
    idref: String,
    locator: Locator,
}

/// A `role=...` element that had an `id` but no qualifying ancestor role;
/// it can still be rescued by an `aria-owns` owner seen anywhere else.
#[derive(Debug, Clone)]
struct PendingOwned {
    id: String,
    role: String,
    locator: Locator,
}

#[derive(Debug, Default)]
pub struct ReferenceLedger {
    all_ids: HashSet<String>,
    form_element_ids: HashSet<String>,
    form_control_ids: HashSet<String>,
    list_element_ids: HashSet<String>,

    label_for_refs: Vec<PendingRef>,
    form_owner_refs: Vec<PendingRef>,
    list_refs: Vec<PendingRef>,
    // attribute name alongside each idref, for the diagnostic text
    aria_refs: Vec<(&'static str, PendingRef)>,

    needs_owner: Vec<PendingOwned>,
    // owning role -> ids it claims via aria-owns
    owned_ids_by_role: HashMap<String, HashSet<String>>,
}

impl ReferenceLedger {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record every id the element declares. `form_control`, `form_element`
    /// and `list_element` widen the respective resolution target sets.
    pub fn record_ids<'a, I>(&mut self, ids: I, form_control: bool, form_element: bool, list_element: bool)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if id.is_empty() {
                continue;
            }
            self.all_ids.insert(id.to_owned());
            if form_control {
                self.form_control_ids.insert(id.to_owned());
            }
            if form_element {
                self.form_element_ids.insert(id.to_owned());
            }
            if list_element {
                self.list_element_ids.insert(id.to_owned());
            }
        }
    }

    pub fn record_label_for(&mut self, idref: &str, locator: Locator) {
        self.label_for_refs.push(PendingRef { idref: idref.to_owned(), locator });
    }

    pub fn record_form_owner(&mut self, idref: &str, locator: Locator) {
        self.form_owner_refs.push(PendingRef { idref: idref.to_owned(), locator });
    }

    pub fn record_input_list(&mut self, idref: &str, locator: Locator) {
        self.list_refs.push(PendingRef { idref: idref.to_owned(), locator });
    }

    pub fn record_aria_ref(&mut self, attribute: &'static str, idref: &str, locator: Locator) {
        self.aria_refs
            .push((attribute, PendingRef { idref: idref.to_owned(), locator }));
    }

    /// The element with `id` and `role` still needs an `aria-owns` owner whose
    /// role is one of the roles required for `role`.
    pub fn record_needs_owner(&mut self, id: &str, role: &str, locator: Locator) {
        self.needs_owner.push(PendingOwned {
            id: id.to_owned(),
            role: role.to_owned(),
            locator,
        });
    }

    /// An element with `owner_role` claims `ids` via `aria-owns`.
    pub fn record_owns<'a, I>(&mut self, owner_role: &str, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let owned = self.owned_ids_by_role.entry(owner_role.to_owned()).or_default();
        for id in ids {
            if !id.is_empty() {
                owned.insert(id.to_owned());
            }
        }
    }

    /// Settle every recorded reference against the collected id sets, in
    /// recording order within each category. Call once, at document end.
    pub fn resolve_all(&mut self, out: &mut Vec<Diagnostic>) {
        for pending in &self.label_for_refs {
            if !self.form_control_ids.contains(&pending.idref) {
                out.push(Diagnostic::error(
                    "The value of the \u{201c}for\u{201d} attribute of the \
                     \u{201c}label\u{201d} element must be the ID of a non-hidden \
                     form control.",
                    pending.locator.clone(),
                ));
            }
        }
        for pending in &self.form_owner_refs {
            if !self.form_element_ids.contains(&pending.idref) {
                out.push(Diagnostic::error(
                    "The \u{201c}form\u{201d} attribute must refer to a \
                     \u{201c}form\u{201d} element.",
                    pending.locator.clone(),
                ));
            }
        }
        for pending in &self.list_refs {
            if !self.list_element_ids.contains(&pending.idref) {
                out.push(Diagnostic::error(
                    "The \u{201c}list\u{201d} attribute of the \u{201c}input\u{201d} \
                     element must refer to a \u{201c}datalist\u{201d} element.",
                    pending.locator.clone(),
                ));
            }
        }
        for (attribute, pending) in &self.aria_refs {
            if !self.all_ids.contains(&pending.idref) {
                out.push(Diagnostic::error(
                    format!(
                        "The \u{201c}{attribute}\u{201d} attribute must point to an \
                         element in the same document."
                    ),
                    pending.locator.clone(),
                ));
            }
        }
        for pending in &self.needs_owner {
            let Some(required) = aria::required_ancestor_roles(&pending.role) else {
                continue;
            };
            let owned = required.iter().any(|owner_role| {
                self.owned_ids_by_role
                    .get(*owner_role)
                    .is_some_and(|ids| ids.contains(&pending.id))
            });
            if !owned {
                out.push(Diagnostic::error(
                    format!(
                        "An element with \u{201c}role={}\u{201d} must be contained \
                         in, or owned by, an element with {}.",
                        pending.role,
                        aria::render_role_set(required)
                    ),
                    pending.locator.clone(),
                ));
            }
        }
    }
}
