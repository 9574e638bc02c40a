//! Streaming conformance checks for HTML documents.
//!
//! This crate implements the context-sensitive document rules that a grammar
//! cannot express: ancestor exclusions ("no interactive content inside a
//! link"), deferred idref resolution (`label[for]`, `form`, the ARIA idref
//! attributes), ARIA role containment with `aria-owns` ownership, table grid
//! overlap detection, and a collection of per-element attribute rules.
//!
//! It deliberately contains no parser. A host drives a [`Checker`] with the
//! event stream its own HTML parser produces:
//!
//! ```
//! use htmlvet::{Attributes, Checker, Locator, Namespace};
//!
//! let mut checker = Checker::new();
//! checker.start_document()?;
//! let attrs = Attributes::from_pairs([("href", "/")]);
//! checker.start_element("a", Namespace::Html, &attrs, &Locator::new(1, 1))?;
//! checker.start_element("button", Namespace::Html, &Attributes::new(), &Locator::new(1, 16))?;
//! checker.end_element("button", Namespace::Html, &Locator::new(1, 40))?;
//! checker.end_element("a", Namespace::Html, &Locator::new(1, 44))?;
//! checker.end_document()?;
//! assert_eq!(checker.diagnostics().len(), 1);
//! # Ok::<(), htmlvet::CheckError>(())
//! ```
//!
//! Diagnostics are ordinary values ([`Diagnostic`]), never process output;
//! hard failures ([`CheckError`]) are reserved for broken event streams and
//! configured resource limits.

pub mod aria;
pub mod attrs;
pub mod checker;
pub mod collab;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod locator;
pub mod refs;
pub mod registry;
pub mod table;

pub use attrs::Attributes;
pub use checker::{Checker, Namespace};
pub use collab::Collaborators;
pub use config::CheckerConfig;
pub use diagnostic::{CheckError, CheckResult, Diagnostic, Severity};
pub use locator::Locator;
