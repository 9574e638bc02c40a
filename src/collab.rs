//! Pluggable collaborators: value grammars the checker consults but does not
//! implement. Each trait has a permissive default so the checker is usable
//! stand-alone; a host wires in real implementations to get CSS, srcset,
//! autocomplete, color, and custom-element-name validation.
//!
//! A collaborator failure is never fatal to the pass. The checker turns each
//! reported violation into one diagnostic at the position of the construct
//! under examination and keeps going.

/// One finding from a [`StyleChecker`], positioned relative to the start of
/// the CSS text (1-indexed line and column within the fragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleFinding {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Checks a fragment of CSS: the text content of a `style` element or the
/// value of a `style` attribute.
pub trait StyleChecker {
    fn check(&self, css: &str) -> Vec<StyleFinding>;
}

/// Why a value failed its grammar; the message completes the sentence
/// "Bad value ... for attribute ...: {message}".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarViolation {
    pub message: String,
}

impl GrammarViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A single-value grammar (CSS color values, custom element names).
pub trait ValueGrammar {
    fn validate(&self, value: &str) -> Result<(), GrammarViolation>;
}

/// Field-kind context for autocomplete detail tokens, chosen from the
/// control's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofillField {
    Any,
    Text,
    Password,
    Url,
    Email,
    Tel,
    Numeric,
    Month,
    Date,
}

pub trait AutocompleteGrammar {
    fn validate(&self, value: &str, field: AutofillField) -> Result<(), GrammarViolation>;
}

/// Facts about a parsed `srcset` the checker acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrcsetInfo {
    /// At least one image candidate string carries a width descriptor.
    pub has_width_descriptor: bool,
}

pub trait SrcsetGrammar {
    /// `width_required` is set when a sibling `sizes` attribute is present.
    fn validate(&self, value: &str, width_required: bool) -> Result<SrcsetInfo, GrammarViolation>;
}

/// Accepts everything. Default for every grammar slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl StyleChecker for Permissive {
    fn check(&self, _css: &str) -> Vec<StyleFinding> {
        Vec::new()
    }
}

impl ValueGrammar for Permissive {
    fn validate(&self, _value: &str) -> Result<(), GrammarViolation> {
        Ok(())
    }
}

impl AutocompleteGrammar for Permissive {
    fn validate(&self, _value: &str, _field: AutofillField) -> Result<(), GrammarViolation> {
        Ok(())
    }
}

impl SrcsetGrammar for Permissive {
    fn validate(
        &self,
        _value: &str,
        _width_required: bool,
    ) -> Result<SrcsetInfo, GrammarViolation> {
        Ok(SrcsetInfo::default())
    }
}

/// The full collaborator set a checker instance consults.
pub struct Collaborators {
    pub style: Box<dyn StyleChecker>,
    pub autocomplete: Box<dyn AutocompleteGrammar>,
    pub srcset: Box<dyn SrcsetGrammar>,
    pub color: Box<dyn ValueGrammar>,
    pub custom_element_name: Box<dyn ValueGrammar>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            style: Box::new(Permissive),
            autocomplete: Box::new(Permissive),
            srcset: Box::new(Permissive),
            color: Box::new(Permissive),
            custom_element_name: Box::new(Permissive),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
