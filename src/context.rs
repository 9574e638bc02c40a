//! Open-element context: one frame per open element, with an accumulated
//! ancestor-category bitmask and the deferred facts the close-time checks
//! need (text seen, images lacking `alt`, option bookkeeping, and so on).
//!
//! The stack also carries three cursors pointing at the innermost open
//! `figure`, heading, and sectioning element. Each frame snapshots the
//! cursors at push time and the pop restores them, so nested constructs can
//! never leave a cursor dangling at a closed frame.

use crate::diagnostic::CheckError;
use crate::locator::Locator;

/// A `source` child of `picture` waiting to be judged when a sibling
/// `img[srcset]` arrives.
#[derive(Debug, Clone)]
pub struct PendingSource {
    pub locator: Locator,
    pub media: Option<String>,
    pub has_type: bool,
}

/// Per-open-media-element state (`audio`/`video`).
#[derive(Debug, Clone)]
pub struct MediaState {
    pub locator: Locator,
    /// A `track[default]` descendant has already been seen.
    pub default_track_seen: bool,
}

/// One open element.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Union of the category bits of every open ancestor plus this element's
    /// own category bit; strictly monotonic down the tree.
    pub mask: u32,
    /// Lowercase local name for HTML elements, `None` for foreign content.
    pub name: Option<String>,
    pub locator: Locator,
    pub role: Option<String>,
    pub active_descendant: Option<String>,
    /// `for` value when this frame is a `label[for]`.
    pub label_for: Option<String>,

    // facts accumulated by descendants, consumed at close
    pub text_found: bool,
    pub img_found: bool,
    pub embedded_content_found: bool,
    pub figcaption_needed: bool,
    pub figcaption_content_found: bool,
    pub images_lacking_alt: Vec<Locator>,
    pub heading_found: bool,

    // option/select bookkeeping
    pub option_needed: bool,
    pub option_found: bool,
    pub no_value_option_found: bool,
    pub empty_value_option_found: bool,
    pub non_empty_option: Option<Locator>,
    pub selected_option_seen: bool,

    // open-construct markers for descendant checks
    pub single_select: bool,
    pub open_label: Option<Locator>,
    pub labeled_descendant_seen: bool,
    pub media: Option<MediaState>,
    pub picture_sources: Vec<PendingSource>,

    /// Set when `aria-activedescendant` was declared but no descendant with
    /// the referenced id has been seen yet.
    pub pending_active_descendant: Option<Locator>,

    /// Raw character content, collected only for `style`.
    pub collect_text: bool,
    pub text_content: String,

    // cursor snapshots taken at push, restored at pop; push() overwrites
    // whatever the caller left here
    pub(crate) saved_figure: Option<usize>,
    pub(crate) saved_heading: Option<usize>,
    pub(crate) saved_sectioning: Option<usize>,
}

/// The open-element stack plus the innermost-construct cursors.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
    current_figure: Option<usize>,
    current_heading: Option<usize>,
    current_sectioning: Option<usize>,
}

impl ContextStack {
    pub fn clear(&mut self) {
        self.frames.clear();
        self.current_figure = None;
        self.current_heading = None;
        self.current_sectioning = None;
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes `frame`, snapshotting the cursors into it first. `figure`,
    /// `heading` and `sectioning` say which cursors the new frame captures.
    pub fn push(&mut self, mut frame: Frame, figure: bool, heading: bool, sectioning: bool) {
        frame.saved_figure = self.current_figure;
        frame.saved_heading = self.current_heading;
        frame.saved_sectioning = self.current_sectioning;
        let index = self.frames.len();
        if figure {
            self.current_figure = Some(index);
        }
        if heading {
            self.current_heading = Some(index);
        }
        if sectioning {
            self.current_sectioning = Some(index);
        }
        self.frames.push(frame);
    }

    /// Pops the innermost frame and restores the cursors it snapshotted.
    pub fn pop(&mut self) -> Result<Frame, CheckError> {
        let frame = self.frames.pop().ok_or(CheckError::StackUnderflow)?;
        self.current_figure = frame.saved_figure;
        self.current_heading = frame.saved_heading;
        self.current_sectioning = frame.saved_sectioning;
        Ok(frame)
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }

    pub fn current_figure(&self) -> Option<usize> {
        self.current_figure
    }

    pub fn current_heading(&self) -> Option<usize> {
        self.current_heading
    }

    pub fn current_sectioning(&self) -> Option<usize> {
        self.current_sectioning
    }

    /// Open frames, innermost first.
    pub fn iter_open(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().rev()
    }

    pub fn iter_open_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        self.frames.iter_mut().rev()
    }

    /// Marks `text_found` on every open `figure` strictly below `index`.
    pub fn mark_text_in_enclosing_figures(&mut self, index: usize) {
        for frame in &mut self.frames[..index] {
            if frame.name.as_deref() == Some("figure") {
                frame.text_found = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SpecialAncestor;

    fn named(name: &str, mask: u32) -> Frame {
        Frame {
            mask,
            name: Some(name.to_owned()),
            ..Frame::default()
        }
    }

    #[test]
    fn masks_accumulate_monotonically() {
        let mut stack = ContextStack::default();
        let body = SpecialAncestor::Body.mask();
        stack.push(named("body", body), false, false, false);
        let parent = stack.current().unwrap().mask;
        let figure = parent | SpecialAncestor::Figure.mask();
        stack.push(named("figure", figure), true, false, false);
        assert_eq!(stack.current().unwrap().mask & body, body);
        assert_eq!(stack.current().unwrap().mask & parent, parent);
    }

    #[test]
    fn cursors_restore_on_pop() {
        let mut stack = ContextStack::default();
        stack.push(named("figure", 0), true, false, false);
        let outer = stack.current_figure();
        stack.push(named("figure", 0), true, false, false);
        assert_eq!(stack.current_figure(), Some(1));
        stack.pop().unwrap();
        assert_eq!(stack.current_figure(), outer);
        stack.pop().unwrap();
        assert_eq!(stack.current_figure(), None);
    }

    #[test]
    fn sectioning_cursor_survives_unrelated_frames() {
        let mut stack = ContextStack::default();
        stack.push(named("section", 0), false, false, true);
        stack.push(named("div", 0), false, false, false);
        assert_eq!(stack.current_sectioning(), Some(0));
        stack.pop().unwrap();
        assert_eq!(stack.current_sectioning(), Some(0));
        stack.pop().unwrap();
        assert_eq!(stack.current_sectioning(), None);
    }

    #[test]
    fn pop_on_empty_stack_is_an_underflow() {
        let mut stack = ContextStack::default();
        assert!(matches!(stack.pop(), Err(CheckError::StackUnderflow)));
    }

    #[test]
    fn enclosing_figures_are_marked() {
        let mut stack = ContextStack::default();
        stack.push(named("figure", 0), true, false, false);
        stack.push(named("div", 0), false, false, false);
        stack.push(named("figure", 0), true, false, false);
        let inner = stack.current_figure().unwrap();
        stack.mark_text_in_enclosing_figures(inner);
        assert!(stack.frame(0).unwrap().text_found);
        assert!(!stack.frame(1).unwrap().text_found);
        assert!(!stack.frame(2).unwrap().text_found);
    }
}
