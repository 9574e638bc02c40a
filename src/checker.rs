//! The streaming conformance checker.
//!
//! One `Checker` handles one document at a time. The host parser drives it
//! with start/end element, character, and document lifecycle events; the
//! checker accumulates non-fatal [`Diagnostic`]s and returns a hard
//! [`CheckError`] only for broken event streams or configured resource
//! limits. Checks that cannot be decided at the point of the triggering
//! event (idrefs, `figure` captioning, `select` option requirements,
//! ARIA ownership) are deferred to the closing event or to `end_document`.

use crate::aria;
use crate::attrs::{self, Attributes};
use crate::collab::{AutofillField, Collaborators};
use crate::config::CheckerConfig;
use crate::context::{ContextStack, Frame, MediaState, PendingSource};
use crate::diagnostic::{CheckError, CheckResult, Diagnostic};
use crate::locator::Locator;
use crate::refs::ReferenceLedger;
use crate::registry::{
    self, HEADING_MASK, HREF_MASK, LABEL_FOR_MASK, SpecialAncestor,
};
use crate::table::TableGrid;

/// Element namespace as reported by the upstream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
    Other,
}

impl Namespace {
    pub fn is_html(self) -> bool {
        matches!(self, Namespace::Html)
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_sectioning(name: &str) -> bool {
    matches!(name, "article" | "aside" | "nav" | "section")
}

fn is_embedded_content(name: &str) -> bool {
    matches!(
        name,
        "audio" | "canvas" | "embed" | "iframe" | "object" | "video"
    )
}

fn is_labelable(name: &str) -> bool {
    matches!(
        name,
        "button" | "input" | "meter" | "output" | "progress" | "select" | "textarea"
    )
}

/// Non-interactive elements where an accessible name via `aria-label` is
/// nevertheless an established pattern. Sorted.
const ARIA_LABEL_OK: [&str; 18] = [
    "area", "article", "aside", "audio", "fieldset", "figure", "footer", "form", "header", "img",
    "main", "nav", "section", "summary", "table", "td", "th", "video",
];

/// `rel` keywords that allow `link` in body content.
const BODY_OK_REL: [&str; 9] = [
    "dns-prefetch",
    "modulepreload",
    "pingback",
    "preconnect",
    "prefetch",
    "preload",
    "prerender",
    "stylesheet",
    "canonical",
];

fn autofill_field(input_type: &str) -> AutofillField {
    match input_type {
        "text" | "search" => AutofillField::Text,
        "password" => AutofillField::Password,
        "url" => AutofillField::Url,
        "email" => AutofillField::Email,
        "tel" => AutofillField::Tel,
        "number" => AutofillField::Numeric,
        "month" => AutofillField::Month,
        "date" => AutofillField::Date,
        _ => AutofillField::Any,
    }
}

/// The checker engine. Create once, feed one document per
/// `start_document`..`end_document` cycle, collect diagnostics, `reset`
/// or start the next document.
pub struct Checker {
    config: CheckerConfig,
    collab: Collaborators,
    stack: ContextStack,
    ledger: ReferenceLedger,
    /// One grid per open `table`, innermost last.
    tables: Vec<TableGrid>,
    diagnostics: Vec<Diagnostic>,

    started: bool,
    ended: bool,
    templates_deep: usize,
    sectioning_depth: usize,

    has_visible_main: bool,
    has_meta_charset: bool,
    has_content_type_pragma: bool,
    has_meta_description: bool,
    has_autofocus: bool,
    has_top_level_h1: bool,
    second_level_h1s: Vec<Locator>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self {
            config,
            collab: Collaborators::default(),
            stack: ContextStack::default(),
            ledger: ReferenceLedger::default(),
            tables: Vec::new(),
            diagnostics: Vec::new(),
            started: false,
            ended: false,
            templates_deep: 0,
            sectioning_depth: 0,
            has_visible_main: false,
            has_meta_charset: false,
            has_content_type_pragma: false,
            has_meta_description: false,
            has_autofocus: false,
            has_top_level_h1: false,
            second_level_h1s: Vec::new(),
        }
    }

    pub fn with_collaborators(config: CheckerConfig, collab: Collaborators) -> Self {
        let mut checker = Self::with_config(config);
        checker.collab = collab;
        checker
    }

    /// Diagnostics accumulated so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the accumulated diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clears all per-document state, including pending diagnostics.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.ledger.clear();
        self.tables.clear();
        self.diagnostics.clear();
        self.started = false;
        self.ended = false;
        self.templates_deep = 0;
        self.sectioning_depth = 0;
        self.has_visible_main = false;
        self.has_meta_charset = false;
        self.has_content_type_pragma = false;
        self.has_meta_description = false;
        self.has_autofocus = false;
        self.has_top_level_h1 = false;
        self.second_level_h1s.clear();
    }

    pub fn start_document(&mut self) -> CheckResult {
        self.reset();
        self.started = true;
        log::debug!("document check started");
        Ok(())
    }

    /// Final event of a document. Settles every deferred reference and
    /// emits the cross-document heading advisories.
    pub fn end_document(&mut self) -> CheckResult {
        if !self.started {
            return Err(CheckError::Lifecycle("end_document before start_document"));
        }
        if self.ended {
            return Err(CheckError::Lifecycle("end_document called twice"));
        }
        self.ledger.resolve_all(&mut self.diagnostics);
        if self.has_top_level_h1 {
            let locations = std::mem::take(&mut self.second_level_h1s);
            for locator in locations {
                self.warn(
                    "Consider using the “h1” element as a top-level heading only (all \
                     “h1” elements are treated as top-level headings by many screen \
                     readers and other tools).",
                    &locator,
                );
            }
        }
        self.ended = true;
        log::debug!(
            "document check finished with {} diagnostics",
            self.diagnostics.len()
        );
        Ok(())
    }

    fn err(&mut self, message: impl Into<String>, locator: &Locator) {
        self.diagnostics
            .push(Diagnostic::error(message, locator.clone()));
    }

    fn warn(&mut self, message: impl Into<String>, locator: &Locator) {
        self.diagnostics
            .push(Diagnostic::warning(message, locator.clone()));
    }

    fn ensure_open(&self) -> CheckResult {
        if !self.started || self.ended {
            return Err(CheckError::Lifecycle("event outside an open document"));
        }
        Ok(())
    }

    pub fn start_element(
        &mut self,
        name: &str,
        ns: Namespace,
        attributes: &Attributes,
        locator: &Locator,
    ) -> CheckResult {
        self.ensure_open()?;
        if ns.is_html() && name == "template" {
            self.templates_deep += 1;
            if self.templates_deep > 1 {
                return Ok(());
            }
        } else if self.templates_deep > 0 {
            return Ok(());
        }
        if self.stack.depth() >= self.config.max_depth {
            return Err(CheckError::DepthLimit(self.config.max_depth));
        }

        if ns.is_html() {
            self.start_html_element(name, attributes, locator)
        } else {
            self.start_foreign_element(name, ns, attributes, locator)
        }
    }

    fn start_foreign_element(
        &mut self,
        _name: &str,
        ns: Namespace,
        attributes: &Attributes,
        locator: &Locator,
    ) -> CheckResult {
        let parent_mask = self.stack.current().map_or(0, |f| f.mask);
        let parent_role = self.stack.current().and_then(|f| f.role.clone());
        let role = attributes.get("role").map(str::to_owned);
        let ids: Vec<String> = attributes.ids().map(str::to_owned).collect();

        // svg/math roots are embedded content for figure purposes
        if matches!(ns, Namespace::Svg | Namespace::MathMl)
            && parent_mask & SpecialAncestor::Figure.mask() != 0
            && let Some(figure) = self.stack.current_figure()
            && let Some(frame) = self.stack.frame_mut(figure)
        {
            frame.embedded_content_found = true;
        }

        self.check_aria_common(
            role.as_deref(),
            parent_role.as_deref(),
            None,
            &ids,
            attributes,
            locator,
        );
        self.resolve_active_descendants(&ids);
        self.ledger
            .record_ids(ids.iter().map(String::as_str), false, false, false);

        let mut frame = Frame {
            mask: parent_mask,
            name: None,
            locator: locator.clone(),
            role,
            active_descendant: attributes.get("aria-activedescendant").map(str::to_owned),
            ..Frame::default()
        };
        if frame.active_descendant.is_some() {
            frame.pending_active_descendant = Some(locator.clone());
        }
        self.stack.push(frame, false, false, false);
        Ok(())
    }

    fn start_html_element(
        &mut self,
        name: &str,
        attributes: &Attributes,
        locator: &Locator,
    ) -> CheckResult {
        let parent_mask = self.stack.current().map_or(0, |f| f.mask);
        let parent_name = self.stack.current().and_then(|f| f.name.clone());
        let parent_role = self.stack.current().and_then(|f| f.role.clone());

        let role = attributes.get("role").map(str::to_owned);
        let has_href = attributes.has("href");
        let ids: Vec<String> = attributes.ids().map(str::to_owned).collect();
        let input_type = attributes
            .get("type")
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "text".to_owned());
        let hidden_input = name == "input" && input_type == "hidden";

        // table grid wiring
        match name {
            "table" => self.tables.push(TableGrid::new()),
            "thead" | "tbody" | "tfoot" => {
                if let Some(grid) = self.tables.last_mut() {
                    grid.start_row_group(name);
                }
            }
            "tr" => {
                if let Some(grid) = self.tables.last_mut() {
                    grid.start_row(self.config.max_table_rows)?;
                }
            }
            "td" | "th" => {
                if let Some(grid) = self.tables.last_mut() {
                    let colspan = attributes
                        .get("colspan")
                        .and_then(attrs::parse_non_negative)
                        .unwrap_or(1)
                        .max(1);
                    let rowspan = match attributes.get("rowspan") {
                        Some(value) => attrs::parse_non_negative(value).unwrap_or(1),
                        None => 1,
                    };
                    let headers: Vec<String> = attributes
                        .get("headers")
                        .map(|value| attrs::split_tokens(value).map(str::to_owned).collect())
                        .unwrap_or_default();
                    grid.cell(
                        colspan,
                        rowspan,
                        headers,
                        name == "th",
                        attributes.get("id"),
                        locator.clone(),
                        &mut self.diagnostics,
                    )?;
                }
            }
            _ => {}
        }

        // stateless attribute checks
        if let Some(message) = attrs::obsolete_element_message(name) {
            self.err(message, locator);
        }
        attrs::check_obsolete_attributes(name, attributes, locator, &mut self.diagnostics);
        attrs::check_microdata(attributes, locator, &mut self.diagnostics);
        attrs::check_redundant_aria_state(attributes, locator, &mut self.diagnostics);
        if attributes.has("rev") {
            self.err(
                "The “rev” attribute is obsolete. Use the “rel” attribute instead, \
                 with a term having the opposite meaning.",
                locator,
            );
        }
        match name {
            "input" => {
                attrs::check_input_attributes(attributes, locator, &mut self.diagnostics)
            }
            "progress" => attrs::check_progress(attributes, locator, &mut self.diagnostics),
            "meter" => attrs::check_meter(attributes, locator, &mut self.diagnostics),
            "script" => attrs::check_script(attributes, locator, &mut self.diagnostics),
            "style" => attrs::check_style_element(attributes, locator, &mut self.diagnostics),
            "form" => attrs::check_form(attributes, locator, &mut self.diagnostics),
            "object" => attrs::check_object(attributes, locator, &mut self.diagnostics),
            "bdo" => attrs::check_bdo(attributes, locator, &mut self.diagnostics),
            "map" => attrs::check_map(attributes, locator, &mut self.diagnostics),
            "track" => attrs::check_track(attributes, locator, &mut self.diagnostics),
            _ => {}
        }

        if let Some(css) = attributes.get("style") {
            for finding in self.collab.style.check(css) {
                self.err(format!("CSS: {}", finding.message), locator);
            }
        }

        if attributes.has("autofocus") {
            if self.has_autofocus {
                self.err(
                    "A document must not contain more than one element with an \
                     “autofocus” attribute.",
                    locator,
                );
            } else {
                self.has_autofocus = true;
            }
        }

        if let (Some(lang), Some(xml_lang)) =
            (attributes.get("lang"), attributes.get_xml("lang"))
            && !lang.eq_ignore_ascii_case(xml_lang)
        {
            self.err(
                "When the attribute “xml:lang” in the XML namespace is specified, \
                 the element must also have the attribute “lang” present with the \
                 same value.",
                locator,
            );
        }

        if name.contains('-') {
            if attributes.has("is") {
                self.err(
                    "Autonomous custom elements must not specify the “is” attribute.",
                    locator,
                );
            }
            if let Err(violation) = self.collab.custom_element_name.validate(name) {
                self.err(
                    format!("“{name}” is not a valid custom element name: {}", violation.message),
                    locator,
                );
            }
        }

        self.check_exclusions(name, attributes, &input_type, role.as_deref(), parent_mask, locator);

        // ancestor requirements
        if name == "area" && parent_mask & SpecialAncestor::Map.mask() == 0 {
            self.err(
                "The “area” element must have an ancestor “map” element.",
                locator,
            );
        }
        if name == "img" {
            self.check_img(attributes, parent_mask, locator);
            if parent_name.as_deref() == Some("picture") && attributes.has("srcset") {
                self.check_picture_sources();
            }
        }
        if name == "source"
            && parent_name.as_deref() == Some("picture")
            && let Some(parent) = self.stack.current_mut()
        {
            parent.picture_sources.push(PendingSource {
                locator: locator.clone(),
                media: attributes.get("media").map(str::to_owned),
                has_type: attributes.has("type"),
            });
        }
        if matches!(name, "img" | "source")
            && let Some(srcset) = attributes.get("srcset")
        {
            let sizes = attributes.get("sizes");
            match self.collab.srcset.validate(srcset, sizes.is_some()) {
                Err(violation) => self.err(
                    format!(
                        "Bad value “{srcset}” for attribute “srcset” on element “{name}”: {}",
                        violation.message
                    ),
                    locator,
                ),
                Ok(info) => {
                    if info.has_width_descriptor && sizes.is_none() {
                        self.err(
                            "When the “srcset” attribute has any image candidate string \
                             with a width descriptor, the “sizes” attribute must also be \
                             specified.",
                            locator,
                        );
                    }
                }
            }
        }
        if matches!(name, "img" | "source")
            && attributes.has("sizes")
            && !attributes.has("srcset")
        {
            self.err(
                "The “sizes” attribute may be specified only if the “srcset” \
                 attribute is also present.",
                locator,
            );
        }

        if name == "table" {
            if attributes.has("summary") {
                self.err(
                    "The “summary” attribute is obsolete. Consider describing the \
                     structure of the “table” in a “caption” element or in a “figure” \
                     element containing the “table”.",
                    locator,
                );
            }
            if attributes.has("border") {
                self.err(
                    "The “border” attribute on the “table” element is obsolete. \
                     Use CSS instead.",
                    locator,
                );
            }
        }

        if name == "track" && attributes.has("default") {
            self.check_duplicate_default_track(locator);
        }

        if name == "main" {
            self.check_main(attributes, locator);
        }
        if name == "h1" {
            match self.sectioning_depth {
                0 => self.has_top_level_h1 = true,
                1 => self.second_level_h1s.push(locator.clone()),
                _ => self.warn(
                    "Consider using the “h1” element as a top-level heading only (all \
                     “h1” elements are treated as top-level headings by many screen \
                     readers and other tools).",
                    locator,
                ),
            }
        }
        if is_heading(name)
            && let Some(sectioning) = self.stack.current_sectioning()
            && let Some(frame) = self.stack.frame_mut(sectioning)
        {
            frame.heading_found = true;
        }
        // an img with non-empty alt makes an enclosing heading non-empty
        if name == "img"
            && parent_mask & HEADING_MASK != 0
            && attributes.get("alt").is_some_and(|alt| !alt.is_empty())
            && let Some(heading) = self.stack.current_heading()
            && let Some(frame) = self.stack.frame_mut(heading)
        {
            frame.img_found = true;
        }

        if name == "meta" {
            self.check_meta(attributes, locator);
        }
        if name == "link" {
            self.check_link(attributes, parent_mask, locator);
        }

        if name == "input" {
            if attributes
                .get("name")
                .is_some_and(|v| v.eq_ignore_ascii_case("isindex"))
            {
                self.err(
                    "Attribute “name” with value “isindex” on element “input” is obsolete.",
                    locator,
                );
            }
            if input_type == "button"
                && attributes.get("value").is_none_or(str::is_empty)
            {
                self.err(
                    "Element “input” with attribute “type” whose value is “button” \
             must have non-empty attribute “value”.",
                    locator,
                );
            }
            if let Some(value) = attributes.get("autocomplete")
                && !value.eq_ignore_ascii_case("on")
                && !value.eq_ignore_ascii_case("off")
                && !value.is_empty()
                && let Err(violation) = self
                    .collab
                    .autocomplete
                    .validate(value, autofill_field(&input_type))
            {
                self.err(
                    format!(
                        "Bad value “{value}” for attribute “autocomplete” on element \
                         “input”: {}",
                        violation.message
                    ),
                    locator,
                );
            }
            if let Some(list) = attributes.get("list") {
                self.ledger.record_input_list(list, locator.clone());
            }
        }

        if name == "option"
            && let Some(parent) = self.stack.current_mut()
            && !parent.option_found
        {
            match attributes.get("value") {
                None => parent.no_value_option_found = true,
                Some("") => parent.empty_value_option_found = true,
                Some(_) => parent.non_empty_option = Some(locator.clone()),
            }
        }
        if name == "option" && attributes.has("selected") {
            let mut violations = 0;
            for frame in self.stack.iter_open_mut() {
                if frame.single_select {
                    if frame.selected_option_seen {
                        violations += 1;
                    } else {
                        frame.selected_option_seen = true;
                    }
                }
            }
            for _ in 0..violations {
                self.err(
                    "A “select” element whose “multiple” attribute is absent must \
                     not have more than one selected “option” descendant.",
                    locator,
                );
            }
        }

        if is_labelable(name) && !hidden_input {
            self.check_labelable(name, &ids, parent_mask, locator);
        }

        // deferred cross-references
        let form_control = is_labelable(name) && !hidden_input;
        self.ledger.record_ids(
            ids.iter().map(String::as_str),
            form_control,
            name == "form",
            name == "datalist",
        );
        if matches!(
            name,
            "button" | "fieldset" | "input" | "object" | "output" | "select" | "textarea"
        ) && let Some(form) = attributes.get("form")
        {
            self.ledger.record_form_owner(form, locator.clone());
        }
        if name == "label"
            && let Some(for_value) = attributes.get("for")
        {
            self.ledger.record_label_for(for_value, locator.clone());
        }

        if let Some(role) = role.as_deref() {
            self.check_unnecessary_role(
                name,
                role,
                &input_type,
                parent_name.as_deref(),
                has_href,
                locator,
            );
        }
        self.check_aria_common(
            role.as_deref(),
            parent_role.as_deref(),
            Some(name),
            &ids,
            attributes,
            locator,
        );
        if attributes.has("aria-label")
            && role.is_none()
            && registry::INTERACTIVE_ELEMENTS.binary_search(&name).is_err()
            && !(is_labelable(name) && !hidden_input)
            && ARIA_LABEL_OK.binary_search(&name).is_err()
        {
            self.warn("Possible misuse of \u{201c}aria-label\u{201d}.", locator);
        }
        self.resolve_active_descendants(&ids);

        // figure accounting: the first img can be the captioned subject,
        // anything further counts as embedded content
        if parent_mask & SpecialAncestor::Figure.mask() != 0
            && let Some(figure) = self.stack.current_figure()
            && let Some(frame) = self.stack.frame_mut(figure)
        {
            if name == "img" {
                if frame.img_found {
                    frame.embedded_content_found = true;
                } else {
                    frame.img_found = true;
                }
            } else if is_embedded_content(name) {
                frame.embedded_content_found = true;
            }
        }

        // build and push the new frame
        let mut mask = parent_mask;
        if let Some(category) = SpecialAncestor::from_name(name) {
            // an anchor is a special ancestor only while it is a hyperlink
            if category != SpecialAncestor::A || has_href {
                mask |= category.mask();
            }
        }
        if name == "a" && has_href {
            mask |= HREF_MASK;
        }
        let label_for = if name == "label" {
            attributes.get("for").map(str::to_owned)
        } else {
            None
        };
        if label_for.is_some() {
            mask |= LABEL_FOR_MASK;
        }

        let active_descendant = attributes.get("aria-activedescendant").map(str::to_owned);
        let aria_owns = attributes.has("aria-owns");
        let mut frame = Frame {
            mask,
            name: Some(name.to_owned()),
            locator: locator.clone(),
            role,
            label_for,
            collect_text: name == "style",
            single_select: name == "select" && !attributes.has("multiple"),
            open_label: (name == "label").then(|| locator.clone()),
            media: matches!(name, "audio" | "video").then(|| MediaState {
                locator: locator.clone(),
                default_track_seen: false,
            }),
            pending_active_descendant: (active_descendant.is_some() && !aria_owns)
                .then(|| locator.clone()),
            active_descendant,
            ..Frame::default()
        };
        if name == "select" && attributes.has("required") && !attributes.has("multiple") {
            let size = attributes
                .get("size")
                .and_then(attrs::parse_non_negative)
                .unwrap_or(1);
            if size <= 1 {
                frame.option_needed = true;
            }
        }
        if is_sectioning(name) {
            self.sectioning_depth += 1;
            if attributes
                .get("aria-label")
                .is_some_and(|label| !label.is_empty())
            {
                frame.heading_found = true;
            }
        }
        self.stack
            .push(frame, name == "figure", is_heading(name), is_sectioning(name));
        Ok(())
    }

    /// Special-ancestor exclusions plus the interactive-content rules.
    fn check_exclusions(
        &mut self,
        name: &str,
        attributes: &Attributes,
        input_type: &str,
        role: Option<&str>,
        parent_mask: u32,
        locator: &Locator,
    ) {
        let a_button = registry::A_BUTTON_MASK;

        // an a element is interactive content only when it is a hyperlink
        let inert_anchor = name == "a" && !attributes.has("href");
        let name_mask = if inert_anchor {
            0
        } else {
            registry::prohibited_ancestor_mask(name)
        };
        if name_mask != 0 {
            self.report_exclusions(
                format!("The element “{name}”"),
                name_mask,
                parent_mask,
                locator,
            );
        }
        if !inert_anchor && registry::INTERACTIVE_ELEMENTS.binary_search(&name).is_ok() {
            // a/button exclusion is already folded into the name-keyed mask
            self.check_interactive_ancestor_role(format!("The element “{name}”"), locator);
        }

        let mut attr_subject: Option<String> = None;
        if matches!(name, "audio" | "video") && attributes.has("controls") {
            attr_subject = Some(format!(
                "The element “{name}” with the attribute “controls”"
            ));
        } else if name == "menu"
            && attributes
                .get("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("toolbar"))
        {
            attr_subject = Some("The element “menu” with the attribute “type=toolbar”".to_owned());
        } else if matches!(name, "img" | "object") && attributes.has("usemap") {
            attr_subject = Some(format!("The element “{name}” with the attribute “usemap”"));
        } else if name == "input" && input_type != "hidden" {
            attr_subject = Some("The element “input”".to_owned());
        } else if attributes.has("tabindex") {
            attr_subject = Some("An element with the attribute “tabindex”".to_owned());
        } else if let Some(role) = role
            && aria::is_interactive_role(role)
        {
            attr_subject = Some(format!("An element with the attribute “role={role}”"));
        }
        if let Some(subject) = attr_subject {
            self.report_exclusions(subject.clone(), a_button, parent_mask, locator);
            self.check_interactive_ancestor_role(subject, locator);
        }
    }

    fn report_exclusions(
        &mut self,
        subject: String,
        mask: u32,
        parent_mask: u32,
        locator: &Locator,
    ) {
        let hit = mask & parent_mask;
        if hit == 0 {
            return;
        }
        let ancestors: Vec<&'static str> = registry::category_names(hit).collect();
        for ancestor in ancestors {
            self.err(
                format!(
                    "{subject} must not appear as a descendant of the “{ancestor}” element."
                ),
                locator,
            );
        }
    }

    /// Walks the open stack for explicit `role=button`/`role=link` ancestors.
    fn check_interactive_ancestor_role(&mut self, subject: String, locator: &Locator) {
        let mut offending: Vec<&'static str> = Vec::new();
        for frame in self.stack.iter_open() {
            if let Some(role) = frame.role.as_deref()
                && let Ok(index) =
                    aria::PROHIBITED_INTERACTIVE_ANCESTOR_ROLES.binary_search(&role)
            {
                offending.push(aria::PROHIBITED_INTERACTIVE_ANCESTOR_ROLES[index]);
            }
        }
        for role in offending {
            self.err(
                format!(
                    "{subject} must not appear as a descendant of an element with \
                     the attribute “role={role}”."
                ),
                locator,
            );
        }
    }

    fn check_img(&mut self, attributes: &Attributes, parent_mask: u32, locator: &Locator) {
        if attributes.has("ismap") && parent_mask & HREF_MASK == 0 {
            self.err(
                "The “img” element with the “ismap” attribute set must have an “a” \
                 ancestor with the “href” attribute.",
                locator,
            );
        }
        if attributes.has("alt") {
            return;
        }
        let titled = attributes.get("title").is_some_and(|t| !t.is_empty());
        if titled {
            return;
        }
        if parent_mask & SpecialAncestor::Figure.mask() != 0
            && let Some(figure) = self.stack.current_figure()
            && let Some(frame) = self.stack.frame_mut(figure)
        {
            // decided when the figure closes: a figcaption can vouch for it
            frame.figcaption_needed = true;
            frame.images_lacking_alt.push(locator.clone());
            return;
        }
        self.err(img_alt_message(), locator);
    }

    /// Judges the pending `source` siblings once `img[srcset]` arrives
    /// under a `picture`.
    fn check_picture_sources(&mut self) {
        let Some(parent) = self.stack.current_mut() else {
            return;
        };
        let sources = std::mem::take(&mut parent.picture_sources);
        for source in sources {
            if source.media.is_none() && !source.has_type {
                self.err(
                    "A “source” element that has a following sibling “source” element \
                     or “img” element with a “srcset” attribute must have a “media” \
                     attribute and/or “type” attribute.",
                    &source.locator,
                );
            } else if source.media.as_deref() == Some("") {
                self.err("Value of “media” attribute must not be empty.", &source.locator);
            } else if source
                .media
                .as_deref()
                .is_some_and(|m| m.trim().eq_ignore_ascii_case("all"))
            {
                self.err(
                    "Value of “media” attribute here must not be “all”.",
                    &source.locator,
                );
            }
        }
    }

    fn check_duplicate_default_track(&mut self, locator: &Locator) {
        let mut duplicates = 0;
        for frame in self.stack.iter_open_mut() {
            if let Some(media) = frame.media.as_mut() {
                if media.default_track_seen {
                    duplicates += 1;
                } else {
                    media.default_track_seen = true;
                }
            }
        }
        for _ in 0..duplicates {
            self.err(
                "The “default” attribute must not occur on more than one “track” \
                 element per media element.",
                locator,
            );
        }
    }

    fn check_main(&mut self, attributes: &Attributes, locator: &Locator) {
        let offending: Vec<String> = self
            .stack
            .iter_open()
            .filter_map(|frame| frame.name.as_deref())
            .filter(|name| registry::PROHIBITED_MAIN_ANCESTORS.binary_search(name).is_ok())
            .map(str::to_owned)
            .collect();
        for ancestor in offending {
            self.err(
                format!(
                    "The “main” element must not appear as a descendant of the \
                     “{ancestor}” element."
                ),
                locator,
            );
        }
        if !attributes.has("hidden") {
            if self.has_visible_main {
                self.err(
                    "A document must not include more than one visible “main” element.",
                    locator,
                );
            } else {
                self.has_visible_main = true;
            }
        }
    }

    fn check_labelable(
        &mut self,
        name: &str,
        ids: &[String],
        parent_mask: u32,
        locator: &Locator,
    ) {
        // at most one labelable descendant per label
        let mut label_locators: Vec<Locator> = Vec::new();
        for frame in self.stack.iter_open_mut() {
            if let Some(label) = frame.open_label.clone() {
                if frame.labeled_descendant_seen {
                    label_locators.push(label);
                } else {
                    frame.labeled_descendant_seen = true;
                }
            }
        }
        for label in label_locators {
            self.err(
                "The “label” element may contain at most one “button”, “input”, \
                 “meter”, “output”, “progress”, “select”, or “textarea” descendant.",
                locator,
            );
            self.warn(
                "This “label” element contains more than one labelable descendant.",
                &label,
            );
        }

        // some label[for] ancestor must point at this control
        if parent_mask & LABEL_FOR_MASK != 0 {
            let mut matched = false;
            for frame in self.stack.iter_open() {
                if frame.mask & LABEL_FOR_MASK == 0 {
                    break;
                }
                if let Some(for_value) = frame.label_for.as_deref()
                    && ids.iter().any(|id| id == for_value)
                {
                    matched = true;
                    break;
                }
            }
            if !matched {
                self.err(
                    format!(
                        "Any “{name}” descendant of a “label” element with a “for” \
                         attribute must have an ID value that matches that “for” \
                         attribute."
                    ),
                    locator,
                );
            }
        }
    }

    fn check_meta(&mut self, attributes: &Attributes, locator: &Locator) {
        if let Some(charset) = attributes.get("charset") {
            if !charset.eq_ignore_ascii_case("utf-8") {
                self.err(
                    "The only allowed value for the “charset” attribute of the \
                     “meta” element is “utf-8”.",
                    locator,
                );
            }
            if self.has_meta_charset {
                self.err(
                    "A document must not include more than one “meta” element with \
                     a “charset” attribute.",
                    locator,
                );
            }
            if self.has_content_type_pragma {
                self.err(both_encoding_declarations_message(), locator);
            }
            self.has_meta_charset = true;
        }
        if let Some(http_equiv) = attributes.get("http-equiv") {
            if http_equiv.eq_ignore_ascii_case("content-type") {
                if self.has_meta_charset {
                    self.err(both_encoding_declarations_message(), locator);
                }
                if self.has_content_type_pragma {
                    self.err(
                        "A document must not include more than one “meta” element \
                         with an “http-equiv” attribute whose value is “content-type”.",
                        locator,
                    );
                }
                self.has_content_type_pragma = true;
            } else if http_equiv.eq_ignore_ascii_case("content-language") {
                self.err(
                    "Using the “meta” element to specify the document-wide default \
                     language is obsolete. Consider specifying the language on the \
                     root element instead.",
                    locator,
                );
            } else if http_equiv.eq_ignore_ascii_case("x-ua-compatible")
                && !attributes
                    .get("content")
                    .is_some_and(|c| c.eq_ignore_ascii_case("ie=edge"))
            {
                self.err(
                    "A “meta” element with an “http-equiv” attribute whose value is \
                     “X-UA-Compatible” must have a “content” attribute with the value \
                     “IE=edge”.",
                    locator,
                );
            }
        }
        match attributes.get("name") {
            Some(name) if name.eq_ignore_ascii_case("description") => {
                if self.has_meta_description {
                    self.err(
                        "A document must not include more than one “meta” element \
                         with its “name” attribute set to the value “description”.",
                        locator,
                    );
                }
                self.has_meta_description = true;
            }
            Some(name) if name.eq_ignore_ascii_case("viewport") => {
                let content = attributes.get("content").unwrap_or("").to_ascii_lowercase();
                let restricts_zoom = content.split(',').map(str::trim).any(|part| {
                    part == "user-scalable=no"
                        || part
                            .strip_prefix("maximum-scale=")
                            .and_then(|v| v.trim().parse::<f64>().ok())
                            .is_some_and(|scale| scale < 2.0)
                });
                if restricts_zoom {
                    self.warn(
                        "Consider avoiding viewport values that prevent users from \
                         resizing documents.",
                        locator,
                    );
                }
            }
            Some(name) if name.eq_ignore_ascii_case("theme-color") => {
                let content = attributes.get("content").unwrap_or("");
                if let Err(violation) = self.collab.color.validate(content) {
                    self.err(
                        format!(
                            "Bad value “{content}” for attribute “content” on element \
                             “meta”: {}",
                            violation.message
                        ),
                        locator,
                    );
                }
            }
            _ => {}
        }
    }

    fn check_link(&mut self, attributes: &Attributes, parent_mask: u32, locator: &Locator) {
        let rel: Vec<String> = attributes
            .get("rel")
            .map(|value| {
                attrs::split_tokens(value)
                    .map(str::to_ascii_lowercase)
                    .collect()
            })
            .unwrap_or_default();
        let has_rel = |keyword: &str| rel.iter().any(|token| token == keyword);

        if attributes.has("as") && !has_rel("preload") && !has_rel("modulepreload") {
            self.err(
                "The “as” attribute on a “link” element must not be used unless the \
                 “rel” attribute contains “preload” or “modulepreload”.",
                locator,
            );
        }
        if attributes.has("integrity")
            && !has_rel("stylesheet")
            && !has_rel("preload")
            && !has_rel("modulepreload")
        {
            self.err(
                "The “integrity” attribute on a “link” element must not be used \
                 unless the “rel” attribute contains “stylesheet”, “preload”, or \
                 “modulepreload”.",
                locator,
            );
        }
        if attributes.has("sizes")
            && !has_rel("icon")
            && !has_rel("apple-touch-icon")
            && !has_rel("apple-touch-icon-precomposed")
        {
            self.err(
                "The “sizes” attribute on a “link” element must not be used unless \
                 the “rel” attribute contains “icon” or “apple-touch-icon”.",
                locator,
            );
        }
        if attributes.has("color") && !has_rel("mask-icon") {
            self.err(
                "The “color” attribute on a “link” element must not be used unless \
                 the “rel” attribute contains “mask-icon”.",
                locator,
            );
        }
        for attribute in ["scope", "updateviacache", "workertype"] {
            if attributes.has(attribute) && !has_rel("serviceworker") {
                self.err(
                    format!(
                        "The “{attribute}” attribute on a “link” element must not be \
                         used unless the “rel” attribute contains “serviceworker”."
                    ),
                    locator,
                );
            }
        }
        let body_ok = rel
            .iter()
            .any(|token| BODY_OK_REL.contains(&token.as_str()))
            || attributes.has("itemprop")
            || attributes.has("property");
        if parent_mask & SpecialAncestor::Body.mask() != 0 && !body_ok {
            self.err(
                "A “link” element must not appear as a descendant of a “body” \
                 element unless the “link” element has an “itemprop” attribute or \
                 has a “rel” attribute whose value is body-ok.",
                locator,
            );
        }
    }

    fn check_unnecessary_role(
        &mut self,
        name: &str,
        role: &str,
        input_type: &str,
        parent_name: Option<&str>,
        has_href: bool,
        locator: &Locator,
    ) {
        let unnecessary = format!("The “{role}” role is unnecessary for element “{name}”.");
        match name {
            "a" | "area" | "link" => {
                if has_href && role == "link" {
                    self.warn(unnecessary, locator);
                }
            }
            "input" => {
                if aria::input_type_implicit_role(input_type) == Some(role) {
                    self.warn(
                        format!(
                            "The “{role}” role is unnecessary for “input” elements \
                             that have a “type” attribute whose value is “{input_type}”."
                        ),
                        locator,
                    );
                }
            }
            "th" => {
                if aria::TH_IMPLICIT_ROLES.binary_search(&role).is_ok() {
                    self.warn(unnecessary, locator);
                }
            }
            "li" => {
                if role == "listitem" && matches!(parent_name, Some("ol") | Some("ul")) {
                    self.warn(unnecessary, locator);
                }
            }
            _ if aria::never_needs_role(name, role) => {}
            _ => {
                if aria::implicit_role(name) == Some(role) {
                    self.warn(unnecessary, locator);
                }
            }
        }
    }

    /// ARIA bookkeeping shared by the HTML and foreign paths: idref
    /// collection, role-containment checks, and `aria-owns` registration.
    fn check_aria_common(
        &mut self,
        role: Option<&str>,
        parent_role: Option<&str>,
        name: Option<&str>,
        ids: &[String],
        attributes: &Attributes,
        locator: &Locator,
    ) {
        for attribute in aria::IDREF_ATTRIBUTES {
            if let Some(value) = attributes.get(attribute) {
                for token in attrs::split_tokens(value) {
                    self.ledger.record_aria_ref(attribute, token, locator.clone());
                }
            }
        }

        let Some(role) = role else {
            return;
        };
        if let Some(owned) = attributes.get("aria-owns") {
            self.ledger.record_owns(role, attrs::split_tokens(owned));
        }
        let Some(required) = aria::required_ancestor_roles(role) else {
            return;
        };
        if parent_role == Some("presentation") {
            return;
        }
        if matches!(name, Some("tbody") | Some("tfoot") | Some("thead")) {
            // implicit rowgroup containment is checked structurally elsewhere
            return;
        }
        // an explicit role on an ancestor does not mask its name-implied one
        let satisfied = self.stack.iter_open().any(|frame| {
            frame
                .role
                .as_deref()
                .is_some_and(|ancestor_role| required.contains(&ancestor_role))
                || frame
                    .name
                    .as_deref()
                    .is_some_and(|n| required.iter().any(|r| aria::element_implies_role(n, r)))
        });
        if satisfied {
            return;
        }
        match ids.first() {
            Some(id) => self
                .ledger
                .record_needs_owner(id, role, locator.clone()),
            None => self.err(
                format!(
                    "An element with “role={role}” must be contained in, or owned \
                     by, an element with {}.",
                    aria::render_role_set(required)
                ),
                locator,
            ),
        }
    }

    /// Any element carrying one of `ids` settles an open
    /// `aria-activedescendant` obligation anywhere below it.
    fn resolve_active_descendants(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for frame in self.stack.iter_open_mut() {
            if frame.pending_active_descendant.is_some()
                && frame
                    .active_descendant
                    .as_deref()
                    .is_some_and(|target| ids.iter().any(|id| id == target))
            {
                frame.pending_active_descendant = None;
            }
        }
    }

    pub fn characters(&mut self, text: &str, locator: &Locator) -> CheckResult {
        self.ensure_open()?;
        if self.templates_deep > 0 {
            return Ok(());
        }
        let depth = self.stack.depth();
        let Some(top) = depth.checked_sub(1) else {
            return Ok(());
        };
        if let Some(frame) = self.stack.current_mut()
            && frame.collect_text
        {
            frame.text_content.push_str(text);
        }
        if !text
            .chars()
            .any(|c| !matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'))
        {
            return Ok(());
        }

        let (name, mask) = {
            let frame = self.stack.frame(top).map(|f| (f.name.clone(), f.mask));
            match frame {
                Some((name, mask)) => (name, mask),
                None => return Ok(()),
            }
        };
        let name = name.as_deref();

        if mask & HEADING_MASK != 0 || name.is_some_and(is_heading) {
            if let Some(heading) = self.stack.current_heading()
                && let Some(frame) = self.stack.frame_mut(heading)
            {
                frame.text_found = true;
            }
        } else if name == Some("figcaption")
            || mask & SpecialAncestor::Figcaption.mask() != 0
        {
            if let Some(figure) = self.stack.current_figure() {
                if let Some(frame) = self.stack.frame_mut(figure) {
                    frame.figcaption_content_found = true;
                }
                self.stack.mark_text_in_enclosing_figures(figure);
            }
        } else if name == Some("figure") || mask & SpecialAncestor::Figure.mask() != 0 {
            if let Some(figure) = self.stack.current_figure() {
                if let Some(frame) = self.stack.frame_mut(figure) {
                    frame.text_found = true;
                }
                self.stack.mark_text_in_enclosing_figures(figure);
            }
        } else if name == Some("option")
            && top > 0
            && let Some(parent) = self.stack.frame_mut(top - 1)
            && !parent.option_found
            && (!parent.empty_value_option_found || parent.no_value_option_found)
            && parent.non_empty_option.is_none()
        {
            parent.non_empty_option = Some(locator.clone());
        }
        Ok(())
    }

    pub fn end_element(&mut self, name: &str, ns: Namespace, locator: &Locator) -> CheckResult {
        self.ensure_open()?;
        if ns.is_html() && name == "template" {
            self.templates_deep = self.templates_deep.saturating_sub(1);
            if self.templates_deep > 0 {
                return Ok(());
            }
        } else if self.templates_deep > 0 {
            return Ok(());
        }

        if ns.is_html() {
            match name {
                "table" => {
                    if let Some(mut grid) = self.tables.pop() {
                        grid.end_table(&mut self.diagnostics);
                    }
                }
                "tr" => {
                    if let Some(grid) = self.tables.last_mut() {
                        grid.end_row();
                    }
                }
                "thead" | "tbody" | "tfoot" => {
                    if let Some(grid) = self.tables.last_mut() {
                        grid.end_row_group(&mut self.diagnostics);
                    }
                }
                _ => {}
            }
        }

        let frame = self.stack.pop()?;

        if let Some(pending) = frame.pending_active_descendant.clone() {
            self.warn(
                "The “aria-activedescendant” attribute must refer to a descendant \
                 element.",
                &pending,
            );
        }

        if !ns.is_html() {
            return Ok(());
        }

        match name {
            "figure" => {
                let needs_captioning = (frame.figcaption_needed
                    && !frame.figcaption_content_found)
                    || frame.text_found
                    || frame.embedded_content_found;
                if needs_captioning {
                    for image in &frame.images_lacking_alt {
                        self.err(img_alt_message(), image);
                    }
                }
            }
            "select" => {
                if frame.option_needed {
                    if !frame.option_found {
                        self.err(
                            "A “select” element with a “required” attribute, and \
                             without a “multiple” attribute, and without a “size” \
                             attribute whose value is greater than one, must have a \
                             child “option” element.",
                            locator,
                        );
                    }
                    if let Some(option) = &frame.non_empty_option {
                        self.err(
                            "The first child “option” element of a “select” element \
                             with a “required” attribute, and without a “multiple” \
                             attribute, and without a “size” attribute whose value is \
                             greater than one, must have either an empty “value” \
                             attribute, or must have no text content.",
                            option,
                        );
                    }
                }
            }
            "option" => {
                if let Some(parent) = self.stack.current_mut() {
                    parent.option_found = true;
                }
            }
            "style" => {
                let findings = self.collab.style.check(&frame.text_content);
                for finding in findings {
                    let position = Locator {
                        line: frame.locator.line + finding.line.saturating_sub(1),
                        column: finding.column,
                        source: frame.locator.source.clone(),
                    };
                    self.err(format!("CSS: {}", finding.message), &position);
                }
            }
            "section" => {
                if !frame.heading_found {
                    self.warn(
                        "Section lacks heading. Consider using “h2”-“h6” elements to \
                         add identifying headings to all sections.",
                        &frame.locator,
                    );
                }
            }
            "article" => {
                if !frame.heading_found {
                    self.warn(
                        "Article lacks heading. Consider using “h2”-“h6” elements to \
                         add identifying headings to all articles.",
                        &frame.locator,
                    );
                }
            }
            _ if is_heading(name) => {
                if !frame.text_found && !frame.img_found {
                    self.warn("Empty heading.", &frame.locator);
                }
            }
            _ => {}
        }
        if is_sectioning(name) {
            self.sectioning_depth = self.sectioning_depth.saturating_sub(1);
        }
        Ok(())
    }
}

fn img_alt_message() -> &'static str {
    "An “img” element must have an “alt” attribute, except under certain \
     conditions. For details, consult guidance on providing text alternatives \
     for images."
}

fn both_encoding_declarations_message() -> &'static str {
    "A document must not include both a “meta” element with an “http-equiv” \
     attribute whose value is “content-type”, and a “meta” element with a \
     “charset” attribute."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize) -> Locator {
        Locator::new(line, 1)
    }

    fn open(checker: &mut Checker, name: &str, pairs: &[(&str, &str)], line: usize) {
        let attributes = Attributes::from_pairs(pairs.iter().copied());
        checker
            .start_element(name, Namespace::Html, &attributes, &at(line))
            .unwrap();
    }

    #[test]
    fn frames_build_by_record_update_outside_the_context_module() {
        // the cursor snapshots must stay visible crate-wide for this to work
        let frame = Frame {
            name: Some("div".to_owned()),
            ..Frame::default()
        };
        assert!(frame.saved_figure.is_none());
        assert!(frame.saved_heading.is_none());
        assert!(frame.saved_sectioning.is_none());
    }

    fn close(checker: &mut Checker, name: &str, line: usize) {
        checker.end_element(name, Namespace::Html, &at(line)).unwrap();
    }

    #[test]
    fn events_outside_a_document_are_lifecycle_errors() {
        let mut checker = Checker::new();
        let attributes = Attributes::new();
        assert!(matches!(
            checker.start_element("div", Namespace::Html, &attributes, &at(1)),
            Err(CheckError::Lifecycle(_))
        ));
        checker.start_document().unwrap();
        checker.end_document().unwrap();
        assert!(matches!(
            checker.end_document(),
            Err(CheckError::Lifecycle(_))
        ));
    }

    #[test]
    fn close_without_open_underflows() {
        let mut checker = Checker::new();
        checker.start_document().unwrap();
        assert!(matches!(
            checker.end_element("div", Namespace::Html, &at(1)),
            Err(CheckError::StackUnderflow)
        ));
    }

    #[test]
    fn depth_limit_is_fatal() {
        let mut checker = Checker::with_config(CheckerConfig {
            max_depth: 2,
            ..CheckerConfig::default()
        });
        checker.start_document().unwrap();
        open(&mut checker, "div", &[], 1);
        open(&mut checker, "div", &[], 2);
        let attributes = Attributes::new();
        assert!(matches!(
            checker.start_element("div", Namespace::Html, &attributes, &at(3)),
            Err(CheckError::DepthLimit(2))
        ));
    }

    #[test]
    fn template_content_is_skipped() {
        let mut checker = Checker::new();
        checker.start_document().unwrap();
        open(&mut checker, "template", &[], 1);
        // obsolete element inside a template draws no diagnostic
        open(&mut checker, "center", &[], 2);
        close(&mut checker, "center", 2);
        close(&mut checker, "template", 3);
        checker.end_document().unwrap();
        assert!(checker.diagnostics().is_empty());
    }

    #[test]
    fn reset_clears_pending_state() {
        let mut checker = Checker::new();
        checker.start_document().unwrap();
        open(&mut checker, "label", &[("for", "nowhere")], 1);
        checker.reset();
        checker.start_document().unwrap();
        checker.end_document().unwrap();
        assert!(checker.diagnostics().is_empty());
    }
}
