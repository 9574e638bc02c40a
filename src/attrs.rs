//! Attribute access and the stateless per-element attribute checks.
//!
//! Everything here is a pure function of one element's name and attributes:
//! obsolete markup lookups, the input `type`/attribute compatibility matrix,
//! `meter`/`progress` numeric ordering, microdata attribute dependencies.
//! Checks that need document or ancestor state stay in the checker.

use crate::diagnostic::Diagnostic;
use crate::locator::Locator;
use itertools::Itertools;
use std::sync::LazyLock;

/// Attribute namespace. Only the XML namespace is distinguished, for
/// `xml:lang` and `xml:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrNs {
    #[default]
    None,
    Xml,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub ns: AttrNs,
}

/// The attributes of one element event. Names are expected lowercase, as the
/// upstream HTML parser delivers them.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    attrs: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let attrs = pairs
            .into_iter()
            .map(|(name, value)| Attribute {
                name: name.to_owned(),
                value: value.to_owned(),
                ns: AttrNs::None,
            })
            .collect();
        Self { attrs }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
            ns: AttrNs::None,
        });
    }

    pub fn push_xml(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
            ns: AttrNs::Xml,
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns == AttrNs::None && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn get_xml(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns == AttrNs::Xml && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    /// Every id the element declares: the `id` attribute and `xml:id`,
    /// empty values excluded.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .iter()
            .filter(|a| a.name == "id" && !a.value.is_empty())
            .map(|a| a.value.as_str())
    }
}

/// Splits on ASCII whitespace, the token model of `class`, `headers`,
/// `aria-owns` and friends.
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'))
        .filter(|token| !token.is_empty())
}

/// Non-negative integer per the HTML rules: leading whitespace allowed,
/// digits only, anything trailing ignored. `None` on failure.
pub fn parse_non_negative(value: &str) -> Option<u32> {
    let trimmed = value.trim_start_matches([' ', '\t', '\n', '\r', '\x0c']);
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn parse_float(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

struct ObsoleteElement {
    name: &'static str,
    advice: &'static str,
}

const OBSOLETE_ELEMENTS: &[ObsoleteElement] = &[
    ObsoleteElement { name: "acronym", advice: "Use the “abbr” element instead." },
    ObsoleteElement { name: "applet", advice: "Use the “embed” element or the “object” element instead." },
    ObsoleteElement { name: "basefont", advice: "Use CSS instead." },
    ObsoleteElement { name: "bgsound", advice: "Use the “audio” element instead." },
    ObsoleteElement { name: "big", advice: "Use CSS instead." },
    ObsoleteElement { name: "blink", advice: "Use CSS instead." },
    ObsoleteElement { name: "center", advice: "Use CSS instead." },
    ObsoleteElement { name: "dir", advice: "Use the “ul” element instead." },
    ObsoleteElement { name: "font", advice: "Use CSS instead." },
    ObsoleteElement { name: "frame", advice: "Use the “iframe” element and CSS instead, or use server-side includes." },
    ObsoleteElement { name: "frameset", advice: "Use the “iframe” element and CSS instead, or use server-side includes." },
    ObsoleteElement { name: "isindex", advice: "Use the “form” element in combination with the “input” element instead." },
    ObsoleteElement { name: "keygen", advice: "Generate and manage key pairs on the server instead." },
    ObsoleteElement { name: "listing", advice: "Use the “pre” and “code” elements instead." },
    ObsoleteElement { name: "marquee", advice: "Use CSS instead." },
    ObsoleteElement { name: "menuitem", advice: "To implement a custom context menu, use script." },
    ObsoleteElement { name: "multicol", advice: "Use CSS instead." },
    ObsoleteElement { name: "nobr", advice: "Use CSS instead." },
    ObsoleteElement { name: "noembed", advice: "Use the “object” element with fallback content instead." },
    ObsoleteElement { name: "noframes", advice: "Use the “iframe” element and CSS instead, or use server-side includes." },
    ObsoleteElement { name: "plaintext", advice: "Use the “pre” and “code” elements instead." },
    ObsoleteElement { name: "rb", advice: "Provide the ruby base directly inside the “ruby” element." },
    ObsoleteElement { name: "rtc", advice: "Use the “rt” element instead." },
    ObsoleteElement { name: "spacer", advice: "Use CSS instead." },
    ObsoleteElement { name: "strike", advice: "Use the “del” element or the “s” element instead." },
    ObsoleteElement { name: "tt", advice: "Use CSS instead." },
    ObsoleteElement { name: "xmp", advice: "Use the “pre” and “code” elements instead." },
];

/// Message for an obsolete element, if `name` is one.
pub fn obsolete_element_message(name: &str) -> Option<String> {
    OBSOLETE_ELEMENTS
        .iter()
        .find(|e| e.name == name)
        .map(|e| format!("The “{}” element is obsolete. {}", name, e.advice))
}

struct ObsoleteAttribute {
    attr: &'static str,
    elements: &'static [&'static str],
    advice: &'static str,
}

/// Obsolete attributes with a specific replacement, keyed by attribute name
/// and scoped to the element names they were ever defined on.
const OBSOLETE_ATTRIBUTES: &[ObsoleteAttribute] = &[
    ObsoleteAttribute { attr: "abbr", elements: &["td", "th"], advice: "Consider instead beginning the cell contents with concise text, followed by further elaboration if needed." },
    ObsoleteAttribute { attr: "archive", elements: &["object"], advice: "Use the “data” attribute and the “type” attribute to invoke plugins." },
    ObsoleteAttribute { attr: "axis", elements: &["td", "th"], advice: "Use the “scope” attribute." },
    ObsoleteAttribute { attr: "charset", elements: &["a", "link"], advice: "Use an HTTP Content-Type header on the linked resource instead." },
    ObsoleteAttribute { attr: "classid", elements: &["object"], advice: "Use the “data” attribute and the “type” attribute to invoke plugins." },
    ObsoleteAttribute { attr: "codebase", elements: &["object"], advice: "Use the “data” attribute and the “type” attribute to invoke plugins." },
    ObsoleteAttribute { attr: "codetype", elements: &["object"], advice: "Use the “data” attribute and the “type” attribute to invoke plugins." },
    ObsoleteAttribute { attr: "coords", elements: &["a"], advice: "Use the “area” element instead of the “a” element for image maps." },
    ObsoleteAttribute { attr: "datafld", elements: &["a", "applet", "button", "div", "fieldset", "frame", "iframe", "img", "input", "label", "legend", "marquee", "object", "param", "select", "span", "textarea"], advice: "Use script and a mechanism such as XMLHttpRequest to populate the page dynamically." },
    ObsoleteAttribute { attr: "dataformatas", elements: &["button", "div", "input", "label", "legend", "marquee", "object", "option", "select", "span", "table"], advice: "Use script and a mechanism such as XMLHttpRequest to populate the page dynamically." },
    ObsoleteAttribute { attr: "datasrc", elements: &["a", "applet", "button", "div", "frame", "iframe", "img", "input", "label", "legend", "marquee", "object", "option", "select", "span", "table", "textarea"], advice: "Use script and a mechanism such as XMLHttpRequest to populate the page dynamically." },
    ObsoleteAttribute { attr: "declare", elements: &["object"], advice: "Repeat the “object” element completely each time the resource is to be reused." },
    ObsoleteAttribute { attr: "event", elements: &["script"], advice: "Use DOM events mechanisms instead." },
    ObsoleteAttribute { attr: "for", elements: &["script"], advice: "Use DOM events mechanisms instead." },
    ObsoleteAttribute { attr: "ismap", elements: &["input"], advice: "Unnecessary. Omit it altogether." },
    ObsoleteAttribute { attr: "lowsrc", elements: &["img"], advice: "Use a progressive JPEG image (given in the “src” attribute), instead of using two separate images." },
    ObsoleteAttribute { attr: "methods", elements: &["a", "link"], advice: "Use the HTTP OPTIONS feature instead." },
    ObsoleteAttribute { attr: "name", elements: &["a", "embed", "img", "option"], advice: "Use the “id” attribute instead." },
    ObsoleteAttribute { attr: "nohref", elements: &["area"], advice: "Omitting the “href” attribute is sufficient." },
    ObsoleteAttribute { attr: "profile", elements: &["head"], advice: "Unnecessary. Omit it altogether." },
    ObsoleteAttribute { attr: "scheme", elements: &["meta"], advice: "Use only one scheme per field, or make the scheme declaration part of the value." },
    ObsoleteAttribute { attr: "scope", elements: &["td"], advice: "Use the “scope” attribute on a “th” element instead." },
    ObsoleteAttribute { attr: "scrolling", elements: &["iframe"], advice: "Use CSS instead." },
    ObsoleteAttribute { attr: "standby", elements: &["object"], advice: "Optimize the linked resource so that it loads quickly or, at least, incrementally." },
    ObsoleteAttribute { attr: "target", elements: &["link"], advice: "Unnecessary. Omit it altogether." },
    ObsoleteAttribute { attr: "type", elements: &["param"], advice: "Use the “name” attribute and the “value” attribute without declaring value types." },
    ObsoleteAttribute { attr: "urn", elements: &["a", "link"], advice: "Specify the preferred persistent identifier using the “href” attribute instead." },
    ObsoleteAttribute { attr: "usemap", elements: &["input"], advice: "Use the “img” element instead of the “input” element for image maps." },
    ObsoleteAttribute { attr: "valuetype", elements: &["param"], advice: "Use the “name” attribute and the “value” attribute without declaring value types." },
    ObsoleteAttribute { attr: "version", elements: &["html"], advice: "Unnecessary. Omit it altogether." },
];

struct StyleAttribute {
    attr: &'static str,
    elements: &'static [&'static str],
}

const TABLE_PARTS: &[&str] = &["col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"];

/// Obsolete presentational attributes. All share the same advice: use CSS.
static OBSOLETE_STYLE_ATTRIBUTES: LazyLock<Vec<StyleAttribute>> = LazyLock::new(|| {
    vec![
        StyleAttribute { attr: "alink", elements: &["body"] },
        StyleAttribute { attr: "align", elements: &["caption", "col", "colgroup", "div", "embed", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "iframe", "img", "input", "legend", "object", "p", "table", "tbody", "td", "tfoot", "th", "thead", "tr"] },
        StyleAttribute { attr: "allowtransparency", elements: &["iframe"] },
        StyleAttribute { attr: "background", elements: &["body"] },
        StyleAttribute { attr: "bgcolor", elements: &["body", "table", "td", "th", "tr"] },
        StyleAttribute { attr: "bordercolor", elements: &["table"] },
        StyleAttribute { attr: "cellpadding", elements: &["table"] },
        StyleAttribute { attr: "cellspacing", elements: &["table"] },
        StyleAttribute { attr: "char", elements: TABLE_PARTS },
        StyleAttribute { attr: "charoff", elements: TABLE_PARTS },
        StyleAttribute { attr: "clear", elements: &["br"] },
        StyleAttribute { attr: "compact", elements: &["dl", "menu", "ol", "ul"] },
        StyleAttribute { attr: "frameborder", elements: &["iframe"] },
        StyleAttribute { attr: "frame", elements: &["table"] },
        StyleAttribute { attr: "height", elements: &["col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"] },
        StyleAttribute { attr: "hspace", elements: &["embed", "iframe", "img", "input", "object"] },
        StyleAttribute { attr: "link", elements: &["body"] },
        StyleAttribute { attr: "marginbottom", elements: &["body"] },
        StyleAttribute { attr: "marginheight", elements: &["body", "iframe"] },
        StyleAttribute { attr: "marginleft", elements: &["body"] },
        StyleAttribute { attr: "marginright", elements: &["body"] },
        StyleAttribute { attr: "margintop", elements: &["body"] },
        StyleAttribute { attr: "marginwidth", elements: &["body", "iframe"] },
        StyleAttribute { attr: "noshade", elements: &["hr"] },
        StyleAttribute { attr: "nowrap", elements: &["td", "th"] },
        StyleAttribute { attr: "rules", elements: &["table"] },
        StyleAttribute { attr: "size", elements: &["hr"] },
        StyleAttribute { attr: "text", elements: &["body"] },
        StyleAttribute { attr: "type", elements: &["li", "ul"] },
        StyleAttribute { attr: "valign", elements: TABLE_PARTS },
        StyleAttribute { attr: "vlink", elements: &["body"] },
        StyleAttribute { attr: "vspace", elements: &["embed", "iframe", "img", "input", "object"] },
        StyleAttribute { attr: "width", elements: &["col", "colgroup", "hr", "pre", "table", "tbody", "td", "tfoot", "th", "thead", "tr"] },
    ]
});

/// Reports every obsolete attribute the element carries.
pub fn check_obsolete_attributes(
    name: &str,
    attrs: &Attributes,
    locator: &Locator,
    out: &mut Vec<Diagnostic>,
) {
    for attribute in attrs.iter() {
        if attribute.ns != AttrNs::None {
            continue;
        }
        if let Some(entry) = OBSOLETE_ATTRIBUTES
            .iter()
            .find(|e| e.attr == attribute.name && e.elements.contains(&name))
        {
            out.push(Diagnostic::error(
                format!(
                    "The “{}” attribute on the “{}” element is obsolete. {}",
                    entry.attr, name, entry.advice
                ),
                locator.clone(),
            ));
        } else if OBSOLETE_STYLE_ATTRIBUTES
            .iter()
            .any(|e| e.attr == attribute.name && e.elements.contains(&name))
        {
            out.push(Diagnostic::error(
                format!(
                    "The “{}” attribute on the “{}” element is obsolete. Use CSS instead.",
                    attribute.name, name
                ),
                locator.clone(),
            ));
        }
    }
}

struct InputAttribute {
    attr: &'static str,
    types: &'static [&'static str],
}

const TEXTUAL: &[&str] = &["text", "search", "url", "tel", "email", "password"];
const DATEISH: &[&str] = &["date", "month", "week", "time", "datetime-local", "number", "range"];

/// Which `input` types each type-restricted attribute is allowed on.
const INPUT_ATTRIBUTES: &[InputAttribute] = &[
    InputAttribute { attr: "accept", types: &["file"] },
    InputAttribute { attr: "alt", types: &["image"] },
    InputAttribute { attr: "autocomplete", types: &["hidden", "text", "search", "url", "tel", "email", "password", "date", "month", "week", "time", "datetime-local", "number", "range", "color"] },
    InputAttribute { attr: "capture", types: &["file"] },
    InputAttribute { attr: "checked", types: &["checkbox", "radio"] },
    InputAttribute { attr: "dirname", types: &["text", "search"] },
    InputAttribute { attr: "formaction", types: &["submit", "image"] },
    InputAttribute { attr: "formenctype", types: &["submit", "image"] },
    InputAttribute { attr: "formmethod", types: &["submit", "image"] },
    InputAttribute { attr: "formnovalidate", types: &["submit", "image"] },
    InputAttribute { attr: "formtarget", types: &["submit", "image"] },
    InputAttribute { attr: "height", types: &["image"] },
    InputAttribute { attr: "list", types: &["text", "search", "url", "tel", "email", "date", "month", "week", "time", "datetime-local", "number", "range", "color"] },
    InputAttribute { attr: "max", types: DATEISH },
    InputAttribute { attr: "maxlength", types: TEXTUAL },
    InputAttribute { attr: "min", types: DATEISH },
    InputAttribute { attr: "minlength", types: TEXTUAL },
    InputAttribute { attr: "multiple", types: &["email", "file"] },
    InputAttribute { attr: "pattern", types: TEXTUAL },
    InputAttribute { attr: "placeholder", types: &["text", "search", "url", "tel", "email", "password", "number"] },
    InputAttribute { attr: "readonly", types: &["text", "search", "url", "tel", "email", "password", "date", "month", "week", "time", "datetime-local", "number"] },
    InputAttribute { attr: "required", types: &["text", "search", "url", "tel", "email", "password", "date", "month", "week", "time", "datetime-local", "number", "checkbox", "radio", "file"] },
    InputAttribute { attr: "size", types: TEXTUAL },
    InputAttribute { attr: "src", types: &["image"] },
    InputAttribute { attr: "step", types: DATEISH },
    InputAttribute { attr: "width", types: &["image"] },
];

fn render_type_list(types: &[&str]) -> String {
    match types {
        [only] => format!("“{only}”"),
        _ => {
            let (last, rest) = types.split_last().unwrap_or((&"", &[]));
            format!(
                "{}, or “{last}”",
                rest.iter().map(|t| format!("“{t}”")).join(", ")
            )
        }
    }
}

/// Checks every type-restricted `input` attribute against the effective type
/// (declared `type` lowercased, defaulting to `text`).
pub fn check_input_attributes(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    let declared = attrs.get("type").map(str::to_ascii_lowercase);
    let input_type = declared.as_deref().unwrap_or("text");
    for attribute in attrs.iter() {
        let Some(entry) = INPUT_ATTRIBUTES.iter().find(|e| e.attr == attribute.name) else {
            continue;
        };
        if !entry.types.contains(&input_type) {
            out.push(Diagnostic::error(
                format!(
                    "Attribute “{}” is only allowed when the input type is {}.",
                    entry.attr,
                    render_type_list(entry.types)
                ),
                locator.clone(),
            ));
        }
    }
}

pub fn check_progress(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    let max = parse_float(attrs.get("max")).unwrap_or(1.0);
    if let Some(value) = parse_float(attrs.get("value")) {
        if value > max {
            out.push(Diagnostic::error(
                "The value of the “value” attribute must be less than or equal to \
                 the value of the “max” attribute.",
                locator.clone(),
            ));
        }
        if value < 0.0 {
            out.push(Diagnostic::error(
                "The value of the “value” attribute must be greater than or equal to zero.",
                locator.clone(),
            ));
        }
    }
}

pub fn check_meter(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    let min = parse_float(attrs.get("min")).unwrap_or(0.0);
    let max = parse_float(attrs.get("max")).unwrap_or(1.0);
    let value = parse_float(attrs.get("value"));
    let low = parse_float(attrs.get("low"));
    let high = parse_float(attrs.get("high"));
    let optimum = parse_float(attrs.get("optimum"));

    let mut err = |message: &str| out.push(Diagnostic::error(message, locator.clone()));

    if min > max {
        err(
            "The value of the “min” attribute must be less than or equal to \
             the value of the “max” attribute.",
        );
    }
    if let Some(value) = value {
        if value < min {
            err(
                "The value of the “value” attribute must be greater than or equal to \
                 the value of the “min” attribute.",
            );
        }
        if value > max {
            err(
                "The value of the “value” attribute must be less than or equal to \
                 the value of the “max” attribute.",
            );
        }
    }
    if let Some(low) = low {
        if low < min {
            err(
                "The value of the “low” attribute must be greater than or equal to \
                 the value of the “min” attribute.",
            );
        }
        if low > max {
            err(
                "The value of the “low” attribute must be less than or equal to \
                 the value of the “max” attribute.",
            );
        }
    }
    if let Some(high) = high {
        if high < low.unwrap_or(min) {
            err(
                "The value of the “high” attribute must be greater than or equal to \
                 the value of the “low” attribute.",
            );
        }
        if high > max {
            err(
                "The value of the “high” attribute must be less than or equal to \
                 the value of the “max” attribute.",
            );
        }
    }
    if let Some(optimum) = optimum {
        if optimum < min {
            err(
                "The value of the “optimum” attribute must be greater than or equal to \
                 the value of the “min” attribute.",
            );
        }
        if optimum > max {
            err(
                "The value of the “optimum” attribute must be less than or equal to \
                 the value of the “max” attribute.",
            );
        }
    }
}

pub fn check_script(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    let script_type = attrs.get("type");
    if let Some(language) = attrs.get("language") {
        let matches_js = language.eq_ignore_ascii_case("javascript")
            && script_type.is_none_or(|t| t.eq_ignore_ascii_case("text/javascript"));
        if matches_js {
            out.push(Diagnostic::warning(
                "The “language” attribute on the “script” element is obsolete. \
                 You can safely omit it.",
                locator.clone(),
            ));
        } else {
            out.push(Diagnostic::error(
                "The “language” attribute on the “script” element is obsolete. \
                 Use the “type” attribute instead.",
                locator.clone(),
            ));
        }
    }
    if script_type.is_some_and(|t| t.eq_ignore_ascii_case("text/javascript")) {
        out.push(Diagnostic::warning(
            "The “type” attribute is unnecessary for JavaScript resources.",
            locator.clone(),
        ));
    }
    if attrs.has("charset") {
        out.push(Diagnostic::error(
            "The “charset” attribute on the “script” element is obsolete.",
            locator.clone(),
        ));
    }
}

pub fn check_style_element(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if let Some(style_type) = attrs.get("type")
        && !style_type.eq_ignore_ascii_case("text/css")
    {
        out.push(Diagnostic::error(
            "The only allowed value for the “type” attribute of the “style” element \
             is “text/css” (with no parameters).",
            locator.clone(),
        ));
    }
}

pub fn check_form(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if let Some(accept_charset) = attrs.get("accept-charset")
        && !split_tokens(accept_charset).all(|t| t.eq_ignore_ascii_case("utf-8"))
    {
        out.push(Diagnostic::error(
            "The only allowed value for the “accept-charset” attribute of the \
             “form” element is “utf-8”.",
            locator.clone(),
        ));
    }
}

pub fn check_object(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if attrs.has("typemustmatch") && !(attrs.has("data") && attrs.has("type")) {
        out.push(Diagnostic::error(
            "The “typemustmatch” attribute must not be specified on an “object” \
             element that does not have both a “data” attribute and a “type” attribute.",
            locator.clone(),
        ));
    }
}

pub fn check_bdo(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if !attrs.has("dir") {
        out.push(Diagnostic::error(
            "The “bdo” element must have the “dir” attribute.",
            locator.clone(),
        ));
    }
}

pub fn check_map(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if let (Some(id), Some(name)) = (attrs.get("id"), attrs.get("name"))
        && id != name
    {
        out.push(Diagnostic::error(
            "The “id” attribute on a “map” element must have the same value \
             as the “name” attribute.",
            locator.clone(),
        ));
    }
}

pub fn check_track(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    if attrs.get("label") == Some("") {
        out.push(Diagnostic::error(
            "The “label” attribute on a “track” element must have a non-empty value.",
            locator.clone(),
        ));
    }
}

/// Microdata attributes depend on each other; `itemid` additionally needs a
/// vocabulary via `itemtype`.
pub fn check_microdata(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    let itemscope = attrs.has("itemscope");
    if attrs.has("itemid") && !(itemscope && attrs.has("itemtype")) {
        out.push(Diagnostic::error(
            "The “itemid” attribute must not be specified on elements that do not \
             have both an “itemscope” attribute and an “itemtype” attribute specified.",
            locator.clone(),
        ));
    }
    if attrs.has("itemref") && !itemscope {
        out.push(Diagnostic::error(
            "The “itemref” attribute must not be specified on elements that do not \
             have an “itemscope” attribute specified.",
            locator.clone(),
        ));
    }
    if attrs.has("itemtype") && !itemscope {
        out.push(Diagnostic::error(
            "The “itemtype” attribute must not be specified on elements that do not \
             have an “itemscope” attribute specified.",
            locator.clone(),
        ));
    }
}

const IMPLICIT_ARIA_STATES: &[(&str, &str)] = &[
    ("disabled", "aria-disabled"),
    ("hidden", "aria-hidden"),
    ("readonly", "aria-readonly"),
    ("required", "aria-required"),
];

/// Warns when an ARIA state attribute repeats what a native attribute
/// already conveys.
pub fn check_redundant_aria_state(attrs: &Attributes, locator: &Locator, out: &mut Vec<Diagnostic>) {
    for &(native, aria) in IMPLICIT_ARIA_STATES {
        if attrs.has(native) && attrs.get(aria).is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            out.push(Diagnostic::warning(
                format!(
                    "Attribute “{aria}” is unnecessary for elements that have \
                     attribute “{native}”."
                ),
                locator.clone(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at() -> Locator {
        Locator::new(1, 1)
    }

    #[test]
    fn token_splitting_skips_runs_of_whitespace() {
        let tokens: Vec<_> = split_tokens("  a\tb\n\nc ").collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn non_negative_parsing_follows_html_rules() {
        assert_eq!(parse_non_negative("  42"), Some(42));
        assert_eq!(parse_non_negative("7px"), Some(7));
        assert_eq!(parse_non_negative("-3"), None);
        assert_eq!(parse_non_negative(""), None);
    }

    #[test]
    fn obsolete_element_lookup() {
        assert!(obsolete_element_message("center").unwrap().contains("CSS"));
        assert!(obsolete_element_message("div").is_none());
    }

    #[test]
    fn obsolete_attribute_is_scoped_to_its_elements() {
        let attrs = Attributes::from_pairs([("charset", "utf-8")]);
        let mut out = Vec::new();
        check_obsolete_attributes("a", &attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
        out.clear();
        // charset on meta is not the obsolete kind
        check_obsolete_attributes("meta", &attrs, &at(), &mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn presentational_attribute_gets_css_advice() {
        let attrs = Attributes::from_pairs([("bgcolor", "red")]);
        let mut out = Vec::new();
        check_obsolete_attributes("table", &attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("Use CSS instead."));
    }

    #[test]
    fn input_attribute_matrix_defaults_to_text() {
        let attrs = Attributes::from_pairs([("maxlength", "5")]);
        let mut out = Vec::new();
        check_input_attributes(&attrs, &at(), &mut out);
        assert_eq!(out, vec![]);

        let attrs = Attributes::from_pairs([("type", "checkbox"), ("maxlength", "5")]);
        check_input_attributes(&attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("“maxlength”"));
    }

    #[test]
    fn meter_ordering_violations_each_report() {
        let attrs =
            Attributes::from_pairs([("min", "10"), ("max", "5"), ("value", "7"), ("low", "0")]);
        let mut out = Vec::new();
        check_meter(&attrs, &at(), &mut out);
        // min>max, value<min, value>max, low<min
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn progress_value_over_max() {
        let attrs = Attributes::from_pairs([("value", "2")]);
        let mut out = Vec::new();
        check_progress(&attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn redundant_aria_state_warns() {
        let attrs = Attributes::from_pairs([("disabled", ""), ("aria-disabled", "true")]);
        let mut out = Vec::new();
        check_redundant_aria_state(&attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, crate::diagnostic::Severity::Warning);
    }

    #[test]
    fn microdata_dependencies() {
        let attrs = Attributes::from_pairs([("itemref", "x")]);
        let mut out = Vec::new();
        check_microdata(&attrs, &at(), &mut out);
        assert_eq!(out.len(), 1);
        out.clear();
        let attrs = Attributes::from_pairs([("itemscope", ""), ("itemtype", "t"), ("itemid", "u")]);
        check_microdata(&attrs, &at(), &mut out);
        assert_eq!(out, vec![]);
    }
}
