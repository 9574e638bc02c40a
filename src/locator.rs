/// Source position attached to every event and diagnostic.
///
/// The upstream parser supplies these; the checker never computes positions
/// itself, it only copies the locator that was current when a construct was
/// seen. Forward-referencing checks (deferred idrefs, figure alt decisions)
/// store a clone so the eventual diagnostic points at the *referencing*
/// construct, not at wherever the document happened to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub struct Locator {
    /// 1-indexed source line.
    pub line: usize,
    /// 1-indexed source column.
    pub column: usize,
    /// Identifier of the source the event came from (URL or path), if known.
    pub source: Option<String>,
}

impl Locator {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            source: None,
        }
    }

    pub fn with_source(line: usize, column: usize, source: impl Into<String>) -> Self {
        Self {
            line,
            column,
            source: Some(source.into()),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}:{}", source, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}
