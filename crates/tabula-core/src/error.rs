use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Jaro similarity a known column name must reach to be offered as a hint.
const SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Error)]
pub enum Error {
    /// The data does not fit the table's shape: length mismatches, duplicate
    /// keys, header counts.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("missing column: {name}{}", format_hint(.suggestions))]
    MissingColumn {
        name: String,
        suggestions: Vec<String>,
    },

    /// An operation is not defined for the element type(s) involved.
    #[error("type error: {0}")]
    Type(String),

    /// A value violates a conversion rule (NaN into an integer, division by zero).
    #[error("range error: {0}")]
    Range(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal invariant failed: {0}")]
    Invariant(String),

    /// Error with context chain for better debugging
    #[error("error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Build a missing-column error, ranking `known` names by similarity.
    pub fn missing_column<'a>(
        name: impl Into<String>,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let name = name.into();
        let mut scored: Vec<(f64, &str)> = known
            .into_iter()
            .map(|k| (strsim::jaro(k, &name), k))
            .filter(|(score, _)| *score > SIMILARITY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Error::MissingColumn {
            name,
            suggestions: scored.into_iter().map(|(_, k)| k.to_string()).collect(),
        }
    }

    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use tabula_core::error::Error;
    /// let err = Error::Schema("different sizes: [3, 2]".into());
    /// let err = err.with_context("while building table");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors (e.g., column name suggestions).
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::MissingColumn { suggestions, .. } => {
                if suggestions.is_empty() {
                    vec!["Check that the column name is spelled correctly".into()]
                } else {
                    suggestions
                        .iter()
                        .map(|s| format!("Did you mean \"{s}\"?"))
                        .collect()
                }
            }
            Error::Range(msg) if msg.contains("missing or infinite") => {
                vec![
                    "Cast to a float type to keep missing values".into(),
                    "Replace NaN values before casting to an integer type".into(),
                ]
            }
            Error::Config(msg) if msg.contains("invalid type") => {
                vec!["Valid types: bool, int8, int16, int32, int, uint8, uint16, uint32, uint, float32, float, object".into()]
            }
            _ => vec![],
        }
    }

    pub(crate) fn size_mismatch(expected: usize, got: usize) -> Self {
        Error::Schema(format!("size mismatch: expected {expected}, got {got}"))
    }
}

fn format_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("{s:?}")).collect();
    format!(" (did you mean? {})", quoted.join(", "))
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
