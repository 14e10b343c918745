//! Field registry for indexed log documents.
//!
//! Every searchable attribute of a log record is listed here exactly once,
//! together with its dotted position inside the indexed document and whether
//! the index mapping carries an unanalyzed `.keyword` sub-field for it.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Suffix appended to a path to address its unanalyzed variant.
pub const KEYWORD_SUFFIX: &str = ".keyword";

/// Indexable field of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ContextMap,
    EndOfBatch,
    Level,
    #[serde(rename = "loggerFQCN")]
    LoggerFqcn,
    LoggerName,
    Message,
    CreationTimeMs,
    Thread,
    ThreadId,
    ThreadPriority,
    SourceClass,
    SourceMethod,
    SourceFile,
    SourceLine,
    SourceClassLoaderName,
}

impl Field {
    /// All registered fields, in declaration order.
    pub const ALL: [Field; 15] = [
        Field::ContextMap,
        Field::EndOfBatch,
        Field::Level,
        Field::LoggerFqcn,
        Field::LoggerName,
        Field::Message,
        Field::CreationTimeMs,
        Field::Thread,
        Field::ThreadId,
        Field::ThreadPriority,
        Field::SourceClass,
        Field::SourceMethod,
        Field::SourceFile,
        Field::SourceLine,
        Field::SourceClassLoaderName,
    ];

    /// Symbolic name used by callers and configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Field::ContextMap => "contextMap",
            Field::EndOfBatch => "endOfBatch",
            Field::Level => "level",
            Field::LoggerFqcn => "loggerFQCN",
            Field::LoggerName => "loggerName",
            Field::Message => "message",
            Field::CreationTimeMs => "creationTimeMs",
            Field::Thread => "thread",
            Field::ThreadId => "threadId",
            Field::ThreadPriority => "threadPriority",
            Field::SourceClass => "sourceClass",
            Field::SourceMethod => "sourceMethod",
            Field::SourceFile => "sourceFile",
            Field::SourceLine => "sourceLine",
            Field::SourceClassLoaderName => "sourceClassLoaderName",
        }
    }

    /// Dotted path of the field inside the indexed document.
    pub fn path(&self) -> &'static str {
        match self {
            Field::ContextMap => "contextMap",
            Field::EndOfBatch => "endOfBatch",
            Field::Level => "level",
            Field::LoggerFqcn => "loggerFqcn",
            Field::LoggerName => "loggerName",
            Field::Message => "message",
            Field::CreationTimeMs => "timeMillis",
            Field::Thread => "thread",
            Field::ThreadId => "threadId",
            Field::ThreadPriority => "threadPriority",
            Field::SourceClass => "source.class",
            Field::SourceMethod => "source.method",
            Field::SourceFile => "source.file",
            Field::SourceLine => "source.line",
            Field::SourceClassLoaderName => "source.classLoaderName",
        }
    }

    /// Whether the mapping declares an unanalyzed `.keyword` sub-field.
    pub fn has_exact_variant(&self) -> bool {
        matches!(
            self,
            Field::Level
                | Field::LoggerFqcn
                | Field::LoggerName
                | Field::Message
                | Field::Thread
                | Field::SourceClass
                | Field::SourceMethod
                | Field::SourceFile
                | Field::SourceClassLoaderName
        )
    }

    /// Path to use for exact (term) matching and sorting.
    ///
    /// Returns `path + ".keyword"` when the field has an exact-match variant,
    /// otherwise the plain path.
    pub fn exact_variant(&self) -> String {
        if self.has_exact_variant() {
            format!("{}{}", self.path(), KEYWORD_SUFFIX)
        } else {
            self.path().to_string()
        }
    }

    /// Whether `position` is this field's document path.
    pub fn equals_position(&self, position: &str) -> bool {
        self.path() == position
    }

    /// Parse from a symbolic name or a document path, returning None for unknown fields.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s || f.equals_position(s))
    }

    /// Resolve a field name, failing fast on anything outside the registry.
    pub fn resolve(name: &str) -> Result<Self, FieldError> {
        Self::parse(name.trim()).ok_or_else(|| FieldError::Unknown(name.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_fields_use_suffix() {
        assert_eq!(Field::Message.exact_variant(), "message.keyword");
        assert_eq!(Field::SourceClass.exact_variant(), "source.class.keyword");
        assert_eq!(Field::LoggerFqcn.exact_variant(), "loggerFqcn.keyword");
    }

    #[test]
    fn test_non_keyword_fields_use_plain_path() {
        assert_eq!(Field::CreationTimeMs.exact_variant(), "timeMillis");
        assert_eq!(Field::SourceLine.exact_variant(), "source.line");
        assert!(!Field::ThreadId.has_exact_variant());
    }

    #[test]
    fn test_resolve_by_name_and_path() {
        assert_eq!(Field::resolve("sourceClass").unwrap(), Field::SourceClass);
        assert_eq!(Field::resolve("source.class").unwrap(), Field::SourceClass);
        assert_eq!(Field::resolve("creationTimeMs").unwrap(), Field::CreationTimeMs);
        assert_eq!(Field::resolve("timeMillis").unwrap(), Field::CreationTimeMs);
        assert_eq!(Field::resolve(" level ").unwrap(), Field::Level);
    }

    #[test]
    fn test_resolve_unknown_field() {
        let err = Field::resolve("hostname").unwrap_err();
        assert!(matches!(err, FieldError::Unknown(ref name) if name == "hostname"));
        assert!("nope".parse::<Field>().is_err());
    }

    #[test]
    fn test_registry_names_are_unique() {
        for (i, a) in Field::ALL.iter().enumerate() {
            for b in &Field::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.path(), b.path());
            }
        }
    }

    #[test]
    fn test_display_is_path() {
        assert_eq!(Field::SourceMethod.to_string(), "source.method");
    }

    #[test]
    fn test_serde_uses_symbolic_name() {
        let json = serde_json::to_string(&Field::LoggerFqcn).unwrap();
        assert_eq!(json, "\"loggerFQCN\"");
        let decoded: Field = serde_json::from_str("\"sourceClassLoaderName\"").unwrap();
        assert_eq!(decoded, Field::SourceClassLoaderName);
    }
}
