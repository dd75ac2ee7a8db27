//! Error types for composite decoding and encoding.

use thiserror::Error;

/// Errors surfaced by the composite codec.
///
/// The decoder reports at most one of these per call. `MalformedLiteral`
/// always wins over anything recorded earlier in the same call; otherwise the
/// first `FieldCountMismatch` or `FieldConversion` seen is the one returned.
#[derive(Error, Debug)]
pub enum CompositeError {
    /// The decode target was handed over as a shared borrow.
    #[error("composite: cannot decode into read-only {type_name}")]
    Unwritable { type_name: &'static str },

    /// The literal violates the composite grammar. `offset` is the byte
    /// position in the input where the problem was detected.
    #[error("composite: malformed literal at byte {offset}: {message}")]
    MalformedLiteral { offset: usize, message: String },

    /// The literal carried more elements than the table has fields.
    /// `index` is the zero-based position of the first excess element.
    #[error("{table} has {fields} fields, but composite has at least {} values", .index + 1)]
    FieldCountMismatch {
        table: &'static str,
        fields: usize,
        index: usize,
    },

    /// A field converter rejected its element.
    #[error("{table}.{field} (element {index}): {source}")]
    FieldConversion {
        table: &'static str,
        field: &'static str,
        index: usize,
        #[source]
        source: FieldError,
    },

    /// A field converter could not render its value.
    #[error("{table}.{field}: {source}")]
    FieldEncode {
        table: &'static str,
        field: &'static str,
        #[source]
        source: FieldError,
    },

    /// No usable field table could be produced for the type.
    #[error("composite: no field table for {type_name}: {message}")]
    Lookup {
        type_name: &'static str,
        message: String,
    },
}

impl CompositeError {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        CompositeError::MalformedLiteral {
            offset,
            message: message.into(),
        }
    }

    /// True for grammar violations, which invalidate the whole literal.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CompositeError::MalformedLiteral { .. })
    }
}

/// Errors raised by individual field converters.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("invalid UTF-8 in text value")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The element text is not a valid literal of the target type.
    #[error("invalid {type_name} literal {input:?}")]
    Parse {
        type_name: &'static str,
        input: String,
    },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A nested composite failed to decode or encode.
    #[error("nested composite: {0}")]
    Nested(Box<CompositeError>),

    #[error("{0}")]
    Custom(String),
}

impl FieldError {
    pub(crate) fn parse(type_name: &'static str, input: &[u8]) -> Self {
        FieldError::Parse {
            type_name,
            input: String::from_utf8_lossy(input).into_owned(),
        }
    }
}

impl From<CompositeError> for FieldError {
    fn from(err: CompositeError) -> Self {
        FieldError::Nested(Box::new(err))
    }
}

/// Convenience alias used throughout composite-core.
pub type Result<T> = std::result::Result<T, CompositeError>;
