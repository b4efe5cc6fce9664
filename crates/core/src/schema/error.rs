//! Schema error types

/// Mismatch between an authored schema and the live property roots
///
/// Recovered by falling back to an empty schema for the load attempt.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Null schema")]
    NullSchema,

    #[error("Non-object schema")]
    NonObjectSchema,

    /// A required schema field such as `name` or `parameters` is absent
    #[error("Schema is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Null parameter")]
    NullParameter,

    #[error("Non-object parameter")]
    NonObjectParameter,

    /// The parameter at `index` has a different key than the live root
    #[error("Parameter mismatch at {index}: expected '{expected}', found '{found}'")]
    KeyMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// The live roots expose more parameters than the schema lists
    #[error("Property not exposed in schema")]
    InsufficientParameters,

    /// The schema lists more parameters than the live roots expose
    #[error("Excess parameters in schema")]
    ExcessParameters,

    /// `nPersistentParameters` disagrees with the live persistent root
    #[error("Schema declares {declared} persistent parameters, persistent root exposes {actual}")]
    PersistentCountMismatch { declared: usize, actual: usize },

    #[error(transparent)]
    Hash(#[from] super::hash::HashError),

    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}
