/// A field-level validation failure reported by [`Model::validate`](crate::Model::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Rejection of a model's current state by its business rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::default().with(field, message)
    }

    /// Add another failing field.
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the failing fields, in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (i, err) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<garde::Report> for ValidationError {
    fn from(report: garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| {
                let field = path.to_string();
                FieldError {
                    field: if field.is_empty() { "value".to_string() } else { field },
                    message: error.message().to_string(),
                }
            })
            .collect();
        ValidationError { errors }
    }
}

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// Load or Delete was asked for a row whose key is not fully populated.
    MissingPrimaryKey { table: String, action: &'static str },
    Validation(ValidationError),
    /// A single-row query returned no row.
    NotFound(String),
    /// A key lookup matched more than one row.
    AmbiguousKey { table: String, rows: usize },
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A returned row does not have one value per mapped column.
    ColumnCount { expected: usize, found: usize },
    UnsupportedType(String),
    Database(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `arec-data-sqlx`) to wrap driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    /// True when the store was never contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DataError::MissingPrimaryKey { .. } | DataError::Validation(_)
        )
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::MissingPrimaryKey { table, action } => {
                write!(f, "no primary key specified, nothing to {action} in {table}")
            }
            DataError::Validation(err) => write!(f, "{err}"),
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::AmbiguousKey { table, rows } => {
                write!(f, "key lookup on {table} matched {rows} rows")
            }
            DataError::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "column {column}: expected {expected}, found {found}"),
            DataError::ColumnCount { expected, found } => {
                write!(f, "row has {found} columns, model maps {expected}")
            }
            DataError::UnsupportedType(name) => write!(f, "unsupported column type: {name}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            DataError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DataError {
    fn from(err: ValidationError) -> Self {
        DataError::Validation(err)
    }
}
