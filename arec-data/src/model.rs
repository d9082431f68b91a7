use crate::error::{DataError, ValidationError};
use crate::handle::Row;
use crate::value::{Value, ValueError};

/// The capability contract a persistable type implements.
///
/// Every item is required. Accessor lists are built from associated
/// functions, so two calls always describe the same fields in the same order.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Default)]
/// struct User { id: i64, name: String, email: String }
///
/// impl Model for User {
///     fn table_name() -> &'static str { "users" }
///     fn columns() -> Vec<Field<Self>> { vec![field!(Self, name), field!(Self, email)] }
///     fn primary_key() -> Vec<Field<Self>> { vec![field!(Self, id)] }
///     fn sequences() -> Vec<Field<Self>> { vec![field!(Self, id)] }
///     fn validate(&self) -> Result<(), ValidationError> { Ok(()) }
/// }
/// ```
pub trait Model: Clone + Send + Sync + 'static {
    /// Target table, optionally schema-qualified (`public.users`).
    fn table_name() -> &'static str;

    /// Non-key columns.
    fn columns() -> Vec<Field<Self>>;

    /// Key columns, in the order used for every WHERE clause.
    fn primary_key() -> Vec<Field<Self>>;

    /// Columns assigned by the store; a subset of `primary_key() ∪ columns()`.
    fn sequences() -> Vec<Field<Self>>;

    /// Business rules, checked before any write is built.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Column name paired with a read/write accessor into one model field.
pub struct Field<M> {
    name: &'static str,
    read: fn(&M) -> Value,
    write: fn(&mut M, Value) -> Result<(), ValueError>,
}

impl<M> Field<M> {
    pub fn new(
        name: &'static str,
        read: fn(&M) -> Value,
        write: fn(&mut M, Value) -> Result<(), ValueError>,
    ) -> Self {
        Self { name, read, write }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, model: &M) -> Value {
        (self.read)(model)
    }

    /// Overwrite the field, reporting the column on a type mismatch.
    pub fn set(&self, model: &mut M, value: Value) -> Result<(), DataError> {
        (self.write)(model, value).map_err(|err| DataError::TypeMismatch {
            column: self.name.to_string(),
            expected: err.expected,
            found: err.found,
        })
    }
}

impl<M> Clone for Field<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Field<M> {}

impl<M> std::fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Build a [`Field`] for a struct member.
///
/// `field!(Self, email)` maps the member to a column of the same name;
/// `field!(Self, "e_mail" => email)` names the column explicitly.
#[macro_export]
macro_rules! field {
    ($model:ty, $member:ident) => {
        $crate::field!($model, stringify!($member) => $member)
    };
    ($model:ty, $column:expr => $member:ident) => {
        $crate::model::Field::<$model>::new(
            $column,
            |m| $crate::value::ToValue::to_value(&m.$member),
            |m, v| {
                m.$member = $crate::value::FromValue::from_value(v)?;
                Ok(())
            },
        )
    };
}

/// Key fields then column fields: the order of every SELECT and RETURNING list.
pub fn scan_fields<M: Model>() -> Vec<Field<M>> {
    let mut fields = M::primary_key();
    fields.extend(M::columns());
    fields
}

pub fn values_of<M>(model: &M, fields: &[Field<M>]) -> Vec<Value> {
    fields.iter().map(|f| f.get(model)).collect()
}

/// Write a returned row into `model`, key columns first.
///
/// The row is applied to a copy and swapped in only when every column
/// converts, so a failed scan leaves `model` untouched.
pub fn scan<M: Model>(model: &mut M, row: Row) -> Result<(), DataError> {
    let fields = scan_fields::<M>();
    if row.len() != fields.len() {
        return Err(DataError::ColumnCount {
            expected: fields.len(),
            found: row.len(),
        });
    }

    let mut staged = model.clone();
    for (field, value) in fields.iter().zip(row) {
        field.set(&mut staged, value)?;
    }
    *model = staged;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::value::Kind;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Note {
        id: i64,
        body: String,
        pinned: Option<bool>,
    }

    impl Model for Note {
        fn table_name() -> &'static str {
            "notes"
        }
        fn columns() -> Vec<Field<Self>> {
            vec![field!(Self, body), field!(Self, "is_pinned" => pinned)]
        }
        fn primary_key() -> Vec<Field<Self>> {
            vec![field!(Self, id)]
        }
        fn sequences() -> Vec<Field<Self>> {
            vec![field!(Self, id)]
        }
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn scan_order_is_key_first() {
        let names: Vec<_> = scan_fields::<Note>().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["id", "body", "is_pinned"]);
    }

    #[test]
    fn scan_overwrites_every_field() {
        let mut note = Note::default();
        scan(
            &mut note,
            vec![Value::Int(9), Value::Text("hi".into()), Value::Null(Kind::Bool)],
        )
        .unwrap();
        assert_eq!(
            note,
            Note {
                id: 9,
                body: "hi".into(),
                pinned: None
            }
        );
    }

    #[test]
    fn failed_scan_leaves_model_untouched() {
        let mut note = Note {
            id: 1,
            body: "keep".into(),
            pinned: Some(true),
        };
        let before = note.clone();

        let err = scan(
            &mut note,
            vec![Value::Int(2), Value::Text("new".into()), Value::Text("yes".into())],
        )
        .unwrap_err();

        assert!(matches!(err, DataError::TypeMismatch { ref column, .. } if column == "is_pinned"));
        assert_eq!(note, before);
    }

    #[test]
    fn short_row_is_rejected() {
        let mut note = Note::default();
        let err = scan(&mut note, vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            DataError::ColumnCount {
                expected: 3,
                found: 1
            }
        ));
    }

    #[test]
    fn field_reads_current_value() {
        let note = Note {
            id: 4,
            ..Default::default()
        };
        assert_eq!(field!(Note, id).get(&note), Value::Int(4));
    }

    #[test]
    fn unsigned_members_map_through_field() {
        #[derive(Clone, Default)]
        struct Counter {
            id: u32,
            hits: u64,
        }

        let id = field!(Counter, id);
        let hits = field!(Counter, hits);
        let mut counter = Counter::default();
        id.set(&mut counter, Value::Int(12)).unwrap();
        hits.set(&mut counter, Value::Int(300)).unwrap();
        assert_eq!(id.get(&counter), Value::Int(12));
        assert_eq!(hits.get(&counter), Value::Int(300));

        let err = id.set(&mut counter, Value::Int(-1)).unwrap_err();
        assert!(matches!(err, DataError::TypeMismatch { ref column, .. } if column == "id"));
        assert_eq!(counter.id, 12);
    }
}
