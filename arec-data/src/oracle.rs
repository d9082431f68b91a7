//! Existence checks over a model's current field values.

use crate::model::{values_of, Model};

/// True when every key column holds a non-empty value.
///
/// A model without key columns is never addressable.
pub fn primary_exists<M: Model>(model: &M) -> bool {
    let keys = M::primary_key();
    !keys.is_empty() && values_of(model, &keys).iter().all(|v| !v.is_empty())
}

/// True when every store-assigned column is populated, i.e. a previous create
/// already went through.
///
/// Models without sequence columns always report `false`, so `save` on them
/// always inserts.
pub fn is_update<M: Model>(model: &M) -> bool {
    let sequences = M::sequences();
    !sequences.is_empty() && values_of(model, &sequences).iter().all(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::field;
    use crate::model::Field;
    use uuid::Uuid;

    #[derive(Clone, Default)]
    struct Line {
        order_id: i64,
        line_no: i32,
        token: Option<Uuid>,
        note: String,
    }

    impl Model for Line {
        fn table_name() -> &'static str {
            "order_lines"
        }
        fn columns() -> Vec<Field<Self>> {
            vec![field!(Self, token), field!(Self, note)]
        }
        fn primary_key() -> Vec<Field<Self>> {
            vec![field!(Self, order_id), field!(Self, line_no)]
        }
        fn sequences() -> Vec<Field<Self>> {
            vec![field!(Self, line_no), field!(Self, token)]
        }
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Setting {
        value: String,
    }

    impl Model for Setting {
        fn table_name() -> &'static str {
            "settings"
        }
        fn columns() -> Vec<Field<Self>> {
            vec![field!(Self, value)]
        }
        fn primary_key() -> Vec<Field<Self>> {
            Vec::new()
        }
        fn sequences() -> Vec<Field<Self>> {
            Vec::new()
        }
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn composite_key_needs_every_part() {
        let mut line = Line {
            order_id: 5,
            ..Default::default()
        };
        assert!(!primary_exists(&line));
        line.line_no = 1;
        assert!(primary_exists(&line));
    }

    #[test]
    fn empty_key_is_never_addressable() {
        let setting = Setting {
            value: "x".into(),
        };
        assert!(!primary_exists(&setting));
        assert!(!is_update(&setting));
    }

    #[test]
    fn update_requires_all_sequences() {
        let mut line = Line {
            order_id: 5,
            line_no: 2,
            ..Default::default()
        };
        assert!(!is_update(&line));
        line.token = Some(Uuid::new_v4());
        assert!(is_update(&line));
        line.token = Some(Uuid::nil());
        assert!(!is_update(&line));
    }
}
