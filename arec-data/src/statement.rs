//! SQL text and argument lists derived from a model's metadata.
//!
//! Every builder method is pure: it reads the contract and the model's current
//! field values and returns a fresh [`Statement`]. Nothing is cached.
//!
//! ```ignore
//! let stmt = StatementBuilder::new(Dialect::Postgres).update(&user);
//! assert_eq!(stmt.sql, "UPDATE users SET name=$2,email=$3 WHERE id=$1 RETURNING id,name,email;");
//! ```

use crate::model::{scan_fields, values_of, Field, Model};
use crate::value::Value;

/// Ordinal placeholder style of the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `$1, $2, ...`
    Postgres,
    /// `?1, ?2, ...`
    Sqlite,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Emit table and column names as written.
    #[default]
    Raw,
    /// Double-quote every identifier segment (`public.users` → `"public"."users"`).
    Quote,
}

/// SQL text plus the arguments for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder {
    dialect: Dialect,
    identifiers: IdentifierPolicy,
}

impl StatementBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            identifiers: IdentifierPolicy::Raw,
        }
    }

    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifiers = policy;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// `SELECT <key..., columns...> FROM <table> WHERE <key predicate>;`
    pub fn load<M: Model>(&self, model: &M) -> Statement {
        let keys = M::primary_key();
        let predicate = self.key_predicate(&keys);
        Statement {
            sql: format!(
                "SELECT {} FROM {} WHERE {predicate};",
                self.column_list::<M>(),
                self.ident(M::table_name())
            ),
            args: values_of(model, &keys),
        }
    }

    /// `DELETE FROM <table> WHERE <key predicate>;`
    pub fn delete<M: Model>(&self, model: &M) -> Statement {
        let keys = M::primary_key();
        let predicate = self.key_predicate(&keys);
        Statement {
            sql: format!("DELETE FROM {} WHERE {predicate};", self.ident(M::table_name())),
            args: values_of(model, &keys),
        }
    }

    /// Insert every non-sequence key column and every column, returning the stored row.
    pub fn insert<M: Model>(&self, model: &M) -> Statement {
        debug_assert_sequences_subset::<M>();
        let targets = insertion_fields::<M>();
        let table = self.ident(M::table_name());
        let returning = self.column_list::<M>();

        let sql = if targets.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES RETURNING {returning};")
        } else {
            let names = targets
                .iter()
                .map(|f| self.ident(f.name()))
                .collect::<Vec<_>>()
                .join(",");
            let placeholders = (1..=targets.len())
                .map(|i| self.dialect.placeholder(i))
                .collect::<Vec<_>>()
                .join(",");
            format!("INSERT INTO {table} ({names}) VALUES ({placeholders}) RETURNING {returning};")
        };

        Statement {
            sql,
            args: values_of(model, &targets),
        }
    }

    /// Set every non-key column by key, returning the stored row.
    ///
    /// Key placeholders come first (`$1..$k`), SET placeholders continue from
    /// `$k+1`; the argument list follows the same order.
    pub fn update<M: Model>(&self, model: &M) -> Statement {
        debug_assert_sequences_subset::<M>();
        let keys = M::primary_key();
        let columns = M::columns();
        let predicate = self.key_predicate(&keys);
        let key_count = keys.len();

        let assignments = if columns.is_empty() {
            // No-op assignment keeps the statement valid for key-only models.
            keys.first()
                .map(|k| format!("{0}={0}", self.ident(k.name())))
                .unwrap_or_default()
        } else {
            columns
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    format!(
                        "{}={}",
                        self.ident(f.name()),
                        self.dialect.placeholder(key_count + i + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join(",")
        };

        let mut args = values_of(model, &keys);
        args.extend(values_of(model, &columns));

        Statement {
            sql: format!(
                "UPDATE {} SET {assignments} WHERE {predicate} RETURNING {};",
                self.ident(M::table_name()),
                self.column_list::<M>()
            ),
            args,
        }
    }

    /// Key columns then columns, comma-joined.
    pub fn column_list<M: Model>(&self) -> String {
        scan_fields::<M>()
            .iter()
            .map(|f| self.ident(f.name()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `k1=$1 AND k2=$2 ...`; numbering always starts at 1.
    fn key_predicate<M>(&self, keys: &[Field<M>]) -> String {
        keys.iter()
            .enumerate()
            .map(|(i, k)| format!("{}={}", self.ident(k.name()), self.dialect.placeholder(i + 1)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn ident(&self, name: &str) -> String {
        match self.identifiers {
            IdentifierPolicy::Raw => name.to_string(),
            IdentifierPolicy::Quote => quote_identifier(name),
        }
    }
}

/// Non-sequence key fields followed by every column field.
pub fn insertion_fields<M: Model>() -> Vec<Field<M>> {
    let sequences = M::sequences();
    let mut fields: Vec<Field<M>> = M::primary_key()
        .into_iter()
        .filter(|k| !sequences.iter().any(|s| s.name() == k.name()))
        .collect();
    fields.extend(M::columns());
    fields
}

fn quote_identifier(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn debug_assert_sequences_subset<M: Model>() {
    if cfg!(debug_assertions) {
        let known = scan_fields::<M>();
        for seq in M::sequences() {
            debug_assert!(
                known.iter().any(|f| f.name() == seq.name()),
                "sequence column {} is not mapped by {}",
                seq.name(),
                M::table_name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::field;

    #[derive(Debug, Clone, Default)]
    struct User {
        id: i64,
        name: String,
        email: String,
    }

    impl Model for User {
        fn table_name() -> &'static str {
            "users"
        }
        fn columns() -> Vec<Field<Self>> {
            vec![field!(Self, name), field!(Self, email)]
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

    /// Three-column natural key, nothing assigned by the store.
    #[derive(Debug, Clone, Default)]
    struct Stock {
        region: String,
        store: i32,
        sku: String,
        quantity: i64,
    }

    impl Model for Stock {
        fn table_name() -> &'static str {
            "inventory.stock"
        }
        fn columns() -> Vec<Field<Self>> {
            vec![field!(Self, quantity)]
        }
        fn primary_key() -> Vec<Field<Self>> {
            vec![field!(Self, region), field!(Self, store), field!(Self, sku)]
        }
        fn sequences() -> Vec<Field<Self>> {
            Vec::new()
        }
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    /// Join row: two-column key and no other columns.
    #[derive(Debug, Clone, Default)]
    struct Membership {
        user_id: i64,
        group_id: i64,
    }

    impl Model for Membership {
        fn table_name() -> &'static str {
            "memberships"
        }
        fn columns() -> Vec<Field<Self>> {
            Vec::new()
        }
        fn primary_key() -> Vec<Field<Self>> {
            vec![field!(Self, user_id), field!(Self, group_id)]
        }
        fn sequences() -> Vec<Field<Self>> {
            Vec::new()
        }
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    /// Only a store-assigned key.
    #[derive(Debug, Clone, Default)]
    struct Ticket {
        id: i64,
    }

    impl Model for Ticket {
        fn table_name() -> &'static str {
            "tickets"
        }
        fn columns() -> Vec<Field<Self>> {
            Vec::new()
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

    fn pg() -> StatementBuilder {
        StatementBuilder::new(Dialect::Postgres)
    }

    fn user() -> User {
        User {
            id: 0,
            name: "a".into(),
            email: "b".into(),
        }
    }

    #[test]
    fn test_insert_skips_sequence_key() {
        let stmt = pg().insert(&user());
        assert_eq!(
            stmt.sql,
            "INSERT INTO users (name,email) VALUES ($1,$2) RETURNING id,name,email;"
        );
        assert_eq!(stmt.args, vec![Value::Text("a".into()), Value::Text("b".into())]);
    }

    #[test]
    fn test_update_numbers_keys_first() {
        let mut u = user();
        u.id = 7;
        u.name = "a2".into();
        let stmt = pg().update(&u);
        assert_eq!(
            stmt.sql,
            "UPDATE users SET name=$2,email=$3 WHERE id=$1 RETURNING id,name,email;"
        );
        assert_eq!(
            stmt.args,
            vec![
                Value::Int(7),
                Value::Text("a2".into()),
                Value::Text("b".into())
            ]
        );
    }

    #[test]
    fn test_load_and_delete() {
        let mut u = user();
        u.id = 3;
        let load = pg().load(&u);
        assert_eq!(load.sql, "SELECT id,name,email FROM users WHERE id=$1;");
        assert_eq!(load.args, vec![Value::Int(3)]);

        let delete = pg().delete(&u);
        assert_eq!(delete.sql, "DELETE FROM users WHERE id=$1;");
        assert_eq!(delete.args, vec![Value::Int(3)]);
    }

    #[test]
    fn test_two_column_key() {
        let m = Membership {
            user_id: 1,
            group_id: 2,
        };
        let load = pg().load(&m);
        assert_eq!(
            load.sql,
            "SELECT user_id,group_id FROM memberships WHERE user_id=$1 AND group_id=$2;"
        );
        assert_eq!(load.args, vec![Value::Int(1), Value::Int(2)]);

        let insert = pg().insert(&m);
        assert_eq!(
            insert.sql,
            "INSERT INTO memberships (user_id,group_id) VALUES ($1,$2) RETURNING user_id,group_id;"
        );
    }

    #[test]
    fn test_three_column_key_order() {
        let s = Stock {
            region: "eu".into(),
            store: 12,
            sku: "X-1".into(),
            quantity: 40,
        };
        let delete = pg().delete(&s);
        assert_eq!(
            delete.sql,
            "DELETE FROM inventory.stock WHERE region=$1 AND store=$2 AND sku=$3;"
        );
        assert_eq!(
            delete.args,
            vec![
                Value::Text("eu".into()),
                Value::Int(12),
                Value::Text("X-1".into())
            ]
        );

        let update = pg().update(&s);
        assert_eq!(
            update.sql,
            "UPDATE inventory.stock SET quantity=$4 WHERE region=$1 AND store=$2 AND sku=$3 \
             RETURNING region,store,sku,quantity;"
        );
        assert_eq!(update.args.len(), 4);
        assert_eq!(update.args[3], Value::Int(40));
    }

    #[test]
    fn test_natural_key_is_inserted() {
        let s = Stock {
            region: "eu".into(),
            store: 1,
            sku: "A".into(),
            quantity: 0,
        };
        let stmt = pg().insert(&s);
        assert_eq!(
            stmt.sql,
            "INSERT INTO inventory.stock (region,store,sku,quantity) VALUES ($1,$2,$3,$4) \
             RETURNING region,store,sku,quantity;"
        );
    }

    #[test]
    fn test_update_without_columns_is_noop_assignment() {
        let stmt = pg().update(&Membership {
            user_id: 1,
            group_id: 2,
        });
        assert_eq!(
            stmt.sql,
            "UPDATE memberships SET user_id=user_id WHERE user_id=$1 AND group_id=$2 \
             RETURNING user_id,group_id;"
        );
        assert_eq!(stmt.args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_insert_with_only_sequence_uses_default_values() {
        let stmt = pg().insert(&Ticket::default());
        assert_eq!(stmt.sql, "INSERT INTO tickets DEFAULT VALUES RETURNING id;");
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn test_sqlite_placeholders() {
        let mut u = user();
        u.id = 1;
        let stmt = StatementBuilder::new(Dialect::Sqlite).update(&u);
        assert_eq!(
            stmt.sql,
            "UPDATE users SET name=?2,email=?3 WHERE id=?1 RETURNING id,name,email;"
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let builder = pg().identifier_policy(IdentifierPolicy::Quote);
        let stmt = builder.delete(&Stock::default());
        assert_eq!(
            stmt.sql,
            "DELETE FROM \"inventory\".\"stock\" WHERE \"region\"=$1 AND \"store\"=$2 AND \"sku\"=$3;"
        );
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_placeholder_count_matches_args() {
        let builder = pg();
        let stock = Stock::default();
        for stmt in [
            builder.load(&stock),
            builder.delete(&stock),
            builder.insert(&stock),
            builder.update(&stock),
        ] {
            let placeholders = stmt.sql.matches('$').count();
            assert_eq!(placeholders, stmt.args.len(), "{}", stmt.sql);
        }
    }
}
