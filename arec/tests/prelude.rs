use arec::prelude::*;
use arec_test::RecordingHandle;

#[derive(Debug, Clone, Default)]
struct Tag {
    id: i64,
    label: String,
}

impl Model for Tag {
    fn table_name() -> &'static str {
        "tags"
    }
    fn columns() -> Vec<Field<Self>> {
        vec![field!(Self, label)]
    }
    fn primary_key() -> Vec<Field<Self>> {
        vec![field!(Self, id)]
    }
    fn sequences() -> Vec<Field<Self>> {
        vec![field!(Self, id)]
    }
    fn validate(&self) -> Result<(), ValidationError> {
        if self.label.is_empty() {
            return Err(ValidationError::new("label", "required"));
        }
        Ok(())
    }
}

#[test]
fn configured_options_drive_statements() {
    let config = ArecConfig::from_yaml_str("arec:\n  data:\n    quote: true\n", "test").unwrap();
    let options = PersistOptions::from_config(&config).unwrap();
    let stmt = options.builder(arec::Dialect::Postgres).delete(&Tag {
        id: 4,
        ..Default::default()
    });
    assert_eq!(stmt.sql, r#"DELETE FROM "tags" WHERE "id"=$1;"#);
}

#[tokio::test]
async fn prelude_is_enough_to_persist() {
    let mut db = RecordingHandle::new().reply_row(vec![Value::Int(1), Value::Text("rust".into())]);
    let mut tag = Tag {
        label: "rust".into(),
        ..Default::default()
    };
    tag.save(&mut db).await.unwrap();
    assert_eq!(tag.id, 1);
    db.assert_last_sql("INSERT INTO tags (label) VALUES ($1) RETURNING id,label;");
}
