//! End-to-end tests of the subcommands against a JSON directory store.

use bivdb_cli::commands::{parse_column, parse_reference, JoinKindArg};
use bivdb_cli::{execute, CliConfig, CliError, Command, OutputFormat};
use bivdb_core::{DatabaseConfig, Error};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    config: CliConfig,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::new(dir.path()).with_format(OutputFormat::Json);
        Self { _dir: dir, config }
    }

    fn run(&self, command: Command) -> Result<String, CliError> {
        execute(&command, &self.config, &self.config.store())
    }

    fn json(&self, command: Command) -> serde_json::Value {
        serde_json::from_str(&self.run(command).unwrap()).unwrap()
    }

    fn create(&self, table: &str, columns: &[&str], references: Option<&str>) {
        self.run(Command::Create {
            database: "test".into(),
            table: table.into(),
            columns: columns.iter().map(|c| parse_column(c).unwrap()).collect(),
            primary_key: "id".into(),
            references: references.map(|r| parse_reference(r).unwrap()),
            fk_column: None,
        })
        .unwrap();
    }

    fn insert(&self, table: &str, values: &[&str]) -> Result<String, CliError> {
        self.run(Command::Insert {
            database: "test".into(),
            table: table.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    fn show(&self, table: &str) -> serde_json::Value {
        self.json(Command::Show {
            database: "test".into(),
            table: table.into(),
        })
    }

    fn activate(&self, table: &str, on: bool) {
        self.run(Command::Activate {
            database: "test".into(),
            table: table.into(),
            off: !on,
        })
        .unwrap();
    }
}

#[test]
fn test_create_insert_show() {
    let h = Harness::new();
    h.create("people", &["id:int:not-null", "name:text"], None);
    h.insert("people", &["1", "Alice"]).unwrap();
    h.insert("people", &["2", "null"]).unwrap();

    assert_eq!(
        h.show("people"),
        serde_json::json!([
            { "id": 1, "name": "Alice" },
            { "id": 2, "name": null },
        ])
    );
    assert_eq!(
        h.json(Command::List {
            database: "test".into()
        }),
        serde_json::json!(["people"])
    );
}

#[test]
fn test_rejected_insert_is_not_saved() {
    let h = Harness::new();
    h.create("people", &["id:int", "name:text"], None);

    let err = h.insert("people", &["one", "Alice"]).unwrap_err();
    assert!(matches!(err, CliError::Core(Error::TypeMismatch { .. })));
    let err = h.insert("people", &["1"]).unwrap_err();
    assert!(matches!(err, CliError::Core(Error::SchemaArity { .. })));

    assert_eq!(h.show("people"), serde_json::json!([]));
}

#[test]
fn test_non_finite_float_rejected() {
    let h = Harness::new();
    h.create("t", &["id:int", "x:float:not-null"], None);

    for literal in ["NaN", "inf", "-inf"] {
        let err = h.insert("t", &["1", literal]).unwrap_err();
        assert!(
            matches!(err, CliError::Core(Error::TypeMismatch { ref actual, .. }) if actual == "non-finite float"),
            "{} gave {:?}",
            literal,
            err
        );
    }

    h.insert("t", &["2", "1.5"]).unwrap();
    assert_eq!(h.show("t"), serde_json::json!([{ "id": 2, "x": 1.5 }]));
}

#[test]
fn test_escaped_null_text() {
    let h = Harness::new();
    h.create("notes", &["id:int", "body:text"], None);
    h.insert("notes", &["1", "\\null"]).unwrap();
    h.insert("notes", &["2", "null"]).unwrap();

    assert_eq!(
        h.show("notes"),
        serde_json::json!([
            { "id": 1, "body": "null" },
            { "id": 2, "body": null },
        ])
    );
}

#[test]
fn test_duplicate_create() {
    let h = Harness::new();
    h.create("people", &["id:int"], None);

    let err = h
        .run(Command::Create {
            database: "test".into(),
            table: "people".into(),
            columns: vec![parse_column("id:int").unwrap()],
            primary_key: "id".into(),
            references: None,
            fk_column: None,
        })
        .unwrap_err();
    assert!(matches!(err, CliError::Core(Error::DuplicateTable(_))));
}

#[test]
fn test_foreign_key_enforced_across_invocations() {
    let h = Harness::new();
    h.create("table2", &["id:int", "name:text"], None);
    h.create("table1", &["id:int", "lang:text"], Some("table2"));
    h.insert("table2", &["3", "Cindy"]).unwrap();

    // Inactive tables accept dangling references.
    h.insert("table1", &["9", "Go"]).unwrap();

    h.activate("table1", true);
    h.insert("table1", &["3", "null"]).unwrap();
    let err = h.insert("table1", &["1", "Python"]).unwrap_err();
    assert!(matches!(
        err,
        CliError::Core(Error::ForeignKeyViolation { .. })
    ));

    let meta = h.json(Command::Metadata {
        database: "test".into(),
        table: "table1".into(),
    });
    assert_eq!(meta["active"], true);
    assert_eq!(meta["row_count"], 2);
    assert_eq!(meta["foreign_key"], "id -> table2.id");
}

#[test]
fn test_update_and_remove_by_key() {
    let h = Harness::new();
    h.create("people", &["id:int", "name:text"], None);
    h.insert("people", &["1", "Alice"]).unwrap();
    h.insert("people", &["2", "Bob"]).unwrap();

    let out = h.json(Command::Update {
        database: "test".into(),
        table: "people".into(),
        key: "2".into(),
        column: "name".into(),
        value: "Robert".into(),
    });
    assert_eq!(out["affected"], 1);

    let out = h.json(Command::Update {
        database: "test".into(),
        table: "people".into(),
        key: "5".into(),
        column: "name".into(),
        value: "Nobody".into(),
    });
    assert_eq!(out["message"], "no row found");

    let out = h.json(Command::Remove {
        database: "test".into(),
        table: "people".into(),
        key: "1".into(),
    });
    assert_eq!(out["affected"], 1);

    assert_eq!(
        h.show("people"),
        serde_json::json!([{ "id": 2, "name": "Robert" }])
    );
}

#[test]
fn test_unchecked_updates() {
    let mut h = Harness::new();
    h.create("people", &["id:int", "name:text"], None);
    h.insert("people", &["1", "Alice"]).unwrap();

    let update = Command::Update {
        database: "test".into(),
        table: "people".into(),
        key: "1".into(),
        column: "id".into(),
        value: "abc".into(),
    };
    assert!(h.run(update.clone()).is_err());

    h.config = h
        .config
        .clone()
        .with_database_config(DatabaseConfig::new().validate_updates(false));
    let out: serde_json::Value = serde_json::from_str(&h.run(update).unwrap()).unwrap();
    assert_eq!(out["affected"], 1);

    // The saved image no longer matches its schema, so loading it fails.
    let err = h
        .run(Command::Show {
            database: "test".into(),
            table: "people".into(),
        })
        .unwrap_err();
    assert!(matches!(err, CliError::Core(Error::TypeMismatch { .. })));
}

#[test]
fn test_join_kinds() {
    let h = Harness::new();
    h.create("a", &["id:int", "name:text"], None);
    h.create("b", &["id:int", "lang:text"], None);
    h.insert("a", &["1", "Alice"]).unwrap();
    h.insert("a", &["2", "Bob"]).unwrap();
    h.insert("b", &["1", "Py"]).unwrap();
    h.insert("b", &["1", "Java"]).unwrap();
    h.insert("b", &["4", "Rust"]).unwrap();

    let join = |kind| {
        h.json(Command::Join {
            database: "test".into(),
            left: "a".into(),
            right: "b".into(),
            kind,
            on: None,
        })
    };

    assert_eq!(
        join(JoinKindArg::Left),
        serde_json::json!([
            { "id": 1, "name": "Alice", "lang": "Py" },
            { "id": 1, "name": "Alice", "lang": "Java" },
            { "id": 2, "name": "Bob", "lang": null },
        ])
    );
    assert_eq!(join(JoinKindArg::Right).as_array().unwrap().len(), 3);
    assert_eq!(join(JoinKindArg::Full).as_array().unwrap().len(), 4);
}

#[test]
fn test_drop_database() {
    let h = Harness::new();
    h.create("people", &["id:int"], None);

    let out = h.json(Command::Drop {
        database: "test".into(),
    });
    assert_eq!(out["message"], "Database 'test' dropped");

    // Dropping again is reported, not failed.
    let out = h.json(Command::Drop {
        database: "test".into(),
    });
    assert!(out["message"].as_str().unwrap().starts_with("warning:"));

    let err = h.insert("people", &["1"]).unwrap_err();
    assert!(matches!(err, CliError::Core(Error::TableNotFound(_))));
}

#[test]
fn test_table_output() {
    let mut h = Harness::new();
    h.config.format = OutputFormat::Table;
    h.create("people", &["id:int", "name:text"], None);
    h.insert("people", &["1", "Alice"]).unwrap();

    let out = h
        .run(Command::Show {
            database: "test".into(),
            table: "people".into(),
        })
        .unwrap();
    assert!(out.contains("Alice"));
    assert!(out.ends_with("1 row(s)"));
}
