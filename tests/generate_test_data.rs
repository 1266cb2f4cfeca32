//! End-to-end generation runs against the in-memory store.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use relgen::{
    generate_test_data, generate_test_data_with_context, GenerationConfig, GenerationError,
    RunPhase,
};
use relgen_core::{
    FieldDescriptor, FieldType, Instance, ModelDescriptor, RelationKind, Schema, Value,
};
use relgen_store::{MemoryStore, Store};
use relgen_synth::{Dictionary, SynthContext};
use std::collections::HashSet;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("relgen=debug,relgen_store=debug")
        .try_init()
        .ok(); // Ignore if already initialized
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn context() -> SynthContext {
    SynthContext::with_dictionary(Dictionary::builtin())
        .with_now(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

fn text_values(instances: &[Instance], field: &str) -> Vec<String> {
    instances
        .iter()
        .filter_map(|i| i.get_field(field)?.as_str().map(String::from))
        .collect()
}

#[test]
fn test_library_generation() -> Result<()> {
    init_logging();
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(10).with_seed(42);

    let report = generate_test_data_with_context(&schema, &mut store, &config, &context())?;

    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(
        report.order,
        vec!["Publisher", "Tag", "Author", "Book", "Review"]
    );
    assert!(report.unresolved.is_empty());

    assert_eq!(store.count("Publisher"), 10);
    assert_eq!(store.count("Tag"), 10);
    assert_eq!(store.count("Author"), 10);
    let books = report.model("Book").unwrap();
    assert_eq!(books.created + books.skipped, 10);
    assert_eq!(store.count("Book"), books.created);
    assert_eq!(store.count("Review"), 10);

    // Unique fields hold distinct values
    let authors = store.instances("Author");
    let emails: HashSet<String> = text_values(&authors, "email").into_iter().collect();
    assert_eq!(emails.len(), 10);
    let handles: HashSet<String> = text_values(&authors, "handle").into_iter().collect();
    assert_eq!(handles.len(), 10);

    // Validator bounds hold
    for author in &authors {
        let age = author.get_field("age").and_then(Value::as_i64).unwrap();
        assert!((18..=99).contains(&age), "age {age} out of bounds");
    }

    // The optional self reference was deferred and filled afterwards
    let author_ids: HashSet<_> = authors.iter().map(|a| a.id).collect();
    for author in &authors {
        let mentor = author.get_field("mentor").and_then(Value::as_ref_id);
        assert!(mentor.is_some_and(|id| author_ids.contains(&id)));
    }

    // Required many-to-many links converge
    let tag_ids: HashSet<_> = store.instances("Tag").iter().map(|t| t.id).collect();
    for book in store.instances("Book") {
        let tags = book.linked("tags");
        assert!((1..=5).contains(&tags.len()));
        assert!(tags.iter().all(|id| tag_ids.contains(id)));
        let code = book.get_field("code").and_then(Value::as_str).unwrap();
        assert!(code.starts_with("BK-"));
    }

    // Reviews point at persisted books
    let book_ids: HashSet<_> = store.instances("Book").iter().map(|b| b.id).collect();
    for review in store.instances("Review") {
        let book = review.get_field("book").and_then(Value::as_ref_id).unwrap();
        assert!(book_ids.contains(&book));
        let rating = review.get_field("rating").and_then(Value::as_i64).unwrap();
        assert!((1..=5).contains(&rating));
    }

    Ok(())
}

#[test]
fn test_cycle_aborts_before_generation() -> Result<()> {
    init_logging();
    let schema = Schema::from_file(fixture("cycle.yaml"))?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(5).with_seed(42);

    let err = generate_test_data_with_context(&schema, &mut store, &config, &context())
        .unwrap_err();
    match err {
        GenerationError::CyclicDependency { cycle } => {
            let members: HashSet<&str> = cycle.iter().map(String::as_str).collect();
            assert_eq!(members, HashSet::from(["A", "C", "D"]));
        }
        other => panic!("Expected CyclicDependency, got {other:?}"),
    }
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_unique_wide_char_field() -> Result<()> {
    init_logging();
    let schema = Schema::new(vec![ModelDescriptor::new(
        "Item",
        vec![FieldDescriptor::new("code", FieldType::char(500)).unique()],
    )])?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(50).with_seed(42);

    generate_test_data_with_context(&schema, &mut store, &config, &context())?;

    let items = store.instances("Item");
    assert_eq!(items.len(), 50);
    let codes = text_values(&items, "code");
    assert!(codes.iter().all(|c| c.chars().count() <= 500));
    let distinct: HashSet<&String> = codes.iter().collect();
    assert_eq!(distinct.len(), 50);
    Ok(())
}

#[test]
fn test_required_one_to_one_to_empty_model_is_deferred() -> Result<()> {
    init_logging();
    let schema = Schema::new(vec![
        ModelDescriptor::new(
            "Account",
            vec![FieldDescriptor::new("name", FieldType::char(20))],
        ),
        ModelDescriptor::new(
            "Profile",
            vec![
                FieldDescriptor::new("bio", FieldType::text(Some(120))),
                FieldDescriptor::relation("account", "Account", RelationKind::OneToOne),
            ],
        ),
    ])?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(5)
        .with_seed(42)
        .with_model_size("Account", 0);

    let report = generate_test_data_with_context(&schema, &mut store, &config, &context())?;

    let profile = report.model("Profile").unwrap();
    assert_eq!(profile.created, 0);
    assert_eq!(profile.deferred, vec!["account".to_string()]);
    assert_eq!(report.unresolved, vec!["Profile.account".to_string()]);
    assert_eq!(store.count("Profile"), 0);
    Ok(())
}

#[test]
fn test_subset_pulls_in_dependencies() -> Result<()> {
    init_logging();
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(4).with_seed(42).with_models(["Book"]);

    let report = generate_test_data_with_context(&schema, &mut store, &config, &context())?;

    assert_eq!(report.order, vec!["Publisher", "Tag", "Author", "Book"]);
    assert_eq!(store.count("Review"), 0);
    assert_eq!(store.count("Publisher"), 4);
    assert_eq!(store.count("Tag"), 4);
    assert_eq!(store.count("Author"), 4);
    Ok(())
}

#[test]
fn test_unknown_subset_model() -> Result<()> {
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(4).with_models(["Nope"]);

    let err = generate_test_data_with_context(&schema, &mut store, &config, &context())
        .unwrap_err();
    assert!(matches!(err, GenerationError::UnknownModel(name) if name == "Nope"));
    Ok(())
}

#[test]
fn test_config_file_drives_run() -> Result<()> {
    init_logging();
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let config = GenerationConfig::from_file(fixture("config.yaml"))?;
    let mut store = MemoryStore::new();

    let report = generate_test_data(&schema, &mut store, &config)?;

    assert_eq!(report.phase, RunPhase::Done);
    assert_eq!(store.count("Tag"), 4);
    assert_eq!(store.count("Author"), 6);
    assert_eq!(store.count("Review"), 0);
    for book in store.instances("Book") {
        assert!((1..=4).contains(&book.linked("tags").len()));
    }
    Ok(())
}

#[test]
fn test_closure_override() -> Result<()> {
    init_logging();
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let mut store = MemoryStore::new();
    let config = GenerationConfig::new(3)
        .with_seed(42)
        .with_models(["Publisher"])
        .with_override("Publisher", "name", |_, index| {
            Value::Text(format!("Press {index}"))
        });

    generate_test_data_with_context(&schema, &mut store, &config, &context())?;

    let mut names = text_values(&store.instances("Publisher"), "name");
    names.sort();
    assert_eq!(names, vec!["Press 0", "Press 1", "Press 2"]);
    Ok(())
}

#[test]
fn test_same_seed_same_data() -> Result<()> {
    let schema = Schema::from_file(fixture("library.yaml"))?;
    let config = GenerationConfig::new(6).with_seed(1234);
    let ctx = context();

    let mut first = MemoryStore::new();
    generate_test_data_with_context(&schema, &mut first, &config, &ctx)?;
    let mut second = MemoryStore::new();
    generate_test_data_with_context(&schema, &mut second, &config, &ctx)?;

    for model in schema.model_names() {
        assert_eq!(first.instances(model), second.instances(model), "{model}");
    }
    Ok(())
}
