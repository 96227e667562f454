//! End-to-end flow: generate a migration, apply it to a file-backed
//! database, then drive the store against the resulting table.

use options_cli::config::Settings;
use options_cli::migrations::{self, Manager};
use options_cli::store::{Error, OptionsStore};
use options_cli::db;

#[tokio::test]
async fn generated_schema_works_with_the_store() {
    let workspace = tempfile::tempdir().unwrap();
    let migrations_dir = workspace.path().join("migrations");
    let db_path = workspace.path().join("data").join("options.db");

    // Generate and apply the create-table migration.
    migrations::generate(&migrations_dir, "options").unwrap();

    let pool = db::connect(&db_path).await.unwrap();
    let manager = Manager::new(&pool, &migrations_dir);
    assert_eq!(manager.apply_pending().await.unwrap(), 1);
    assert!(manager.status().await.unwrap().is_up_to_date());

    // The accessor agrees with the generated schema.
    let store = OptionsStore::new(pool);
    assert!(store.add("my_key", "my_value").await.unwrap());
    assert!(store.has("my_key").await.unwrap());
    assert_eq!(
        store.get("my_key").await.unwrap(),
        Some("my_value".to_string())
    );

    let err = store.add("my_key", "x").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { ref key } if key == "my_key"));

    assert!(store.update("my_key", "new_value").await.unwrap());
    assert_eq!(
        store.get("my_key").await.unwrap(),
        Some("new_value".to_string())
    );

    assert!(store.delete("my_key").await.unwrap());
    assert!(!store.has("my_key").await.unwrap());
}

#[tokio::test]
async fn custom_table_from_settings() {
    let workspace = tempfile::tempdir().unwrap();
    let migrations_dir = workspace.path().join("migrations");
    let db_path = workspace.path().join("options.db");

    let settings: Settings = toml::from_str(r#"table_name = "app_settings""#).unwrap();

    migrations::generate(&migrations_dir, &settings.table_name).unwrap();

    let pool = db::connect(&db_path).await.unwrap();
    Manager::new(&pool, &migrations_dir)
        .apply_pending()
        .await
        .unwrap();

    let store = OptionsStore::with_table(pool, settings.table_name.clone()).unwrap();
    store.add("theme", "dark").await.unwrap();
    assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));
}
