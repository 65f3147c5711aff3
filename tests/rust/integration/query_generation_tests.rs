//! End-to-end generation against the sample catalog

use std::sync::Arc;

use fieldsql::field_catalog::{FieldCatalog, DEFAULT_SYSTEM, SYSTEM_A, SYSTEM_B};
use fieldsql::query_generator::{MatchSettings, QueryGenerator, QueryGeneratorError};

use super::sample_catalog_path;

fn sample_generator(settings: MatchSettings) -> QueryGenerator {
    let catalog =
        FieldCatalog::from_csv_path(sample_catalog_path()).expect("sample catalog should load");
    QueryGenerator::new(Arc::new(catalog), settings)
}

#[test]
fn test_user_emails_single_table() {
    let result = sample_generator(MatchSettings::default())
        .generate("get user emails", DEFAULT_SYSTEM, 0)
        .unwrap();

    assert_eq!(result.query, "SELECT users.email FROM users u");
    assert_eq!(result.matched_fields.len(), 1);
    assert_eq!(result.matched_fields[0].qualified_name(), "users.email");
    assert!(result.joins_used.is_empty());
    assert!(result.confidence > 0.0);
}

#[test]
fn test_count_total_orders() {
    let result = sample_generator(MatchSettings::default())
        .generate("count total orders", DEFAULT_SYSTEM, 0)
        .unwrap();

    assert_eq!(result.query, "SELECT COUNT(orders.total_amount) FROM orders o");
    assert!(!result.query.contains("GROUP BY"));
    assert!(!result.query.contains("DISTINCT"));
}

#[test]
fn test_unique_product_names_ordered_joins_the_chain() {
    let result = sample_generator(MatchSettings::default())
        .generate("unique product names ordered", DEFAULT_SYSTEM, 0)
        .unwrap();

    assert!(result.query.starts_with("SELECT DISTINCT "));
    assert!(result.query.matches(" JOIN ").count() >= 2);
    assert!(result.joins_used.len() >= 2);
    assert_eq!(
        result.query,
        "SELECT DISTINCT users.name, order_items.product_id, products.name FROM users u \
         JOIN orders o ON orders.user_id = users.user_id \
         JOIN order_items o ON order_items.order_id = orders.order_id \
         JOIN products p ON order_items.product_id = products.product_id"
    );
    assert_eq!(result.confidence, 50.0);
}

#[test]
fn test_group_intent_with_limit() {
    let result = sample_generator(MatchSettings::default())
        .generate("grouped by status", DEFAULT_SYSTEM, 25)
        .unwrap();

    assert_eq!(
        result.query,
        "SELECT orders.status, COUNT(*) FROM orders o GROUP BY orders.status LIMIT 25"
    );
}

#[test]
fn test_nonsense_description_is_no_matches() {
    let err = sample_generator(MatchSettings::default())
        .generate("xyz12345 nonexistent", DEFAULT_SYSTEM, 0)
        .unwrap_err();

    assert_eq!(err, QueryGeneratorError::NoMatches);
}

#[test]
fn test_system_names_follow_requested_system() {
    let generator = sample_generator(MatchSettings::default());

    let system_a = generator.generate("user email", SYSTEM_A, 0).unwrap();
    assert_eq!(
        system_a.matched_fields[0].system_field.as_deref(),
        Some("usr_email")
    );

    let system_b = generator.generate("user email", SYSTEM_B, 0).unwrap();
    assert_eq!(
        system_b.matched_fields[0].system_field.as_deref(),
        Some("customer_email")
    );
    assert_eq!(system_a.query, system_b.query);
}

#[test]
fn test_max_matches_caps_results() {
    let result = sample_generator(MatchSettings {
        max_matches: 1,
        ..Default::default()
    })
    .generate("unique product names ordered", DEFAULT_SYSTEM, 0)
    .unwrap();

    assert_eq!(result.matched_fields.len(), 1);
    assert_eq!(result.query, "SELECT DISTINCT users.name FROM users u");
}

#[test]
fn test_fuzzy_matching_tolerates_typos() {
    let strict = sample_generator(MatchSettings::default());
    assert_eq!(
        strict.generate("categroy", DEFAULT_SYSTEM, 0).unwrap_err(),
        QueryGeneratorError::NoMatches
    );

    let fuzzy = sample_generator(MatchSettings {
        fuzzy: true,
        ..Default::default()
    });
    let result = fuzzy.generate("categroy", DEFAULT_SYSTEM, 0).unwrap();
    assert_eq!(
        result.matched_fields[0].qualified_name(),
        "products.category"
    );
}
