//! Loading the sample mapping file end to end

use std::io::Write;

use fieldsql::field_catalog::{CatalogError, FieldCatalog, GraphError, SYSTEM_A, SYSTEM_B};

use super::sample_catalog_path;

#[test]
fn test_sample_catalog_loads() -> anyhow::Result<()> {
    let catalog = FieldCatalog::from_csv_path(sample_catalog_path())?;

    assert_eq!(catalog.len(), 17);
    assert_eq!(catalog.graph().table_count(), 4);
    for table in ["users", "orders", "order_items", "products"] {
        assert!(catalog.graph().contains_table(table), "missing {}", table);
    }
    Ok(())
}

#[test]
fn test_sample_catalog_system_filters() -> anyhow::Result<()> {
    let catalog = FieldCatalog::from_csv_path(sample_catalog_path())?;

    assert_eq!(catalog.get_all_fields("").len(), 17);
    assert_eq!(catalog.get_all_fields("default").len(), 17);

    let system_a = catalog.get_all_fields(SYSTEM_A);
    assert_eq!(system_a.len(), 13);
    assert!(system_a.iter().all(|f| f.table_name != "order_items"));

    let system_b = catalog.get_all_fields(SYSTEM_B);
    assert!(system_b.iter().all(|f| f.has_alias_for(SYSTEM_B)));

    assert!(catalog.get_all_fields("system_c").is_empty());
    Ok(())
}

#[test]
fn test_sample_catalog_join_chain() -> anyhow::Result<()> {
    let catalog = FieldCatalog::from_csv_path(sample_catalog_path())?;
    let path = catalog.graph().find_join_path("users", "products")?;

    let conditions: Vec<&str> = path.iter().map(|e| e.condition.as_str()).collect();
    assert_eq!(
        conditions,
        vec![
            "orders.user_id = users.user_id",
            "order_items.order_id = orders.order_id",
            "order_items.product_id = products.product_id",
        ]
    );

    assert_eq!(
        catalog.graph().find_join_path("users", "invoices"),
        Err(GraphError::TableNotFound {
            table: "invoices".to_string()
        })
    );
    Ok(())
}

#[test]
fn test_missing_file_is_fatal() {
    let err = FieldCatalog::from_csv_path("/nonexistent/field_mappings.csv").unwrap_err();
    assert!(matches!(err, CatalogError::Open { .. }));
}

#[test]
fn test_malformed_rows_are_skipped() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        "column_name,table_name,system_a_fieldmap,system_b_fieldmap,field_description,field_type,join_key,foreign_table,foreign_key"
    )?;
    writeln!(file, "email,users,usr_email,,User email address,string,,,")?;
    writeln!(file, "broken,row")?;
    writeln!(file, "user_id,orders,,,Ordering customer,int,,users,user_id")?;
    file.flush()?;

    let catalog = FieldCatalog::from_csv_path(file.path())?;
    assert_eq!(catalog.len(), 2);
    assert!(catalog.graph().edge("orders", "users").is_some());
    Ok(())
}
