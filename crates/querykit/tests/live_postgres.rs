//! Round trip against a real server.
//!
//! Reads `PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD` and `PGDATABASE` (a
//! `.env` file is honoured). Skipped when `PGDATABASE` is not set.

#![cfg(feature = "pool")]

use querykit::prelude::*;

#[derive(Debug, PartialEq)]
struct Customer {
    id: i64,
    last_name: String,
    state: String,
}

impl FromRow for Customer {
    fn from_row(row: &tokio_postgres::Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("customer_id")?,
            last_name: row.try_get_column("last_name")?,
            state: row.try_get_column("state")?,
        })
    }
}

fn config_from_env() -> Option<ConnectionConfig> {
    dotenvy::dotenv().ok();
    let database = std::env::var("PGDATABASE").ok()?;
    let mut config = ConnectionConfig::new(
        std::env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string()),
        std::env::var("PGPASSWORD").unwrap_or_default(),
        database,
    )
    .max_connections(2);
    if let Ok(host) = std::env::var("PGHOST") {
        config = config.host(host);
    }
    if let Some(port) = std::env::var("PGPORT").ok().and_then(|p| p.parse().ok()) {
        config = config.port(port);
    }
    Some(config)
}

#[tokio::test]
async fn customers_round_trip() -> DbResult<()> {
    let Some(config) = config_from_env() else {
        eprintln!("PGDATABASE is not set; skipping customers_round_trip");
        return Ok(());
    };

    let pool = querykit::connect(&config).await?;
    let client = pool.get().await?;
    GenericClient::execute(
        &client,
        "CREATE TEMP TABLE customers (
            customer_id BIGSERIAL PRIMARY KEY,
            last_name TEXT NOT NULL,
            state TEXT NOT NULL
        )",
        &[],
    )
    .await?;

    let mut customers = DbAdapter::for_table("customers");

    let johnson = customers
        .insert(["last_name", "state"], params!["Johnson", "California"])
        .exec_insert_returning_id(&client, "customer_id")
        .await?;
    let inserted = customers
        .insert(["last_name", "state"], params!["Smith", "Oregon"])
        .exec_insert(&client)
        .await?;
    assert_eq!(inserted, 1);

    let found: Vec<Customer> = customers
        .select_columns(["customer_id", "last_name", "state"])
        .where_group(WhereGroup::and(vec![
            Clause::and("state", fragment::eq("California")),
            Clause::and("last_name", fragment::eq("Johnson")),
        ]))
        .exec_select_as(&client)
        .await?;
    assert_eq!(
        found,
        vec![Customer {
            id: johnson,
            last_name: "Johnson".to_string(),
            state: "California".to_string(),
        }]
    );

    let updated = customers
        .update(["state"], params!["Nevada"])
        .where_group(WhereGroup::and(vec![Clause::and(
            "customer_id",
            fragment::eq(johnson),
        )]))
        .exec_update(&client)
        .await?;
    assert_eq!(updated, 1);

    let row = customers
        .select_row_columns(["state"])
        .where_group(WhereGroup::and(vec![Clause::and(
            "customer_id",
            fragment::eq(johnson),
        )]))
        .exec_select_row(&client)
        .await?
        .ok_or_else(|| DbError::not_found("updated customer"))?;
    assert_eq!(row.try_get_column::<String>("state")?, "Nevada");

    let many = customers.select_row().exec_select_row(&client).await?;
    assert!(many.is_none());

    GenericClient::execute(
        &client,
        "CREATE TEMP TABLE regions (
            region_id SERIAL PRIMARY KEY,
            code TEXT NOT NULL
        )",
        &[],
    )
    .await?;
    let mut regions = DbAdapter::for_table("regions");
    let first = regions
        .insert_value("code", "CA")
        .exec_insert_returning_id(&client, "region_id")
        .await?;
    let second = regions
        .insert_value("code", "OR")
        .exec_insert_returning_id(&client, "region_id")
        .await?;
    assert_eq!(second, first + 1);

    let deleted = customers
        .delete()
        .where_group(WhereGroup::and(vec![Clause::and(
            "last_name",
            fragment::in_list(["Johnson", "Smith"]),
        )]))
        .exec_delete(&client)
        .await?;
    assert_eq!(deleted, 2);

    Ok(())
}
