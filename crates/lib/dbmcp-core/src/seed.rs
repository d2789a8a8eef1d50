//! Sample data loading for both adapters.

use dbmcp_store::models::{ORDERS, Order, PRODUCTS, Product, SampleRecord, USERS, User, format_price};
use dbmcp_store::schema::{
    DDL_ORDERS, DDL_PRODUCTS, DDL_USERS, DROP_ORDER, SampleTable, TABLE_ORDERS, TABLE_PRODUCTS,
    TABLE_USERS,
};
use tracing::info;

use crate::control::{ControlError, sql::quote_literal};
use crate::store::{KeyValueStore, Warehouse};

/// Rows or keys written for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tables: Vec<TableCount>,
}

impl SeedReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.tables.iter().map(|count| count.rows).sum()
    }
}

/// Writes every fixture as a hash, one `HSET` per key.
///
/// # Errors
/// Returns `ControlError` if the store is unreachable (checked with a ping
/// before any write) or a write fails.
pub async fn seed_store<S: KeyValueStore>(store: &S) -> Result<SeedReport, ControlError> {
    let endpoint = store.endpoint();
    info!(host = %endpoint.host, port = endpoint.port, db = endpoint.db, "seeding key-value store");
    store.ping().await?;

    let mut report = SeedReport::default();
    report.tables.push(seed_hashes(store, &TABLE_USERS, &USERS).await?);
    report.tables.push(seed_hashes(store, &TABLE_PRODUCTS, &PRODUCTS).await?);
    report.tables.push(seed_hashes(store, &TABLE_ORDERS, &ORDERS).await?);
    info!(total = report.total(), "seeding complete");
    Ok(report)
}

async fn seed_hashes<S: KeyValueStore, R: SampleRecord>(
    store: &S,
    table: &SampleTable,
    records: &[R],
) -> Result<TableCount, ControlError> {
    for record in records {
        store
            .hash_set(&table.key_for(record.id()), &record.hash_fields())
            .await?;
    }
    info!(table = table.name, keys = records.len(), "seeded table");
    Ok(TableCount {
        table: table.name,
        rows: records.len(),
    })
}

/// Drops, recreates, and fills the sample tables.
///
/// # Errors
/// Returns `ControlError` if any batch fails; earlier batches stay applied.
pub async fn seed_warehouse<W: Warehouse>(warehouse: &W) -> Result<SeedReport, ControlError> {
    let endpoint = warehouse.endpoint();
    info!(host = %endpoint.host, port = endpoint.port, database = %endpoint.database, "seeding warehouse");

    info!("dropping existing tables");
    warehouse.execute(&drop_statements().join(";\n")).await?;
    info!("creating tables");
    warehouse.execute(&[DDL_USERS, DDL_PRODUCTS, DDL_ORDERS].join(";\n")).await?;
    info!("inserting sample data");
    warehouse.execute(&insert_statements()?.join(";\n")).await?;

    let report = SeedReport {
        tables: vec![
            TableCount { table: TABLE_USERS.name, rows: USERS.len() },
            TableCount { table: TABLE_PRODUCTS.name, rows: PRODUCTS.len() },
            TableCount { table: TABLE_ORDERS.name, rows: ORDERS.len() },
        ],
    };
    info!(total = report.total(), "seeding complete");
    Ok(report)
}

/// Every statement the warehouse seed runs, in order.
///
/// # Errors
/// Returns `ControlError` if a fixture value cannot be rendered as a literal.
pub fn warehouse_statements() -> Result<Vec<String>, ControlError> {
    let mut statements = drop_statements();
    statements.extend([DDL_USERS, DDL_PRODUCTS, DDL_ORDERS].map(str::to_string));
    statements.extend(insert_statements()?);
    Ok(statements)
}

fn drop_statements() -> Vec<String> {
    DROP_ORDER
        .iter()
        .map(|table| format!("DROP TABLE IF EXISTS {table} CASCADE"))
        .collect()
}

fn insert_statements() -> Result<Vec<String>, ControlError> {
    let mut statements = Vec::with_capacity(USERS.len() + PRODUCTS.len() + ORDERS.len());
    for user in &USERS {
        statements.push(user_insert(user)?);
    }
    for product in &PRODUCTS {
        statements.push(product_insert(product)?);
    }
    for order in &ORDERS {
        statements.push(order_insert(order)?);
    }
    Ok(statements)
}

fn user_insert(user: &User) -> Result<String, ControlError> {
    Ok(format!(
        "INSERT INTO users VALUES ({}, {}, {}, {}, {})",
        user.id,
        quote_literal(user.name)?,
        quote_literal(user.email)?,
        quote_literal(user.role)?,
        quote_literal(user.created)?,
    ))
}

fn product_insert(product: &Product) -> Result<String, ControlError> {
    Ok(format!(
        "INSERT INTO products VALUES ({}, {}, {}, {}, {})",
        product.id,
        quote_literal(product.name)?,
        format_price(product.price),
        quote_literal(product.category)?,
        product.stock,
    ))
}

fn order_insert(order: &Order) -> Result<String, ControlError> {
    Ok(format!(
        "INSERT INTO orders VALUES ({}, {}, {}, {}, {}, {})",
        order.id,
        order.user_id,
        order.product_id,
        order.quantity,
        quote_literal(order.status)?,
        quote_literal(order.order_date)?,
    ))
}
