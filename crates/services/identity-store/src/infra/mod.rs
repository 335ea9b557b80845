//! Infrastructure layer - database connection and schema bootstrap.

mod db;

pub use db::Database;

/// Recorded statements of a mock connection no store holds any more.
#[cfg(test)]
pub(crate) fn transaction_log(
    connection: std::sync::Arc<sea_orm::DatabaseConnection>,
) -> Vec<sea_orm::Transaction> {
    match std::sync::Arc::try_unwrap(connection) {
        Ok(connection) => connection.into_transaction_log(),
        Err(_) => panic!("mock connection is still shared"),
    }
}
