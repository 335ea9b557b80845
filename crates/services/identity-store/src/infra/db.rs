//! Database connection and initialization.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, Schema, Statement,
};

use common::DatabaseConfig;

use crate::repository::entities::{role, user, user_claim, user_login, user_role};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Open a pooled connection; the URL scheme selects the backend.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(config.sqlx_logging);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!(
            backend = ?connection.get_database_backend(),
            max_connections = config.max_connections,
            "Database connected"
        );

        Ok(Self::from_connection(connection))
    }

    /// Wrap an already open connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a shared handle to the database connection.
    pub fn get_connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.connection)
    }

    /// Hand over this wrapper's connection handle.
    pub fn into_connection(self) -> Arc<DatabaseConnection> {
        self.connection
    }

    /// Create any missing identity tables from the entity definitions.
    ///
    /// Existing tables are left untouched; there is no migration history.
    pub async fn create_schema(&self) -> Result<(), DbErr> {
        self.create_table(user::Entity).await?;
        self.create_table(role::Entity).await?;
        self.create_table(user_role::Entity).await?;
        self.create_table(user_claim::Entity).await?;
        self.create_table(user_login::Entity).await?;

        tracing::info!("Identity schema ready");
        Ok(())
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(entity);
        stmt.if_not_exists();

        self.connection.execute(backend.build(&stmt)).await?;
        Ok(())
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
