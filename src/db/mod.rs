// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Database utilities

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_connection_pool_at, get_connection, get_database_path,
    ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};

/// Test fixtures shared by repository and service tests.
#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;
    use tempfile::TempDir;

    use super::{create_connection_pool_at, initialize_database, ConnectionPool};

    /// Pool over a fresh on-disk database with the schema applied.
    /// The TempDir must be kept alive for the pool's lifetime.
    pub fn create_test_pool() -> (Arc<ConnectionPool>, TempDir) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = create_connection_pool_at(&dir.path().join("filmhub-test.db"))
            .expect("create test pool");
        {
            let conn = pool.get().expect("get connection");
            initialize_database(&conn).expect("apply schema");
        }
        (Arc::new(pool), dir)
    }
}
