//! Connection pool utilities

use crate::client::GenericClient;
use crate::config::ConnectionConfig;
use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a connection pool from a [`ConnectionConfig`].
///
/// Uses `NoTls`; a config with `tls = true` is rejected here and must go
/// through [`create_pool_with_tls`] with a real connector.
///
/// ```ignore
/// let pool = querykit::create_pool(&ConnectionConfig::new("app", "secret", "shop"))?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &ConnectionConfig) -> DbResult<Pool> {
    if config.tls {
        return Err(DbError::configuration(
            "tls requested; use create_pool_with_tls with a connector",
        ));
    }
    create_pool_with_manager_config(config, NoTls, default_manager_config(), |builder| builder)
}

/// Create a connection pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &ConnectionConfig, tls: T) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    create_pool_with_manager_config(config, tls, default_manager_config(), |builder| builder)
}

/// Create a connection pool with an injected `ManagerConfig` and extra `PoolBuilder` tuning.
///
/// The pool size from `config` is applied before `configure_pool` runs.
pub fn create_pool_with_manager_config<T>(
    config: &ConnectionConfig,
    tls: T,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    if config.database.is_empty() {
        return Err(DbError::configuration("database name is required"));
    }

    let mgr = Manager::from_config(config.to_pg_config(), tls, manager_config);
    let pool = configure_pool(Pool::builder(mgr).max_size(config.pool_size()))
        .build()
        .map_err(|e| DbError::Pool(e.to_string()))?;

    tracing::debug!(
        target: "querykit.pool",
        details = %config.display_details(),
        max_size = config.pool_size(),
        "pool created"
    );
    Ok(pool)
}

/// Create a pool and verify it can reach the server.
///
/// Fails with [`DbError::Connection`] when no connection can be opened.
pub async fn connect(config: &ConnectionConfig) -> DbResult<Pool> {
    let pool = create_pool(config)?;
    ping(&pool).await.map_err(|err| {
        tracing::warn!(
            target: "querykit.pool",
            details = %config.display_details(),
            error = %err,
            "database unreachable"
        );
        DbError::Connection(format!("{}: {err}", config.display_details()))
    })?;
    Ok(pool)
}

async fn ping(pool: &Pool) -> DbResult<()> {
    let client = pool.get().await?;
    GenericClient::execute(&client, "SELECT 1", &[]).await?;
    Ok(())
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_config_needs_a_connector() {
        let config = ConnectionConfig::new("app", "pw", "shop").tls(true);
        let err = create_pool(&config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_database_is_rejected() {
        let config = ConnectionConfig::new("app", "pw", "");
        assert!(create_pool(&config).unwrap_err().is_configuration());
    }

    #[test]
    fn pool_size_follows_config() {
        let config = ConnectionConfig::new("app", "pw", "shop").max_connections(4);
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, 4);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let config = ConnectionConfig::new("app", "pw", "shop")
            .host("127.0.0.1")
            .port(1);
        let Err(err) = connect(&config).await else {
            panic!("connected to a closed port");
        };
        assert!(matches!(err, DbError::Connection(_)), "got {err:?}");
        assert!(err.to_string().contains("host=127.0.0.1 port=1"));
    }
}
