//! Connection and table configuration.

use serde::Deserialize;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Database server credentials and pool sizing.
///
/// Consumed once when the pool is created. Can be deserialized from any serde
/// format; missing fields fall back to the defaults.
///
/// ```ignore
/// let config: ConnectionConfig = toml::from_str(r#"
///     user = "app"
///     password = "secret"
///     database = "shop"
/// "#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Require an encrypted connection.
    pub tls: bool,
    /// Upper bound on pooled connections.
    pub max_connections: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            tls: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ConnectionConfig {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Pool size, falling back to the default when unset.
    pub fn pool_size(&self) -> usize {
        if self.max_connections == 0 {
            DEFAULT_MAX_CONNECTIONS
        } else {
            self.max_connections
        }
    }

    /// Driver configuration for tokio-postgres.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            self.host.as_str()
        };
        config
            .host(host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database)
            .ssl_mode(if self.tls {
                tokio_postgres::config::SslMode::Require
            } else {
                tokio_postgres::config::SslMode::Disable
            });
        config
    }

    /// Connection details for logs; never includes the password.
    pub fn display_details(&self) -> String {
        format!(
            "host={} port={} user={} database={}",
            self.host, self.port, self.user, self.database
        )
    }
}

/// Target table of a [`DbAdapter`](crate::DbAdapter) and its column prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableDetails {
    pub table: String,
    pub prefix: String,
}

impl TableDetails {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Column name with the table prefix applied: `prefix` + `column`.
    pub fn column(&self, column: &str) -> String {
        format!("{}{column}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_host_port_and_pool() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"user":"app","database":"shop"}"#).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.pool_size(), 10);
        assert!(!config.tls);
    }

    #[test]
    fn reads_toml_with_table_details() {
        #[derive(Deserialize)]
        struct AppConfig {
            database: ConnectionConfig,
            customers: TableDetails,
        }

        let config: AppConfig = toml::from_str(
            r#"
            [database]
            host = "db.internal"
            user = "app"
            password = "secret"
            database = "shop"
            tls = true
            max_connections = 4

            [customers]
            table = "customers"
            prefix = "cu_"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.pool_size(), 4);
        assert!(config.database.tls);
        assert_eq!(config.customers.column("id"), "cu_id");
    }

    #[test]
    fn zero_max_connections_uses_default() {
        let config = ConnectionConfig::new("app", "pw", "shop").max_connections(0);
        assert_eq!(config.pool_size(), 10);
        assert_eq!(config.clone().max_connections(3).pool_size(), 3);
    }

    #[test]
    fn details_hide_password() {
        let config = ConnectionConfig::new("app", "s3cret", "shop").host("db.internal");
        let details = config.display_details();
        assert_eq!(details, "host=db.internal port=5432 user=app database=shop");
        assert!(!details.contains("s3cret"));
    }

    #[test]
    fn pg_config_carries_credentials() {
        let pg = ConnectionConfig::new("app", "pw", "shop").port(6543).to_pg_config();
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_dbname(), Some("shop"));
        assert_eq!(pg.get_ports(), &[6543]);
    }

    #[test]
    fn table_prefix_applies_to_columns() {
        let table = TableDetails::new("customers").with_prefix("cu_");
        assert_eq!(table.column("state"), "cu_state");
    }
}
