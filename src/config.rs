use serde::Deserialize;

use crate::error::SqlConnError;

/// What happens when a prepare or out-of-transaction execute fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    #[default]
    FailFast,
    /// Log it, keep it in `last_error`, and carry on.
    Suppress,
}

/// Options for opening a [`Connection`](crate::Connection).
///
/// Every field has a default, so a partial JSON document is enough:
/// ```rust
/// use fast_sql_conn::prelude::*;
///
/// let opts = ConnectOptions::from_json(r#"{ "database": "app.db", "port": 3307 }"#).unwrap();
/// assert_eq!(opts.host, "localhost");
/// assert_eq!(opts.port, 3307);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
    pub charset: String,
    pub error_policy: ErrorPolicy,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
            port: 3306,
            charset: "utf8".to_string(),
            error_policy: ErrorPolicy::FailFast,
        }
    }
}

impl ConnectOptions {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new()
    }

    /// Parse options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `SqlConnError::ConfigError` if the document is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, SqlConnError> {
        let opts: ConnectOptions = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// Returns `SqlConnError::ConfigError` for an empty host or charset.
    pub fn validate(&self) -> Result<(), SqlConnError> {
        if self.host.trim().is_empty() {
            return Err(SqlConnError::ConfigError("host must not be empty".into()));
        }
        if self.charset.trim().is_empty() {
            return Err(SqlConnError::ConfigError("charset must not be empty".into()));
        }
        Ok(())
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.opts.host = host.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.database = database.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.opts.charset = charset.into();
        self
    }

    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.opts.error_policy = policy;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_constructor() {
        let opts = ConnectOptions::default();
        assert_eq!(opts.host, "localhost");
        assert_eq!(opts.user, "root");
        assert_eq!(opts.password, "");
        assert_eq!(opts.database, "");
        assert_eq!(opts.port, 3306);
        assert_eq!(opts.charset, "utf8");
        assert_eq!(opts.error_policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn builder_overrides_fields() {
        let opts = ConnectOptions::builder()
            .host("db.internal")
            .user("app")
            .password("secret")
            .database("shop")
            .port(3307)
            .charset("utf8mb4")
            .error_policy(ErrorPolicy::Suppress)
            .finish();
        assert_eq!(opts.host, "db.internal");
        assert_eq!(opts.database, "shop");
        assert_eq!(opts.port, 3307);
        assert_eq!(opts.error_policy, ErrorPolicy::Suppress);
    }

    #[test]
    fn json_policy_is_snake_case() {
        let opts = ConnectOptions::from_json(r#"{"error_policy":"suppress"}"#).unwrap();
        assert_eq!(opts.error_policy, ErrorPolicy::Suppress);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = ConnectOptions::from_json(r#"{"port":"not-a-port"}"#).unwrap_err();
        assert!(matches!(err, SqlConnError::ConfigError(_)));
        let err = ConnectOptions::from_json(r#"{"host":""}"#).unwrap_err();
        assert!(matches!(err, SqlConnError::ConfigError(_)));
    }
}
