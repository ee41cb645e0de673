use std::{env, fmt, str::FromStr};

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {variable}: expected one of {expected}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which item store backs the projection gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(Self::DynamoDb),
            "memory" | "inmemory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                variable: "STORAGE_BACKEND",
                value: s.to_string(),
                expected: "dynamodb, memory",
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DynamoDb => f.write_str("dynamodb"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage backend (default: dynamodb)
    pub storage_backend: StorageBackend,
    /// DynamoDB table name (default: "ProyeccionesInsumos")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Create the table and its indexes at startup when missing (default: false)
    pub create_table: bool,
    /// Page size of the in-memory backend (default: 100)
    pub memory_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::DynamoDb,
            table_name: "ProyeccionesInsumos".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            create_table: false,
            memory_page_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_BACKEND` - `dynamodb` or `memory` (default: dynamodb)
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "ProyeccionesInsumos")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Custom endpoint URL (default: unset)
    /// - `CREATE_TABLE` - Provision the table at startup (default: false)
    /// - `MEMORY_PAGE_SIZE` - In-memory page size (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        Ok(Self {
            storage_backend,
            table_name: lookup("DYNAMODB_TABLE_NAME").unwrap_or(defaults.table_name),
            region: lookup("AWS_REGION").unwrap_or(defaults.region),
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
            create_table: lookup("CREATE_TABLE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.create_table),
            memory_page_size: lookup("MEMORY_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.memory_page_size),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
