//! Data containers
//!
//! Descriptors for the concrete databases a PSP merges and stages data in.
//! All values arrive already resolved (hosts, ports, database names); the
//! model reads no environment variables and opens no connections.

use crate::location::LocationKey;
use crate::runtime::ProductionStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A resolved host and port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortPair {
    /// Host name or address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl HostPortPair {
    /// Create a host/port pair
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Kind of database engine backing a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataContainerKind {
    /// PostgreSQL
    PostgresDatabase,

    /// Microsoft SQL Server
    SqlServerDatabase,
}

/// A named database used for merge or staging storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContainer {
    /// Container name, e.g. the Kubernetes deployment name
    pub name: String,

    /// Database engine kind
    pub kind: DataContainerKind,

    /// Resolved endpoint
    pub host_port: HostPortPair,

    /// Database name within the engine
    pub database_name: String,

    /// Locations hosting this container
    pub locations: BTreeSet<LocationKey>,

    /// Whether this container serves production traffic
    pub production_status: ProductionStatus,
}

impl DataContainer {
    /// Create a PostgreSQL container descriptor
    pub fn postgres(
        name: impl Into<String>,
        host_port: HostPortPair,
        database_name: impl Into<String>,
        locations: BTreeSet<LocationKey>,
        production_status: ProductionStatus,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DataContainerKind::PostgresDatabase,
            host_port,
            database_name: database_name.into(),
            locations,
            production_status,
        }
    }

    /// Create a SQL Server container descriptor
    pub fn sql_server(
        name: impl Into<String>,
        host_port: HostPortPair,
        database_name: impl Into<String>,
        locations: BTreeSet<LocationKey>,
        production_status: ProductionStatus,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DataContainerKind::SqlServerDatabase,
            host_port,
            database_name: database_name.into(),
            locations,
            production_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_container() {
        let locations: BTreeSet<_> = [LocationKey::new("MyCorp:USA/NY_1")].into_iter().collect();
        let container = DataContainer::postgres(
            "K8sMergeDB",
            HostPortPair::new("postgres-demo", 5432),
            "merge_db",
            locations,
            ProductionStatus::NotProduction,
        );

        assert_eq!(container.kind, DataContainerKind::PostgresDatabase);
        assert_eq!(container.host_port.port, 5432);
        assert_eq!(container.database_name, "merge_db");
        assert_eq!(container.locations.len(), 1);
    }

    #[test]
    fn test_sql_server_container() {
        let container = DataContainer::sql_server(
            "AzureMergeDB",
            HostPortPair::new("sql.example.net", 1433),
            "merge_db",
            BTreeSet::new(),
            ProductionStatus::NotProduction,
        );
        assert_eq!(container.kind, DataContainerKind::SqlServerDatabase);
    }
}
