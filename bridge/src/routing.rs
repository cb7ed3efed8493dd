//! Routing configuration: which remote adapter and token stand behind each
//! remote domain.
//!
//! The table is administered outside this crate and is read-only to the
//! adapter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tidal_types::{Address, DomainId};

use crate::error::BridgeError;

/// The trusted counterpart on one remote domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRoute {
    /// The paired adapter; inbound messages must come from it.
    pub remote_adapter: Address,
    /// The token identity outbound messages are addressed to.
    pub remote_token: Address,
}

/// Flat form of a route, as written in configuration files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub domain: DomainId,
    pub remote_adapter: Address,
    pub remote_token: Address,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingTable {
    routes: BTreeMap<DomainId, RemoteRoute>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from config entries. A later entry for the same domain wins.
    pub fn from_entries(entries: impl IntoIterator<Item = RouteEntry>) -> Self {
        let routes = entries
            .into_iter()
            .map(|e| {
                (
                    e.domain,
                    RemoteRoute {
                        remote_adapter: e.remote_adapter,
                        remote_token: e.remote_token,
                    },
                )
            })
            .collect();
        Self { routes }
    }

    pub fn with_route(mut self, domain: DomainId, route: RemoteRoute) -> Self {
        self.routes.insert(domain, route);
        self
    }

    pub fn get(&self, domain: DomainId) -> Option<&RemoteRoute> {
        self.routes.get(&domain)
    }

    pub fn resolve(&self, domain: DomainId) -> Result<&RemoteRoute, BridgeError> {
        self.routes
            .get(&domain)
            .ok_or(BridgeError::UnknownRoute(domain))
    }

    /// Whether `adapter` is the paired adapter configured for `domain`.
    pub fn is_trusted(&self, domain: DomainId, adapter: &Address) -> bool {
        self.routes
            .get(&domain)
            .is_some_and(|r| &r.remote_adapter == adapter)
    }

    pub fn entries(&self) -> Vec<RouteEntry> {
        self.routes
            .iter()
            .map(|(domain, r)| RouteEntry {
                domain: *domain,
                remote_adapter: r.remote_adapter.clone(),
                remote_token: r.remote_token.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
