//! The fixed set of services the gateway knows how to inspect.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A service running as a container in the Intellacc stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    Backend,
    Frontend,
    PredictionEngine,
    Db,
}

impl Service {
    /// All services, in the order they are advertised in tool schemas.
    pub const ALL: [Service; 4] = [
        Service::Backend,
        Service::Frontend,
        Service::PredictionEngine,
        Service::Db,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Backend => "backend",
            Service::Frontend => "frontend",
            Service::PredictionEngine => "prediction-engine",
            Service::Db => "db",
        }
    }

    /// Names of every service, for use in JSON Schema `enum` lists.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Service::as_str).collect()
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|svc| svc.as_str() == s)
            .ok_or_else(|| CoreError::UnknownService(s.to_string()))
    }
}

/// Maps each [`Service`] to the container identifier that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMap {
    pub backend: String,
    pub frontend: String,
    pub prediction_engine: String,
    pub db: String,
}

impl ServiceMap {
    pub fn container(&self, service: Service) -> &str {
        match service {
            Service::Backend => &self.backend,
            Service::Frontend => &self.frontend,
            Service::PredictionEngine => &self.prediction_engine,
            Service::Db => &self.db,
        }
    }

    /// Resolve a raw service name straight to its container.
    pub fn resolve(&self, name: &str) -> Result<(Service, &str), CoreError> {
        let service: Service = name.parse()?;
        Ok((service, self.container(service)))
    }
}

impl Default for ServiceMap {
    fn default() -> Self {
        Self {
            backend: "intellacc_backend".to_string(),
            frontend: "intellacc_frontend".to_string(),
            prediction_engine: "intellacc_prediction_engine".to_string(),
            db: "intellacc_db".to_string(),
        }
    }
}
