use std::fmt::Display;

use serde::Deserialize;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::Result;

pub const DEFAULT_INGRESS_CLASS: &str = "azure/application-gateway";

/// Coordinates of the load balancer resource in its cloud account.
#[derive(Clone, Debug, TypedBuilder, Deserialize, PartialEq, Eq)]
pub struct LoadBalancerIdentifier {
    #[builder(setter(into))]
    pub subscription_id: String,
    #[builder(setter(into))]
    pub resource_group: String,
    #[builder(setter(into))]
    pub name: String,
}

impl Display for LoadBalancerIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.subscription_id, self.resource_group, self.name)
    }
}

#[derive(Debug, TypedBuilder, Deserialize)]
pub struct Configuration {
    #[builder(setter(into))]
    pub controller_name: String,
    #[builder(default)]
    pub enable_open_telemetry: Option<bool>,
    #[builder(default)]
    pub use_private_ip: Option<bool>,
    #[builder(default)]
    pub ingress_class: Option<String>,
    pub load_balancer: LoadBalancerIdentifier,
}

#[derive(Error, Debug)]
enum ConfigurationError {
    #[error("controller name must be not empty")]
    ControllerName,
    #[error("load balancer resource group and name must be not empty")]
    LoadBalancer,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.controller_name.is_empty() {
            return Err(ConfigurationError::ControllerName.into());
        }
        if self.load_balancer.resource_group.is_empty() || self.load_balancer.name.is_empty() {
            return Err(ConfigurationError::LoadBalancer.into());
        }
        Ok(())
    }

    pub fn use_private_ip(&self) -> bool {
        self.use_private_ip.unwrap_or_default()
    }

    pub fn ingress_class(&self) -> &str {
        self.ingress_class.as_deref().unwrap_or(DEFAULT_INGRESS_CLASS)
    }
}
