mod model;
mod resource_key;

pub use model::{
    BackendAddress, BackendPool, FrontendIpConfiguration, Listener, LoadBalancerConfig, PathMap, PathRule, Probe, Protocol, RoutingRule,
    SslCertificate, SubResource, HTTPS_PORT, HTTP_PORT,
};
pub use resource_key::{ResourceKey, DEFAULT_NAMESPACE_NAME};

/// Name under which an artifact is unique within one load balancer configuration.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for BackendPool {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Probe {
    fn name(&self) -> &str {
        &self.name
    }
}
