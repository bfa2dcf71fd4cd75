use async_trait::async_trait;

use crate::common::{LoadBalancerConfig, SubResource};

/// Reference to an update accepted by the load balancer control plane and still being applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentHandle {
    pub id: String,
}

/// Remote control plane of the load balancer. Updates are asynchronous: `submit` returns as soon as the
/// update is accepted and `wait_for_completion` resolves once it has been applied or has failed.
#[async_trait]
pub trait LoadBalancerClient: Send + Sync {
    async fn get(&self) -> crate::Result<LoadBalancerConfig>;

    async fn submit(&self, config: &LoadBalancerConfig) -> crate::Result<DeploymentHandle>;

    async fn wait_for_completion(&self, handle: DeploymentHandle) -> crate::Result<()>;

    async fn public_ip_address(&self, public_ip: &SubResource) -> crate::Result<Option<String>>;
}
