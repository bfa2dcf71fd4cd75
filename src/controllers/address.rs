use tracing::warn;

use crate::{common::LoadBalancerConfig, services::LoadBalancerClient};

/// Address at which the load balancer is reachable: the first private frontend address when
/// `use_private_ip` is set, otherwise the first public one as resolved by the control plane.
pub async fn resolve_frontend_address(config: &LoadBalancerConfig, use_private_ip: bool, client: &dyn LoadBalancerClient) -> Option<String> {
    for frontend in &config.frontend_ip_configurations {
        if use_private_ip {
            if let Some(address) = &frontend.private_ip_address {
                return Some(address.clone());
            }
        } else if let Some(public_ip) = &frontend.public_ip_address {
            return match client.public_ip_address(public_ip).await {
                Ok(address) => address,
                Err(e) => {
                    warn!("Unable to resolve public address {}: {e}", public_ip.id);
                    None
                }
            };
        }
    }
    None
}
