use k8s_openapi::api::networking::v1::{Ingress, IngressLoadBalancerIngress, IngressLoadBalancerStatus, IngressStatus};
use kube::{Api, Client};
use tokio::sync::mpsc;
use typed_builder::TypedBuilder;

use super::patcher::{Operation, Patcher};

#[derive(TypedBuilder)]
pub struct IngressStatusPatcherService {
    client: Client,
    receiver: mpsc::Receiver<Operation<Ingress>>,
}

impl Patcher<Ingress> for IngressStatusPatcherService {
    fn receiver(&mut self) -> &mut mpsc::Receiver<Operation<Ingress>> {
        &mut self.receiver
    }

    fn api(&self, namespace: &str) -> Api<Ingress> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Copy of the ingress whose load balancer status points at the given address, or at nothing at all.
pub fn with_load_balancer_address(ingress: &Ingress, address: Option<&str>) -> Ingress {
    let entries = address
        .filter(|address| !address.is_empty())
        .map(|address| vec![IngressLoadBalancerIngress { ip: Some(address.to_owned()), ..Default::default() }])
        .unwrap_or_default();

    let mut ingress = ingress.clone();
    ingress.status = Some(IngressStatus { load_balancer: Some(IngressLoadBalancerStatus { ingress: Some(entries) }) });
    ingress
}
