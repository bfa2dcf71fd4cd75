use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::reflector::Store;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn, Span};
use typed_builder::TypedBuilder;

use super::patchers::{with_load_balancer_address, Operation, PatchContext};
use crate::{
    brownfield::{is_ingress_managed, IngressManagedTarget, IngressProhibitedTarget},
    common::ResourceKey,
};

/// The Kubernetes side of a reconciliation: cached resources in, ingress status out.
#[async_trait]
pub trait KubeContext: Send + Sync {
    /// Ingresses addressed to this controller.
    fn list_http_ingresses(&self) -> Vec<Ingress>;

    fn list_managed_targets(&self) -> Vec<IngressManagedTarget>;

    fn list_prohibited_targets(&self) -> Vec<IngressProhibitedTarget>;

    /// Publishes `address` on every ingress in `add` and clears it from every ingress in `remove`.
    async fn set_ingress_statuses(&self, add: &[Ingress], remove: &[Ingress], address: Option<&str>) -> crate::Result<()>;
}

#[derive(thiserror::Error, Debug)]
#[error("failed to patch status of {failed} ingresses")]
pub struct StatusPatchError {
    failed: usize,
}

/// [`KubeContext`] reading from reflector stores and writing status through the ingress status patcher.
#[derive(Clone, TypedBuilder)]
pub struct StoreKubeContext {
    ingresses: Store<Ingress>,
    managed_targets: Store<IngressManagedTarget>,
    prohibited_targets: Store<IngressProhibitedTarget>,
    ingress_class: String,
    controller_name: String,
    ingress_patcher_sender: mpsc::Sender<Operation<Ingress>>,
}

impl StoreKubeContext {
    async fn patch_status(&self, ingress: &Ingress, address: Option<&str>) -> bool {
        let resource_key = ResourceKey::from(ingress);
        let (response_sender, receiver) = oneshot::channel();
        let operation = Operation::PatchStatus(PatchContext {
            resource_key: resource_key.clone(),
            resource: with_load_balancer_address(ingress, address),
            controller_name: self.controller_name.clone(),
            response_sender,
            span: Span::current(),
        });
        if self.ingress_patcher_sender.send(operation).await.is_err() {
            warn!("Ingress patcher is gone, can't update status of {resource_key}");
            return false;
        }
        matches!(receiver.await, Ok(Ok(_)))
    }
}

#[async_trait]
impl KubeContext for StoreKubeContext {
    fn list_http_ingresses(&self) -> Vec<Ingress> {
        self.ingresses
            .state()
            .iter()
            .filter(|ingress| is_ingress_managed(ingress, &self.ingress_class))
            .map(|ingress| ingress.as_ref().clone())
            .collect()
    }

    fn list_managed_targets(&self) -> Vec<IngressManagedTarget> {
        self.managed_targets.state().iter().map(|target| target.as_ref().clone()).collect()
    }

    fn list_prohibited_targets(&self) -> Vec<IngressProhibitedTarget> {
        self.prohibited_targets.state().iter().map(|target| target.as_ref().clone()).collect()
    }

    async fn set_ingress_statuses(&self, add: &[Ingress], remove: &[Ingress], address: Option<&str>) -> crate::Result<()> {
        let mut failed = 0;
        for ingress in add {
            if !self.patch_status(ingress, address).await {
                failed += 1;
            }
        }
        for ingress in remove {
            debug!("Removing load balancer address from {}", ResourceKey::from(ingress));
            if !self.patch_status(ingress, None).await {
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(StatusPatchError { failed }.into());
        }
        Ok(())
    }
}
