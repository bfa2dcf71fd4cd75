use std::{sync::Arc, time::Instant};

use itertools::Itertools;
use k8s_openapi::api::networking::v1::Ingress;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use typed_builder::TypedBuilder;

use super::{
    address::resolve_frontend_address,
    event::{Event, EventKind, EventPayload},
    ControllerError,
};
use crate::{
    brownfield::{is_ingress_managed, protect_unmanaged, TargetLists},
    common::{LoadBalancerConfig, ResourceKey},
    configuration::DEFAULT_INGRESS_CLASS,
    services::{BuildContext, BuildOutcome, ConfigBuilder, Diagnostics, KubeContext, LoadBalancerClient},
    state::ConfigCache,
};

type Result<T, E = ControllerError> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileStatus {
    Deployed,
    Unchanged,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReconcileOutcome {
    pub status: ReconcileStatus,
    pub diagnostics: Diagnostics,
}

/// Brings the load balancer in line with the Kubernetes state, one event at a time.
#[derive(TypedBuilder)]
pub struct Reconciler {
    client: Arc<dyn LoadBalancerClient>,
    config_builder: Arc<dyn ConfigBuilder>,
    kube_context: Arc<dyn KubeContext>,
    #[builder(default)]
    cache: ConfigCache,
    #[builder(default)]
    use_private_ip: bool,
    #[builder(default = DEFAULT_INGRESS_CLASS.to_owned())]
    ingress_class: String,
    #[builder(default, setter(skip))]
    in_flight: tokio::sync::Mutex<()>,
}

impl Reconciler {
    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Fetch, validate, build, diff, deploy and wait, then record the applied configuration and publish
    /// the load balancer address on the ingresses. Concurrent callers are served one after the other.
    #[instrument(level = "info", name = "Reconciler", skip_all, fields(id = %event.id, event = %event))]
    pub async fn process(&self, event: &Event, cancellation: &CancellationToken) -> Result<ReconcileOutcome> {
        let _in_flight = self.in_flight.lock().await;

        let current = self.client.get().await.map_err(|e| {
            error!("Unable to get the load balancer configuration: {e}");
            ControllerError::Fetch(e.to_string())
        })?;

        let context = self.build_context();

        if let Err(e) = self.config_builder.fatal_validate_on_existing(&current, &context) {
            error!("Fatal validation error on the existing load balancer configuration, will retry until resolved: {e}");
            return Err(ControllerError::FatalValidation(e.to_string()));
        }

        let mut diagnostics = self.config_builder.pre_build_validate(&context);
        let BuildOutcome { config: mut desired, diagnostics: build_diagnostics } = self.config_builder.build(&current, &context);
        diagnostics.append(build_diagnostics);
        diagnostics.append(self.config_builder.post_build_validate(&context));
        diagnostics.log();

        protect_unmanaged(&current, &mut desired, &context.target_lists);

        if self.cache.is_same(&desired)? {
            info!("cache: Config has NOT changed! No need to deploy.");
            return Ok(ReconcileOutcome { status: ReconcileStatus::Unchanged, diagnostics });
        }

        self.deploy(&desired, cancellation).await?;

        info!("cache: Updated with latest applied config.");
        self.cache.commit(desired.clone())?;

        self.update_ingress_status(&desired, &context, event).await;

        Ok(ReconcileOutcome { status: ReconcileStatus::Deployed, diagnostics })
    }

    fn build_context(&self) -> BuildContext {
        let managed_targets = self.kube_context.list_managed_targets();
        let prohibited_targets = self.kube_context.list_prohibited_targets();
        debug!("Managed targets: {}", managed_targets.iter().map(ResourceKey::from).join(","));
        debug!("Prohibited targets: {}", prohibited_targets.iter().map(ResourceKey::from).join(","));

        let target_lists = TargetLists::from_sources(&managed_targets, &prohibited_targets);
        BuildContext::builder()
            .ingresses(self.kube_context.list_http_ingresses())
            .managed_targets(managed_targets)
            .prohibited_targets(prohibited_targets)
            .target_lists(target_lists)
            .use_private_ip(self.use_private_ip)
            .build()
    }

    async fn deploy(&self, desired: &LoadBalancerConfig, cancellation: &CancellationToken) -> Result<()> {
        if cancellation.is_cancelled() {
            return Err(ControllerError::Cancelled);
        }

        info!("BEGIN load balancer deployment");
        let started = Instant::now();

        let handle = match self.client.submit(desired).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Failed applying load balancer configuration: {e} -- {}", desired.sanitized_json().unwrap_or_default());
                self.invalidate_cache();
                return Err(ControllerError::Submit(e.to_string()));
            },
        };

        let completion = tokio::select! {
            res = self.client.wait_for_completion(handle) => res.map_err(|e| ControllerError::Deployment(e.to_string())),
            () = cancellation.cancelled() => Err(ControllerError::Cancelled),
        };

        info!("Applied load balancer config in {:?}", started.elapsed());

        if let Err(e) = completion {
            warn!("Unable to deploy load balancer config: {e}");
            self.invalidate_cache();
            return Err(e);
        }

        debug!("END load balancer deployment {}", desired.sanitized_json().unwrap_or_default());
        Ok(())
    }

    fn invalidate_cache(&self) {
        if let Err(e) = self.cache.invalidate() {
            error!("cache: Unable to invalidate after a failed deployment: {e}");
        }
    }

    async fn update_ingress_status(&self, desired: &LoadBalancerConfig, context: &BuildContext, event: &Event) {
        let address = resolve_frontend_address(desired, self.use_private_ip, self.client.as_ref()).await;

        let remove: Vec<Ingress> = match (&event.kind, &event.payload) {
            (EventKind::Update, EventPayload::Ingress(ingress)) if !is_ingress_managed(ingress, &self.ingress_class) => {
                vec![ingress.as_ref().clone()]
            },
            _ => vec![],
        };

        if let Err(e) = self.kube_context.set_ingress_statuses(&context.ingresses, &remove, address.as_deref()).await {
            warn!("Unable to update ingress statuses: {e}");
        }
    }
}
