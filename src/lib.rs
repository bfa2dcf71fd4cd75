use std::{fmt::Debug, sync::Arc};

use futures::{FutureExt, StreamExt};
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    runtime::{
        reflector::{self, store::Writer},
        watcher, WatchStreamExt,
    },
    Api, Client, Resource,
};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

pub mod audit;
pub mod brownfield;
pub mod common;
pub mod configuration;
pub mod controllers;
pub mod services;
pub mod state;

use brownfield::{IngressManagedTarget, IngressProhibitedTarget};
use configuration::Configuration;
use controllers::{Event, EventKind, EventPayload, Reconciler};
use services::{ConfigBuilder, IngressStatusPatcherService, LoadBalancerClient, Patcher, ReconcileService, StoreKubeContext};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

/// The parts of the controller which talk to the outside world besides Kubernetes.
#[derive(Clone, TypedBuilder)]
pub struct Collaborators {
    pub load_balancer_client: Arc<dyn LoadBalancerClient>,
    pub config_builder: Arc<dyn ConfigBuilder>,
}

pub async fn start(configuration: Configuration, collaborators: Collaborators, shutdown: CancellationToken) -> Result<()> {
    info!("lbingress started for {}", configuration.load_balancer);
    let client = Client::try_default().await?;

    let (event_sender, event_receiver) = mpsc::channel(1024);
    let (ingress_patcher_channel_sender, ingress_patcher_channel_receiver) = mpsc::channel(1024);

    let (ingresses, ingress_writer) = reflector::store::<Ingress>();
    let (managed_targets, managed_target_writer) = reflector::store::<IngressManagedTarget>();
    let (prohibited_targets, prohibited_target_writer) = reflector::store::<IngressProhibitedTarget>();

    let kube_context = StoreKubeContext::builder()
        .ingresses(ingresses)
        .managed_targets(managed_targets)
        .prohibited_targets(prohibited_targets)
        .ingress_class(configuration.ingress_class().to_owned())
        .controller_name(configuration.controller_name.clone())
        .ingress_patcher_sender(ingress_patcher_channel_sender)
        .build();

    let reconciler = Reconciler::builder()
        .client(collaborators.load_balancer_client)
        .config_builder(collaborators.config_builder)
        .kube_context(Arc::new(kube_context))
        .use_private_ip(configuration.use_private_ip())
        .ingress_class(configuration.ingress_class().to_owned())
        .build();

    let reconcile_service =
        ReconcileService::builder().reconciler(Arc::new(reconciler)).event_receiver(event_receiver).shutdown(shutdown.clone()).build();
    let mut ingress_patcher_service =
        IngressStatusPatcherService::builder().client(client.clone()).receiver(ingress_patcher_channel_receiver).build();

    let ingress_watch = watch(Api::<Ingress>::all(client.clone()), ingress_writer, event_sender.clone(), shutdown.clone(), |ingress| {
        EventPayload::Ingress(Box::new(ingress))
    });
    let managed_target_watch =
        watch(Api::<IngressManagedTarget>::all(client.clone()), managed_target_writer, event_sender.clone(), shutdown.clone(), |target| {
            EventPayload::ManagedTarget(Box::new(target))
        });
    let prohibited_target_watch =
        watch(Api::<IngressProhibitedTarget>::all(client), prohibited_target_writer, event_sender, shutdown, |target| {
            EventPayload::ProhibitedTarget(Box::new(target))
        });

    let services = vec![
        reconcile_service.start().boxed(),
        ingress_patcher_service.start().boxed(),
        ingress_watch.boxed(),
        managed_target_watch.boxed(),
        prohibited_target_watch.boxed(),
    ];

    futures::future::join_all(services).await;
    info!("lbingress stopped");
    Ok(())
}

/// Keeps `writer`'s store in sync with the cluster and turns every change into a reconciliation event.
async fn watch<K, F>(api: Api<K>, writer: Writer<K>, sender: mpsc::Sender<Event>, shutdown: CancellationToken, into_payload: F) -> Result<()>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
    F: Fn(K) -> EventPayload + Send,
{
    let stream = reflector::reflector(writer, watcher(api, watcher::Config::default())).default_backoff();
    tokio::pin!(stream);

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            event = stream.next() => {
                let (kind, resource) = match event {
                    Some(Ok(watcher::Event::InitApply(resource))) => (EventKind::Create, resource),
                    Some(Ok(watcher::Event::Apply(resource))) => (EventKind::Update, resource),
                    Some(Ok(watcher::Event::Delete(resource))) => (EventKind::Delete, resource),
                    Some(Ok(watcher::Event::Init | watcher::Event::InitDone)) => continue,
                    Some(Err(e)) => {
                        warn!("Watch error {e}");
                        continue;
                    },
                    None => break,
                };
                if sender.send(Event::new(kind, into_payload(resource))).await.is_err() {
                    break;
                }
            },
        }
    }
    Ok(())
}
