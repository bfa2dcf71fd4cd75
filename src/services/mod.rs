mod config_builder;
mod kube_context;
mod load_balancer;
pub mod patchers;
mod reconcile_service;

pub use config_builder::{BuildContext, BuildOutcome, ConfigBuilder, Diagnostic, Diagnostics, Stage};
pub use kube_context::{KubeContext, StatusPatchError, StoreKubeContext};
pub use load_balancer::{DeploymentHandle, LoadBalancerClient};
pub use patchers::{IngressStatusPatcherService, Patcher};
pub use reconcile_service::ReconcileService;
