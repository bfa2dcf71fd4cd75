use std::fmt::Display;

use k8s_openapi::api::networking::v1::Ingress;
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::{
    brownfield::{prune_ingresses, IngressManagedTarget, IngressProhibitedTarget, TargetLists},
    common::LoadBalancerConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    PreBuild,
    Build,
    PostBuild,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.stage, self.message)
    }
}

/// Problems found while validating or building a configuration which do not stop a reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: Stage, message: impl Into<String>) {
        self.0.push(Diagnostic { stage, message: message.into() });
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn log(&self) {
        for diagnostic in &self.0 {
            warn!("{diagnostic}");
        }
    }
}

/// Snapshot of the Kubernetes side of a reconciliation.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct BuildContext {
    #[builder(default)]
    pub ingresses: Vec<Ingress>,
    #[builder(default)]
    pub managed_targets: Vec<IngressManagedTarget>,
    #[builder(default)]
    pub prohibited_targets: Vec<IngressProhibitedTarget>,
    #[builder(default)]
    pub target_lists: TargetLists,
    #[builder(default)]
    pub use_private_ip: bool,
}

impl BuildContext {
    /// Ingresses narrowed down to the rules and paths the controller is allowed to configure.
    pub fn managed_ingresses(&self) -> Vec<Ingress> {
        prune_ingresses(&self.ingresses, &self.target_lists)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildOutcome {
    pub config: LoadBalancerConfig,
    pub diagnostics: Diagnostics,
}

/// Turns Kubernetes state into a complete desired load balancer configuration.
pub trait ConfigBuilder: Send + Sync {
    /// Checks on the existing remote configuration which must pass before anything is written.
    fn fatal_validate_on_existing(&self, existing: &LoadBalancerConfig, context: &BuildContext) -> crate::Result<()>;

    fn pre_build_validate(&self, context: &BuildContext) -> Diagnostics;

    /// Best effort; whatever could not be built is reported in the outcome's diagnostics.
    fn build(&self, existing: &LoadBalancerConfig, context: &BuildContext) -> BuildOutcome;

    fn post_build_validate(&self, context: &BuildContext) -> Diagnostics;
}
