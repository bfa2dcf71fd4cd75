use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::target::TargetSource;

/// Traffic the controller is explicitly allowed to manage.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(group = "brownfield.ingress.k8s.io", version = "v1", kind = "IngressManagedTarget", namespaced)]
pub struct IngressManagedTargetSpec {
    pub host: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

/// Traffic configured outside Kubernetes which the controller must leave alone.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(group = "brownfield.ingress.k8s.io", version = "v1", kind = "IngressProhibitedTarget", namespaced)]
pub struct IngressProhibitedTargetSpec {
    pub host: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

macro_rules! impl_target_source {
    ($spec:ty, $resource:ty) => {
        impl TargetSource for $spec {
            fn host(&self) -> &str {
                &self.host
            }
            fn ports(&self) -> &[u16] {
                &self.ports
            }
            fn paths(&self) -> &[String] {
                &self.paths
            }
        }

        impl TargetSource for $resource {
            fn host(&self) -> &str {
                &self.spec.host
            }
            fn ports(&self) -> &[u16] {
                &self.spec.ports
            }
            fn paths(&self) -> &[String] {
                &self.spec.paths
            }
        }
    };
}

impl_target_source!(IngressManagedTargetSpec, IngressManagedTarget);
impl_target_source!(IngressProhibitedTargetSpec, IngressProhibitedTarget);
