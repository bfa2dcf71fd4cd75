use std::fmt::Display;

use k8s_openapi::api::networking::v1::Ingress;
use kube::{Resource, ResourceExt};

use crate::brownfield::{IngressManagedTarget, IngressProhibitedTarget};

pub const DEFAULT_NAMESPACE_NAME: &str = "default";
pub const INGRESS_GROUP_NAME: &str = "networking.k8s.io";
pub const INGRESS_KIND_NAME: &str = "Ingress";

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceKey {
    pub group: String,
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

impl ResourceKey {
    pub fn namespaced(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_owned(),
            namespace: namespace.to_owned(),
            ..Default::default()
        }
    }

    fn from_resource<R>(value: &R) -> Self
    where
        R: Resource<DynamicType = ()> + ResourceExt,
    {
        let namespace = value.meta().namespace.clone().unwrap_or_default();
        Self {
            group: R::group(&()).into_owned(),
            namespace: if namespace.is_empty() { DEFAULT_NAMESPACE_NAME.to_owned() } else { namespace },
            name: value.name_any(),
            kind: R::kind(&()).into_owned(),
        }
    }
}

impl Default for ResourceKey {
    fn default() -> Self {
        Self {
            group: INGRESS_GROUP_NAME.to_owned(),
            namespace: DEFAULT_NAMESPACE_NAME.to_owned(),
            name: String::default(),
            kind: INGRESS_KIND_NAME.to_owned(),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl From<&Ingress> for ResourceKey {
    fn from(value: &Ingress) -> Self {
        Self::from_resource(value)
    }
}

impl From<&IngressManagedTarget> for ResourceKey {
    fn from(value: &IngressManagedTarget) -> Self {
        Self::from_resource(value)
    }
}

impl From<&IngressProhibitedTarget> for ResourceKey {
    fn from(value: &IngressProhibitedTarget) -> Self {
        Self::from_resource(value)
    }
}
