use std::fmt::Display;

use k8s_openapi::api::networking::v1::Ingress;
use uuid::Uuid;

use crate::{
    brownfield::{IngressManagedTarget, IngressProhibitedTarget},
    common::ResourceKey,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Update,
    Delete,
}

#[derive(Clone, Debug)]
pub enum EventPayload {
    Ingress(Box<Ingress>),
    ManagedTarget(Box<IngressManagedTarget>),
    ProhibitedTarget(Box<IngressProhibitedTarget>),
    Other { kind: String, key: ResourceKey },
}

impl EventPayload {
    pub fn key(&self) -> ResourceKey {
        match self {
            EventPayload::Ingress(ingress) => ResourceKey::from(ingress.as_ref()),
            EventPayload::ManagedTarget(target) => ResourceKey::from(target.as_ref()),
            EventPayload::ProhibitedTarget(target) => ResourceKey::from(target.as_ref()),
            EventPayload::Other { key, .. } => key.clone(),
        }
    }
}

/// A change observed on the Kubernetes side which triggers one reconciliation.
#[derive(Clone, Debug)]
pub struct Event {
    pub id: Uuid,
    pub kind: EventKind,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        Self { id: Uuid::new_v4(), kind, payload }
    }

    pub fn ingress(kind: EventKind, ingress: Ingress) -> Self {
        Self::new(kind, EventPayload::Ingress(Box::new(ingress)))
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.payload {
            EventPayload::Ingress(_) => "Ingress",
            EventPayload::ManagedTarget(_) => "IngressManagedTarget",
            EventPayload::ProhibitedTarget(_) => "IngressProhibitedTarget",
            EventPayload::Other { kind, .. } => kind.as_str(),
        };
        write!(f, "{:?} {kind} {}", self.kind, self.payload.key())
    }
}
