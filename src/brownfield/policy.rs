use tracing::debug;

use super::{
    crd::{IngressManagedTarget, IngressProhibitedTarget},
    target::{derive_targets, Target},
    TARGET,
};

/// Something whose membership in a target list can be decided.
pub trait Matchable {
    fn is_in(&self, list: &[Target]) -> bool;
    fn describe(&self) -> String;
}

impl Matchable for Target {
    fn is_in(&self, list: &[Target]) -> bool {
        Target::is_in(self, list)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Allow-list and deny-list in force for one reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetLists {
    pub allowed: Vec<Target>,
    pub prohibited: Vec<Target>,
}

impl TargetLists {
    pub fn new(allowed: Vec<Target>, prohibited: Vec<Target>) -> Self {
        Self { allowed, prohibited }
    }

    pub fn from_sources(managed: &[IngressManagedTarget], prohibited: &[IngressProhibitedTarget]) -> Self {
        Self { allowed: derive_targets(managed), prohibited: derive_targets(prohibited) }
    }

    /// Without either list the controller manages everything.
    pub fn is_disabled(&self) -> bool {
        self.allowed.is_empty() && self.prohibited.is_empty()
    }

    /// Decides whether the controller may manage the given item. A non-empty deny-list is authoritative
    /// and the allow-list is then not consulted at all.
    pub fn should_keep<M: Matchable + ?Sized>(&self, item: &M) -> bool {
        if !self.prohibited.is_empty() {
            if item.is_in(&self.prohibited) {
                debug!(target: TARGET, "Excluded, in deny-list: {}", item.describe());
                return false;
            }
            debug!(target: TARGET, "Kept, not in deny-list: {}", item.describe());
            return true;
        }

        if !self.allowed.is_empty() {
            if item.is_in(&self.allowed) {
                debug!(target: TARGET, "Kept, in allow-list: {}", item.describe());
                return true;
            }
            debug!(target: TARGET, "Excluded, not in allow-list: {}", item.describe());
            return false;
        }

        true
    }
}
