use tracing::debug;

use super::{merge_by_name, target::path_covered, unmanaged_by_name, Matchable, Target, TargetLists, TARGET};
use crate::common::Probe;

// Probes are matched on host and path only; the port of a list entry is not relevant to a health check.
impl Matchable for Probe {
    fn is_in(&self, list: &[Target]) -> bool {
        let Some(host) = &self.host else {
            return false;
        };
        list.iter().any(|entry| &entry.hostname == host && path_covered(entry.path.as_deref(), self.path.as_deref()))
    }

    fn describe(&self) -> String {
        format!("probe {} {}{}", self.name, self.host.as_deref().unwrap_or_default(), self.path.as_deref().unwrap_or_default())
    }
}

pub fn filter_managed_probes(probes: &[Probe], lists: &TargetLists) -> Vec<Probe> {
    if lists.is_disabled() {
        return probes.to_vec();
    }
    probes
        .iter()
        .filter(|probe| {
            let managed = lists.should_keep(*probe);
            debug!(target: TARGET, "Health probe {} managed={managed}", probe.name);
            managed
        })
        .cloned()
        .collect()
}

/// Health probes the controller must leave untouched.
pub fn prune_managed_probes(probes: &[Probe], lists: &TargetLists) -> Vec<Probe> {
    let managed = filter_managed_probes(probes, lists);
    if managed.is_empty() {
        return probes.to_vec();
    }
    unmanaged_by_name(probes, &managed)
}

/// Union of the given lists keyed by probe name; later lists win. Sorted by name.
pub fn merge_probes<'a>(buckets: impl IntoIterator<Item = &'a [Probe]>) -> Vec<Probe> {
    merge_by_name(buckets)
}
