//! Coexistence with load balancer configuration made by hand.
//!
//! Allow-lists ([`IngressManagedTarget`]) and deny-lists ([`IngressProhibitedTarget`]) describe which
//! slices of traffic the controller may configure. Everything here is pure over its inputs and may be
//! called from any number of threads.

mod crd;
#[cfg(test)]
pub(crate) mod fixtures;
mod ingress;
mod policy;
mod pools;
mod probes;
mod target;
mod topology;

use std::collections::{BTreeMap, HashSet};

pub use crd::{IngressManagedTarget, IngressManagedTargetSpec, IngressProhibitedTarget, IngressProhibitedTargetSpec};
pub use ingress::{is_ingress_managed, prune_ingress_rules, prune_ingresses, INGRESS_CLASS_ANNOTATION};
pub use policy::{Matchable, TargetLists};
pub use pools::{filter_managed_pools, merge_pools, prune_managed_pools};
pub use probes::{filter_managed_probes, merge_probes, prune_managed_probes};
pub use target::{derive_targets, normalize_path, Target, TargetSource};
pub use topology::{PoolToTargets, TopologyContext};
use tracing::debug;

use crate::common::{LoadBalancerConfig, Named};

const TARGET: &str = "brownfield";

/// Output is sorted by name so equal inputs always produce equal configurations.
fn merge_by_name<'a, T>(buckets: impl IntoIterator<Item = &'a [T]>) -> Vec<T>
where
    T: Named + Clone + 'a,
{
    let mut unique: BTreeMap<String, T> = BTreeMap::new();
    for bucket in buckets {
        for item in bucket {
            unique.insert(item.name().to_owned(), item.clone());
        }
    }
    unique.into_values().collect()
}

fn unmanaged_by_name<T>(all: &[T], managed: &[T]) -> Vec<T>
where
    T: Named + Clone,
{
    let managed: HashSet<&str> = managed.iter().map(Named::name).collect();
    all.iter().filter(|item| !managed.contains(item.name())).cloned().collect()
}

/// Puts the pools and probes of the current configuration which the controller must not touch back into
/// the desired configuration. A hand-made artifact wins over a desired one with the same name.
pub fn protect_unmanaged(current: &LoadBalancerConfig, desired: &mut LoadBalancerConfig, lists: &TargetLists) {
    if lists.is_disabled() {
        return;
    }

    let context = TopologyContext::from(current);
    let unmanaged_pools = prune_managed_pools(&current.backend_pools, lists, &context);
    let unmanaged_probes = prune_managed_probes(&current.probes, lists);
    debug!(target: TARGET, "Preserving {} backend pools and {} health probes", unmanaged_pools.len(), unmanaged_probes.len());

    desired.backend_pools = merge_pools([desired.backend_pools.as_slice(), unmanaged_pools.as_slice()]);
    desired.probes = merge_probes([desired.probes.as_slice(), unmanaged_probes.as_slice()]);
}
