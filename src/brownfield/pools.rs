use tracing::debug;

use super::{merge_by_name, unmanaged_by_name, TargetLists, TopologyContext, TARGET};
use crate::common::BackendPool;

/// Backend pools the controller may create, modify or delete. A pool is managed as soon as any one of the
/// targets it serves passes the allow/deny decision; pools serving no known target are never managed
/// while filtering is enabled.
pub fn filter_managed_pools(pools: &[BackendPool], lists: &TargetLists, context: &TopologyContext<'_>) -> Vec<BackendPool> {
    if lists.is_disabled() {
        return pools.to_vec();
    }

    let pool_to_targets = context.pool_to_targets();
    pools
        .iter()
        .filter(|pool| {
            let targets = pool_to_targets.get(&pool.name).map(Vec::as_slice).unwrap_or_default();
            // every target is evaluated so each one shows up in the decision log
            let managed = targets.iter().fold(false, |managed, target| lists.should_keep(target) || managed);
            debug!(target: TARGET, "Backend pool {} managed={managed} targets={}", pool.name, targets.len());
            managed
        })
        .cloned()
        .collect()
}

/// Backend pools the controller must leave untouched; the complement of [`filter_managed_pools`].
pub fn prune_managed_pools(pools: &[BackendPool], lists: &TargetLists, context: &TopologyContext<'_>) -> Vec<BackendPool> {
    let managed = filter_managed_pools(pools, lists, context);
    if managed.is_empty() {
        return pools.to_vec();
    }
    unmanaged_by_name(pools, &managed)
}

/// Union of the given lists keyed by pool name; later lists win. Sorted by name.
pub fn merge_pools<'a>(buckets: impl IntoIterator<Item = &'a [BackendPool]>) -> Vec<BackendPool> {
    merge_by_name(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        brownfield::{
            derive_targets,
            fixtures::{self, names, HOST, POOL_BAR, POOL_DEFAULT, POOL_FOO, POOL_NO_PATHS, POOL_OTHER},
            Target,
        },
        common::LoadBalancerConfig,
    };

    fn lists(managed: bool, prohibited: bool) -> TargetLists {
        let managed = if managed { fixtures::managed_targets() } else { vec![] };
        let prohibited = if prohibited { fixtures::prohibited_targets() } else { vec![] };
        TargetLists::new(derive_targets(&managed), derive_targets(&prohibited))
    }

    #[test]
    fn no_lists_manage_every_pool() {
        let config = fixtures::load_balancer_config();
        let context = TopologyContext::from(&config);
        let lists = TargetLists::default();
        assert_eq!(filter_managed_pools(&config.backend_pools, &lists, &context), config.backend_pools);
        assert!(prune_managed_pools(&config.backend_pools, &lists, &context).is_empty());
    }

    #[test]
    fn deny_list_excludes_prohibited_pools() {
        let config = fixtures::load_balancer_config();
        let context = TopologyContext::from(&config);
        let lists = lists(true, true);

        let managed = filter_managed_pools(&config.backend_pools, &lists, &context);
        assert_eq!(names(&managed), vec![POOL_FOO, POOL_OTHER]);

        let unmanaged = prune_managed_pools(&config.backend_pools, &lists, &context);
        assert_eq!(names(&unmanaged), vec![POOL_BAR, POOL_DEFAULT, POOL_NO_PATHS]);
    }

    #[test]
    fn allow_list_selects_allowed_pools() {
        let config = fixtures::load_balancer_config();
        let context = TopologyContext::from(&config);
        let lists = lists(true, false);

        let managed = filter_managed_pools(&config.backend_pools, &lists, &context);
        assert_eq!(names(&managed), vec![POOL_BAR, POOL_FOO]);

        let unmanaged = prune_managed_pools(&config.backend_pools, &lists, &context);
        assert_eq!(names(&unmanaged), vec![POOL_DEFAULT, POOL_NO_PATHS, POOL_OTHER]);
    }

    #[test]
    fn pool_is_managed_when_any_target_passes() {
        let mut config = fixtures::load_balancer_config();
        // pool-bar now also serves the whole https listener host, which is not prohibited
        config.routing_rules.push(
            crate::common::RoutingRule::builder()
                .name("rr-bar-default")
                .listener(crate::common::SubResource::new("/gw/httpListeners/fl-443"))
                .backend_pool(crate::common::SubResource::new(POOL_BAR))
                .build(),
        );
        let context = TopologyContext::from(&config);
        let lists = TargetLists::new(vec![], vec![Target::host(HOST).with_port(443).with_path("/bar")]);
        let managed = filter_managed_pools(&config.backend_pools, &lists, &context);
        assert!(names(&managed).iter().any(|name| name == POOL_BAR));
    }

    #[test]
    fn nothing_managed_prunes_nothing() {
        let config = fixtures::load_balancer_config();
        let context = TopologyContext::from(&config);
        let lists = TargetLists::new(vec![Target::host("unknown.host")], vec![]);
        assert!(filter_managed_pools(&config.backend_pools, &lists, &context).is_empty());
        assert_eq!(prune_managed_pools(&config.backend_pools, &lists, &context), config.backend_pools);
    }

    #[test]
    fn filter_and_prune_partition_pools() {
        let config = fixtures::load_balancer_config();
        let context = TopologyContext::from(&config);
        let empty = LoadBalancerConfig::default();
        let candidates = [
            lists(false, false),
            lists(true, false),
            lists(false, true),
            lists(true, true),
            TargetLists::new(vec![Target::host(HOST)], vec![]),
            TargetLists::new(vec![], vec![Target::host(HOST)]),
        ];
        for lists in &candidates {
            for context in [context, TopologyContext::from(&empty)] {
                let mut managed = names(&filter_managed_pools(&config.backend_pools, lists, &context));
                managed.extend(names(&prune_managed_pools(&config.backend_pools, lists, &context)));
                managed.sort_unstable();
                assert_eq!(managed, names(&config.backend_pools), "{lists:?}");
            }
        }
    }

    #[test]
    fn merges_pools_by_name() {
        let first = vec![BackendPool::builder().name("a").build(), BackendPool::builder().name("b").build()];
        let mut replaced = BackendPool::builder().name("b").build();
        replaced.backend_addresses.push(crate::common::BackendAddress { fqdn: Some("b.internal".to_owned()), ip_address: None });
        let second = vec![replaced.clone(), BackendPool::builder().name("c").build()];

        let merged = merge_pools([first.as_slice(), second.as_slice()]);
        assert_eq!(names(&merged), vec!["a", "b", "c"]);
        assert!(merged.contains(&replaced));
        assert!(merge_pools(std::iter::empty()).is_empty());
    }

    #[test]
    fn merge_output_is_sorted_whatever_the_input_order() {
        let pool = |name: &str| BackendPool::builder().name(name).build();
        let forward = vec![pool("pool-a"), pool("pool-b"), pool("pool-c"), pool("pool-foo")];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        assert_eq!(merge_pools([forward.as_slice()]), forward);
        assert_eq!(merge_pools([backward.as_slice()]), forward);
        assert_eq!(merge_pools([&backward[..2], &forward[..2]]), forward);
    }
}
