use std::collections::HashMap;

use tracing::debug;

use super::{
    target::{normalize_path, Target},
    TARGET,
};
use crate::common::{Listener, LoadBalancerConfig, PathMap, RoutingRule};

/// Backend pool name to the traffic targets the pool is responsible for.
pub type PoolToTargets = HashMap<String, Vec<Target>>;

/// Read-only view of the routing parts of a load balancer configuration.
#[derive(Clone, Copy, Debug)]
pub struct TopologyContext<'a> {
    pub listeners: &'a [Listener],
    pub routing_rules: &'a [RoutingRule],
    pub path_maps: &'a [PathMap],
}

impl<'a> From<&'a LoadBalancerConfig> for TopologyContext<'a> {
    fn from(config: &'a LoadBalancerConfig) -> Self {
        Self { listeners: &config.listeners, routing_rules: &config.routing_rules, path_maps: &config.path_maps }
    }
}

impl<'a> TopologyContext<'a> {
    fn listeners_by_name(&self) -> HashMap<&'a str, &'a Listener> {
        self.listeners.iter().map(|l| (l.name.as_str(), l)).collect()
    }

    fn path_maps_by_name(&self) -> HashMap<&'a str, &'a PathMap> {
        self.path_maps.iter().map(|p| (p.name.as_str(), p)).collect()
    }

    /// Follows every routing rule to the pools it sends traffic to. Rules pointing at unknown listeners or
    /// path maps are skipped, as are rules and path rules without a backend pool.
    pub fn pool_to_targets(&self) -> PoolToTargets {
        let listeners = self.listeners_by_name();
        let path_maps = self.path_maps_by_name();
        let mut pool_to_targets = PoolToTargets::new();

        for rule in self.routing_rules {
            let Some(listener) = listeners.get(rule.listener.name()) else {
                debug!(target: TARGET, "Routing rule {} refers to unknown listener {}", rule.name, rule.listener.id);
                continue;
            };

            let target = Target { hostname: listener.host_name.clone().unwrap_or_default(), port: Some(listener.port()), path: None };

            let Some(path_map_ref) = &rule.path_map else {
                // ssl redirect rules have no pool
                if let Some(pool) = &rule.backend_pool {
                    pool_to_targets.entry(pool.name().to_owned()).or_default().push(target);
                }
                continue;
            };

            let Some(path_map) = path_maps.get(path_map_ref.name()) else {
                debug!(target: TARGET, "Routing rule {} refers to unknown path map {}", rule.name, path_map_ref.id);
                continue;
            };

            for path_rule in &path_map.path_rules {
                let Some(pool) = &path_rule.backend_pool else {
                    debug!(target: TARGET, "Path rule {} does not have a backend pool", path_rule.name);
                    continue;
                };
                let Some(paths) = &path_rule.paths else {
                    debug!(target: TARGET, "Path rule {} does not have a paths list", path_rule.name);
                    continue;
                };
                let targets = pool_to_targets.entry(pool.name().to_owned()).or_default();
                for path in paths {
                    targets.push(Target { path: Some(normalize_path(path)), ..target.clone() });
                }
            }
        }
        pool_to_targets
    }
}
