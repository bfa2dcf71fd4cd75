use super::{IngressManagedTargetSpec, IngressProhibitedTargetSpec};
use crate::common::{BackendPool, Listener, LoadBalancerConfig, Named, PathMap, PathRule, Protocol, RoutingRule, SubResource};

pub const HOST: &str = "bye.com";
pub const OTHER_HOST: &str = "other-host-name.com";

pub const POOL_FOO: &str = "pool-foo";
pub const POOL_BAR: &str = "pool-bar";
pub const POOL_OTHER: &str = "pool-other";
pub const POOL_DEFAULT: &str = "pool-default";
pub const POOL_NO_PATHS: &str = "pool-no-paths";

pub fn managed_spec(host: &str, ports: &[u16], paths: &[&str]) -> IngressManagedTargetSpec {
    IngressManagedTargetSpec { host: host.to_owned(), ports: ports.to_vec(), paths: paths.iter().map(|p| (*p).to_owned()).collect() }
}

pub fn prohibited_spec(host: &str, ports: &[u16], paths: &[&str]) -> IngressProhibitedTargetSpec {
    IngressProhibitedTargetSpec { host: host.to_owned(), ports: ports.to_vec(), paths: paths.iter().map(|p| (*p).to_owned()).collect() }
}

/// `/foo`, `/bar` and `/baz` on port 443
pub fn managed_targets() -> Vec<IngressManagedTargetSpec> {
    vec![managed_spec(HOST, &[443], &["/foo", "/bar", "/baz"])]
}

/// `/fox` and `/bar` on port 443
pub fn prohibited_targets() -> Vec<IngressProhibitedTargetSpec> {
    vec![prohibited_spec(HOST, &[443], &["/fox", "/bar"])]
}

/// HTTPS listener for HOST with a path map sending `/foo` and `/bar` to their own pools, plus an HTTP
/// listener for OTHER_HOST routed straight to one pool.
pub fn load_balancer_config() -> LoadBalancerConfig {
    LoadBalancerConfig {
        listeners: vec![
            Listener::builder().name("fl-443").host_name(HOST).protocol(Protocol::Https).build(),
            Listener::builder().name("fl-other").host_name(OTHER_HOST).build(),
        ],
        routing_rules: vec![
            RoutingRule::builder()
                .name("rr-443")
                .listener(SubResource::new("/gw/httpListeners/fl-443"))
                .path_map(SubResource::new("/gw/urlPathMaps/url-443"))
                .build(),
            RoutingRule::builder()
                .name("rr-other")
                .listener(SubResource::new("/gw/httpListeners/fl-other"))
                .backend_pool(SubResource::new(&format!("/gw/backendAddressPools/{POOL_OTHER}")))
                .build(),
        ],
        path_maps: vec![PathMap::builder()
            .name("url-443")
            .path_rules(vec![
                PathRule::builder()
                    .name("pr-foo")
                    .paths(vec!["/foo/*".to_owned()])
                    .backend_pool(SubResource::new(&format!("/gw/backendAddressPools/{POOL_FOO}")))
                    .build(),
                PathRule::builder()
                    .name("pr-bar")
                    .paths(vec!["/bar".to_owned()])
                    .backend_pool(SubResource::new(&format!("/gw/backendAddressPools/{POOL_BAR}")))
                    .build(),
                PathRule::builder().name("pr-no-paths").backend_pool(SubResource::new(POOL_NO_PATHS)).build(),
                PathRule::builder().name("pr-no-pool").paths(vec!["/nowhere".to_owned()]).build(),
            ])
            .build()],
        backend_pools: [POOL_FOO, POOL_BAR, POOL_OTHER, POOL_DEFAULT, POOL_NO_PATHS].iter().map(|name| BackendPool::builder().name(*name).build()).collect(),
        ..Default::default()
    }
}

/// Sorted names, for order independent comparisons.
pub fn names<T: Named>(items: &[T]) -> Vec<String> {
    let mut names: Vec<String> = items.iter().map(|item| item.name().to_owned()).collect();
    names.sort_unstable();
    names
}
