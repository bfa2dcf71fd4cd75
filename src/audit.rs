//! Dry run of the brownfield rules against a saved snapshot, for operators who want to know what the
//! controller would take over before letting it loose on a hand-configured load balancer.

use k8s_openapi::api::networking::v1::Ingress;
use serde::{Deserialize, Serialize};

use crate::{
    brownfield::{
        filter_managed_pools, filter_managed_probes, is_ingress_managed, prune_ingresses, prune_managed_pools, prune_managed_probes,
        IngressManagedTarget, IngressProhibitedTarget, TargetLists, TopologyContext,
    },
    common::{LoadBalancerConfig, Named, ResourceKey},
};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub load_balancer: LoadBalancerConfig,
    #[serde(default)]
    pub managed_targets: Vec<IngressManagedTarget>,
    #[serde(default)]
    pub prohibited_targets: Vec<IngressProhibitedTarget>,
    #[serde(default)]
    pub ingresses: Vec<Ingress>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressAudit {
    pub key: String,
    pub managed: bool,
    /// `host/path` entries left to the controller after pruning.
    pub retained: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub managed_pools: Vec<String>,
    pub unmanaged_pools: Vec<String>,
    pub managed_probes: Vec<String>,
    pub unmanaged_probes: Vec<String>,
    pub ingresses: Vec<IngressAudit>,
}

fn sorted_names<T: Named>(items: &[T]) -> Vec<String> {
    let mut names: Vec<String> = items.iter().map(|item| item.name().to_owned()).collect();
    names.sort_unstable();
    names
}

fn retained_paths(ingress: &Ingress) -> Vec<String> {
    let rules = ingress.spec.as_ref().and_then(|spec| spec.rules.as_ref());
    rules
        .into_iter()
        .flatten()
        .flat_map(|rule| {
            let host = rule.host.clone().unwrap_or_default();
            let paths: Vec<String> = rule
                .http
                .as_ref()
                .map(|http| http.paths.iter().map(|path| format!("{host}{}", path.path.as_deref().unwrap_or("/"))).collect())
                .unwrap_or_default();
            if paths.is_empty() {
                vec![host]
            } else {
                paths
            }
        })
        .collect()
}

impl Snapshot {
    pub fn audit(&self, ingress_class: &str) -> AuditReport {
        let lists = TargetLists::from_sources(&self.managed_targets, &self.prohibited_targets);
        let topology = TopologyContext::from(&self.load_balancer);
        let pools = &self.load_balancer.backend_pools;
        let probes = &self.load_balancer.probes;

        let pruned = prune_ingresses(&self.ingresses, &lists);
        let ingresses = self
            .ingresses
            .iter()
            .zip(pruned.iter())
            .map(|(original, pruned)| IngressAudit {
                key: ResourceKey::from(original).to_string(),
                managed: is_ingress_managed(original, ingress_class),
                retained: retained_paths(pruned),
            })
            .collect();

        AuditReport {
            managed_pools: sorted_names(&filter_managed_pools(pools, &lists, &topology)),
            unmanaged_pools: sorted_names(&prune_managed_pools(pools, &lists, &topology)),
            managed_probes: sorted_names(&filter_managed_probes(probes, &lists)),
            unmanaged_probes: sorted_names(&prune_managed_probes(probes, &lists)),
            ingresses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::DEFAULT_INGRESS_CLASS;

    const SNAPSHOT: &str = r#"
loadBalancer:
  listeners:
    - name: fl-443
      hostName: bye.com
      protocol: Https
  routingRules:
    - name: rr-443
      listener:
        id: /gw/httpListeners/fl-443
      pathMap:
        id: /gw/urlPathMaps/url-443
  pathMaps:
    - name: url-443
      pathRules:
        - name: pr-foo
          paths: ["/foo/*"]
          backendPool:
            id: /gw/backendAddressPools/pool-foo
        - name: pr-bar
          paths: ["/bar"]
          backendPool:
            id: /gw/backendAddressPools/pool-bar
  backendPools:
    - name: pool-foo
    - name: pool-bar
    - name: pool-default
  probes:
    - name: probe-foo
      host: bye.com
      path: /foo
    - name: probe-bar
      host: bye.com
      path: /bar
prohibitedTargets:
  - apiVersion: brownfield.ingress.k8s.io/v1
    kind: IngressProhibitedTarget
    metadata:
      name: manual
      namespace: default
    spec:
      host: bye.com
      ports: [443]
      paths: ["/bar"]
ingresses:
  - apiVersion: networking.k8s.io/v1
    kind: Ingress
    metadata:
      name: web
      namespace: default
      annotations:
        kubernetes.io/ingress.class: azure/application-gateway
    spec:
      rules:
        - host: bye.com
          http:
            paths:
              - path: /foo
                pathType: Prefix
                backend:
                  service:
                    name: foo
                    port:
                      number: 80
              - path: /bar
                pathType: Prefix
                backend:
                  service:
                    name: bar
                    port:
                      number: 80
"#;

    #[test]
    fn reports_what_the_controller_would_own() {
        let snapshot: Snapshot = serde_yaml::from_str(SNAPSHOT).unwrap();
        let report = snapshot.audit(DEFAULT_INGRESS_CLASS);

        assert_eq!(report.managed_pools, vec!["pool-foo"]);
        assert_eq!(report.unmanaged_pools, vec!["pool-bar", "pool-default"]);
        assert_eq!(report.managed_probes, vec!["probe-foo"]);
        assert_eq!(report.unmanaged_probes, vec!["probe-bar"]);
        assert_eq!(
            report.ingresses,
            vec![IngressAudit { key: "default/web".to_owned(), managed: true, retained: vec!["bye.com/foo".to_owned()] }]
        );

        let yaml = serde_yaml::to_string(&report).unwrap();
        assert!(yaml.contains("unmanagedPools:"));
    }

    #[test]
    fn empty_snapshot_keeps_nothing_back() {
        let report = Snapshot::default().audit(DEFAULT_INGRESS_CLASS);
        assert_eq!(report, AuditReport::default());
    }
}
