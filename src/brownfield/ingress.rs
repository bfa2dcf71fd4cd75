use k8s_openapi::api::networking::v1::{HTTPIngressRuleValue, Ingress, IngressRule};
use tracing::debug;

use super::{Target, TargetLists, TARGET};
use crate::common::ResourceKey;

pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// Rewrites the rules of the ingress down to what the controller may configure. Rules without an `http`
/// section are always dropped. Rules with an empty path list are judged as a whole host; rules with paths
/// are judged path by path and dropped when no path survives.
pub fn prune_ingress_rules(ingress: &mut Ingress, lists: &TargetLists) {
    let key = ResourceKey::from(&*ingress);
    let Some(spec) = ingress.spec.as_mut() else {
        return;
    };
    let Some(rules) = spec.rules.take() else {
        return;
    };

    let mut kept = Vec::with_capacity(rules.len());
    for rule in rules {
        let host = rule.host.clone().unwrap_or_default();
        let Some(http) = rule.http.as_ref() else {
            debug!(target: TARGET, "Dropping rule for host {host} from ingress {key}, no http section");
            continue;
        };

        if http.paths.is_empty() {
            if lists.should_keep(&Target::host(&host)) {
                kept.push(rule);
            } else {
                debug!(target: TARGET, "Dropping rule for host {host} from ingress {key}");
            }
            continue;
        }

        let paths: Vec<_> = rule
            .http
            .into_iter()
            .flat_map(|http| http.paths)
            .filter(|path| {
                let target = Target { hostname: host.clone(), port: None, path: path.path.clone() };
                lists.should_keep(&target)
            })
            .collect();

        if paths.is_empty() {
            debug!(target: TARGET, "Dropping rule for host {host} from ingress {key}, no paths left");
            continue;
        }

        kept.push(IngressRule { host: rule.host, http: Some(HTTPIngressRuleValue { paths }) });
    }

    spec.rules = Some(kept);
}

/// Clones of the given ingresses, each narrowed by [`prune_ingress_rules`].
pub fn prune_ingresses(ingresses: &[Ingress], lists: &TargetLists) -> Vec<Ingress> {
    ingresses
        .iter()
        .map(|ingress| {
            let mut ingress = ingress.clone();
            prune_ingress_rules(&mut ingress, lists);
            ingress
        })
        .collect()
}

/// Whether the ingress is addressed to this controller, either by annotation or by ingress class name.
pub fn is_ingress_managed(ingress: &Ingress, ingress_class: &str) -> bool {
    let by_annotation = ingress
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(INGRESS_CLASS_ANNOTATION))
        .is_some_and(|class| class == ingress_class);
    let by_class_name =
        ingress.spec.as_ref().and_then(|spec| spec.ingress_class_name.as_ref()).is_some_and(|class| class == ingress_class);
    by_annotation || by_class_name
}
