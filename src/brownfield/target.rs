use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TARGET;

/// A slice of traffic: a host, optionally narrowed down to a port and a path prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Target {
    pub fn host(hostname: &str) -> Self {
        Self { hostname: hostname.to_owned(), port: None, path: None }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_owned());
        self
    }

    /// True when some entry of the list covers this target: same host, compatible port and
    /// a path prefix of this target's path. Absent ports and paths on the entry act as wildcards,
    /// and so does an absent port on this target.
    pub fn is_in(&self, list: &[Target]) -> bool {
        list.iter().any(|entry| {
            entry.hostname == self.hostname
                && ports_match(entry.port, self.port)
                && path_covered(entry.path.as_deref(), self.path.as_deref())
        })
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hostname)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

fn ports_match(entry: Option<u16>, target: Option<u16>) -> bool {
    match (entry, target) {
        (Some(entry), Some(target)) => entry == target,
        _ => true,
    }
}

/// A missing entry path covers the whole host. Otherwise `/abc` covers `/abc` and `/abc/def` but not `/abcdef`.
pub(crate) fn path_covered(entry: Option<&str>, path: Option<&str>) -> bool {
    match entry {
        None => true,
        Some(entry) => normalize_path_with_tail(path.unwrap_or_default()).starts_with(&normalize_path_with_tail(entry)),
    }
}

/// Strips the trailing run of `/` and `*` characters.
pub fn normalize_path(path: &str) -> String {
    path.trim_end_matches(['/', '*']).to_owned()
}

pub(crate) fn normalize_path_with_tail(path: &str) -> String {
    normalize_path(path) + "/"
}

/// Allow-list and deny-list entry: a host with any number of ports and paths.
pub trait TargetSource {
    fn host(&self) -> &str;
    fn ports(&self) -> &[u16];
    fn paths(&self) -> &[String];
}

/// Expands each source into the cross product of its ports and paths. A source without ports (or paths)
/// yields targets without a port (or path). Sources without a host are skipped.
pub fn derive_targets<'a, S>(sources: impl IntoIterator<Item = &'a S>) -> Vec<Target>
where
    S: TargetSource + 'a,
{
    let mut targets = vec![];
    for source in sources {
        let host = source.host();
        if host.is_empty() {
            warn!(target: TARGET, "Skipping target source without a host ports={:?} paths={:?}", source.ports(), source.paths());
            continue;
        }

        let ports: Vec<Option<u16>> = if source.ports().is_empty() { vec![None] } else { source.ports().iter().copied().map(Some).collect() };
        let paths: Vec<Option<String>> =
            if source.paths().is_empty() { vec![None] } else { source.paths().iter().map(|p| Some(normalize_path(p))).collect() };

        for (port, path) in ports.into_iter().cartesian_product(paths) {
            let target = Target { hostname: host.to_owned(), port, path };
            debug!(target: TARGET, "Derived target {target}");
            targets.push(target);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brownfield::fixtures::{self, HOST, OTHER_HOST};

    #[test]
    fn normalizes_trailing_slashes_and_stars() {
        assert_eq!(normalize_path("*//*hello/**/*//"), "*//*hello");
        assert_eq!(normalize_path("/foo/"), "/foo");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path_with_tail("/abc/*"), "/abc/");
    }

    #[test]
    fn derives_managed_targets() {
        let actual = derive_targets(&fixtures::managed_targets());
        assert_eq!(actual.len(), 3);
        for path in ["/foo", "/bar", "/baz"] {
            assert!(actual.contains(&Target::host(HOST).with_port(443).with_path(path)), "missing {path}");
        }
    }

    #[test]
    fn derives_prohibited_targets() {
        let actual = derive_targets(&fixtures::prohibited_targets());
        assert_eq!(actual.len(), 2);
        assert!(actual.contains(&Target::host(HOST).with_port(443).with_path("/fox")));
        assert!(actual.contains(&Target::host(HOST).with_port(443).with_path("/bar")));
    }

    #[test]
    fn derives_cross_product_and_host_only_targets() {
        let sources = vec![
            fixtures::managed_spec(HOST, &[80, 443], &["/a/", "/b"]),
            fixtures::managed_spec(OTHER_HOST, &[], &[]),
            fixtures::managed_spec("", &[80], &["/ignored"]),
        ];
        let actual = derive_targets(&sources);
        assert_eq!(actual.len(), 5);
        assert!(actual.contains(&Target::host(HOST).with_port(80).with_path("/a")));
        assert!(actual.contains(&Target::host(HOST).with_port(443).with_path("/b")));
        assert!(actual.contains(&Target::host(OTHER_HOST)));
    }

    #[test]
    fn finds_target_in_list() {
        let list = vec![Target::host(HOST).with_port(443).with_path("/foo"), Target::host(HOST).with_port(443).with_path("/bar")];
        assert!(Target::host(HOST).with_port(443).with_path("/bar").is_in(&list));
        assert!(!Target::host(HOST).with_port(9898).with_path("/xyz").is_in(&list));
    }

    #[test]
    fn finds_target_without_port() {
        let list = vec![
            Target::host(HOST).with_path("/fox"),
            Target::host(HOST).with_port(443).with_path("/foo"),
            Target::host(HOST).with_port(443).with_path("/bar"),
        ];
        assert!(Target::host(HOST).with_path("/bar").is_in(&list));
        assert!(!Target::host(HOST).with_path("/xyz").is_in(&list));
        assert!(Target::host(HOST).with_port(8080).with_path("/fox").is_in(&list));
    }

    #[test]
    fn path_prefix_boundaries() {
        let list = vec![Target::host(HOST).with_path("/abc")];
        assert!(Target::host(HOST).with_path("/abc").is_in(&list));
        assert!(Target::host(HOST).with_path("/abc/").is_in(&list));
        assert!(Target::host(HOST).with_path("/abc/def").is_in(&list));
        assert!(!Target::host(HOST).with_path("/abcdef").is_in(&list));
        assert!(!Target::host(HOST).with_path("/ab").is_in(&list));
        assert!(!Target::host(HOST).is_in(&list));
    }

    #[test]
    fn host_only_entry_covers_everything_on_host() {
        let list = vec![Target::host(HOST)];
        assert!(Target::host(HOST).is_in(&list));
        assert!(Target::host(HOST).with_port(8080).with_path("/any/thing").is_in(&list));
        assert!(!Target::host(OTHER_HOST).is_in(&list));
        assert!(!Target::host(HOST).is_in(&[]));
    }

    #[test]
    fn mismatched_ports_do_not_match() {
        let list = vec![Target::host(HOST).with_port(80)];
        assert!(Target::host(HOST).with_port(80).with_path("/x").is_in(&list));
        assert!(!Target::host(HOST).with_port(443).is_in(&list));
    }

    #[test]
    fn port_and_path_combinations() {
        // (entry port, target port, matches)
        let ports = [
            (None, None, true),
            (None, Some(443), true),
            (Some(443), None, true),
            (Some(443), Some(443), true),
            (Some(443), Some(80), false),
        ];
        // (entry path, target path, matches)
        let paths = [
            (None, None, true),
            (None, Some("/abc"), true),
            (None, Some("/abcdef"), true),
            (Some("/abc"), None, false),
            (Some("/abc"), Some("/abc"), true),
            (Some("/abc"), Some("/abc/def"), true),
            (Some("/abc"), Some("/abcdef"), false),
            (Some("/abc/"), Some("/abc/def/"), true),
        ];

        for ((entry_port, port, port_ok), (entry_path, path, path_ok)) in ports.into_iter().cartesian_product(paths) {
            let entry = Target { hostname: HOST.to_owned(), port: entry_port, path: entry_path.map(str::to_owned) };
            let target = Target { hostname: HOST.to_owned(), port, path: path.map(str::to_owned) };
            assert_eq!(target.is_in(&[entry.clone()]), port_ok && path_ok, "{target} in [{entry}]");

            let elsewhere = Target { hostname: OTHER_HOST.to_owned(), ..target };
            assert!(!elsewhere.is_in(&[entry]));
        }
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Target::host(HOST).with_port(443).with_path("/foo").to_string(), format!("{HOST}:443/foo"));
        assert_eq!(Target::host(HOST).to_string(), HOST);
    }
}
