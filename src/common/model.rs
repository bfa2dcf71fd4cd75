use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

const SANITIZED: &str = "--- SENSITIVE DATA ----";
pub const HTTPS_PORT: u16 = 443;
pub const HTTP_PORT: u16 = 80;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubResource {
    pub id: String,
}

impl SubResource {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }

    /// Name of the referenced resource, i.e. the last segment of its slash separated id.
    pub fn name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub protocol: Protocol,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<SubResource>,
}

impl Listener {
    pub fn port(&self) -> u16 {
        match self.protocol {
            Protocol::Https => HTTPS_PORT,
            Protocol::Http => HTTP_PORT,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRule {
    #[builder(setter(into))]
    pub name: String,
    pub listener: SubResource,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_map: Option<SubResource>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_pool: Option<SubResource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_pool: Option<SubResource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct PathMap {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default)]
    #[serde(default)]
    pub path_rules: Vec<PathRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BackendPool {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default)]
    #[serde(default)]
    pub backend_addresses: Vec<BackendAddress>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub protocol: Protocol,
    #[builder(default = 30)]
    #[serde(default)]
    pub interval: u32,
    #[builder(default = 30)]
    #[serde(default)]
    pub timeout: u32,
    #[builder(default = 3)]
    #[serde(default)]
    pub unhealthy_threshold: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfiguration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCertificate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_cert_data: Option<String>,
}

impl std::fmt::Debug for SslCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SslCertificate")
            .field("name", &self.name)
            .field("data", &SANITIZED)
            .field("password", &SANITIZED)
            .field("public_cert_data", &self.public_cert_data)
            .finish()
    }
}

/// Full configuration of the remote L7 load balancer, as fetched from and submitted to its control plane.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfig {
    #[serde(default)]
    pub listeners: Vec<Listener>,
    #[serde(default)]
    pub routing_rules: Vec<RoutingRule>,
    #[serde(default)]
    pub path_maps: Vec<PathMap>,
    #[serde(default)]
    pub backend_pools: Vec<BackendPool>,
    #[serde(default)]
    pub probes: Vec<Probe>,
    #[serde(default)]
    pub frontend_ip_configurations: Vec<FrontendIpConfiguration>,
    #[serde(default)]
    pub ssl_certificates: Vec<SslCertificate>,
}

impl LoadBalancerConfig {
    /// JSON rendering of the configuration with certificate material blanked out, safe to put in logs.
    pub fn sanitized_json(&self) -> serde_json::Result<String> {
        let mut sanitized = self.clone();
        for certificate in &mut sanitized.ssl_certificates {
            if certificate.data.is_some() {
                certificate.data = Some(SANITIZED.to_owned());
            }
            if certificate.password.is_some() {
                certificate.password = Some(SANITIZED.to_owned());
            }
        }
        serde_json::to_string(&sanitized)
    }
}
