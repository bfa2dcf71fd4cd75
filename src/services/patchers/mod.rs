mod ingress_status_patcher;
mod patcher;

pub use ingress_status_patcher::{with_load_balancer_address, IngressStatusPatcherService};
pub use patcher::{Operation, PatchContext, Patcher};
