//! Dynamic API plumbing
//!
//! Builds typed `Api<DynamicObject>` handles from registry entries. All the
//! browsable kinds are stable built-ins, so the group/version/plural triple
//! comes straight from the registry with no discovery round-trip.

use kube::core::{ApiResource, DynamicObject};
use kube::{Api, Client};

use crate::models::KindEntry;

/// Build the `ApiResource` for a registry entry
pub fn api_resource(entry: &KindEntry) -> ApiResource {
    ApiResource {
        group: entry.group.to_string(),
        version: entry.version.to_string(),
        api_version: entry.api_version(),
        kind: entry.display_name.to_string(),
        plural: entry.plural.to_string(),
    }
}

/// Api handle scoped to one namespace
pub fn namespaced_api(client: &Client, entry: &KindEntry, namespace: &str) -> Api<DynamicObject> {
    Api::namespaced_with(client.clone(), namespace, &api_resource(entry))
}

/// Api handle spanning all namespaces
pub fn all_namespaces_api(client: &Client, entry: &KindEntry) -> Api<DynamicObject> {
    Api::all_with(client.clone(), &api_resource(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_kind;

    #[test]
    fn test_api_resource_core_kind() {
        let resource = api_resource(find_kind("pod").unwrap());
        assert_eq!(resource.group, "");
        assert_eq!(resource.version, "v1");
        assert_eq!(resource.api_version, "v1");
        assert_eq!(resource.kind, "Pod");
        assert_eq!(resource.plural, "pods");
    }

    #[test]
    fn test_api_resource_grouped_kind() {
        let resource = api_resource(find_kind("sts").unwrap());
        assert_eq!(resource.group, "apps");
        assert_eq!(resource.api_version, "apps/v1");
        assert_eq!(resource.plural, "statefulsets");
    }
}
