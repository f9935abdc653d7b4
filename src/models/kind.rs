//! Resource kind registry
//!
//! Central table of the resource kinds the navigator knows how to browse.
//! To add a kind, add an entry to `KIND_REGISTRY`; hotkey validity and
//! operation dispatch key off the entry, so no new code path is needed.

/// Capability descriptor for a single resource kind
#[derive(Debug, PartialEq, Eq)]
pub struct KindEntry {
    /// Display name as shown in the kind menu ("Pod", "Deployment", ...)
    pub display_name: &'static str,
    /// API group ("" for core)
    pub group: &'static str,
    /// API version within the group
    pub version: &'static str,
    /// Lowercase plural used in API paths and kubectl arguments
    pub plural: &'static str,
    /// Accepted aliases for CLI `--kind` and quick lookup
    pub aliases: &'static [&'static str],
}

impl KindEntry {
    /// `group/version` string, or bare version for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// Registry of browsable resource kinds
///
/// Order here is the order the kind menu presents.
pub const KIND_REGISTRY: &[KindEntry] = &[
    KindEntry {
        display_name: "Pod",
        group: "",
        version: "v1",
        plural: "pods",
        aliases: &["pod", "pods", "po"],
    },
    KindEntry {
        display_name: "Deployment",
        group: "apps",
        version: "v1",
        plural: "deployments",
        aliases: &["deployment", "deployments", "deploy"],
    },
    KindEntry {
        display_name: "Service",
        group: "",
        version: "v1",
        plural: "services",
        aliases: &["service", "services", "svc"],
    },
    KindEntry {
        display_name: "ConfigMap",
        group: "",
        version: "v1",
        plural: "configmaps",
        aliases: &["configmap", "configmaps", "cm"],
    },
    KindEntry {
        display_name: "Secret",
        group: "",
        version: "v1",
        plural: "secrets",
        aliases: &["secret", "secrets"],
    },
    KindEntry {
        display_name: "StatefulSet",
        group: "apps",
        version: "v1",
        plural: "statefulsets",
        aliases: &["statefulset", "statefulsets", "sts"],
    },
    KindEntry {
        display_name: "DaemonSet",
        group: "apps",
        version: "v1",
        plural: "daemonsets",
        aliases: &["daemonset", "daemonsets", "ds"],
    },
    KindEntry {
        display_name: "PersistentVolumeClaim",
        group: "",
        version: "v1",
        plural: "persistentvolumeclaims",
        aliases: &["persistentvolumeclaim", "persistentvolumeclaims", "pvc"],
    },
];

/// Look up a kind by display name, plural, or alias (case-insensitive)
pub fn find_kind(name: &str) -> Option<&'static KindEntry> {
    let lower = name.to_lowercase();
    KIND_REGISTRY.iter().find(|entry| {
        entry.display_name.to_lowercase() == lower
            || entry.plural == lower
            || entry.aliases.contains(&lower.as_str())
    })
}

/// Display names in registry order, for the kind menu
pub fn kind_names() -> Vec<String> {
    KIND_REGISTRY
        .iter()
        .map(|entry| entry.display_name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_kind_by_alias() {
        assert_eq!(find_kind("po").unwrap().display_name, "Pod");
        assert_eq!(find_kind("deploy").unwrap().display_name, "Deployment");
        assert_eq!(find_kind("svc").unwrap().display_name, "Service");
        assert_eq!(
            find_kind("pvc").unwrap().display_name,
            "PersistentVolumeClaim"
        );
    }

    #[test]
    fn test_find_kind_case_insensitive() {
        assert_eq!(find_kind("pod").unwrap().display_name, "Pod");
        assert_eq!(find_kind("Pod").unwrap().display_name, "Pod");
        assert_eq!(find_kind("STATEFULSET").unwrap().display_name, "StatefulSet");
    }

    #[test]
    fn test_find_kind_unknown() {
        assert!(find_kind("gitrepository").is_none());
        assert!(find_kind("").is_none());
    }

    #[test]
    fn test_api_version_core_vs_grouped() {
        assert_eq!(find_kind("pod").unwrap().api_version(), "v1");
        assert_eq!(find_kind("deploy").unwrap().api_version(), "apps/v1");
    }

    #[test]
    fn test_kind_names_order_matches_registry() {
        let names = kind_names();
        assert_eq!(names.len(), KIND_REGISTRY.len());
        assert_eq!(names[0], "Pod");
        assert_eq!(names[names.len() - 1], "PersistentVolumeClaim");
    }
}
