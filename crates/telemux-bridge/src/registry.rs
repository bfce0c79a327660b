// SPDX-License-Identifier: MIT
//
// Named-instance registry for one platform.
//
// The registry maps caller-chosen instance names to live SDK instances.
// It is mutated only by `init_instance` and read by everything else; a
// single mutex guards the map so two initializations racing on the same
// name cannot interleave partial writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use telemux_core::error::Result;
use telemux_core::InstanceConfig;
use telemux_vendor::traits::{VendorInstance, VendorSdk};

/// Name→instance mapping plus the SDK factory that populates it.
///
/// Cloning is cheap and shares the underlying map, so the lifecycle
/// fanout and the bridge can hold the same registry.
#[derive(Clone)]
pub struct InstanceRegistry {
    sdk: Arc<dyn VendorSdk>,
    instances: Arc<Mutex<HashMap<String, Arc<dyn VendorInstance>>>>,
}

impl InstanceRegistry {
    pub fn new(sdk: Arc<dyn VendorSdk>) -> Self {
        Self {
            sdk,
            instances: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Platform name of the backing SDK.
    pub fn platform_name(&self) -> &str {
        self.sdk.platform_name()
    }

    /// Create a new SDK instance under `name`, overwriting any prior entry.
    ///
    /// The new instance has personalization enabled before it becomes
    /// visible. On construction failure the error propagates and the prior
    /// entry (if any) stays live — the replaced instance is never torn
    /// down explicitly, it is dropped with its last reference.
    pub fn init_instance(&self, name: &str, config: &InstanceConfig) -> Result<()> {
        let instance = self.sdk.create_instance(config)?;
        instance.enable_personalization();

        let replaced = self
            .instances
            .lock()
            .expect("instance registry lock poisoned")
            .insert(name.to_string(), instance)
            .is_some();

        info!(
            instance = name,
            account_id = %config.account_id,
            region = %config.region,
            replaced,
            "analytics instance initialized"
        );
        Ok(())
    }

    /// Pure lookup, no side effects.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn VendorInstance>> {
        self.instances
            .lock()
            .expect("instance registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Visit a snapshot of every live instance (lifecycle fanout).
    ///
    /// The snapshot is taken under the lock and released before the
    /// callback runs, so callbacks may touch the registry freely.
    pub fn for_each(&self, mut f: impl FnMut(&str, &Arc<dyn VendorInstance>)) {
        let snapshot: Vec<(String, Arc<dyn VendorInstance>)> = {
            let map = self
                .instances
                .lock()
                .expect("instance registry lock poisoned");
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };
        debug!(count = snapshot.len(), "visiting live instances");
        for (name, instance) in &snapshot {
            f(name, instance);
        }
    }

    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .expect("instance registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemux_vendor::recording::RecordingSdk;

    fn config(account: &str) -> InstanceConfig {
        InstanceConfig::new(account, "TOK", "eu1")
    }

    #[test]
    fn resolve_unknown_name_is_none() {
        let registry = InstanceRegistry::new(RecordingSdk::new());
        assert!(registry.resolve("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn init_enables_personalization_before_exposing() {
        let sdk = RecordingSdk::new();
        let registry = InstanceRegistry::new(sdk.clone());
        registry.init_instance("d1", &config("ACC")).expect("init");

        let spy = sdk.instance(0).expect("constructed");
        assert!(spy.personalization_enabled());
        assert!(registry.resolve("d1").is_some());
    }

    #[test]
    fn reinit_replaces_entry_with_new_construction() {
        let sdk = RecordingSdk::new();
        let registry = InstanceRegistry::new(sdk.clone());

        registry.init_instance("d1", &config("OLD")).expect("first init");
        registry.init_instance("d1", &config("NEW")).expect("re-init");

        // Two constructions happened; the live entry is the second one.
        assert_eq!(sdk.construction_count(), 2);
        assert_eq!(registry.len(), 1);

        let resolved = registry.resolve("d1").expect("live entry");
        let latest: Arc<dyn VendorInstance> = sdk.instance(1).expect("second construction");
        assert!(Arc::ptr_eq(&resolved, &latest));
    }

    #[test]
    fn failed_reinit_keeps_prior_instance_live() {
        let sdk = RecordingSdk::new();
        let registry = InstanceRegistry::new(sdk.clone());
        registry.init_instance("d1", &config("OLD")).expect("first init");

        sdk.fail_next_init("SDK rejected configuration");
        let err = registry
            .init_instance("d1", &config("NEW"))
            .expect_err("scripted failure");
        assert_eq!(err.code(), "INIT_ERROR");

        // The old instance is still resolvable.
        let resolved = registry.resolve("d1").expect("still live");
        let original: Arc<dyn VendorInstance> = sdk.instance(0).expect("first construction");
        assert!(Arc::ptr_eq(&resolved, &original));
    }

    #[test]
    fn for_each_visits_every_instance() {
        let sdk = RecordingSdk::new();
        let registry = InstanceRegistry::new(sdk);
        registry.init_instance("d1", &config("A")).expect("init d1");
        registry.init_instance("d2", &config("B")).expect("init d2");

        let mut seen = Vec::new();
        registry.for_each(|name, _| seen.push(name.to_string()));
        seen.sort();
        assert_eq!(seen, vec!["d1", "d2"]);
    }
}
