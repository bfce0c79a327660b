// SPDX-License-Identifier: MIT
//
// Activity lifecycle fanout.
//
// The host application registers one lifecycle observer at startup; every
// resume/pause transition is forwarded to all live instances (default and
// custom alike), so each SDK instance tracks sessions correctly.

use tracing::debug;

use crate::registry::InstanceRegistry;
use crate::traits::InstanceLifecycle;

/// Forwards activity transitions to every instance in the registry.
pub struct LifecycleFanout {
    registry: InstanceRegistry,
}

impl LifecycleFanout {
    pub fn new(registry: InstanceRegistry) -> Self {
        Self { registry }
    }
}

impl InstanceLifecycle for LifecycleFanout {
    fn activity_resumed(&self) {
        debug!("activity resumed, notifying all instances");
        self.registry.for_each(|_, instance| instance.activity_resumed());
    }

    fn activity_paused(&self) {
        debug!("activity paused, notifying all instances");
        self.registry.for_each(|_, instance| instance.activity_paused());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemux_core::InstanceConfig;
    use telemux_vendor::recording::RecordingSdk;

    #[test]
    fn transitions_reach_every_live_instance() {
        let sdk = RecordingSdk::new();
        let registry = InstanceRegistry::new(sdk.clone());
        registry
            .init_instance("d1", &InstanceConfig::new("A", "T", "eu1"))
            .expect("init d1");
        registry
            .init_instance("d2", &InstanceConfig::new("B", "T", "eu1"))
            .expect("init d2");

        let fanout = LifecycleFanout::new(registry);
        fanout.activity_resumed();
        fanout.activity_resumed();
        fanout.activity_paused();

        for index in 0..2 {
            let spy = sdk.instance(index).expect("constructed");
            assert_eq!(spy.resumed_count(), 2);
            assert_eq!(spy.paused_count(), 1);
        }
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let fanout = LifecycleFanout::new(InstanceRegistry::new(RecordingSdk::new()));
        fanout.activity_resumed();
        fanout.activity_paused();
    }
}
