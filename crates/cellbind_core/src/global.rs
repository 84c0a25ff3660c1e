//! Process-wide registry instances.
//!
//! Hosts that dispatch notifications from a single callback thread and have
//! no place to keep an injected registry can use these shared instances.
//! Both are created on first access and live until process exit.

use crate::binding::registry::BindingRegistry;
use crate::object::registry::ObjectRegistry;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

static BINDINGS: Lazy<Mutex<BindingRegistry>> = Lazy::new(|| Mutex::new(BindingRegistry::new()));
static OBJECTS: Lazy<Mutex<ObjectRegistry>> = Lazy::new(|| Mutex::new(ObjectRegistry::new()));

/// Shared binding registry.
pub fn bindings() -> &'static Mutex<BindingRegistry> {
    &BINDINGS
}

/// Shared object registry.
pub fn objects() -> &'static Mutex<ObjectRegistry> {
    &OBJECTS
}

#[cfg(test)]
mod tests {
    use super::{bindings, objects};
    use crate::property;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Flag {
        on: bool,
    }

    #[test]
    fn shared_instances_are_the_same_across_calls() {
        let flag = Arc::new(Mutex::new(Flag { on: false }));
        bindings()
            .lock()
            .bind("global::flag", &flag, property!(Flag, on))
            .expect("bind");
        bindings()
            .lock()
            .notify_value("global::flag", true)
            .expect("notify");
        assert!(flag.lock().on);

        let handle = objects().lock().register("flag", 1_u8).expect("register");
        assert!(objects().lock().contains(&handle));
    }
}
