use std::collections::BTreeMap;
use std::fmt;

use super::command::{Command, OutletEvent};
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::signal_processing::KalmanFilter;

/// Handle to a filter owned by a [`FilterRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of every filter instance a host creates
///
/// The host adapter creates one registry at start-up and drops it at exit;
/// dropping the registry releases all remaining instances. Ids are never
/// reused within one registry.
pub struct FilterRegistry {
    instances: BTreeMap<InstanceId, KalmanFilter>,
    next_id: u64,
}

impl FilterRegistry {
    pub fn new() -> Self {
        log::info!("kalman_setup");
        Self {
            instances: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Instantiate a filter from positional creation arguments
    pub fn create<S: AsRef<str>>(&mut self, args: &[S]) -> InstanceId {
        self.create_with_config(&FilterConfig::from_creation_args(args))
    }

    pub fn create_with_config(&mut self, config: &FilterConfig) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.instances.insert(id, KalmanFilter::new(config));
        log::debug!("kalman: created instance {}", id);
        id
    }

    /// Deliver one message to an instance
    ///
    /// # Errors
    /// `UnknownInstance` if `id` was destroyed or never created. Parameter
    /// errors inside the instance are logged, not returned.
    pub fn dispatch(&mut self, id: InstanceId, command: Command) -> Result<Vec<OutletEvent>> {
        let filter = self
            .instances
            .get_mut(&id)
            .ok_or(FilterError::UnknownInstance(id.0))?;
        Ok(command.apply(filter))
    }

    pub fn get(&self, id: InstanceId) -> Option<&KalmanFilter> {
        self.instances.get(&id)
    }

    /// Tear down an instance, releasing its history
    pub fn destroy(&mut self, id: InstanceId) -> Result<()> {
        self.instances
            .remove(&id)
            .map(|_| log::debug!("kalman: destroyed instance {}", id))
            .ok_or(FilterError::UnknownInstance(id.0))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Outlet;

    #[test]
    fn test_create_and_dispatch() {
        let mut registry = FilterRegistry::new();
        let id = registry.create(&["10", "0.2", "5"]);

        let events = registry.dispatch(id, Command::Measurement(5.0)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outlet, Outlet::Filter);
        assert_eq!(events[0].value, 5.0);
        assert_eq!(events[1].outlet, Outlet::Accuracy);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut registry = FilterRegistry::new();
        let a = registry.create(&["4"]);
        let b = registry.create(&["4"]);

        registry.dispatch(a, Command::Init(9.0)).unwrap();
        assert_eq!(registry.get(a).unwrap().init_value(), 9.0);
        assert_eq!(registry.get(b).unwrap().init_value(), 0.0);
    }

    #[test]
    fn test_destroy() {
        let mut registry = FilterRegistry::new();
        let id = registry.create::<&str>(&[]);
        assert_eq!(registry.len(), 1);

        registry.destroy(id).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.destroy(id), Err(FilterError::UnknownInstance(0)));
        assert!(matches!(
            registry.dispatch(id, Command::Measurement(1.0)),
            Err(FilterError::UnknownInstance(_))
        ));
    }

    #[test]
    fn test_ids_continue_past_u32_range() {
        let mut registry = FilterRegistry::new();
        registry.next_id = u64::from(u32::MAX);
        let a = registry.create::<&str>(&[]);
        let b = registry.create::<&str>(&[]);
        assert_ne!(a, b);
        assert_eq!(b.to_string(), format!("#{}", u64::from(u32::MAX) + 1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_not_reused() {
        let mut registry = FilterRegistry::new();
        let first = registry.create::<&str>(&[]);
        registry.destroy(first).unwrap();
        let second = registry.create::<&str>(&[]);
        assert_ne!(first, second);
    }
}
