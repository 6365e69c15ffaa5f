use dashmap::DashMap;
use std::sync::Arc;

/// Registry of applications with a decision currently being submitted to the
/// backend.
///
/// Keyed by application id alone: while an accept is in flight a refuse on
/// the same application is rejected too, and the other way round.
#[derive(Clone, Default)]
pub struct InFlight {
    active: Arc<DashMap<String, ()>>,
}

/// Held for the duration of one backend call; releases its key on drop.
pub struct InFlightTicket {
    key: String,
    active: Arc<DashMap<String, ()>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, enrollment_id: &str) -> Option<InFlightTicket> {
        match self.active.entry(enrollment_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Some(InFlightTicket {
                    key: enrollment_id.to_string(),
                    active: Arc::clone(&self.active),
                })
            }
        }
    }

    #[cfg(test)]
    fn is_active(&self, enrollment_id: &str) -> bool {
        self.active.contains_key(enrollment_id)
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_until_release() {
        let in_flight = InFlight::new();

        let ticket = in_flight.try_acquire("enr-1").unwrap();
        assert!(in_flight.try_acquire("enr-1").is_none());
        assert!(in_flight.is_active("enr-1"));

        drop(ticket);
        assert!(!in_flight.is_active("enr-1"));
        assert!(in_flight.try_acquire("enr-1").is_some());
    }

    #[test]
    fn test_keys_are_per_enrollment_only() {
        let in_flight = InFlight::new();

        let _decision = in_flight.try_acquire("enr-1").unwrap();
        assert!(in_flight.try_acquire("enr-1").is_none());
        assert!(in_flight.try_acquire("enr-2").is_some());
    }

    #[test]
    fn test_clones_share_one_registry() {
        let in_flight = InFlight::new();
        let other = in_flight.clone();

        let _decision = in_flight.try_acquire("enr-1").unwrap();
        assert!(other.try_acquire("enr-1").is_none());
    }
}
