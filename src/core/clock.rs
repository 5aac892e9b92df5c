use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::common::EntryId;

/// Clock abstracts access to the current timestamp so editors stay
/// deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hands out creation-timestamp ids. Ids are strictly increasing even when
/// the clock stalls or two entries are created in the same millisecond.
pub struct EntryIdGenerator {
    clock: Arc<dyn Clock>,
    last: i64,
}

impl EntryIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, last: 0 }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn next_id(&mut self) -> EntryId {
        let now = self.clock.now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        EntryId(self.last)
    }

    /// Records ids that already exist (e.g. from a resumed draft) so new ids
    /// never collide with them.
    pub fn observe(&mut self, id: EntryId) {
        self.last = self.last.max(id.0);
    }
}

impl Default for EntryIdGenerator {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ids_stay_unique_under_a_frozen_clock() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut ids = EntryIdGenerator::new(Arc::new(FixedClock(instant)));
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first.0, instant.timestamp_millis());
        assert_eq!(second.0, first.0 + 1);
    }

    #[test]
    fn observed_ids_push_the_floor_up() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut ids = EntryIdGenerator::new(Arc::new(FixedClock(instant)));
        ids.observe(EntryId(instant.timestamp_millis() + 50));
        assert_eq!(ids.next_id().0, instant.timestamp_millis() + 51);
    }
}
