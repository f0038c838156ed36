//! Application state for the HR operations API.
//!
//! This module defines the shared application state that is available
//! to all request handlers, and the clock handlers read `now` from.

use std::sync::{Arc, RwLock};

use chrono::{FixedOffset, NaiveDateTime, Utc};

use crate::calculation::local_time;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::store::InMemoryStore;

use super::auth::{CredentialVerifier, TokenTable};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// The current wall-clock time in the organization's time zone.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock and shifts it by a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a clock for the given offset.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        local_time(Utc::now(), self.offset)
    }
}

/// A clock that only moves when told to. Used by tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<NaiveDateTime>,
}

impl ManualClock {
    /// Creates a clock stopped at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the store, the credential verifier and the clock.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<InMemoryStore>,
    credentials: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates the application state from a loaded configuration.
    ///
    /// The store is seeded with the configured employees, bearer tokens come
    /// from the seed section and the clock follows the configured UTC offset.
    ///
    /// # Errors
    ///
    /// - `DuplicateKey` if two seed employees share an id or email
    /// - `Validation` if the UTC offset is out of range
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        let engine = config.config();
        let store = InMemoryStore::with_seed(&engine.seed)?;
        let credentials = TokenTable::new(engine.seed.tokens.clone());
        let clock = SystemClock::new(engine.attendance.offset()?);

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            credentials: Arc::new(credentials),
            clock: Arc::new(clock),
        })
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Returns the credential verifier.
    pub fn credentials(&self) -> &dyn CredentialVerifier {
        self.credentials.as_ref()
    }

    /// The current local time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::EmployeeRepository;
    use crate::models::{Role, fixtures::employee};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_new_seeds_store() {
        let mut config = EngineConfig::default();
        config
            .seed
            .employees
            .push(employee("EMP20240001", Role::Employee));
        let state = AppState::new(ConfigLoader::from_config(config).unwrap()).unwrap();
        assert!(state.store().find_employee("EMP20240001").unwrap().is_some());
    }

    #[test]
    fn test_manual_clock_moves_on_set() {
        let clock = Arc::new(ManualClock::new(at(9, 0)));
        let state = AppState::new(ConfigLoader::default())
            .unwrap()
            .with_clock(clock.clone());
        assert_eq!(state.now(), at(9, 0));
        clock.set(at(18, 0));
        assert_eq!(state.now(), at(18, 0));
    }

    #[test]
    fn test_system_clock_applies_offset() {
        let utc = SystemClock::new(FixedOffset::east_opt(0).unwrap()).now();
        let ist = SystemClock::new(FixedOffset::east_opt(19_800).unwrap()).now();
        let shift = (ist - utc).num_minutes();
        assert!((329..=331).contains(&shift));
    }
}
