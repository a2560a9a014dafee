//! # Keypad Sessions
//!
//! One [`InputState`] per interactive keypad client, keyed by UUID.
//!
//! ## Lock Order
//! A key press holds the session map while it evaluates into the ledger:
//! sessions first, ledger second. Nothing takes them the other way round.
//!
//! ## Idle Eviction
//! Opening a session sweeps out every session whose last key press (or
//! creation) is older than the idle timeout.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tally_core::{CalculationRecord, CoreError, InputState, Key, KeypadSnapshot};
use uuid::Uuid;

use super::LedgerState;

/// Default idle timeout: 30 minutes.
pub const DEFAULT_IDLE_TIMEOUT_SECS: i64 = 30 * 60;

/// A live keypad.
#[derive(Debug, Clone)]
pub struct KeypadSession {
    pub input: InputState,
    pub last_active: DateTime<Utc>,
}

/// What one key press did.
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub snapshot: KeypadSnapshot,
    /// Ledger record written by this press, if it evaluated something.
    pub recorded: Option<CalculationRecord>,
    /// Engine failure; the keypad has already been reset.
    pub error: Option<CoreError>,
}

/// All keypad sessions.
#[derive(Debug)]
pub struct KeypadSessions {
    sessions: Mutex<HashMap<Uuid, KeypadSession>>,
    idle_timeout: Duration,
}

impl Default for KeypadSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl KeypadSessions {
    pub fn new() -> Self {
        Self::with_idle_timeout(Duration::seconds(DEFAULT_IDLE_TIMEOUT_SECS))
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        KeypadSessions {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Opens a session in the canonical zero state.
    pub fn create(&self) -> (Uuid, KeypadSnapshot) {
        self.create_at(Utc::now())
    }

    fn create_at(&self, now: DateTime<Utc>) -> (Uuid, KeypadSnapshot) {
        let id = Uuid::new_v4();
        let session = KeypadSession {
            input: InputState::new(),
            last_active: now,
        };
        let snapshot = session.input.snapshot();

        let mut sessions = self.lock();
        let evicted = self.evict_idle(&mut sessions, now);
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle keypad sessions");
        }
        sessions.insert(id, session);
        (id, snapshot)
    }

    pub fn snapshot(&self, id: Uuid) -> Option<KeypadSnapshot> {
        self.lock().get(&id).map(|session| session.input.snapshot())
    }

    /// Closes a session. Returns false if it did not exist.
    pub fn remove(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Applies a key press to a session, recording into `ledger`.
    ///
    /// `None` when the session does not exist.
    pub fn press(&self, id: Uuid, key: Key, ledger: &LedgerState) -> Option<KeyOutcome> {
        self.press_at(id, key, ledger, Utc::now())
    }

    fn press_at(&self, id: Uuid, key: Key, ledger: &LedgerState, now: DateTime<Utc>) -> Option<KeyOutcome> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        session.last_active = now;

        let result = ledger.with_ledger_mut(|ledger| session.input.press(key, ledger));
        let (recorded, error) = match result {
            Ok(recorded) => (recorded, None),
            Err(e) => (None, Some(e)),
        };

        Some(KeyOutcome {
            snapshot: session.input.snapshot(),
            recorded,
            error,
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, KeypadSession>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_active <= self.idle_timeout);
        before - sessions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, KeypadSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
