//! # History Ledger
//!
//! Ordered, uniquely numbered log of evaluated expressions.
//!
//! ## Id Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append  append  append  delete(2)  append  clear()  append             │
//! │    #1      #2      #3     [1, 3]      #4     []       #5                │
//! │                                                                         │
//! │  next_id only ever grows. Deleting or clearing never hands an id out    │
//! │  a second time and never renumbers surviving records.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The ledger is a plain owned value with `&mut self` mutators. It does no
//! locking of its own: whoever shares it (the HTTP service) wraps it in a
//! mutex so that append, delete and clear are mutually exclusive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::number::{format_operand, Number};
use crate::operation::Operation;

// =============================================================================
// Calculation Record
// =============================================================================

/// One evaluated expression. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculationRecord {
    /// 1-based, strictly increasing, never reused.
    pub id: u64,
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
    pub result: Number,
    /// `"A op B = R"`, e.g. `"10.0 + 5.0 = 15"`.
    pub expression: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Builds the `"A op B = R"` expression text.
pub fn format_expression(operation: Operation, a: f64, b: f64, result: Number) -> String {
    format!(
        "{} {} {} = {}",
        format_operand(a),
        operation.symbol(),
        format_operand(b),
        result
    )
}

// =============================================================================
// Ledger
// =============================================================================

/// Append-only calculation history.
#[derive(Debug, Clone)]
pub struct Ledger {
    records: Vec<CalculationRecord>,
    next_id: u64,
}

impl Ledger {
    /// Creates an empty ledger whose first record will get id 1.
    pub fn new() -> Self {
        Ledger {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Records an evaluation and returns the stored record.
    pub fn append(&mut self, operation: Operation, a: f64, b: f64, result: Number) -> CalculationRecord {
        let record = CalculationRecord {
            id: self.next_id,
            operation,
            a,
            b,
            result,
            expression: format_expression(operation, a, b, result),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }

    /// Returns the whole history, or its most recent `limit` entries.
    ///
    /// ## Rules
    /// - `None`, `Some(0)` or a negative limit → every record
    /// - otherwise the last `limit` records, oldest first
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Ledger, Number, Operation};
    ///
    /// let mut ledger = Ledger::new();
    /// for n in 1..=3 {
    ///     ledger.append(Operation::Add, n as f64, 0.0, Number::Integer(n));
    /// }
    ///
    /// let tail = ledger.list(Some(2));
    /// assert_eq!(tail.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    /// assert_eq!(ledger.list(None).len(), 3);
    /// ```
    pub fn list(&self, limit: Option<i64>) -> Vec<CalculationRecord> {
        match limit {
            Some(limit) if limit > 0 => {
                let keep = usize::try_from(limit).unwrap_or(usize::MAX).min(self.records.len());
                self.records[self.records.len() - keep..].to_vec()
            }
            _ => self.records.clone(),
        }
    }

    /// Removes and returns the record with `id`.
    pub fn delete_by_id(&mut self, id: u64) -> CoreResult<CalculationRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::RecordNotFound(id))?;

        Ok(self.records.remove(index))
    }

    /// Removes every record and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn add(ledger: &mut Ledger, a: f64, b: f64) -> CalculationRecord {
        let result = Number::from_f64(a + b).unwrap();
        ledger.append(Operation::Add, a, b, result)
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut ledger = Ledger::new();

        let first = add(&mut ledger, 10.0, 5.0);
        let second = add(&mut ledger, 1.0, 1.0);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.expression, "10.0 + 5.0 = 15");
        assert_eq!(first.result, Number::Integer(15));
    }

    #[test]
    fn test_expression_keeps_fractional_result() {
        let mut ledger = Ledger::new();
        let record = ledger.append(Operation::Divide, 7.0, 2.0, Number::Float(3.5));
        assert_eq!(record.expression, "7.0 / 2.0 = 3.5");
    }

    #[test]
    fn test_list_limit_returns_most_recent() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);
        add(&mut ledger, 2.0, 0.0);
        let third = add(&mut ledger, 3.0, 0.0);

        let tail = ledger.list(Some(1));
        assert_eq!(tail, vec![third]);
    }

    #[test]
    fn test_list_non_positive_limit_returns_all() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);
        add(&mut ledger, 2.0, 0.0);

        assert_eq!(ledger.list(None).len(), 2);
        assert_eq!(ledger.list(Some(0)).len(), 2);
        assert_eq!(ledger.list(Some(-3)).len(), 2);
        assert_eq!(ledger.list(Some(50)).len(), 2);
    }

    #[test]
    fn test_delete_by_id() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);
        let second = add(&mut ledger, 2.0, 0.0);
        add(&mut ledger, 3.0, 0.0);

        let deleted = ledger.delete_by_id(2).unwrap();
        assert_eq!(deleted, second);
        assert_eq!(
            ledger.list(None).iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_delete_missing_id_fails() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);

        assert_eq!(ledger.delete_by_id(42), Err(CoreError::RecordNotFound(42)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);
        let second = add(&mut ledger, 2.0, 0.0);
        ledger.delete_by_id(second.id).unwrap();

        let next = add(&mut ledger, 3.0, 0.0);
        assert_eq!(next.id, 3);
        assert!(ledger.delete_by_id(second.id).is_err());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 1.0, 0.0);
        add(&mut ledger, 2.0, 0.0);
        add(&mut ledger, 3.0, 0.0);

        assert_eq!(ledger.clear(), 3);
        assert!(ledger.is_empty());
        assert_eq!(ledger.clear(), 0);

        // Ids continue after a clear
        assert_eq!(add(&mut ledger, 4.0, 0.0).id, 4);
    }

    proptest! {
        #[test]
        fn prop_ids_strictly_increase(actions in proptest::collection::vec(0u8..3, 1..60)) {
            let mut ledger = Ledger::new();
            let mut last_id = 0u64;

            for action in actions {
                match action {
                    0 => {
                        let record = add(&mut ledger, 1.0, 1.0);
                        prop_assert!(record.id > last_id);
                        last_id = record.id;
                    }
                    1 => {
                        if let Some(first) = ledger.list(None).first() {
                            ledger.delete_by_id(first.id).unwrap();
                        }
                    }
                    _ => {
                        let before = ledger.len();
                        prop_assert_eq!(ledger.clear(), before);
                        prop_assert!(ledger.is_empty());
                    }
                }
            }

            let ids: Vec<u64> = ledger.list(None).iter().map(|r| r.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
