//! # Keypad Input State Machine
//!
//! Turns discrete button presses into a display string and, on `=` or
//! operator chaining, into engine evaluations recorded in the [`Ledger`].
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────────┐   operator (nothing pending)   ┌──────────────────┐   │
//! │   │  Entering  │ ─────────────────────────────► │ AwaitingOperand  │   │
//! │   │            │                                │ previous = a     │   │
//! │   │ current=.. │ ◄───────────────────────────── │ pending  = op    │   │
//! │   └─────┬──────┘        digit / "."             └──────────────────┘   │
//! │         │                                                               │
//! │         │ operator (op pending)  ──► evaluate pending, record, re-arm   │
//! │         │ "="      (op pending)  ──► evaluate pending, record, show     │
//! │         │ "C"                    ──► canonical zero state               │
//! │         ▼                                                               │
//! │   engine error ──► canonical zero state + error reported to caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Chaining
//! `3 + 4 × 2 =` evaluates `3 + 4 = 7` when `×` is pressed, then
//! `7 × 2 = 14` on `=`. Both evaluations land in the ledger, in that order.
//!
//! ```rust
//! use tally_core::{InputState, Key, Ledger};
//!
//! let mut keypad = InputState::new();
//! let mut ledger = Ledger::new();
//!
//! for key in ["3", "+", "4", "×", "2", "="] {
//!     keypad.press(key.parse::<Key>().unwrap(), &mut ledger).unwrap();
//! }
//!
//! assert_eq!(keypad.display_text(), "14");
//! let expressions: Vec<String> = ledger.list(None).into_iter().map(|r| r.expression).collect();
//! assert_eq!(expressions, vec!["3.0 + 4.0 = 7", "7.0 * 2.0 = 14"]);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::engine;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{CalculationRecord, Ledger};
use crate::number::Number;
use crate::operation::Operation;
use crate::ZERO_DISPLAY;

// =============================================================================
// Keys
// =============================================================================

/// A single keypad event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `0`..=`9`
    Digit(char),
    DecimalPoint,
    Operator(Operation),
    Equals,
    Clear,
    Backspace,
    Negate,
}

/// Error returned when a key label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Parses a key label as a front-end would send it.
    ///
    /// Digits, `.`, `=`, `C`, `⌫`/`backspace`, `±`/`negate`, and any
    /// operator token accepted by [`Operation::from_token`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Ok(Key::Digit(c));
            }
        }

        match label {
            "." | "," => return Ok(Key::DecimalPoint),
            "=" => return Ok(Key::Equals),
            "⌫" => return Ok(Key::Backspace),
            "±" | "+/-" => return Ok(Key::Negate),
            _ => {}
        }

        match label.to_ascii_lowercase().as_str() {
            "c" | "ac" | "clear" => return Ok(Key::Clear),
            "equals" | "enter" => return Ok(Key::Equals),
            "backspace" | "del" => return Ok(Key::Backspace),
            "negate" => return Ok(Key::Negate),
            "decimal" | "point" => return Ok(Key::DecimalPoint),
            _ => {}
        }

        Operation::from_token(label)
            .map(Key::Operator)
            .ok_or_else(|| UnknownKey(label.to_string()))
    }
}

// =============================================================================
// Input State
// =============================================================================

/// Keypad state for one interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    display_text: String,
    /// Operand being typed; may hold `"0."` or a leading `-`.
    current_operand: String,
    previous_operand: Option<f64>,
    pending_operation: Option<Operation>,
    awaiting_fresh_operand: bool,
}

impl InputState {
    /// Creates the canonical zero state.
    pub fn new() -> Self {
        InputState {
            display_text: ZERO_DISPLAY.to_string(),
            current_operand: ZERO_DISPLAY.to_string(),
            previous_operand: None,
            pending_operation: None,
            awaiting_fresh_operand: false,
        }
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn current_operand(&self) -> &str {
        &self.current_operand
    }

    pub fn previous_operand(&self) -> Option<f64> {
        self.previous_operand
    }

    pub fn pending_operation(&self) -> Option<Operation> {
        self.pending_operation
    }

    pub fn is_awaiting_fresh_operand(&self) -> bool {
        self.awaiting_fresh_operand
    }

    /// Applies one key press.
    ///
    /// Returns the ledger record when the key caused an evaluation.
    pub fn press(&mut self, key: Key, ledger: &mut Ledger) -> CoreResult<Option<CalculationRecord>> {
        match key {
            Key::Digit(d) => self.digit(d),
            Key::DecimalPoint => self.decimal_point(),
            Key::Backspace => self.backspace(),
            Key::Negate => self.negate(),
            Key::Clear => self.clear(),
            Key::Operator(op) => return self.set_operation(op, ledger),
            Key::Equals => return self.equals(ledger),
        }
        Ok(None)
    }

    /// Appends a digit, replacing the operand when a fresh one is expected
    /// or when the operand is the literal `"0"`.
    pub fn digit(&mut self, d: char) {
        if !d.is_ascii_digit() {
            return;
        }

        if self.awaiting_fresh_operand {
            self.current_operand = d.to_string();
            self.awaiting_fresh_operand = false;
        } else if self.current_operand == ZERO_DISPLAY {
            self.current_operand = d.to_string();
        } else {
            self.current_operand.push(d);
        }
        self.sync_display();
    }

    /// Adds a decimal point; a second one in the same operand is ignored.
    pub fn decimal_point(&mut self) {
        if self.awaiting_fresh_operand {
            self.current_operand = "0.".to_string();
            self.awaiting_fresh_operand = false;
        } else if !self.current_operand.contains('.') {
            self.current_operand.push('.');
        }
        self.sync_display();
    }

    /// Drops the last character, flooring at `"0"`.
    pub fn backspace(&mut self) {
        if self.awaiting_fresh_operand {
            return;
        }

        self.current_operand.pop();
        if self.current_operand.is_empty() || self.current_operand == "-" {
            self.current_operand = ZERO_DISPLAY.to_string();
        }
        self.sync_display();
    }

    /// Toggles a leading minus sign.
    pub fn negate(&mut self) {
        if self.awaiting_fresh_operand || self.current_operand == ZERO_DISPLAY {
            return;
        }

        if let Some(rest) = self.current_operand.strip_prefix('-') {
            self.current_operand = rest.to_string();
        } else {
            self.current_operand.insert(0, '-');
        }
        self.sync_display();
    }

    /// Selects an operator, first evaluating any pending one against the
    /// current operand.
    pub fn set_operation(&mut self, op: Operation, ledger: &mut Ledger) -> CoreResult<Option<CalculationRecord>> {
        let recorded = if self.pending_operation.is_some() {
            self.equals(ledger)?
        } else {
            None
        };

        let operand = match self.current_value() {
            Ok(value) => value,
            Err(e) => {
                self.clear();
                return Err(e);
            }
        };

        self.previous_operand = Some(operand);
        self.pending_operation = Some(op);
        self.awaiting_fresh_operand = true;
        Ok(recorded)
    }

    /// Evaluates the pending operation against the current operand.
    ///
    /// No-op when nothing is pending. On an engine failure the state is
    /// reset and the error returned.
    pub fn equals(&mut self, ledger: &mut Ledger) -> CoreResult<Option<CalculationRecord>> {
        let (Some(op), Some(a)) = (self.pending_operation, self.previous_operand) else {
            return Ok(None);
        };

        let evaluated = self
            .current_value()
            .and_then(|b| engine::evaluate(op, a, b).map(|raw| (b, raw)))
            .and_then(|(b, raw)| Number::from_f64(raw).map(|result| (b, result)));

        let (b, result) = match evaluated {
            Ok(pair) => pair,
            Err(e) => {
                self.clear();
                return Err(e);
            }
        };

        let record = ledger.append(op, a, b, result);

        self.current_operand = result.to_string();
        self.display_text = self.current_operand.clone();
        self.previous_operand = None;
        self.pending_operation = None;
        self.awaiting_fresh_operand = false;
        Ok(Some(record))
    }

    /// Resets to the canonical zero state.
    pub fn clear(&mut self) {
        *self = InputState::new();
    }

    /// Serializable view for front-ends.
    pub fn snapshot(&self) -> KeypadSnapshot {
        KeypadSnapshot {
            display: self.display_text.clone(),
            pending_operation: self.pending_operation,
            previous_operand: self.previous_operand,
            awaiting_fresh_operand: self.awaiting_fresh_operand,
        }
    }

    fn current_value(&self) -> CoreResult<f64> {
        self.current_operand
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidOperand(self.current_operand.clone()))
    }

    fn sync_display(&mut self) {
        self.display_text = self.current_operand.clone();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a keypad front-end renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeypadSnapshot {
    pub display: String,
    pub pending_operation: Option<Operation>,
    pub previous_operand: Option<f64>,
    pub awaiting_fresh_operand: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(keypad: &mut InputState, ledger: &mut Ledger, keys: &[&str]) -> CoreResult<()> {
        for key in keys {
            keypad.press(key.parse().unwrap(), ledger)?;
        }
        Ok(())
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("7".parse::<Key>(), Ok(Key::Digit('7')));
        assert_eq!(".".parse::<Key>(), Ok(Key::DecimalPoint));
        assert_eq!("C".parse::<Key>(), Ok(Key::Clear));
        assert_eq!("⌫".parse::<Key>(), Ok(Key::Backspace));
        assert_eq!("±".parse::<Key>(), Ok(Key::Negate));
        assert_eq!("=".parse::<Key>(), Ok(Key::Equals));
        assert_eq!("×".parse::<Key>(), Ok(Key::Operator(Operation::Multiply)));
        assert_eq!("-".parse::<Key>(), Ok(Key::Operator(Operation::Subtract)));
        assert_eq!("divide".parse::<Key>(), Ok(Key::Operator(Operation::Divide)));
        assert!("42".parse::<Key>().is_err());
        assert!("%".parse::<Key>().is_err());
    }

    #[test]
    fn test_digits_replace_leading_zero() {
        let mut keypad = InputState::new();
        keypad.digit('0');
        assert_eq!(keypad.display_text(), "0");
        keypad.digit('5');
        keypad.digit('2');
        assert_eq!(keypad.display_text(), "52");
    }

    #[test]
    fn test_decimal_point_once() {
        let mut keypad = InputState::new();
        keypad.digit('3');
        keypad.decimal_point();
        keypad.digit('1');
        keypad.decimal_point();
        keypad.digit('4');
        assert_eq!(keypad.display_text(), "3.14");
    }

    #[test]
    fn test_decimal_point_starts_fresh_operand() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["8", "+", "."]).unwrap();
        assert_eq!(keypad.display_text(), "0.");

        press_all(&mut keypad, &mut ledger, &["5", "="]).unwrap();
        assert_eq!(keypad.display_text(), "8.5");
    }

    #[test]
    fn test_backspace() {
        let mut keypad = InputState::new();
        keypad.digit('1');
        keypad.digit('2');
        keypad.backspace();
        assert_eq!(keypad.display_text(), "1");
        keypad.backspace();
        assert_eq!(keypad.display_text(), "0");
        keypad.backspace();
        assert_eq!(keypad.display_text(), "0");
    }

    #[test]
    fn test_backspace_on_negative_single_digit_floors_at_zero() {
        let mut keypad = InputState::new();
        keypad.digit('5');
        keypad.negate();
        assert_eq!(keypad.display_text(), "-5");
        keypad.backspace();
        assert_eq!(keypad.display_text(), "0");
    }

    #[test]
    fn test_backspace_ignored_while_awaiting_operand() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["4", "2", "+", "⌫"]).unwrap();
        assert_eq!(keypad.current_operand(), "42");
        assert!(keypad.is_awaiting_fresh_operand());
    }

    #[test]
    fn test_negate() {
        let mut keypad = InputState::new();
        keypad.negate();
        assert_eq!(keypad.display_text(), "0");

        keypad.digit('7');
        keypad.negate();
        assert_eq!(keypad.display_text(), "-7");
        keypad.negate();
        assert_eq!(keypad.display_text(), "7");
    }

    #[test]
    fn test_negate_ignored_while_awaiting_operand() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["5", "+", "±"]).unwrap();
        assert_eq!(keypad.current_operand(), "5");
        assert_eq!(keypad.display_text(), "5");
        assert!(keypad.is_awaiting_fresh_operand());
    }

    #[test]
    fn test_simple_equals() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["1", "2", "÷", "5", "="]).unwrap();

        assert_eq!(keypad.display_text(), "2.4");
        assert_eq!(keypad.pending_operation(), None);
        assert_eq!(keypad.previous_operand(), None);
        assert!(!keypad.is_awaiting_fresh_operand());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_equals_without_pending_is_noop() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        keypad.digit('9');

        assert_eq!(keypad.equals(&mut ledger), Ok(None));
        assert_eq!(keypad.display_text(), "9");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_chained_operators_evaluate_pending_first() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();

        press_all(&mut keypad, &mut ledger, &["3", "+", "4", "×"]).unwrap();
        assert_eq!(keypad.display_text(), "7");
        assert_eq!(keypad.pending_operation(), Some(Operation::Multiply));
        assert_eq!(keypad.previous_operand(), Some(7.0));

        press_all(&mut keypad, &mut ledger, &["2", "="]).unwrap();
        assert_eq!(keypad.display_text(), "14");

        let records = ledger.list(None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operation, Operation::Add);
        assert_eq!(records[0].result, Number::Integer(7));
        assert_eq!(records[1].operation, Operation::Multiply);
        assert_eq!(records[1].result, Number::Integer(14));
    }

    #[test]
    fn test_second_operator_chains_against_repeated_operand() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();

        press_all(&mut keypad, &mut ledger, &["6", "+", "-"]).unwrap();
        assert_eq!(keypad.display_text(), "12");
        assert_eq!(keypad.pending_operation(), Some(Operation::Subtract));

        press_all(&mut keypad, &mut ledger, &["2", "="]).unwrap();
        assert_eq!(keypad.display_text(), "10");

        let expressions: Vec<String> = ledger.list(None).into_iter().map(|r| r.expression).collect();
        assert_eq!(expressions, vec!["6.0 + 6.0 = 12", "12.0 - 2.0 = 10"]);
    }

    #[test]
    fn test_digit_after_equals_extends_result() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["2", "+", "3", "=", "1"]).unwrap();
        assert_eq!(keypad.display_text(), "51");
    }

    #[test]
    fn test_division_by_zero_resets_state() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();

        let err = press_all(&mut keypad, &mut ledger, &["5", "/", "0", "="]).unwrap_err();
        assert_eq!(err, CoreError::DivisionByZero);
        assert_eq!(keypad, InputState::new());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_division_by_zero_during_chaining_resets_state() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();

        let err = press_all(&mut keypad, &mut ledger, &["5", "/", "0", "+"]).unwrap_err();
        assert_eq!(err, CoreError::DivisionByZero);
        assert_eq!(keypad.display_text(), "0");
        assert_eq!(keypad.pending_operation(), None);
    }

    #[test]
    fn test_overflow_resets_state() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();

        let err = press_all(&mut keypad, &mut ledger, &["9", "^", "9", "9", "9", "="]).unwrap_err();
        assert!(matches!(err, CoreError::NonFiniteResult(_)));
        assert_eq!(keypad, InputState::new());
    }

    #[test]
    fn test_clear() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["9", "*", "3", "C"]).unwrap();
        assert_eq!(keypad, InputState::new());
        assert_eq!(keypad.snapshot().display, "0");
    }

    #[test]
    fn test_snapshot() {
        let mut keypad = InputState::new();
        let mut ledger = Ledger::new();
        press_all(&mut keypad, &mut ledger, &["2", "^"]).unwrap();

        let snapshot = keypad.snapshot();
        assert_eq!(snapshot.display, "2");
        assert_eq!(snapshot.pending_operation, Some(Operation::Power));
        assert_eq!(snapshot.previous_operand, Some(2.0));
        assert!(snapshot.awaiting_fresh_operand);
    }
}
