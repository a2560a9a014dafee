//! # Chat Front-end Logic
//!
//! Message handling for chat bots: slash commands and free-text
//! expressions in, reply text out. The bot transport itself lives
//! outside this crate.
//!
//! ## Message Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "/start"                 ──► welcome text                              │
//! │  "/help"                  ──► operations and synonyms                   │
//! │  "/calculate 10 + 5"      ──► evaluate, record, remember                │
//! │  "/history"               ──► user's last expression                    │
//! │  "10 × 5"  (3 tokens)     ──► evaluate, record, remember                │
//! │  anything else            ──► "could not understand" hint               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain errors never escape: division by zero and friends become a reply.

use std::collections::HashMap;

use crate::engine;
use crate::error::CoreResult;
use crate::ledger::{CalculationRecord, Ledger};
use crate::number::{format_operand, Number};
use crate::operation::Operation;

const WELCOME_TEXT: &str = "\
🧮 *Welcome to the Calculator bot!*

I can evaluate arithmetic expressions for you.

*Commands:*
/start - Show this message
/help - Usage help
/calculate - Evaluate an expression
/history - Show your last result

*Examples:*
• Send: `10 + 5`
• Send: `15 / 3`
• Send: `2 ^ 8`
• Or use: /calculate 10 + 5";

const HELP_TEXT: &str = "\
📖 *Calculator help*

*Operations:*
➕ Addition: `+` or `add`
➖ Subtraction: `-` or `subtract`
✖️ Multiplication: `*`, `×` or `multiply`
➗ Division: `/`, `÷` or `divide`
🔢 Power: `^`, `**` or `power`

*Usage:*
1. Send `number operation number`, e.g. `10 + 5`
2. `/calculate 2 ^ 8`
3. Decimals work: `3.5 + 2.7`
4. So do negatives: `-5 + 3`";

const CALCULATE_USAGE: &str = "Usage: /calculate <number> <operation> <number>\nExample: /calculate 10 + 5";

const NOT_UNDERSTOOD_TEXT: &str = "\
❓ I did not understand that.

Send an expression as `number operation number`
Example: `10 + 5`

Or use /help to see everything I can do.";

const NO_HISTORY_TEXT: &str = "ℹ️ You have no calculation history yet.";

/// Per-user memory of the last successful calculation.
#[derive(Debug, Clone, Default)]
pub struct ChatMemory {
    last_by_user: HashMap<String, CalculationRecord>,
}

impl ChatMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last calculation made by `user_id`, if any.
    pub fn last_for(&self, user_id: &str) -> Option<&CalculationRecord> {
        self.last_by_user.get(user_id)
    }

    /// Handles one incoming message and returns the reply text.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{ChatMemory, Ledger};
    ///
    /// let mut memory = ChatMemory::new();
    /// let mut ledger = Ledger::new();
    ///
    /// let reply = memory.handle_message("42", "7 × 6", &mut ledger);
    /// assert!(reply.contains("7.0 × 6.0 = 42"));
    /// assert_eq!(ledger.len(), 1);
    /// ```
    pub fn handle_message(&mut self, user_id: &str, text: &str, ledger: &mut Ledger) -> String {
        let text = text.trim();

        if let Some(command_line) = text.strip_prefix('/') {
            let mut parts = command_line.split_whitespace();
            let command = parts
                .next()
                .map(|c| c.split('@').next().unwrap_or(c))
                .unwrap_or_default()
                .to_ascii_lowercase();
            let args: Vec<&str> = parts.collect();

            return match command.as_str() {
                "start" => WELCOME_TEXT.to_string(),
                "help" => HELP_TEXT.to_string(),
                "calculate" => self.calculate_command(user_id, &args, ledger),
                "history" => self.history_reply(user_id),
                _ => NOT_UNDERSTOOD_TEXT.to_string(),
            };
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != 3 {
            return NOT_UNDERSTOOD_TEXT.to_string();
        }

        match parse_expression(&tokens) {
            Some(Ok((a, op, b))) => self.evaluate_reply(user_id, op, a, b, ledger),
            Some(Err(unknown)) => format!("❌ Unknown operation: {}", unknown),
            None => NOT_UNDERSTOOD_TEXT.to_string(),
        }
    }

    fn calculate_command(&mut self, user_id: &str, args: &[&str], ledger: &mut Ledger) -> String {
        if args.len() < 3 {
            return format!("❌ {}", CALCULATE_USAGE);
        }

        match parse_expression(&args[..3]) {
            Some(Ok((a, op, b))) => self.evaluate_reply(user_id, op, a, b, ledger),
            Some(Err(unknown)) => format!("❌ Unknown operation: {}", unknown),
            None => format!("❌ Error: operands must be numbers\n{}", CALCULATE_USAGE),
        }
    }

    fn history_reply(&self, user_id: &str) -> String {
        match self.last_for(user_id) {
            Some(record) => format!("📊 *Last result:*\n`{}`", display_expression(record)),
            None => NO_HISTORY_TEXT.to_string(),
        }
    }

    fn evaluate_reply(&mut self, user_id: &str, op: Operation, a: f64, b: f64, ledger: &mut Ledger) -> String {
        match evaluate(op, a, b) {
            Ok(result) => {
                let record = ledger.append(op, a, b, result);
                let reply = format!("✅ *Result:*\n`{}`", display_expression(&record));
                self.last_by_user.insert(user_id.to_string(), record);
                reply
            }
            Err(e) => format!("❌ {}", e),
        }
    }
}

fn evaluate(op: Operation, a: f64, b: f64) -> CoreResult<Number> {
    let raw = engine::evaluate(op, a, b)?;
    Number::from_f64(raw)
}

/// Parses `a op b`.
///
/// `None` when an operand is not a finite number, `Some(Err(token))` when
/// the operator is unknown.
fn parse_expression(tokens: &[&str]) -> Option<Result<(f64, Operation, f64), String>> {
    let a = parse_operand(tokens[0])?;
    let b = parse_operand(tokens[2])?;

    Some(match Operation::from_token(tokens[1]) {
        Some(op) => Ok((a, op, b)),
        None => Err(tokens[1].to_string()),
    })
}

fn parse_operand(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"7.0 × 6.0 = 42"`: like the ledger expression, with chat symbols.
pub fn display_expression(record: &CalculationRecord) -> String {
    format!(
        "{} {} {} = {}",
        format_operand(record.a),
        record.operation.display_symbol(),
        format_operand(record.b),
        record.result
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(memory: &mut ChatMemory, ledger: &mut Ledger, text: &str) -> String {
        memory.handle_message("user-1", text, ledger)
    }

    #[test]
    fn test_start_and_help() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        assert!(chat(&mut memory, &mut ledger, "/start").contains("Welcome"));
        let help = chat(&mut memory, &mut ledger, "/help");
        assert!(help.contains("`**`"));
        assert!(help.contains("`÷`"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_free_text_expression() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        let reply = chat(&mut memory, &mut ledger, "100 ÷ 4");
        assert_eq!(reply, "✅ *Result:*\n`100.0 ÷ 4.0 = 25`");

        let record = &ledger.list(None)[0];
        assert_eq!(record.expression, "100.0 / 4.0 = 25");
    }

    #[test]
    fn test_power_synonym() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        let reply = chat(&mut memory, &mut ledger, "2 ** 10");
        assert!(reply.contains("2.0 ^ 10.0 = 1024"));
    }

    #[test]
    fn test_calculate_command() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        let reply = chat(&mut memory, &mut ledger, "/calculate 3.5 + 2.5");
        assert!(reply.contains("3.5 + 2.5 = 6"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_calculate_command_usage() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        assert!(chat(&mut memory, &mut ledger, "/calculate").contains("Usage"));
        assert!(chat(&mut memory, &mut ledger, "/calculate 1 +").contains("Usage"));
        assert!(chat(&mut memory, &mut ledger, "/calculate one + 2").contains("Usage"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_division_by_zero_is_a_reply() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        let reply = chat(&mut memory, &mut ledger, "5 / 0");
        assert_eq!(reply, "❌ Division by zero is impossible!");
        assert!(ledger.is_empty());
        assert!(memory.last_for("user-1").is_none());
    }

    #[test]
    fn test_unknown_operator() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        let reply = chat(&mut memory, &mut ledger, "5 % 2");
        assert_eq!(reply, "❌ Unknown operation: %");
    }

    #[test]
    fn test_not_understood() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        assert!(chat(&mut memory, &mut ledger, "hello").contains("did not understand"));
        assert!(chat(&mut memory, &mut ledger, "15/3").contains("did not understand"));
        assert!(chat(&mut memory, &mut ledger, "a + b").contains("did not understand"));
    }

    #[test]
    fn test_history_is_per_user() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        assert_eq!(chat(&mut memory, &mut ledger, "/history"), NO_HISTORY_TEXT);

        chat(&mut memory, &mut ledger, "7 x 6");
        chat(&mut memory, &mut ledger, "1 - 3");
        memory.handle_message("user-2", "2 + 2", &mut ledger);

        let reply = chat(&mut memory, &mut ledger, "/history");
        assert_eq!(reply, "📊 *Last result:*\n`1.0 - 3.0 = -2`");
        assert_eq!(memory.last_for("user-2").map(|r| r.id), Some(3));
    }

    #[test]
    fn test_command_with_bot_suffix() {
        let mut memory = ChatMemory::new();
        let mut ledger = Ledger::new();

        assert!(chat(&mut memory, &mut ledger, "/help@tally_bot").contains("Calculator help"));
    }
}
