//! Request DTOs for the message API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde_json::Value;

/// Minimum length of a message body, in characters
pub const MIN_MESSAGE_LENGTH: usize = 10;

/// Request body for POST /messages
///
/// # Fields
/// - `name`: Sender name, required
/// - `email`: Sender address, required and shaped like `user@host.tld`
/// - `message`: Message text, at least ten characters
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl NewMessage {
    /// Validates a parsed JSON body and extracts the message.
    ///
    /// Every field is checked; the error lists one `Invalid <field>` entry per
    /// failing field, in field order.
    pub fn from_json(body: &Value) -> Result<Self, Vec<String>> {
        let name = field(body, "name");
        let email = field(body, "email");
        let message = field(body, "message");

        let mut errors = Vec::new();
        if !required(name) {
            errors.push("Invalid name".to_string());
        }
        if !(required(email) && email.is_some_and(is_email)) {
            errors.push("Invalid email".to_string());
        }
        if !(required(message) && message.is_some_and(|m| m.chars().count() >= MIN_MESSAGE_LENGTH))
        {
            errors.push("Invalid message".to_string());
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(Self {
                name: name.to_string(),
                email: email.to_string(),
                message: message.to_string(),
            }),
            _ => Err(errors),
        }
    }

    /// Positional parameters for the insert statement.
    pub fn params(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.email.as_str()),
            Value::from(self.message.as_str()),
        ]
    }
}

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

fn required(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot with at least one character on each side
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
