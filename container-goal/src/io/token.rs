//! Fresh unique tokens for container names.

use uuid::Uuid;

/// Source of tokens that are unique across invocations and processes.
pub trait TokenSource: Send + Sync {
    fn fresh_token(&self) -> String;
}

/// Random (v4) UUID tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn fresh_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
