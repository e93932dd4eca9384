//! Task id generation
//!
//! Ids only need to be unique within one board. A short hash of a random
//! UUID and the current time keeps them readable in the CLI.
//! Format: prefix-xxxxxx (6 lowercase base32 chars)

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Default prefix for generated task ids
pub const DEFAULT_PREFIX: &str = "task";

/// Generate a task id
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    let encoded = base32::encode(base32::Alphabet::Crockford, &hash[..4])
        .to_lowercase()
        .chars()
        .take(6)
        .collect::<String>();

    format!("{}-{}", prefix, encoded)
}

/// Generate an id that does not collide with any id for which `taken` is true
pub fn generate_unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_id(prefix);
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_generate_id() {
        let id = generate_id("task");
        assert!(id.starts_with("task-"));
        assert_eq!(id.len(), 11); // task- + 6 chars
    }

    #[test]
    fn test_generate_unique_id_skips_taken() {
        let calls = Cell::new(0);
        let id = generate_unique_id("t", |_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert!(id.starts_with("t-"));
        assert_eq!(calls.get(), 3);
    }
}
