//! Card-key authentication and usage accounting, kept behind a narrow
//! trait so the server is runnable standalone without a real account
//! database — quota accounting itself is an external collaborator this
//! crate does not own.

use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub usage_count: u32,
    pub usage_limit: u32,
}

impl Usage {
    /// -1 (represented here as `i64`) means unlimited, matching the HTTP
    /// response shape's `remaining = -1` convention.
    pub fn remaining(&self) -> i64 {
        if self.usage_limit == 0 {
            -1
        } else {
            (self.usage_limit as i64 - self.usage_count as i64).max(0)
        }
    }

    pub fn has_quota(&self) -> bool {
        self.usage_limit == 0 || self.usage_count < self.usage_limit
    }
}

pub trait QuotaGate: Send + Sync {
    /// Resolve an opaque card key to a user id, or `None` if the key is
    /// invalid. The in-memory default accepts any non-empty key.
    fn authenticate(&self, card_key: &str) -> Option<String>;

    fn usage(&self, user_id: &str) -> Usage;

    fn increment(&self, user_id: &str);
}

/// Accepts any non-empty card key as its own user id and tracks usage in
/// a concurrent map. Good enough to run the server standalone; a real
/// deployment swaps in a `QuotaGate` backed by its account database.
pub struct InMemoryQuotaGate {
    usage_limit: u32,
    counts: DashMap<String, u32>,
}

impl InMemoryQuotaGate {
    pub fn new(usage_limit: u32) -> Self {
        Self { usage_limit, counts: DashMap::new() }
    }
}

impl Default for InMemoryQuotaGate {
    fn default() -> Self {
        Self::new(0)
    }
}

impl QuotaGate for InMemoryQuotaGate {
    fn authenticate(&self, card_key: &str) -> Option<String> {
        if card_key.trim().is_empty() {
            None
        } else {
            Some(card_key.to_string())
        }
    }

    fn usage(&self, user_id: &str) -> Usage {
        let usage_count = self.counts.get(user_id).map(|count| *count).unwrap_or(0);
        Usage { usage_count, usage_limit: self.usage_limit }
    }

    fn increment(&self, user_id: &str) {
        *self.counts.entry(user_id.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_card_key_fails_authentication() {
        let gate = InMemoryQuotaGate::default();
        assert!(gate.authenticate("").is_none());
    }

    #[test]
    fn unlimited_quota_always_has_room() {
        let gate = InMemoryQuotaGate::default();
        let user = gate.authenticate("abc123").unwrap();
        for _ in 0..10 {
            gate.increment(&user);
        }
        let usage = gate.usage(&user);
        assert!(usage.has_quota());
        assert_eq!(usage.remaining(), -1);
    }

    #[test]
    fn limited_quota_runs_out() {
        let gate = InMemoryQuotaGate::new(2);
        let user = gate.authenticate("abc123").unwrap();
        assert!(gate.usage(&user).has_quota());
        gate.increment(&user);
        gate.increment(&user);
        assert!(!gate.usage(&user).has_quota());
        assert_eq!(gate.usage(&user).remaining(), 0);
    }
}
