//! Collision-safe test case naming.

use std::collections::BTreeMap;

/// Registry of reserved case identifiers.
///
/// Base names are stripped of structural punctuation and prefixed with the
/// fixed `test_` marker; a repeated base name gets the stored counter
/// appended, so no two reservations ever return the same identifier. The
/// registry is never cleared mid-run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: BTreeMap<String, u32>,
}

impl NameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique identifier derived from `base`.
    pub fn reserve(&mut self, base: &str) -> String {
        let cleaned: String = base.chars().filter(|&c| c != '.').collect();
        let mut name = format!("test_{cleaned}");
        if let Some(count) = self.used.get(&name).copied() {
            // Probe upward from the stored counter; a suffixed candidate can
            // itself have been taken by an unrelated base.
            let mut next = count + 1;
            let mut candidate = format!("{name}{next}");
            while self.used.contains_key(&candidate) {
                next += 1;
                candidate = format!("{name}{next}");
            }
            self.used.insert(name, next);
            name = candidate;
        }
        self.used.insert(name.clone(), 0);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_is_unmodified() {
        let mut reg = NameRegistry::new();
        assert_eq!(reg.reserve("add_op"), "test_add_op");
    }

    #[test]
    fn test_repeats_get_counters() {
        let mut reg = NameRegistry::new();
        assert_eq!(reg.reserve("sum"), "test_sum");
        assert_eq!(reg.reserve("sum"), "test_sum1");
        assert_eq!(reg.reserve("sum"), "test_sum2");
    }

    #[test]
    fn test_punctuation_is_stripped() {
        let mut reg = NameRegistry::new();
        assert_eq!(reg.reserve("fft.inverse"), "test_fftinverse");
    }

    #[test]
    fn test_suffixed_base_cannot_shadow_a_counter() {
        let mut reg = NameRegistry::new();
        assert_eq!(reg.reserve("sum"), "test_sum");
        assert_eq!(reg.reserve("sum"), "test_sum1");
        // A base that cleans to an already-issued suffixed name probes on.
        assert_eq!(reg.reserve("sum1"), "test_sum11");
    }

    #[test]
    fn test_distinct_bases_never_collide() {
        let mut reg = NameRegistry::new();
        let names: Vec<String> = ["abs", "all", "abs", "any", "all", "abs"]
            .iter()
            .map(|b| reg.reserve(b))
            .collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
