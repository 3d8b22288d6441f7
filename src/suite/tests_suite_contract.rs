//! Property-based contracts for the generation engine's run-long state.

use proptest::prelude::*;

use super::names::NameRegistry;
use super::seeds::{SeedStream, SEED_BOUND};

proptest! {
    /// Reserving any sequence of base names never yields a duplicate
    /// identifier, including repeats of the same base.
    #[test]
    fn reserve_never_reuses_identifiers(bases in prop::collection::vec("[a-z][a-z0-9_.]{0,12}", 1..64)) {
        let mut registry = NameRegistry::new();
        let mut seen = std::collections::BTreeSet::new();
        for base in &bases {
            let name = registry.reserve(base);
            prop_assert!(seen.insert(name.clone()), "identifier `{name}` reused");
        }
    }

    /// Reserved identifiers carry the fixed marker and no punctuation.
    #[test]
    fn reserved_names_are_clean(base in "[a-z][a-z.]{0,12}") {
        let mut registry = NameRegistry::new();
        let name = registry.reserve(&base);
        prop_assert!(name.starts_with("test_"));
        prop_assert!(!name.contains('.'));
    }

    /// Seeds are always below the bound, for any master seed.
    #[test]
    fn seeds_stay_bounded(master in any::<u64>(), draws in 1usize..200) {
        let mut stream = SeedStream::new(master);
        for _ in 0..draws {
            prop_assert!(stream.next_seed() < SEED_BOUND);
        }
    }

    /// The seed sequence is a pure function of the master seed.
    #[test]
    fn seed_sequence_is_reproducible(master in any::<u64>()) {
        let mut a = SeedStream::new(master);
        let mut b = SeedStream::new(master);
        for _ in 0..32 {
            prop_assert_eq!(a.next_seed(), b.next_seed());
        }
    }
}
