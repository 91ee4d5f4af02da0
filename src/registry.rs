//! Process-wide registry of filter names currently in use.
//!
//! This is the only piece of process-global mutable state in the crate.
//! It exists so that two `Filter`s can never address the same storage
//! key: name uniqueness is what keeps `kit:bloom:<name>` keys from
//! colliding across unrelated filters sharing a backend.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

fn registry() -> &'static Mutex<HashSet<String>> {
    static REGISTRY: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Attempts to reserve `name`. Returns `true` if the name was free and is
/// now reserved, `false` if it was already in use.
///
/// Insertion and the uniqueness check happen under one lock acquisition so
/// concurrent creations of the same name admit at most one success (S5).
pub(crate) fn try_reserve(name: &str) -> bool {
    let mut names = registry().lock().expect("registry mutex poisoned");
    names.insert(name.to_string())
}

/// Releases `name`, making it available for reuse. Idempotent: releasing an
/// already-released (or never-reserved) name is a no-op.
pub(crate) fn release(name: &str) {
    let mut names = registry().lock().expect("registry mutex poisoned");
    names.remove(name);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Registry is process-global, so tests that exercise it share state.
    // Each test uses a name unlikely to collide with any other test in the
    // suite rather than trying to reset global state between tests.

    #[test]
    fn second_reservation_of_same_name_fails() {
        assert!(try_reserve("registry_test_dup"));
        assert!(!try_reserve("registry_test_dup"));
        release("registry_test_dup");
    }

    #[test]
    fn release_is_idempotent() {
        assert!(try_reserve("registry_test_idempotent"));
        release("registry_test_idempotent");
        release("registry_test_idempotent");
        // name is available again after release
        assert!(try_reserve("registry_test_idempotent"));
        release("registry_test_idempotent");
    }

    #[test]
    fn release_then_reserve_succeeds() {
        assert!(try_reserve("registry_test_reuse"));
        release("registry_test_reuse");
        assert!(try_reserve("registry_test_reuse"));
        release("registry_test_reuse");
    }

    #[test]
    fn concurrent_reservations_admit_at_most_one_winner() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use std::thread;

        let successes = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let successes = Arc::clone(&successes);
            handles.push(thread::spawn(move || {
                if try_reserve("registry_test_concurrent") {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        release("registry_test_concurrent");
    }
}
