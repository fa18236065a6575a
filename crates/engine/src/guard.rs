use std::sync::atomic::{AtomicBool, Ordering};

use crate::SwapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Idle,
    Active,
}

/// Single-flag mutual exclusion around the orchestration entry point
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    active: AtomicBool,
}

/// Held for the duration of a guarded call; releases the guard when dropped,
/// including on early return and unwind.
#[must_use = "the guard is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> Result<GuardToken<'_>, SwapError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SwapError::ReentrantCall)?;
        Ok(GuardToken { guard: self })
    }

    pub fn status(&self) -> GuardStatus {
        if self.active.load(Ordering::Acquire) {
            GuardStatus::Active
        } else {
            GuardStatus::Idle
        }
    }
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_entry_rejected() {
        let guard = ReentrancyGuard::new();
        let token = guard.enter().unwrap();

        assert_eq!(guard.status(), GuardStatus::Active);
        assert_eq!(guard.enter().unwrap_err(), SwapError::ReentrantCall);

        drop(token);
        assert_eq!(guard.status(), GuardStatus::Idle);
    }

    #[test]
    fn test_released_on_error_path() {
        let guard = ReentrancyGuard::new();

        let failing = || -> Result<(), SwapError> {
            let _token = guard.enter()?;
            Err(SwapError::ZeroOwner)
        };

        assert_eq!(failing(), Err(SwapError::ZeroOwner));
        assert_eq!(guard.status(), GuardStatus::Idle);
        assert!(guard.enter().is_ok());
    }

    #[test]
    fn test_released_on_panic() {
        let guard = ReentrancyGuard::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _token = guard.enter().unwrap();
            panic!("collaborator blew up");
        }));

        assert!(result.is_err());
        assert_eq!(guard.status(), GuardStatus::Idle);
    }
}
