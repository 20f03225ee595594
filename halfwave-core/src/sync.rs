//! Set-once instance slots for interrupt dispatch
//!
//! A hardware interrupt vector carries no context, so the handler has to
//! find the driver through a static. Each slot holds at most one instance
//! for the lifetime of the program: one active driver per peripheral.
//!
//! ```ignore
//! static PWM_WRAP: InstanceSlot<&'static mut dyn WrapHandler> = InstanceSlot::new();
//!
//! PWM_WRAP.install(streamer)?;
//!
//! // In the interrupt handler:
//! PWM_WRAP.with(|s| s.on_wrap());
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Errors from instance slot operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotError {
    /// The slot already holds an instance
    AlreadyInstalled,
}

/// Static slot holding the single active instance behind an interrupt vector
pub struct InstanceSlot<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T> Default for InstanceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InstanceSlot<T> {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the instance
    ///
    /// Fails if an instance is already installed; the slot is never replaced.
    pub fn install(&self, value: T) -> Result<(), SlotError> {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_some() {
                return Err(SlotError::AlreadyInstalled);
            }
            *slot = Some(value);
            Ok(())
        })
    }

    /// Check if an instance is installed
    pub fn is_installed(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// Run `f` on the installed instance inside a critical section
    ///
    /// Returns `None` if nothing is installed or the instance is already
    /// borrowed further up the stack.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.lock(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot() {
        let slot: InstanceSlot<u32> = InstanceSlot::new();
        assert!(!slot.is_installed());
        assert_eq!(slot.with(|v| *v), None);
    }

    #[test]
    fn test_install_once() {
        let slot = InstanceSlot::new();
        assert_eq!(slot.install(5u32), Ok(()));
        assert!(slot.is_installed());
        assert_eq!(slot.install(6u32), Err(SlotError::AlreadyInstalled));

        // First instance stays
        assert_eq!(slot.with(|v| *v), Some(5));
    }

    #[test]
    fn test_with_mutates() {
        let slot = InstanceSlot::new();
        slot.install(1u32).unwrap();
        slot.with(|v| *v += 41);
        assert_eq!(slot.with(|v| *v), Some(42));
    }

    #[test]
    fn test_reentrant_access_is_refused() {
        let slot = InstanceSlot::new();
        slot.install(0u32).unwrap();
        let nested = slot.with(|_| slot.with(|v| *v));
        assert_eq!(nested, Some(None));
    }

    #[test]
    fn test_static_slot() {
        static SLOT: InstanceSlot<u8> = InstanceSlot::new();
        SLOT.install(7).unwrap();
        assert_eq!(SLOT.with(|v| *v), Some(7));
    }
}
