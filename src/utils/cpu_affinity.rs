//! Thread pinning for stable measurements.
//!
//! Linux uses `sched_setaffinity` through libc and restores the saved mask on
//! unpin. Other platforms report pinning as unavailable and the harness
//! measures unpinned.

#[cfg(target_os = "linux")]
mod platform {
    use std::cell::RefCell;

    thread_local! {
        static SAVED_MASK: RefCell<Option<libc::cpu_set_t>> = const { RefCell::new(None) };
    }

    pub fn online_cores() -> Option<usize> {
        // SAFETY: sysconf has no memory-safety preconditions.
        let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        (n > 0).then_some(n as usize)
    }

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: sched_getcpu has no preconditions.
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu as usize)
    }

    pub fn allowed_cores() -> Option<usize> {
        // SAFETY: the mask is plain-old-data owned by this frame and the size
        // passed matches the type.
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set) != 0 {
                return None;
            }
            Some(libc::CPU_COUNT(&set) as usize)
        }
    }

    pub fn pin(core: usize) -> bool {
        // SAFETY: both masks are plain-old-data owned by this frame, and the
        // size passed matches the type.
        unsafe {
            let mut saved: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut saved) != 0 {
                return false;
            }

            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core, &mut set);
            if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
                return false;
            }

            SAVED_MASK.with(|cell| *cell.borrow_mut() = Some(saved));
            true
        }
    }

    pub fn unpin() -> bool {
        SAVED_MASK.with(|cell| match cell.borrow_mut().take() {
            // SAFETY: `set` came from sched_getaffinity on this thread.
            Some(set) => unsafe {
                libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
            },
            None => false,
        })
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub fn online_cores() -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }

    pub fn current_cpu() -> Option<usize> {
        None
    }

    pub fn allowed_cores() -> Option<usize> {
        None
    }

    pub fn pin(_core: usize) -> bool {
        false
    }

    pub fn unpin() -> bool {
        false
    }
}

/// Number of online cores, if the platform reports it.
pub fn online_cores() -> Option<usize> {
    platform::online_cores()
}

/// Number of cores the calling thread may run on.
pub fn allowed_cores() -> Option<usize> {
    platform::allowed_cores()
}

/// Pin the calling thread to the core it is running on, falling back to
/// core 0. Returns the pinned core.
pub fn pin_to_current_core() -> Option<usize> {
    let core = platform::current_cpu().unwrap_or(0);
    platform::pin(core).then_some(core)
}

/// Restore the affinity saved by the last successful pin on this thread.
pub fn unpin() -> bool {
    platform::unpin()
}

/// Pins on creation, unpins on drop.
///
/// ```ignore
/// {
///     let _pin = CpuPinGuard::new();
///     // ... timed section ...
/// }
/// ```
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
}

impl CpuPinGuard {
    pub fn new() -> Self {
        Self {
            pinned_core: pin_to_current_core(),
        }
    }

    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if self.pinned_core.is_some() {
            unpin();
        }
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_cores() {
        let cores = online_cores().expect("core count");
        assert!(cores >= 1);
    }

    #[test]
    fn test_pin_guard_restores() {
        let guard = CpuPinGuard::new();
        if guard.is_pinned() {
            assert!(guard.core_id().is_some());
        }
        drop(guard);
        // nothing left to restore
        assert!(!unpin());
    }

    #[test]
    fn test_pin_narrows_allowed_cores() {
        let before = allowed_cores();
        {
            let guard = CpuPinGuard::new();
            if guard.is_pinned() {
                assert_eq!(allowed_cores(), Some(1));
            }
        }
        assert_eq!(allowed_cores(), before);
    }
}
