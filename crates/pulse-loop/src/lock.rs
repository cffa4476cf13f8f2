//! The no-op lock for single-threaded hosts.

use parking_lot::lock_api::{GuardNoSend, RawMutex};

/// A lock that never blocks and never excludes.
///
/// Substituted for the loop's mutex on hosts where every interaction with
/// the loop happens on one thread (or where the host provides exclusion by
/// other means, e.g. masking interrupts). A loop built over `NullLock` must
/// not be shared across threads.
///
/// ```
/// use pulse_loop::{EventLoop, NullLock};
///
/// let event_loop = EventLoop::<NullLock>::with_lock();
/// event_loop.schedule_immediate(|_| Ok(()));
/// event_loop.process(0).unwrap();
/// ```
pub struct NullLock;

// RawMutex is an unsafe trait: implementors vouch for exclusion. NullLock
// provides none, which is sound only under the single-threaded use it is
// documented for; its guard marker is accordingly not Send.
#[allow(unsafe_code)]
unsafe impl RawMutex for NullLock {
    const INIT: Self = NullLock;

    type GuardMarker = GuardNoSend;

    #[inline]
    fn lock(&self) {}

    #[inline]
    fn try_lock(&self) -> bool {
        true
    }

    #[inline]
    unsafe fn unlock(&self) {}
}
