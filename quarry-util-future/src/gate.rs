use crate::switch;
use alloc::boxed::Box;
use core::ptr::NonNull;

// The entire gate lives in one 64-bit word:
//
//   bit 63     : stop flag
//   bits 32..63: reference count (u31)
//   bits  0..32: running count
//
// A fresh gate starts with one reference and nothing running.
const RUNNING: u64 = 1;
const REF: u64 = 1 << 32;
const STOP: u64 = 1 << 63;

const RUNNING_MASK: u64 = u32::MAX as u64;
const REF_MASK: u64 = ((u32::MAX >> 1) as u64) << 32;

///
/// A reference-counted cancellation gate.
///
/// Clones of a `Gate` share a single atomic word. Work is performed inside *critical sections*
/// bracketed by [`Gate::enter`] and [`Gate::leave`] (or, more conveniently, inside a callable
/// produced by [`Gate::wrap`]). Once [`Gate::stop`] has been called, no further section can be
/// entered; `stop` itself does not return until every section already in flight has left.
///
/// This makes post-cancellation delivery safe: a completion handler wrapped by the gate either
/// runs to completion before `stop` returns, or does not run at all.
///
/// # Protocol
///
/// [`Gate::stop`] must be called exactly once before the last clone is dropped; it is idempotent
/// with respect to the flag itself, but the "stopped before deallocation" requirement is
/// asserted in debug builds.
pub struct Gate {
    cell: NonNull<switch::AtomicU64>,
}

// SAFETY:
// - the pointee is an atomic, and the manual reference count keeps it alive as long as any
//   clone exists
unsafe impl Send for Gate {}
unsafe impl Sync for Gate {}

impl Gate {
    ///
    /// Creates a new gate with a single reference, not yet stopped.
    #[must_use]
    pub fn new() -> Self {
        let cell = Box::new(switch::AtomicU64::new(REF));

        Self {
            // SAFETY:
            // - Box::into_raw never returns null
            cell: unsafe { NonNull::new_unchecked(Box::into_raw(cell)) },
        }
    }

    #[inline]
    fn cell(&self) -> &switch::AtomicU64 {
        // SAFETY:
        // - our reference keeps the allocation alive; it is only freed by the last drop
        unsafe { self.cell.as_ref() }
    }

    ///
    /// Attempts to enter a critical section. Returns `true` on success, in which case the caller
    /// must pair this with [`Gate::leave`]. Returns `false` if the gate has been stopped, in
    /// which case no section was entered and nothing must be done.
    #[must_use]
    pub fn enter(&self) -> bool {
        let observed = self.cell().fetch_add(RUNNING, switch::Ordering::AcqRel);

        if observed & STOP != 0 {
            // raced with stop(): back out before anyone counts on us running
            self.cell().fetch_sub(RUNNING, switch::Ordering::AcqRel);
            return false;
        }

        true
    }

    ///
    /// Leaves a critical section previously entered with [`Gate::enter`].
    pub fn leave(&self) {
        self.cell().fetch_sub(RUNNING, switch::Ordering::AcqRel);
    }

    ///
    /// Sets the stop flag, then waits until no critical section remains in flight.
    ///
    /// After this method returns, every [`Gate::enter`] fails and every write performed inside
    /// an already-running section is visible to the caller.
    pub fn stop(&self) {
        let mut observed = self.cell().fetch_or(STOP, switch::Ordering::AcqRel);

        while observed & RUNNING_MASK != 0 {
            switch::spin_loop();
            observed = self.cell().load(switch::Ordering::Acquire);
        }
    }

    ///
    /// Whether [`Gate::stop`] has been called on this gate or any clone of it.
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.cell().load(switch::Ordering::Acquire) & STOP != 0
    }

    ///
    /// Wraps a callback so that invoking the wrapper runs `f` inside a critical section, or does
    /// nothing at all once the gate has been stopped.
    ///
    /// The wrapper holds its own clone of the gate and may outlive `self`.
    pub fn wrap<F>(&self, mut f: F) -> impl FnMut()
    where
        F: FnMut(),
    {
        let gate = self.clone();

        move || {
            if gate.enter() {
                f();
                gate.leave();
            }
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Gate {
    fn clone(&self) -> Self {
        self.cell().fetch_add(REF, switch::Ordering::AcqRel);
        Self { cell: self.cell }
    }
}

impl Drop for Gate {
    fn drop(&mut self) {
        let observed = self.cell().fetch_sub(REF, switch::Ordering::AcqRel);

        if observed & REF_MASK == REF {
            debug_assert!(observed & STOP != 0, "gate dropped without stop()");

            // SAFETY:
            // - we held the last reference, so nobody else can touch the allocation
            unsafe {
                drop(Box::from_raw(self.cell.as_ptr()));
            }
        }
    }
}
