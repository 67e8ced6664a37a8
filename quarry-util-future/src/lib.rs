//!
//! Minimal concurrency utilities for the `quarry` crates. Usable in `no_std` environments, but
//! requires `alloc`.
//!
//! The central type is [`gate::Gate`], a reference-counted cancellation gate: callbacks wrapped
//! by a gate stop running once [`gate::Gate::stop`] is called, and `stop` itself waits for every
//! in-flight callback to finish. [`runner::block_on`] drives a single future to completion from
//! synchronous code (tests, mostly) without pulling in an executor.
//!
//! # Features
//!
//! All usable features are listed below, ordered alphabetically. Entries tagged with `(default)`
//! are enabled by default.
//!
//! * `loom`: Enables [loom](https://docs.rs/loom/latest/loom/) concurrency testing types, useful
//!   for ensuring correctness of code that relies on
//!   [atomic memory orderings](https://en.cppreference.com/w/cpp/atomic/memory_order). These will
//!   be used in place of core implementations of e.g. atomics whenever possible. **Not useful**
//!   for consumers of this library outside of tests that also use Loom.
//!
//! * `std` (default): Required by [`runner::block_on`], which parks the calling thread.

#![no_std]

pub(crate) extern crate alloc;
#[cfg(feature = "std")]
pub(crate) extern crate std;

///
/// Reference-counted gate that stops dispatch of queued work after `stop()`.
pub mod gate;

#[cfg(feature = "std")]
///
/// Utility for running a single future to completion.
pub mod runner;

///
/// Enables switching between `loom` and `core`/`std` types based on whether the `loom` feature
/// is enabled.
pub(crate) mod switch {
    #[cfg(not(feature = "loom"))]
    pub(crate) use core::hint::spin_loop;

    #[cfg(not(feature = "loom"))]
    pub(crate) use core::sync::atomic::AtomicU64;

    #[cfg(not(feature = "loom"))]
    pub(crate) use core::sync::atomic::Ordering;

    #[cfg(feature = "loom")]
    pub(crate) use loom::hint::spin_loop;

    #[cfg(feature = "loom")]
    pub(crate) use loom::sync::atomic::AtomicU64;

    #[cfg(feature = "loom")]
    pub(crate) use loom::sync::atomic::Ordering;
}

#[cfg(feature = "std")]
///
/// Simple [`alloc::task::Wake`] implementation that just unparks a single thread. Used
/// internally by [`runner::block_on`].
///
/// Deliberately not switched to `loom` types: `block_on` is a plain test-driving utility, not
/// something whose orderings we model-check, and keeping it on real threads means enabling the
/// `loom` feature doesn't break consumers that drive futures with it.
pub(crate) struct ParkingWake {
    woken: core::sync::atomic::AtomicBool,
    parked_thread: std::thread::Thread,
}

#[cfg(feature = "std")]
impl alloc::task::Wake for ParkingWake {
    fn wake(self: alloc::sync::Arc<Self>) {
        // relaxed is fine, unpark() has Release memory effects
        self.woken.store(true, core::sync::atomic::Ordering::Relaxed);
        self.parked_thread.unpark();
    }
}
