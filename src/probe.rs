//! Clock and memory probes used to time benchmark runs
//!
//! The harness never queries the system clock or the allocator directly. It takes a
//! [`Clock`] and a [`MemoryProbe`], so runs can be replayed in tests with scripted values.

use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

/// A monotonic time source
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;
}

/// Reports how many heap bytes are currently in use
pub trait MemoryProbe {
    /// Bytes allocated and not yet freed
    fn bytes_in_use(&self) -> usize;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<M: MemoryProbe + ?Sized> MemoryProbe for &M {
    fn bytes_in_use(&self) -> usize {
        (**self).bytes_in_use()
    }
}

/// [`Clock`] backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    /// Instant the clock was created at
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Global allocator wrapper that counts allocated and freed bytes.
///
/// Install it in a binary with `#[global_allocator]` and pass a reference to the harness
/// as its [`MemoryProbe`].
#[derive(Debug, Default)]
pub struct CountingAllocator {
    /// Total bytes handed out
    allocated: AtomicUsize,
    /// Total bytes returned
    deallocated: AtomicUsize,
}

impl CountingAllocator {
    /// Creates an allocator with zeroed counters
    #[must_use]
    pub const fn new() -> Self {
        Self { allocated: AtomicUsize::new(0), deallocated: AtomicUsize::new(0) }
    }

    /// Total bytes allocated so far
    pub fn total_allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Total bytes freed so far
    pub fn total_deallocated(&self) -> usize {
        self.deallocated.load(Ordering::Relaxed)
    }
}

impl MemoryProbe for CountingAllocator {
    fn bytes_in_use(&self) -> usize {
        self.total_allocated().saturating_sub(self.total_deallocated())
    }
}

// SAFETY: every call is forwarded unchanged to `System`; the counters only observe sizes.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: the caller upholds `GlobalAlloc::alloc`'s contract
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.allocated.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: the caller upholds `GlobalAlloc::alloc_zeroed`'s contract
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.allocated.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: the caller upholds `GlobalAlloc::dealloc`'s contract
        unsafe { System.dealloc(ptr, layout) };
        self.deallocated.fetch_add(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: the caller upholds `GlobalAlloc::realloc`'s contract
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            self.deallocated.fetch_add(layout.size(), Ordering::Relaxed);
            self.allocated.fetch_add(new_size, Ordering::Relaxed);
        }
        new_ptr
    }
}

/// Time and memory readings taken at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Clock reading
    at: Duration,
    /// Heap bytes in use
    bytes: usize,
}

impl Snapshot {
    /// Reads `clock` and `probe`
    pub fn take<C, M>(clock: &C, probe: &M) -> Self
    where
        C: Clock + ?Sized,
        M: MemoryProbe + ?Sized,
    {
        let bytes = probe.bytes_in_use();
        Self { at: clock.now(), bytes }
    }

    /// Elapsed time and signed change in heap usage from `self` to `later`
    #[must_use]
    pub fn until(self, later: Self) -> (Duration, i64) {
        let elapsed = later.at.saturating_sub(self.at);
        let before = i64::try_from(self.bytes).unwrap_or(i64::MAX);
        let after = i64::try_from(later.bytes).unwrap_or(i64::MAX);
        (elapsed, after.saturating_sub(before))
    }
}
