// ── Device registry ──
//
// File-backed record store: loaded once, flushed whole on every write,
// read through a lock-free snapshot.

mod persist;
mod registry;

pub use registry::Registry;
