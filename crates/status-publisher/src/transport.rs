//! Fan-Out Transport Capability

/// Best-effort broadcast of published messages to connected observers
///
/// `publish` is fire-and-forget from the caller's point of view: it must
/// not block on slow observers, and the caller never learns how many
/// observers exist (zero is fine).
pub trait Transport {
    /// Hand one message to the fan-out
    fn publish(&self, message: &str);
}
