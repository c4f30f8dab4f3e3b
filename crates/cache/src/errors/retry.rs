/// Classification for retry policy.
///
/// Used by [`RetryPolicy`](crate::RetryPolicy) to decide whether another
/// attempt against the upstream is worth making.
///
/// # Behavior Summary
///
/// | Class | Retry? | Ends in fallback? |
/// |-------|--------|-------------------|
/// | `WithBackoff` | Yes, until attempts are exhausted | Yes |
/// | `Never` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure (timeout, 429, 5xx, empty or malformed payload).
    /// Wait for the backoff delay and call the upstream again.
    WithBackoff,

    /// The upstream rejected the request itself (bad credentials, unknown
    /// symbol). Repeating the same call returns the same answer.
    Never,
}
