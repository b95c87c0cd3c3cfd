use std::sync::Arc;

/// Injected `RandInt(min, max)` source, inclusive on both ends. `None` when
/// the underlying generator fails.
///
/// Transaction IDs are drawn from it, so production implementations must be
/// backed by a CSPRNG rather than a statistical generator.
pub type RandIntFn = Arc<dyn Fn(i32, i32) -> Option<i32> + Send + Sync>;
