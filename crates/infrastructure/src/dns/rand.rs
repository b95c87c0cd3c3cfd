use netstack_application::ports::RandIntFn;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use tracing::error;

/// `RandInt(min, max)` backed by the operating system CSPRNG.
///
/// A failing generator yields `None`; there is no weaker fallback.
pub fn crypto_rand_int() -> RandIntFn {
    let rng = SystemRandom::new();
    Arc::new(move |min: i32, max: i32| {
        let mut buf = [0u8; 4];
        if let Err(e) = rng.fill(&mut buf) {
            error!(error = ?e, "System random source failed");
            return None;
        }
        Some(uniform_in_range(u32::from_be_bytes(buf), min, max))
    })
}

/// Maps a uniformly distributed `u32` onto `[min, max]`.
pub(crate) fn uniform_in_range(raw: u32, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    let span = (max as i64 - min as i64 + 1) as u64;
    (min as i64 + (raw as u64 % span) as i64) as i32
}
