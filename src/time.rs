//! Platform-agnostic time utilities
//!
//! Elapsed time since app start, used as the animation clock by hosts that
//! are not handed a frame timestamp.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_millis() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_millis() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

pub fn now_seconds() -> f64 {
    now_millis() / 1000.0
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
        assert!(now_seconds() >= 0.0);
    }
}
