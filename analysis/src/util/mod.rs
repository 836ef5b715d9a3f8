use std::time::{Duration, Instant};

pub mod cli_args;

/// run a closure and report its wall-clock time alongside the result
pub fn measure<Out, F: FnOnce() -> Out>(f: F) -> (Out, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
