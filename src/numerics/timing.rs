#![allow(unused)]
use std::cell::RefCell;
use std::time::{Duration, Instant};

#[derive(Default, Clone)]
pub struct TimingStats {
    pub jacobian_times: Vec<Duration>,
    pub linear_solve_times: Vec<Duration>,
    pub total_time: Duration,
}

impl TimingStats {
    #[cfg(feature = "timing")]
    pub fn print_summary(&self) {
        if self.jacobian_times.is_empty() {
            return;
        }
        let total_jacobian: Duration = self.jacobian_times.iter().sum();
        let total_linear: Duration = self.linear_solve_times.iter().sum();
        let overhead = self
            .total_time
            .saturating_sub(total_jacobian + total_linear);

        println!("\n{}", "=".repeat(60));
        println!("{:^60}", "SOLVER TIMING SUMMARY");
        println!("{}", "=".repeat(60));
        println!(
            "Total solver time:             {:.3}s",
            self.total_time.as_secs_f64()
        );
        println!(
            "  Jacobian assembly:         {:>9.3}ms  (avg: {:>9.3}ms)",
            total_jacobian.as_secs_f64() * 1000.0,
            total_jacobian.as_secs_f64() * 1000.0 / self.jacobian_times.len() as f64
        );
        println!(
            "  Linear solve:              {:>9.3}ms  (avg: {:>9.3}ms)",
            total_linear.as_secs_f64() * 1000.0,
            total_linear.as_secs_f64() * 1000.0 / self.linear_solve_times.len().max(1) as f64
        );
        println!(
            "  Overhead/Other:            {:>9.3}ms",
            overhead.as_secs_f64() * 1000.0
        );
        println!(
            "Iterations:                    {} jacobian, {} lin.solve\n",
            self.jacobian_times.len(),
            self.linear_solve_times.len()
        );
    }
}

thread_local! {
    static STATS: RefCell<TimingStats> = RefCell::new(TimingStats::default());
}

pub fn reset_timing() {
    STATS.with(|s| *s.borrow_mut() = TimingStats::default());
}

pub fn record_jacobian<T>(f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    STATS.with(|s| s.borrow_mut().jacobian_times.push(start.elapsed()));
    out
}

pub fn record_linear_solve<T>(f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    STATS.with(|s| s.borrow_mut().linear_solve_times.push(start.elapsed()));
    out
}

pub fn finalize_and_print(total: Duration) {
    STATS.with(|s| s.borrow_mut().total_time = total);
    #[cfg(feature = "timing")]
    STATS.with(|s| s.borrow().print_summary());
}
