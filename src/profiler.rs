use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cumulative time and call count per named section of the sweep.
#[derive(Default)]
pub struct Profiler {
    pub sections: HashMap<&'static str, (Duration, u32)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let entry = self.sections.entry(name).or_default();
        entry.0 += elapsed;
        entry.1 += 1;
    }

    /// Sections sorted by total time, longest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, Duration, u32)> {
        let mut v: Vec<_> = self
            .sections
            .iter()
            .map(|(n, (d, c))| (*n, *d, *c))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }

    pub fn print_and_clear(&mut self) {
        for (name, total, calls) in self.report_sorted() {
            let mean = total / calls.max(1);
            println!("{:<16} {:>6} calls  total {:?}  mean {:?}", name, calls, total, mean);
        }
        self.sections.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section; the guard records into the global profiler on drop.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().record(self.name, self.start.elapsed());
    }
}

/// Profile the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_orders_by_total_time() {
        let mut profiler = Profiler::new();
        profiler.record("archive_run", Duration::from_millis(2));
        profiler.record("solver_run", Duration::from_millis(30));
        profiler.record("archive_run", Duration::from_millis(3));

        let report = profiler.report_sorted();
        assert_eq!(report[0], ("solver_run", Duration::from_millis(30), 1));
        assert_eq!(report[1], ("archive_run", Duration::from_millis(5), 2));
    }
}
