// src/checker/progress.rs
// =============================================================================
// A text progress bar shared by all check tasks.
//
// Redraws are throttled to one every 100ms, except the final one (current ==
// total), which is always drawn so the bar never stops short of 100%.
//
// Rust concepts:
// - Mutex: increments come from many tasks at once, so the counter, the
//   redraw timestamp and the output stream live behind one lock
// - Box<dyn Write + Send>: the bar can draw to stdout, or to a buffer in tests
// =============================================================================

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 50;
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

struct ProgressState {
    current: usize,
    last_draw: Instant,
    out: Box<dyn Write + Send>,
}

pub struct ProgressReporter {
    total: usize,
    state: Mutex<ProgressState>,
}

impl ProgressReporter {
    /// A progress bar drawn on stdout
    pub fn new(total: usize) -> Self {
        Self::with_writer(total, Box::new(io::stdout()))
    }

    /// A progress bar that counts but draws nothing
    pub fn hidden(total: usize) -> Self {
        Self::with_writer(total, Box::new(io::sink()))
    }

    pub fn with_writer(total: usize, out: Box<dyn Write + Send>) -> Self {
        ProgressReporter {
            total,
            state: Mutex::new(ProgressState {
                current: 0,
                last_draw: Instant::now(),
                out,
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current(&self) -> usize {
        self.lock().current
    }

    /// Records one finished unit of work and redraws if due
    pub fn increment(&self) {
        let mut state = self.lock();
        state.current += 1;

        if state.last_draw.elapsed() >= REDRAW_INTERVAL || state.current == self.total {
            let line = render(state.current, self.total);
            // The bar is cosmetic; a closed stdout must not stop the run
            let _ = state.out.write_all(line.as_bytes());
            let _ = state.out.flush();
            state.last_draw = Instant::now();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Renders `\r[====>    ] current/total (pct%)`, with a newline once complete
fn render(current: usize, total: usize) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        current as f64 / total as f64
    };
    let completed = (BAR_WIDTH as f64 * fraction) as usize;

    let bar: String = (0..BAR_WIDTH)
        .map(|i| {
            if i < completed {
                '='
            } else if i == completed {
                '>'
            } else {
                ' '
            }
        })
        .collect();

    let mut line = format!(
        "\r[{}] {}/{} ({}%)",
        bar,
        current,
        total,
        (fraction * 100.0) as u64
    );
    if current == total {
        line.push('\n');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Write target that tests can read back
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn render_half_way() {
        let line = render(5, 10);
        let expected = format!("\r[{}>{}] 5/10 (50%)", "=".repeat(25), " ".repeat(24));
        assert_eq!(line, expected);
    }

    #[test]
    fn render_complete_ends_with_newline() {
        let line = render(3, 3);
        assert_eq!(line, format!("\r[{}] 3/3 (100%)\n", "=".repeat(50)));
    }

    #[test]
    fn render_empty_run() {
        assert!(render(0, 0).ends_with("0/0 (100%)\n"));
    }

    #[test]
    fn increment_counts() {
        let progress = ProgressReporter::hidden(10);
        progress.increment();
        assert_eq!(progress.current(), 1);
        assert_eq!(progress.total(), 10);
    }

    #[test]
    fn fast_increments_are_throttled_but_final_draw_is_kept() {
        let buffer = SharedBuffer::default();
        let progress = ProgressReporter::with_writer(100, Box::new(buffer.clone()));

        for _ in 0..100 {
            progress.increment();
        }

        let output = buffer.contents();
        // Far fewer than 100 redraws in a tight loop, but the last one is there
        assert!(output.matches('\r').count() < 100);
        assert!(output.ends_with("100/100 (100%)\n"));
    }

    #[test]
    fn concurrent_increments_reach_total() {
        let buffer = SharedBuffer::default();
        let progress = Arc::new(ProgressReporter::with_writer(
            64,
            Box::new(buffer.clone()),
        ));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let progress = Arc::clone(&progress);
                std::thread::spawn(move || {
                    for _ in 0..8 {
                        progress.increment();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(progress.current(), 64);
        assert!(buffer.contents().contains("64/64 (100%)"));
    }

    #[test]
    fn slow_increments_redraw() {
        let buffer = SharedBuffer::default();
        let progress = ProgressReporter::with_writer(3, Box::new(buffer.clone()));

        std::thread::sleep(REDRAW_INTERVAL + Duration::from_millis(20));
        progress.increment();

        assert!(buffer.contents().contains("1/3 (33%)"));
    }
}
