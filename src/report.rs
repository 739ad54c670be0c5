//! Build reporting
//!
//! Small timing/progress reporter for the CLI. All lines go to stderr so
//! stdout stays free for tooling; glyph decoration is dropped when stderr
//! is not a terminal.

use std::time::Instant;

use is_terminal::IsTerminal;

use crate::config::ConfigWarning;

/// Per-run progress reporter
pub struct Reporter {
    start: Instant,
    decorated: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            start: Instant::now(),
            decorated: std::io::stderr().is_terminal(),
            verbose,
        }
    }

    fn tick(&self) -> &'static str {
        if self.decorated {
            "✓"
        } else {
            "ok"
        }
    }

    /// One finalized asset written to disk.
    pub fn asset(&self, name: &str, output_rel: &str) {
        if self.verbose {
            eprintln!("{} {} -> {}", self.tick(), name, output_rel);
        }
    }

    /// Non-fatal config warnings, printed before the build starts.
    pub fn config_warnings(&self, warnings: &[ConfigWarning]) {
        for w in warnings {
            eprintln!(
                "{} unknown config key '{}' in {}",
                if self.decorated { "⚠" } else { "warning:" },
                w.key,
                w.file.display()
            );
        }
    }

    /// Successful completion line with elapsed time.
    pub fn finish(&self, asset_count: usize) {
        let elapsed = self.start.elapsed();
        eprintln!(
            "{} compiled {} asset{} in {}ms",
            self.tick(),
            asset_count,
            if asset_count == 1 { "" } else { "s" },
            elapsed.as_millis()
        );
    }
}
