use instant::Instant;

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

struct TimerSpan {
    name: String,
    started_at: Instant,
}

/// Hierarchial magic. Spans are logged when they start and stop, indented by how deeply they're
/// nested, and everything is summarized when the timer is done.
pub struct Timer {
    outermost_name: String,
    started_at: Instant,
    stack: Vec<TimerSpan>,
    results: Vec<String>,
    notes: Vec<String>,
    warnings: Vec<String>,
    quiet: bool,
}

impl Timer {
    pub fn new<S: Into<String>>(name: S) -> Timer {
        let outermost_name = name.into();
        info!("{}...", outermost_name);
        Timer {
            outermost_name,
            started_at: Instant::now(),
            stack: Vec::new(),
            results: Vec::new(),
            notes: Vec::new(),
            warnings: Vec::new(),
            quiet: false,
        }
    }

    /// Used in tests and other places where nobody cares about the output
    pub fn throwaway() -> Timer {
        Timer {
            outermost_name: "throwaway".to_string(),
            started_at: Instant::now(),
            stack: Vec::new(),
            results: Vec::new(),
            notes: Vec::new(),
            warnings: Vec::new(),
            quiet: true,
        }
    }

    pub fn start<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        debug!("{}{}...", "  ".repeat(self.stack.len()), name);
        self.stack.push(TimerSpan {
            name,
            started_at: Instant::now(),
        });
    }

    /// Spans must be stopped in the order they were started. A mismatched name is a bug in the
    /// caller and is only logged.
    pub fn stop<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        let span = match self.stack.pop() {
            Some(span) => span,
            None => {
                warn!("Timer {} stopped {} without starting it", self.outermost_name, name);
                return;
            }
        };
        if span.name != name {
            warn!(
                "Timer {} stopped {}, but the innermost span is {}",
                self.outermost_name, name, span.name
            );
        }
        let line = format!(
            "{}- {} took {}",
            "  ".repeat(self.stack.len()),
            span.name,
            prettyprint_time(elapsed_seconds(span.started_at))
        );
        debug!("{}", line);
        self.results.push(line);
    }

    pub fn note<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        info!("{}", line);
        self.notes.push(line);
    }

    pub fn warn<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        warn!("{}", line);
        self.warnings.push(line);
    }

    pub fn notes(&self) -> &Vec<String> {
        &self.notes
    }

    pub fn warnings(&self) -> &Vec<String> {
        &self.warnings
    }

    pub fn done(self) {}
}

impl Drop for Timer {
    fn drop(&mut self) {
        if self.quiet {
            return;
        }
        while let Some(span) = self.stack.pop() {
            warn!("{} never stopped span {}", self.outermost_name, span.name);
        }
        info!(
            "{} took {}",
            self.outermost_name,
            prettyprint_time(elapsed_seconds(self.started_at))
        );
        for line in &self.results {
            info!("{}", line);
        }
        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("  {}", line);
            }
        }
        if !self.warnings.is_empty() {
            warn!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                warn!("  {}", line);
            }
        }
    }
}

pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettyprint_usize() {
        assert_eq!("0", prettyprint_usize(0));
        assert_eq!("999", prettyprint_usize(999));
        assert_eq!("1,000", prettyprint_usize(1000));
        assert_eq!("12,345,678", prettyprint_usize(12345678));
    }

    #[test]
    fn test_timer_spans() {
        let mut timer = Timer::throwaway();
        timer.start("outer");
        timer.start("inner");
        timer.stop("inner");
        timer.stop("outer");
        timer.warn("something odd");
        timer.note("3 rows skipped");
        assert_eq!(2, timer.results.len());
        assert!(timer.results[0].starts_with("  - inner took"));
        assert!(timer.results[1].starts_with("- outer took"));
        assert_eq!(vec!["something odd".to_string()], *timer.warnings());
        assert_eq!(vec!["3 rows skipped".to_string()], *timer.notes());
    }
}
