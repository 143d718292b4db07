// File: rusty-forms-orchestrator/src/report.rs
// Purpose: Presentation hand-off for validation outcomes

/// Presents a validation outcome
///
/// Rendering (markup, CSS classes, HTMX swaps) belongs to the implementor.
/// Called once per committed verdict, after the field state is written.
pub trait Reporter: Send + Sync {
    fn report(&self, name: &str, valid: bool, message: &str);
}

/// Reporter that writes outcomes to the tracing log
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, name: &str, valid: bool, message: &str) {
        tracing::info!(field = name, valid, message, "validation result");
    }
}

/// Reporter backed by a closure
pub struct FnReporter<F> {
    f: F,
}

impl<F> FnReporter<F>
where
    F: Fn(&str, bool, &str) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Reporter for FnReporter<F>
where
    F: Fn(&str, bool, &str) + Send + Sync,
{
    fn report(&self, name: &str, valid: bool, message: &str) {
        (self.f)(name, valid, message)
    }
}
