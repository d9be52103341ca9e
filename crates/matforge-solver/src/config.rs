//! Solver configuration types.

/// Options handed unchanged to the solve boundary.
///
/// Every field is optional; `None` leaves the backend default in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Time limit in seconds per solve call.
    pub time_limit: Option<f64>,
    /// Relative objective gap at which a solve may stop.
    pub mip_gap: Option<f64>,
    /// Verbosity level.
    pub verbosity: Option<u32>,
    /// Enable/disable presolve.
    pub presolve: Option<bool>,
    /// Number of threads. `Some(0)` is treated like `None`.
    pub threads: Option<u32>,
    /// Log solver output to console.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative objective gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Thread count to request from the backend, if any.
    pub fn effective_threads(&self) -> Option<u32> {
        self.threads.filter(|count| *count > 0)
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.verbosity.is_none()
            && self.presolve.is_none()
            && self.threads.is_none()
            && self.log_to_console.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_is_empty() {
        assert!(SolverConfig::new().is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_verbosity(1)
            .with_presolve(true)
            .with_threads(4)
            .with_log_to_console(false);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.verbosity, Some(1));
        assert_eq!(config.presolve, Some(true));
        assert_eq!(config.effective_threads(), Some(4));
        assert_eq!(config.log_to_console, Some(false));
    }

    #[test]
    fn zero_threads_means_backend_default() {
        let config = SolverConfig::new().with_threads(0);
        assert!(!config.is_empty());
        assert_eq!(config.effective_threads(), None);
    }
}
