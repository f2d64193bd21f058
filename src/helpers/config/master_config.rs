use super::*;

/// Format of the summary printed when the program exits
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration for the whole tickcast program
#[derive(Debug)]
pub struct MasterConfig {
    /// If to exit with success without running (for example, after showing --help)
    pub happy_exit: bool,
    pub emitter: EmitterConfig,
    /// None means run until interrupted
    pub run_time: Option<Duration>,
    pub stopwatches: usize,
    pub output: OutputFormat,
}

impl Default for MasterConfig {
    /// NOTE: the true default configuration you get when you run tickcast is determined by
    /// config_entries(), this is just a starting point for them to be applied to
    fn default() -> Self {
        Self {
            happy_exit: false,
            emitter: EmitterConfig::default(),
            run_time: None,
            stopwatches: 0,
            output: OutputFormat::Text,
        }
    }
}
