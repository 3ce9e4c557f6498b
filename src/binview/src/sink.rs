//! Error Sinks
//!
//! Where the provider reports resource failures that it has already turned
//! into a plain failure result for the caller.

use crate::error::ResourceError;
use std::sync::Arc;

/// Receives resource failures, once per failure
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &ResourceError);
}

/// Sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, error: &ResourceError) {
        tracing::error!(error = %error, "virtual process resource failure");
    }
}

impl<T: ErrorSink + ?Sized> ErrorSink for Arc<T> {
    fn report(&self, error: &ResourceError) {
        (**self).report(error)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    /// Keeps every reported message
    #[derive(Default)]
    pub struct RecordingSink {
        pub reports: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub fn count(&self) -> usize {
            self.reports.lock().len()
        }
    }

    impl ErrorSink for RecordingSink {
        fn report(&self, error: &ResourceError) {
            self.reports.lock().push(error.to_string());
        }
    }

    #[test]
    fn test_shared_sink_forwards() {
        let sink = Arc::new(RecordingSink::default());
        let shared: Arc<RecordingSink> = Arc::clone(&sink);

        shared.report(&ResourceError::Empty(PathBuf::from("a.bin")));
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.reports.lock()[0], "Cannot map empty file: a.bin");
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        TracingSink.report(&ResourceError::Released(PathBuf::from("b.bin")));
    }
}
