//! Tracer construction.
//!
//! The tracer is built once at startup from configuration and then shared
//! read-only by every component.

pub mod langfuse;

pub use langfuse::LangfuseTracer;

use std::sync::Arc;

use crate::traits::tracer::{NoopTracer, Tracer};
use crate::types::config::LangfuseConfig;

/// Build the process-wide tracer.
///
/// Without Langfuse credentials, or if the Langfuse client can't be built,
/// this is a [`NoopTracer`]: tracing is optional and never blocks startup.
pub fn build_tracer(langfuse: Option<LangfuseConfig>) -> Arc<dyn Tracer> {
    let Some(config) = langfuse else {
        tracing::info!("Langfuse not configured; tracing disabled");
        return Arc::new(NoopTracer);
    };

    let host = config.host.clone();
    match LangfuseTracer::new(config) {
        Ok(tracer) => {
            tracing::info!(host = %host, "Langfuse tracing enabled");
            Arc::new(tracer)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create Langfuse tracer; tracing disabled");
            Arc::new(NoopTracer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_is_noop() {
        assert!(!build_tracer(None).is_enabled());
    }

    #[test]
    fn test_config_enables_tracer() {
        let tracer = build_tracer(Some(LangfuseConfig::new(
            "pk-lf-1",
            "sk-lf-1",
            "https://cloud.langfuse.com",
        )));
        assert!(tracer.is_enabled());
    }
}
