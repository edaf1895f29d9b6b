use bridge_core::{BridgeConfig, BridgeError, Reconciler};
use std::sync::Arc;

/// Shared application state passed to all route handlers.
///
/// A server with unusable configuration still starts so the liveness probe
/// answers; every trigger then fails with the configuration error and makes no
/// external call.
#[derive(Clone)]
pub struct AppState {
    pipeline: Result<Arc<Reconciler>, BridgeError>,
}

impl AppState {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            pipeline: Ok(Arc::new(reconciler)),
        }
    }

    pub fn unconfigured(err: BridgeError) -> Self {
        Self {
            pipeline: Err(err),
        }
    }

    /// Build state from the outcome of configuration loading.
    pub fn from_config(config: bridge_core::Result<BridgeConfig>) -> Self {
        match config.and_then(|c| Reconciler::from_config(&c)) {
            Ok(reconciler) => Self::new(reconciler),
            Err(err) => {
                tracing::warn!(error = %err, "configuration incomplete; triggers will fail until it is fixed");
                Self::unconfigured(err)
            }
        }
    }

    pub fn reconciler(&self) -> Result<Arc<Reconciler>, BridgeError> {
        self.pipeline.clone()
    }

    #[cfg(test)]
    fn is_configured(&self) -> bool {
        self.pipeline.is_ok()
    }
}
