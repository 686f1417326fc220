use prometheus::{Encoder, TextEncoder};

use crate::errors::ServiceError;

/// Render all registered metrics in the Prometheus text format.
pub async fn metrics_handler() -> Result<String, ServiceError> {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ServiceError::InternalError(format!("failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| ServiceError::InternalError(format!("metrics output not utf-8: {}", e)))
}
