//! HTTP check request handling implementation.

use std::time::Instant;

use reqwest::{Client, Request};
use tracing::debug;

use crate::error::CheckError;
use crate::monitor::MonitorSpec;

/// Response of a completed exchange.
///
/// The status code only shows up in logs; checks judge the body alone.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub body: Vec<u8>,
    /// Milliseconds from dispatch until the body was fully read
    pub latency_ms: u64,
}

/// Build the outgoing request for a monitor.
///
/// Without a payload this is a GET, otherwise a POST carrying the payload.
/// Headers are appended in configured order, so a repeated name ends up with
/// every configured value.
pub fn build_request(
    client: &Client,
    monitor: &MonitorSpec,
    payload: Option<Vec<u8>>,
) -> Result<Request, CheckError> {
    let mut http_request = match payload {
        Some(body) => client.post(&monitor.url).body(body),
        None => client.get(&monitor.url),
    };

    for header in &monitor.headers {
        http_request = http_request.header(header.name.as_str(), header.value.as_str());
    }

    http_request.build().map_err(|error| CheckError::RequestConstruction(error.to_string()))
}

/// Send the request and read the full response body.
///
/// Latency is measured from `started`, which the caller takes right before
/// dispatch, up to the end of the body.
pub async fn perform_http_request(
    client: Client,
    request: Request,
    started: Instant,
) -> Result<FetchedResponse, CheckError> {
    let response = client.execute(request).await.map_err(|error| CheckError::transport(&error))?;
    let status = response.status().as_u16();

    let body = response.bytes().await.map_err(|error| CheckError::transport(&error))?;
    let latency_ms = started.elapsed().as_millis() as u64;

    debug!("Received {} bytes with status {} in {} ms", body.len(), status, latency_ms);

    Ok(FetchedResponse { body: body.to_vec(), latency_ms })
}
