//! Remote strategy: multipart POST to the conversion endpoint.
//!
//! Uses the curl crate (libcurl). One request per conversion; no retry, and a
//! redirect is answered as the non-2xx it is. A
//! transport failure, a non-2xx status or an unreadable envelope fails the
//! record. Runs in the current thread; the service calls it from `spawn_blocking`.

mod envelope;
mod form;

use std::time::Duration;

use super::result::{ConversionMethod, ConversionResult};
use super::ConversionRequest;
use crate::config::ImgconvConfig;
use crate::error::ConvertError;

pub use envelope::{decode_data_url, parse_envelope, EnvelopeError, RemotePayload};
pub use form::form_fields;

/// Client for the remote conversion endpoint.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    endpoint: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(cfg: &ImgconvConfig) -> Self {
        let remote = cfg.remote_or_default();
        Self::new(cfg.remote_endpoint.clone()).with_timeouts(remote.connect_timeout(), remote.timeout())
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads the record and returns the converted result.
    pub fn convert_blocking(&self, request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        let record = request.record();
        let (code, body) = self.post(request)?;
        if !(200..300).contains(&code) {
            return Err(ConvertError::remote(
                Some(code),
                format!("{} returned HTTP {}", self.endpoint, code),
            ));
        }

        let payload = parse_envelope(&body).map_err(|e| ConvertError::remote(Some(code), e.to_string()))?;
        let encoded =
            decode_data_url(&payload.data_url).map_err(|e| ConvertError::remote(Some(code), e.to_string()))?;

        let result = ConversionResult::from_encoded(
            record,
            request.format(),
            encoded,
            ConversionMethod::Remote(payload.conversion_method.clone()),
        );
        if payload.converted_size.is_some_and(|s| s != result.converted_size) {
            tracing::debug!(
                index = record.index(),
                reported = ?payload.converted_size,
                measured = result.converted_size,
                "remote convertedSize differs from decoded payload"
            );
        }
        Ok(result)
    }

    fn post(&self, request: &ConversionRequest) -> Result<(u32, Vec<u8>), ConvertError> {
        let record = request.record();
        let transport = |e: curl::Error| ConvertError::remote(None, e.to_string());
        let build = |e: curl::FormError| ConvertError::conversion(format!("build multipart form: {}", e));

        let mut form = curl::easy::Form::new();
        form.part("image")
            .buffer(record.original_name(), record.bytes().to_vec())
            .content_type(record.media_type())
            .add()
            .map_err(build)?;
        for (name, value) in form_fields(request.format(), request.resize()) {
            form.part(name).contents(value.as_bytes()).add().map_err(build)?;
        }

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.endpoint).map_err(transport)?;
        easy.connect_timeout(self.connect_timeout).map_err(transport)?;
        easy.timeout(self.timeout).map_err(transport)?;
        easy.httppost(form).map_err(transport)?;

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let code = easy.response_code().map_err(transport)?;
        tracing::debug!(
            index = record.index(),
            endpoint = %self.endpoint,
            code,
            bytes = body.len(),
            "remote conversion response"
        );
        Ok((code, body))
    }
}
