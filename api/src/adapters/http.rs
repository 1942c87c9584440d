//! Response handling shared by the HTTP adapters

use serde::Deserialize;

use crate::error::{ExternalServiceError, Service};

/// Decode a JSON body, mapping error statuses onto `ExternalServiceError`
pub async fn handle_response<T: for<'de> Deserialize<'de>>(
    service: Service,
    response: reqwest::Response,
) -> Result<T, ExternalServiceError> {
    let response = check_status(service, response).await?;
    response
        .json()
        .await
        .map_err(|e| ExternalServiceError::Deserialization {
            service,
            message: e.to_string(),
        })
}

/// Like `handle_response` for endpoints whose body is ignored
pub async fn handle_empty_response(
    service: Service,
    response: reqwest::Response,
) -> Result<(), ExternalServiceError> {
    check_status(service, response).await.map(|_| ())
}

async fn check_status(
    service: Service,
    response: reqwest::Response,
) -> Result<reqwest::Response, ExternalServiceError> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 {
        Err(ExternalServiceError::Unauthorized { service })
    } else if status.as_u16() == 429 {
        Err(ExternalServiceError::RateLimited { service })
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(ExternalServiceError::Api {
            service,
            status: status.as_u16(),
            message,
        })
    }
}

/// Map a transport failure for `service`
pub fn request_error(service: Service) -> impl Fn(reqwest::Error) -> ExternalServiceError {
    move |source| ExternalServiceError::Request { service, source }
}
