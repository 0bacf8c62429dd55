/*!
 * Error types for the accessgen application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling the upstream model API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails (transport-level)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The API rejected the credentials (HTTP 401/403)
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    /// The API rate limit or quota was exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The API rejected the request as invalid (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other error response from the API
    #[error("API responded with error: {status_code} - {message}")]
    Upstream {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },
}

/// Errors that terminate an accessibility-generation request.
///
/// Only failures of the primary generation call (or invalid input) surface
/// here. Failures of the secondary calls - the alt-text length retry, the
/// unknown-abbreviation escalation, and the image-type classification - are
/// recovered into QA flags and never produce one of these.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No image was provided in the request
    #[error("No image provided: an image data URL or https URL is required")]
    MissingInput,

    /// The upstream API rejected the credentials
    #[error("Upstream authentication failed: {0}")]
    UpstreamAuth(String),

    /// The upstream API rate limit was exceeded
    #[error("Upstream rate limit exceeded: {0}")]
    UpstreamRateLimit(String),

    /// The upstream API rejected the request as invalid
    #[error("Upstream rejected the request: {0}")]
    UpstreamBadRequest(String),

    /// The upstream API was unreachable or returned an unexpected error
    #[error("Upstream model unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The primary call succeeded but returned no usable content
    #[error("Upstream model returned no usable content")]
    MalformedResponse,
}

impl From<ProviderError> for GenerationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unauthorized(msg) => Self::UpstreamAuth(msg),
            ProviderError::RateLimited(msg) => Self::UpstreamRateLimit(msg),
            ProviderError::BadRequest(msg) => Self::UpstreamBadRequest(msg),
            ProviderError::RequestFailed(msg) | ProviderError::ParseError(msg) => {
                Self::UpstreamUnavailable(msg)
            }
            ProviderError::Upstream {
                status_code,
                message,
            } => Self::UpstreamUnavailable(format!("{} - {}", status_code, message)),
        }
    }
}
