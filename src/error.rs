use thiserror::Error;

/// Hard failures of a tool run. Expected empty-data paths are not errors;
/// see [`crate::data_models::SearchOutcome`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Config(String),

    #[error("{service} API error! Status: {status} {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("generation service returned no usable text")]
    EmptyGeneration,

    #[error("extraction failed for {url}: {reason}")]
    Extraction { url: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Pdf(String),
}

impl ToolError {
    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> ToolError {
        move |source| ToolError::Transport { service, source }
    }

    pub fn decode(service: &'static str) -> impl FnOnce(reqwest::Error) -> ToolError {
        move |e| ToolError::Decode {
            service,
            message: e.to_string(),
        }
    }

    /// Builds an [`ToolError::Upstream`] from a non-success response, keeping the body text.
    pub async fn from_response(service: &'static str, resp: reqwest::Response) -> ToolError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        ToolError::Upstream {
            service,
            status,
            message,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ToolError::InvalidInput(_))
    }
}

impl From<anyhow::Error> for ToolError {
    fn from(e: anyhow::Error) -> Self {
        ToolError::Storage(format!("{e:#}"))
    }
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
