//! catalog-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// 商品查询失败（远端 gRPC 调用出错）
///
/// 每个变体都保留原始的 `tonic::Status`，由 HTTP 层决定状态码。
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("product service unavailable while looking up {id}")]
    Unavailable {
        id: String,
        #[source]
        source: tonic::Status,
    },

    #[error("product {id} not found")]
    NotFound {
        id: String,
        #[source]
        source: tonic::Status,
    },

    #[error("product service deadline exceeded while looking up {id}")]
    DeadlineExceeded {
        id: String,
        #[source]
        source: tonic::Status,
    },

    #[error("product service failed while looking up {id}")]
    Remote {
        id: String,
        #[source]
        source: tonic::Status,
    },
}

impl LookupError {
    /// 按 gRPC 状态码归类
    pub fn from_status(id: impl Into<String>, status: tonic::Status) -> Self {
        let id = id.into();
        match status.code() {
            tonic::Code::Unavailable => Self::Unavailable { id, source: status },
            tonic::Code::NotFound => Self::NotFound { id, source: status },
            tonic::Code::DeadlineExceeded => Self::DeadlineExceeded { id, source: status },
            _ => Self::Remote { id, source: status },
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Unavailable { id, .. }
            | Self::NotFound { id, .. }
            | Self::DeadlineExceeded { id, .. }
            | Self::Remote { id, .. } => id,
        }
    }

    /// 底层 gRPC 状态
    pub fn status(&self) -> &tonic::Status {
        match self {
            Self::Unavailable { source, .. }
            | Self::NotFound { source, .. }
            | Self::DeadlineExceeded { source, .. }
            | Self::Remote { source, .. } => source,
        }
    }

    /// 指标标签
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::NotFound { .. } => "not_found",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::Remote { .. } => "error",
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl AppError {
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => 400,
            Self::Lookup(LookupError::Unavailable { .. }) => 503,
            Self::Lookup(LookupError::NotFound { .. }) => 404,
            Self::Lookup(LookupError::DeadlineExceeded { .. }) => 504,
            Self::Lookup(LookupError::Remote { .. }) => 500,
        }
    }

    /// 转换为 Problem Details
    ///
    /// 远端返回的错误信息只写日志，不回传给调用方。
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.problem_detail(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::MissingParameter(_) => "missing-parameter",
            Self::InvalidParameter { .. } => "invalid-parameter",
            Self::Lookup(LookupError::Unavailable { .. }) => "remote-unavailable",
            Self::Lookup(LookupError::NotFound { .. }) => "not-found",
            Self::Lookup(LookupError::DeadlineExceeded { .. }) => "remote-deadline-exceeded",
            Self::Lookup(LookupError::Remote { .. }) => "internal",
        };
        format!("https://api.catalog.nrsjnet.com.br/problems/{slug}")
    }

    fn problem_title(&self) -> String {
        match self {
            Self::MissingParameter(_) => "Missing Parameter",
            Self::InvalidParameter { .. } => "Invalid Parameter",
            Self::Lookup(LookupError::Unavailable { .. }) => "Service Unavailable",
            Self::Lookup(LookupError::NotFound { .. }) => "Resource Not Found",
            Self::Lookup(LookupError::DeadlineExceeded { .. }) => "Gateway Timeout",
            Self::Lookup(LookupError::Remote { .. }) => "Internal Server Error",
        }
        .to_string()
    }

    fn problem_detail(&self) -> String {
        match self {
            Self::MissingParameter(name) => format!("Path parameter '{name}' is required"),
            Self::InvalidParameter { name, reason } => {
                format!("Path parameter '{name}' is invalid: {reason}")
            }
            Self::Lookup(LookupError::NotFound { id, .. }) => format!("Product '{id}' does not exist"),
            Self::Lookup(LookupError::Unavailable { .. }) => {
                "The product service is currently unreachable".to_string()
            }
            Self::Lookup(LookupError::DeadlineExceeded { .. }) => {
                "The product service did not respond in time".to_string()
            }
            Self::Lookup(LookupError::Remote { .. }) => {
                "An unexpected error occurred while looking up the product".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Lookup(err) = &self {
            let status = err.status();
            if matches!(err, LookupError::Remote { .. }) {
                error!(
                    product_id = %err.id(),
                    code = ?status.code(),
                    cause = %status.message(),
                    "Product lookup failed"
                );
            } else {
                warn!(
                    product_id = %err.id(),
                    code = ?status.code(),
                    cause = %status.message(),
                    "Product lookup failed"
                );
            }
        }

        let problem = self.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn lookup(code: tonic::Code) -> AppError {
        AppError::from(LookupError::from_status(
            "42",
            tonic::Status::new(code, "db connection reset by peer"),
        ))
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            LookupError::from_status("x", tonic::Status::not_found("x")),
            LookupError::NotFound { .. }
        ));
        assert!(matches!(
            LookupError::from_status("x", tonic::Status::unavailable("down")),
            LookupError::Unavailable { .. }
        ));
        assert!(matches!(
            LookupError::from_status("x", tonic::Status::deadline_exceeded("slow")),
            LookupError::DeadlineExceeded { .. }
        ));
        assert!(matches!(
            LookupError::from_status("x", tonic::Status::permission_denied("no")),
            LookupError::Remote { .. }
        ));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(AppError::missing_parameter("productId").status_code(), 400);
        assert_eq!(
            AppError::invalid_parameter("productId", "bad utf-8").status_code(),
            400
        );
        assert_eq!(lookup(tonic::Code::NotFound).status_code(), 404);
        assert_eq!(lookup(tonic::Code::Unavailable).status_code(), 503);
        assert_eq!(lookup(tonic::Code::DeadlineExceeded).status_code(), 504);
        assert_eq!(lookup(tonic::Code::Internal).status_code(), 500);
        assert_eq!(lookup(tonic::Code::Unknown).status_code(), 500);
    }

    #[test]
    fn test_lookup_error_keeps_cause() {
        let err = LookupError::from_status("42", tonic::Status::internal("boom"));
        assert_eq!(err.id(), "42");
        assert_eq!(err.status().message(), "boom");
        assert_eq!(err.outcome(), "error");

        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("boom"));
    }

    #[test]
    fn test_problem_details_hide_remote_message() {
        let problem = lookup(tonic::Code::Internal).to_problem_details();
        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "Internal Server Error");
        assert!(!problem.detail.contains("connection reset"));
        assert!(problem.r#type.ends_with("/problems/internal"));
    }

    #[tokio::test]
    async fn test_into_response_problem_json() {
        let response = lookup(tonic::Code::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let problem: ProblemDetails = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem.status, 404);
        assert_eq!(problem.detail, "Product '42' does not exist");
        assert!(problem.instance.is_none());
    }
}
