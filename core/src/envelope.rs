//! Success/failure envelope returned by every `FitbitClient` operation.
//!
//! # Design
//! `ApiResponse` is an enum, so "data present" and "errors present" can never
//! both hold or both be absent. The accessor methods give callers the
//! flag/data/errors view without exposing a nullable field.

use serde::Deserialize;

/// One entry of the provider's `errors` array on a non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub error_type: String,
    /// Name of the offending request field, when the API reports one.
    #[serde(default)]
    pub field_name: Option<String>,
    pub message: String,
}

/// Body of a non-2xx reply. Other keys (e.g. `success`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorDescriptor>,
}

/// A list of error descriptors that is never empty.
///
/// The field is private, so a failure envelope can only be built from a
/// list that passed [`ErrorList::new`]:
///
/// ```compile_fail
/// use fitbit_core::{ApiResponse, ErrorList};
/// let resp: ApiResponse<()> = ApiResponse::Failure(ErrorList(Vec::new()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorList(Vec<ErrorDescriptor>);

impl ErrorList {
    /// Returns `None` for an empty list.
    pub fn new(errors: Vec<ErrorDescriptor>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn as_slice(&self) -> &[ErrorDescriptor] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ErrorDescriptor> {
        self.0
    }
}

/// Outcome of an API call that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ErrorList),
}

impl<T> ApiResponse<T> {
    /// Build a failure envelope. Returns `None` for an empty error list.
    pub fn failure(errors: Vec<ErrorDescriptor>) -> Option<Self> {
        ErrorList::new(errors).map(ApiResponse::Failure)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success(data) => Some(data),
            ApiResponse::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResponse::Success(data) => Some(data),
            ApiResponse::Failure(_) => None,
        }
    }

    /// Error descriptors; empty on success.
    pub fn errors(&self) -> &[ErrorDescriptor] {
        match self {
            ApiResponse::Success(_) => &[],
            ApiResponse::Failure(errors) => errors.as_slice(),
        }
    }

    pub fn into_result(self) -> Result<T, Vec<ErrorDescriptor>> {
        match self {
            ApiResponse::Success(data) => Ok(data),
            ApiResponse::Failure(errors) => Err(errors.into_vec()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        match self {
            ApiResponse::Success(data) => ApiResponse::Success(f(data)),
            ApiResponse::Failure(errors) => ApiResponse::Failure(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ErrorDescriptor {
        ErrorDescriptor {
            error_type: "request".to_string(),
            field_name: None,
            message: "bad".to_string(),
        }
    }

    #[test]
    fn success_has_data_and_no_errors() {
        let resp = ApiResponse::Success(vec![1, 2]);
        assert!(resp.is_success());
        assert_eq!(resp.data(), Some(&vec![1, 2]));
        assert!(resp.errors().is_empty());
    }

    #[test]
    fn failure_has_errors_and_no_data() {
        let resp: ApiResponse<Vec<u8>> = ApiResponse::failure(vec![descriptor()]).unwrap();
        assert!(!resp.is_success());
        assert!(resp.data().is_none());
        assert_eq!(resp.errors().len(), 1);
        assert!(resp.into_data().is_none());
    }

    #[test]
    fn failure_requires_at_least_one_error() {
        assert!(ApiResponse::<()>::failure(Vec::new()).is_none());
        assert!(ErrorList::new(Vec::new()).is_none());
    }

    #[test]
    fn failure_built_from_error_list_reports_its_errors() {
        let errors = ErrorList::new(vec![descriptor(), descriptor()]).unwrap();
        let resp: ApiResponse<()> = ApiResponse::Failure(errors);
        assert!(!resp.is_success());
        assert!(resp.data().is_none());
        assert_eq!(resp.errors().len(), 2);
        assert_eq!(resp.into_result().unwrap_err().len(), 2);
    }

    #[test]
    fn map_keeps_errors_on_failure() {
        let resp: ApiResponse<Vec<u8>> = ApiResponse::failure(vec![descriptor()]).unwrap();
        let mapped = resp.map(|v| v.len());
        assert_eq!(mapped.into_result().unwrap_err(), vec![descriptor()]);

        let ok = ApiResponse::Success(vec![7u8]).map(|v| v.len());
        assert_eq!(ok.into_result().unwrap(), 1);
    }

    #[test]
    fn error_body_reads_field_name_and_ignores_success_flag() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"errors":[{"errorType":"validation","fieldName":"date","message":"Invalid date"}],"success":false}"#,
        )
        .unwrap();
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].error_type, "validation");
        assert_eq!(body.errors[0].field_name.as_deref(), Some("date"));
    }
}
