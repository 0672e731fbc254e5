//! The JSON envelope every API response is wrapped in.

use serde::Serialize;

pub const SUCCESS: &str = "success";
pub const FAIL: &str = "fail";
pub const ERROR: &str = "error";

/// `fail` for client errors, `error` for server errors.
pub fn status_label(http_status: u16) -> &'static str {
    match http_status {
        500..=u16::MAX => ERROR,
        400..=499 => FAIL,
        _ => SUCCESS,
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error chain, only ever filled in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: SUCCESS,
            token: None,
            results: None,
            message: None,
            data: Some(data),
            detail: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    /// A success carrying no `data`.
    pub fn ok() -> Self {
        Self {
            status: SUCCESS,
            token: None,
            results: None,
            message: None,
            data: None,
            detail: None,
        }
    }

    pub fn failure(http_status: u16, message: impl Into<String>) -> Self {
        Self {
            status: status_label(http_status),
            message: Some(message.into()),
            ..Self::ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let body = serde_json::to_value(Envelope::ok().with_token("t")).unwrap();
        assert_eq!(body, json!({"status": "success", "token": "t"}));
    }

    #[test]
    fn failures_are_labelled_by_status() {
        let fail = serde_json::to_value(Envelope::failure(404, "gone")).unwrap();
        assert_eq!(fail, json!({"status": "fail", "message": "gone"}));
        assert_eq!(status_label(503), ERROR);
        assert_eq!(status_label(201), SUCCESS);
    }

    #[test]
    fn data_and_count() {
        let body = serde_json::to_value(Envelope::success(vec![1, 2]).with_results(2)).unwrap();
        assert_eq!(body, json!({"status": "success", "results": 2, "data": [1, 2]}));
    }
}
