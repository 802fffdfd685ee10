/*
 * Responsibility
 * - the uniform response envelope every JSON endpoint returns
 *   {IsSuccess, Message, Data} (+ PageNo/PageSize/TotalRecord/TotalPages on lists)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    #[serde(rename = "IsSuccess")]
    pub is_success: bool,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Option<T>,

    #[serde(rename = "PageNo", skip_serializing_if = "Option::is_none")]
    pub page_no: Option<u64>,
    #[serde(rename = "PageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(rename = "TotalRecord", skip_serializing_if = "Option::is_none")]
    pub total_record: Option<u64>,
    #[serde(rename = "TotalPages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: Some(data),
            page_no: None,
            page_size: None,
            total_record: None,
            total_pages: None,
        }
    }

    pub fn paginated(
        message: impl Into<String>,
        data: T,
        page_no: u64,
        page_size: u64,
        total_record: u64,
    ) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: Some(data),
            page_no: Some(page_no),
            page_size: Some(page_size),
            total_record: Some(total_record),
            total_pages: Some(total_pages(total_record, page_size)),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }

    pub fn ok(self) -> Response {
        self.into_response_with(StatusCode::OK)
    }

    pub fn created(self) -> Response {
        self.into_response_with(StatusCode::CREATED)
    }
}

impl ApiEnvelope<serde_json::Value> {
    pub fn error(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            data,
            page_no: None,
            page_size: None,
            total_record: None,
            total_pages: None,
        }
    }

    /// Success with no payload ("deleted successfully" etc.).
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: None,
            page_no: None,
            page_size: None,
            total_record: None,
            total_pages: None,
        }
    }
}

pub fn total_pages(total_record: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_record.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_uses_pascal_case_keys() {
        let env = ApiEnvelope::success("ok", serde_json::json!({"id": 1}));
        let v = serde_json::to_value(&env).unwrap();

        assert_eq!(v["IsSuccess"], true);
        assert_eq!(v["Message"], "ok");
        assert_eq!(v["Data"]["id"], 1);
        assert!(v.get("PageNo").is_none());
    }

    #[test]
    fn paginated_envelope_carries_page_fields() {
        let env = ApiEnvelope::paginated("ok", vec![1, 2, 3], 2, 10, 25);
        let v = serde_json::to_value(&env).unwrap();

        assert_eq!(v["PageNo"], 2);
        assert_eq!(v["PageSize"], 10);
        assert_eq!(v["TotalRecord"], 25);
        assert_eq!(v["TotalPages"], 3);
    }

    #[test]
    fn error_envelope_has_null_data() {
        let env = ApiEnvelope::error("Invalid email or password", None);
        let v = serde_json::to_value(&env).unwrap();

        assert_eq!(v["IsSuccess"], false);
        assert!(v["Data"].is_null());
    }

    #[test]
    fn total_pages_is_ceil_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
