//! Request and response bodies of the T1 Disk API.
//!
//! The `/files/create/` response carries the headers the upload must be sent
//! with as a JSON object (`{"headers": {"Content-Type": "..."}}`), not as real
//! HTTP response headers. The upload descriptor takes its content
//! type from that object.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header carrying the token on every authenticated request.
pub const AUTH_HEADER: &str = "Mountbit-Auth";

pub const LOGIN_PATH: &str = "/accounts/login/";
pub const CREATE_FILE_PATH: &str = "/files/create/";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
    pub permanent_auth: bool,
}

/// Response of a successful login. Only `token` is needed for later calls,
/// the rest is informational.
#[derive(Deserialize, Debug, Clone)]
pub struct LoginInfo {
    pub token: String,
    pub device_description: Option<String>,
    pub created: Option<i64>,
    pub expires: Option<i64>,
    pub remote_wipe: Option<bool>,
    pub id: Option<String>,
    #[serde(rename = "userid")]
    pub user_id: Option<i64>,
    pub user_eid: Option<i64>,
    pub login: Option<String>,
    pub domain: Option<String>,
    pub name: Option<String>,
    pub offer_url: Option<String>,
    pub company_id: Option<i64>,
    pub previous_login_date: Option<i64>,
    pub previous_login_ip: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct CreateFileRequest<'a> {
    pub path: &'a str,
    pub multipart: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UploadSlot {
    url: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    confirm_url: String,
}

/// A single-use upload slot: where to PUT the bytes, with which content type,
/// and where to confirm afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub upload_url: String,
    pub content_type: String,
    pub confirm_url: String,
}

impl UploadSlot {
    pub(crate) fn into_descriptor(self) -> UploadDescriptor {
        let content_type = match self.headers.get("Content-Type") {
            Some(value) => Some(value.clone()),
            None => self
                .headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value.clone()),
        };

        let content_type = content_type.unwrap_or_else(|| {
            log::warn!("no Content-Type in upload slot, using {}", DEFAULT_CONTENT_TYPE);
            DEFAULT_CONTENT_TYPE.to_owned()
        });

        UploadDescriptor {
            upload_url: self.url,
            content_type,
            confirm_url: self.confirm_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> UploadDescriptor {
        serde_json::from_str::<UploadSlot>(json)
            .unwrap()
            .into_descriptor()
    }

    #[test]
    fn content_type_comes_from_headers_object() {
        let d = descriptor(r#"{"url":"U","headers":{"Content-Type":"T"},"confirm_url":"C"}"#);
        assert_eq!(
            d,
            UploadDescriptor {
                upload_url: "U".into(),
                content_type: "T".into(),
                confirm_url: "C".into(),
            }
        );
    }

    #[test]
    fn content_type_key_is_matched_case_insensitively() {
        let d = descriptor(r#"{"url":"U","headers":{"content-type":"text/plain"},"confirm_url":"C"}"#);
        assert_eq!(d.content_type, "text/plain");
    }

    #[test]
    fn missing_content_type_defaults_to_octet_stream() {
        let d = descriptor(r#"{"url":"U","headers":{"X-Other":"1"},"confirm_url":"C"}"#);
        assert_eq!(d.content_type, DEFAULT_CONTENT_TYPE);

        let d = descriptor(r#"{"url":"U","confirm_url":"C"}"#);
        assert_eq!(d.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn slot_without_confirm_url_is_rejected() {
        assert!(serde_json::from_str::<UploadSlot>(r#"{"url":"U","headers":{}}"#).is_err());
    }

    #[test]
    fn login_info_keeps_metadata() {
        let info: LoginInfo = serde_json::from_str(
            r#"{
                "token": "X",
                "device_description": "cli",
                "created": 1700000000,
                "expires": 1800000000,
                "remote_wipe": false,
                "id": "abc",
                "userid": 42,
                "user_eid": 7,
                "login": "user@example.com",
                "domain": "example.com",
                "name": "User",
                "offer_url": "",
                "company_id": 3,
                "previous_login_date": 1690000000,
                "previous_login_ip": "127.0.0.1"
            }"#,
        )
        .unwrap();

        assert_eq!(info.token, "X");
        assert_eq!(info.user_id, Some(42));
        assert_eq!(info.previous_login_ip.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn login_info_needs_only_token() {
        let info: LoginInfo = serde_json::from_str(r#"{"token":"X"}"#).unwrap();
        assert_eq!(info.token, "X");
        assert!(info.expires.is_none());

        assert!(serde_json::from_str::<LoginInfo>(r#"{"id":"abc"}"#).is_err());
    }

    #[test]
    fn login_request_body() {
        let body = serde_json::to_value(LoginRequest {
            login: "user",
            password: "secret",
            permanent_auth: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"login": "user", "password": "secret", "permanent_auth": true})
        );
    }
}
