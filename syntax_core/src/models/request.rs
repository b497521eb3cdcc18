//! Request and response envelopes

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexNowRequest {
    #[serde(rename = "urlList", default)]
    pub url_list: Option<serde_json::Value>,
}

impl IndexNowRequest {
    /// The submitted URLs, or `None` unless `urlList` is a non-empty array of strings.
    pub fn urls(&self) -> Option<Vec<String>> {
        let list = self.url_list.as_ref()?.as_array()?;
        if list.is_empty() {
            return None;
        }

        list.iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}
