//! 通用工具函数

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Trim a free-text field; blank becomes `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalize a slug: trimmed, lower-cased, blank → `None`.
pub fn normalize_slug(value: Option<&str>) -> Option<String> {
    normalize_optional(value).map(|s| s.to_lowercase())
}
