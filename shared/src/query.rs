//! 查询请求类型
//!
//! 属性列表的搜索与分页。

use serde::{Deserialize, Serialize};

/// 默认每页数量
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// 每页数量上限
pub const MAX_PAGE_SIZE: u32 = 100;

/// 属性列表查询
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeQuery {
    /// 按名称或 slug 模糊搜索 (不区分大小写)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 页码 (从 1 开始)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// 每页数量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl AttributeQuery {
    /// 创建带搜索词的查询
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    /// 规范化后的搜索词 (空白视为无搜索)
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// 页码, 至少为 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// 每页数量, 限制在 1..=MAX_PAGE_SIZE
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// 跳过的记录数
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(u64::from(limit)) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
