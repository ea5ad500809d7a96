use crate::catalog::DisplayLabels;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:catalog.db | SQLite 数据库 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志目录，存在时写入滚动日志文件 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | COMPARE_MAX_PRODUCTS | 8 | 单次对比商品数上限 |
/// | DISPLAY_YES / DISPLAY_NO | Так / Ні | 布尔值显示文本 |
/// | DISPLAY_MISSING | — | 对比表缺失值标记 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/catalog.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub db_max_connections: u32,
    pub compare_max_products: usize,
    pub display: DisplayLabels,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let defaults = DisplayLabels::default();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:catalog.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            compare_max_products: std::env::var("COMPARE_MAX_PRODUCTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(8),
            display: DisplayLabels {
                yes: std::env::var("DISPLAY_YES").unwrap_or(defaults.yes),
                no: std::env::var("DISPLAY_NO").unwrap_or(defaults.no),
                missing: std::env::var("DISPLAY_MISSING").unwrap_or(defaults.missing),
            },
        }
    }

    /// 测试用配置：内存数据库，不读取环境变量
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
            db_max_connections: 1,
            compare_max_products: 8,
            display: DisplayLabels::default(),
        }
    }
}
