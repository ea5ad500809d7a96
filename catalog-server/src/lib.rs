//! Catalog Server - 分类维度的动态属性系统
//!
//! # 架构
//!
//! - [`catalog`] - 属性目录、绑定继承、schema 投影、商品属性值与对比
//! - [`db`] - SQLite 连接池、迁移与仓储
//! - [`api`] - HTTP 路由 (axum)
//! - [`core`] - 配置、状态与服务器
//! - [`utils`] - 错误、日志与校验工具

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod middleware;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
