//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里负责：
//! - 重新导出供本 crate 使用
//! - 把仓储层错误 [`RepoError`] 桥接为 [`AppError`]
//!
//! # 使用示例
//!
//! ```ignore
//! let attr = store.find_attribute(id).await?
//!     .ok_or_else(|| AppError::attribute_not_found(id))?;
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Conflict(msg) => AppError::invalid_operation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository failure");
                AppError::database(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.kind(), ErrorKind::System);

        let err: AppError = RepoError::Validation("option 9 is not owned".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: AppError = RepoError::NotFound("Attribute 3".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: AppError = RepoError::Conflict("Attribute 3 is now number".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }
}
