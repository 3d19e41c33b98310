//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_peer_review_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum PeerReviewError {
            $($variant(String),)*
        }

        impl PeerReviewError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PeerReviewError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PeerReviewError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PeerReviewError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PeerReviewError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PeerReviewError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_peer_review_errors! {
    NotFound("E001", "Resource Not Found"),
    Forbidden("E002", "Forbidden"),
    InvalidState("E003", "Invalid State"),
    Validation("E004", "Validation Error"),
    InvalidCriterion("E005", "Invalid Criterion"),
    ScoreOutOfRange("E006", "Score Out Of Range"),
    AlreadyCompleted("E007", "Review Already Completed"),
    Authentication("E008", "Authentication Error"),
    DatabaseConfig("E009", "Database Configuration Error"),
    DatabaseConnection("E010", "Database Connection Error"),
    DatabaseOperation("E011", "Database Operation Error"),
    Serialization("E012", "Serialization Error"),
    FileOperation("E013", "File Operation Error"),
}

impl PeerReviewError {
    /// 是否属于校验类错误（未知评分维度、分数越界等都归为校验失败）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PeerReviewError::Validation(_)
                | PeerReviewError::InvalidCriterion(_)
                | PeerReviewError::ScoreOutOfRange(_)
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PeerReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PeerReviewError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PeerReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        PeerReviewError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PeerReviewError {
    fn from(err: std::io::Error) -> Self {
        PeerReviewError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PeerReviewError {
    fn from(err: serde_json::Error) -> Self {
        PeerReviewError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PeerReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PeerReviewError::not_found("test").code(), "E001");
        assert_eq!(PeerReviewError::invalid_state("test").code(), "E003");
        assert_eq!(PeerReviewError::already_completed("test").code(), "E007");
        assert_eq!(PeerReviewError::database_config("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            PeerReviewError::score_out_of_range("test").error_type(),
            "Score Out Of Range"
        );
        assert_eq!(
            PeerReviewError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = PeerReviewError::forbidden("Not the assigned reviewer");
        assert_eq!(err.message(), "Not the assigned reviewer");
    }

    #[test]
    fn test_validation_grouping() {
        assert!(PeerReviewError::invalid_criterion("x").is_validation());
        assert!(PeerReviewError::score_out_of_range("x").is_validation());
        assert!(PeerReviewError::validation("x").is_validation());
        assert!(!PeerReviewError::already_completed("x").is_validation());
        assert!(!PeerReviewError::invalid_state("x").is_validation());
    }

    #[test]
    fn test_format_simple() {
        let err = PeerReviewError::invalid_state("Assignment is not published");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid State"));
        assert!(formatted.contains("Assignment is not published"));
    }
}
