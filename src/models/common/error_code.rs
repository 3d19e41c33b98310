use crate::errors::PeerReviewError;

/// 业务错误码（写入 ApiResponse.code）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    StateConflict = 1009,

    // 互评
    ReviewAlreadyCompleted = 4001,
    ReviewCriterionInvalid = 4002,
    ReviewScoreOutOfRange = 4003,
}

impl ErrorCode {
    /// 将领域错误映射为 (HTTP 状态码, 业务错误码)
    pub fn from_error(err: &PeerReviewError) -> (actix_web::http::StatusCode, ErrorCode) {
        use actix_web::http::StatusCode;

        match err {
            PeerReviewError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            PeerReviewError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            PeerReviewError::InvalidState(_) => {
                (StatusCode::CONFLICT, ErrorCode::StateConflict)
            }
            PeerReviewError::AlreadyCompleted(_) => {
                (StatusCode::CONFLICT, ErrorCode::ReviewAlreadyCompleted)
            }
            PeerReviewError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            PeerReviewError::InvalidCriterion(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ReviewCriterionInvalid)
            }
            PeerReviewError::ScoreOutOfRange(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ReviewScoreOutOfRange)
            }
            PeerReviewError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        let cases = [
            (PeerReviewError::not_found("x"), StatusCode::NOT_FOUND),
            (PeerReviewError::forbidden("x"), StatusCode::FORBIDDEN),
            (PeerReviewError::invalid_state("x"), StatusCode::CONFLICT),
            (PeerReviewError::already_completed("x"), StatusCode::CONFLICT),
            (PeerReviewError::score_out_of_range("x"), StatusCode::BAD_REQUEST),
            (PeerReviewError::invalid_criterion("x"), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorCode::from_error(&err).0, status, "{err}");
        }
    }

    #[test]
    fn test_database_errors_are_internal() {
        let (status, code) = ErrorCode::from_error(&PeerReviewError::database_operation("boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::InternalServerError);
    }
}
