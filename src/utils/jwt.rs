use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体（令牌由外部认证服务签发，这里只负责校验）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 解析用户 ID
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_secret(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 使用指定密钥验证 JWT token
    pub fn verify_token_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token_with_secret(token, secret)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 使用全局配置中的密钥验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_access_token_with_secret(token, &Self::get_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_roundtrip() {
        let token = JwtUtils::generate_token_with_secret(
            42,
            "teacher",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(5),
            SECRET,
        )
        .unwrap();
        let claims = JwtUtils::verify_access_token_with_secret(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_rejects_refresh_token_and_wrong_secret() {
        let refresh = JwtUtils::generate_token_with_secret(
            1,
            "user",
            "refresh",
            chrono::Duration::minutes(5),
            SECRET,
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token_with_secret(&refresh, SECRET).is_err());

        let access = JwtUtils::generate_token_with_secret(
            1,
            "user",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(5),
            SECRET,
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token_with_secret(&access, "other").is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let token = JwtUtils::generate_token_with_secret(
            1,
            "user",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::hours(-2),
            SECRET,
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token_with_secret(&token, SECRET).is_err());
    }
}
