use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::JwtConfig;
use crate::errors::AuthError;
use crate::models::auth::entities::{Identity, UserRole};

pub const BEARER_PREFIX: &str = "Bearer ";
pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，本服务只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

/// 令牌签发与校验
///
/// 密钥在启动时从配置读取一次，之后通过 `web::Data<JwtUtils>` 注入到中间件中。
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: chrono::Duration,
}

impl JwtUtils {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry: chrono::Duration::minutes(config.access_token_expiry),
        }
    }

    // 生成 Access Token
    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: &UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate_token_with_expiry(
            user_id,
            &role.to_string(),
            ACCESS_TOKEN_TYPE,
            self.access_token_expiry,
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        &self,
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = self.verify_token(token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    /// 校验 `Authorization` 头并解析出调用者身份
    pub fn verify(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::Missing)?;

        let claims = self.verify_access_token(token.trim()).map_err(|err| {
            info!("JWT token validation failed: {}", err);
            AuthError::Invalid
        })?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::Invalid)?;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| AuthError::Invalid)?;

        Ok(Identity { id, role })
    }
}
