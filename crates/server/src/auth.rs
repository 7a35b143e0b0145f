use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use service::ragflow::RagflowService;

/// Permission claim required for content and knowledge-base reads.
pub const PERM_KB_READ: &str = "kb:read";
/// Permission claim required for administrative mutations.
pub const PERM_CONTENT_MANAGE: &str = "content:manage";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub ragflow: Arc<RagflowService>,
}

/// Bearer token claims. `perms` carries the permission strings checked by
/// the per-route guard.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthClaims {
    pub sub: String,
    #[serde(default)]
    pub perms: Vec<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

impl AuthClaims {
    pub fn has_perm(&self, perm: &str) -> bool {
        self.perms.iter().any(|p| p == perm)
    }
}

/// 全局中间件：除健康检查与文档外，校验 Authorization: Bearer <token>
/// 缺失 token 返回 400，非法或过期返回 401；失败记录日志
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // 白名单：健康检查、Swagger 文档、CORS 预检
    if path == "/health"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match authz {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        }
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<AuthClaims>(&token, &key, &validation) {
        Ok(data) => {
            // claims 注入 request 扩展，供权限校验使用
            req.extensions_mut().insert(data.claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Per-route-group guard: requires a permission claim injected by the
/// bearer middleware.
pub async fn require_permission(
    perm: &'static str,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(claims) = req.extensions().get::<AuthClaims>() else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if !claims.has_perm(perm) {
        tracing::warn!(sub = %claims.sub, perm, "permission denied");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}
