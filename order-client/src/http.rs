// order-client/src/http.rs
// HTTP 客户端 - 网络通信

use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::client::{
    CreateOrderRequest, CreateOrderResponse, InitiatePaymentRequest, InitiatePaymentResponse,
    KitchenLoginRequest, LoginRequest, LoginResponse, UpdateStatusRequest,
};
use shared::order::{Order, OrderStatus};

/// Server response envelope ({ success, data, error })
#[derive(serde::Deserialize)]
struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// The order store's client-facing contract.
///
/// Implemented by [`NetworkHttpClient`] for real deployments and by
/// in-memory fakes in tests.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `POST /api/orders` - unauthenticated customer action
    async fn create_order(&self, req: &CreateOrderRequest) -> ClientResult<CreateOrderResponse>;

    /// `GET /api/kitchen/orders` - kitchen-or-admin
    async fn fetch_active_orders(&self) -> ClientResult<Vec<Order>>;

    /// `PATCH /api/orders/{id}/status` - kitchen-or-admin
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<Order>;

    /// `POST /api/payment/initiate` - customer payment handoff
    async fn initiate_payment(
        &self,
        req: &InitiatePaymentRequest,
    ) -> ClientResult<InitiatePaymentResponse>;
}

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 当前令牌
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// 设置 Bearer 令牌 (登录后调用)
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            // 尝试解析为 API 错误响应
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(ClientError::AccessDenied(message))
                }
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                _ => Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                }),
            };
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.success {
            return Err(ClientError::InvalidResponse(
                envelope.error.unwrap_or_else(|| "Unknown error".into()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing response data".into()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.get(&url);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.post(&url).json(body);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn patch<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.patch(&url).json(body);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.delete(&url);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }

    // ========== Auth ==========

    /// 管理员登录；成功后自动携带令牌
    pub async fn login_admin(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.post("/api/admin/login", &req).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    /// 厨房 PIN 登录
    pub async fn login_kitchen(&mut self, pin: &str) -> ClientResult<LoginResponse> {
        let req = KitchenLoginRequest {
            pin: pin.to_string(),
        };
        let resp: LoginResponse = self.post("/api/kitchen/login", &req).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }
}

#[async_trait]
impl OrderApi for NetworkHttpClient {
    async fn create_order(&self, req: &CreateOrderRequest) -> ClientResult<CreateOrderResponse> {
        self.post("/api/orders", req).await
    }

    async fn fetch_active_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/kitchen/orders").await
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<Order> {
        self.patch(
            &format!("/api/orders/{order_id}/status"),
            &UpdateStatusRequest { status },
        )
        .await
    }

    async fn initiate_payment(
        &self,
        req: &InitiatePaymentRequest,
    ) -> ClientResult<InitiatePaymentResponse> {
        self.post("/api/payment/initiate", req).await
    }
}
