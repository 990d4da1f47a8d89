//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 reqwest Client，只暴露"带鉴权发请求"的能力

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{SubmitError, SubmitResult};

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 Client 资源（连接池、超时）
/// - 统一附加 accept / authorization 请求头
/// - 不认识题目 / 提交
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// 根据配置创建执行器
    pub fn new(config: &Config) -> SubmitResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SubmitError::http("client", e))?;
        Ok(Self { client })
    }

    /// 构建请求头
    ///
    /// 令牌按存储的原样放入 authorization，不做任何前缀处理
    pub fn headers(token: &str) -> SubmitResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        let auth = HeaderValue::from_str(token)
            .map_err(|e| SubmitError::Config(format!("authorization 令牌非法: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    /// 发送 GET 请求
    pub async fn get(&self, url: &str, token: &str) -> SubmitResult<Response> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .headers(Self::headers(token)?)
            .send()
            .await
            .map_err(|e| SubmitError::http(url, e))
    }

    /// 发送 JSON POST 请求
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> SubmitResult<Response> {
        debug!("POST {}", url);
        self.client
            .post(url)
            .headers(Self::headers(token)?)
            .json(body)
            .send()
            .await
            .map_err(|e| SubmitError::http(url, e))
    }
}
