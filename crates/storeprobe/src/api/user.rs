use super::{ApiClient, ApiResponse};
use crate::result::ProbeResult;
use crate::retry::RetryPolicy;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// User resource, camelCase on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<i32>,
}

/// Client for the `/user` resource
#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    /// `/user` endpoints on top of `client`
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /user`
    pub async fn create_user<B: Serialize + ?Sized>(&self, body: &B) -> ProbeResult<ApiResponse> {
        self.client.send_json(Method::POST, "/user", body).await
    }

    /// `PUT /user/{username}`
    pub async fn update_user<B: Serialize + ?Sized>(
        &self,
        username: &str,
        body: &B,
    ) -> ProbeResult<ApiResponse> {
        self.client
            .send_json(Method::PUT, &format!("/user/{username}"), body)
            .await
    }

    /// `GET /user/{username}`
    pub async fn get_user(&self, username: &str) -> ProbeResult<ApiResponse> {
        self.client
            .send(Method::GET, &format!("/user/{username}"), HeaderMap::new(), &[])
            .await
    }

    /// `DELETE /user/{username}`
    pub async fn delete_user(&self, username: &str) -> ProbeResult<ApiResponse> {
        self.client
            .send(
                Method::DELETE,
                &format!("/user/{username}"),
                HeaderMap::new(),
                &[],
            )
            .await
    }

    /// `GET /user/{username}` until it answers 200 or `policy` gives up
    pub async fn get_user_with_retry(
        &self,
        username: &str,
        policy: &RetryPolicy,
    ) -> ProbeResult<ApiResponse> {
        policy
            .run(&format!("GET /user/{username}"), move |_| async move {
                let response = self.get_user(username).await?;
                response.expect_status(200)?;
                Ok(response)
            })
            .await
    }
}
