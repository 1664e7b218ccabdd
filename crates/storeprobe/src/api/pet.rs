use super::{ApiClient, ApiResponse};
use crate::result::{ProbeError, ProbeResult};
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sale status of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// In stock
    Available,
    /// Reserved
    Pending,
    /// Gone
    Sold,
}

impl PetStatus {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pet category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Free-form pet tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Pet resource. The service requires `name` and `photoUrls`, but every
/// field is optional here so incomplete payloads can be sent on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Pet {
    /// Pet with just an id, a name and a status
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Client for the `/pet` resource
#[derive(Debug, Clone)]
pub struct PetApi {
    client: ApiClient,
    api_key: Option<String>,
}

impl PetApi {
    /// Create a client; `api_key` is only needed for deletes
    #[must_use]
    pub const fn new(client: ApiClient, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    /// `POST /pet`
    pub async fn create_pet<B: Serialize + ?Sized>(&self, body: &B) -> ProbeResult<ApiResponse> {
        self.client.send_json(Method::POST, "/pet", body).await
    }

    /// `PUT /pet`; the pet is identified by the id inside `body`
    pub async fn update_pet<B: Serialize + ?Sized>(&self, body: &B) -> ProbeResult<ApiResponse> {
        self.client.send_json(Method::PUT, "/pet", body).await
    }

    /// `GET /pet/{id}`.
    ///
    /// `id` is inserted verbatim, so an empty id requests the collection path.
    pub async fn get_pet(&self, id: impl fmt::Display) -> ProbeResult<ApiResponse> {
        self.client
            .send(Method::GET, &format!("/pet/{id}"), HeaderMap::new(), &[])
            .await
    }

    /// `GET /pet/findByStatus?status=a,b`
    pub async fn find_by_status(&self, statuses: &[PetStatus]) -> ProbeResult<ApiResponse> {
        let joined = statuses
            .iter()
            .map(PetStatus::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        self.client
            .send(
                Method::GET,
                "/pet/findByStatus",
                headers,
                &[("status", joined)],
            )
            .await
    }

    /// `DELETE /pet/{id}` authorised with the `api_key` header
    pub async fn delete_pet(&self, id: impl fmt::Display) -> ProbeResult<ApiResponse> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProbeError::MissingConfig {
                key: "api key".to_string(),
            })?;
        let value = HeaderValue::from_str(key).map_err(|err| ProbeError::InvalidConfig {
            key: "api key".to_string(),
            reason: err.to_string(),
        })?;
        let mut headers = HeaderMap::new();
        let _ = headers.insert("api_key", value);
        self.client
            .send(Method::DELETE, &format!("/pet/{id}"), headers, &[])
            .await
    }

    /// `GET /pet/{id}` until it answers 200 or `policy` gives up
    pub async fn get_pet_with_retry(
        &self,
        id: i64,
        policy: &RetryPolicy,
    ) -> ProbeResult<ApiResponse> {
        policy
            .run(&format!("GET /pet/{id}"), move |_| async move {
                let response = self.get_pet(id).await?;
                response.expect_status(200)?;
                Ok(response)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_pet_wire_format() {
        let pet = Pet::new(1234567, "TestPet_1234567", PetStatus::Available);
        assert_eq!(
            serde_json::to_value(&pet).unwrap(),
            json!({"id": 1234567, "name": "TestPet_1234567", "status": "available"})
        );
    }

    #[test]
    fn test_full_pet_decodes() {
        let body = json!({
            "id": 9,
            "category": {"id": 1, "name": "dogs"},
            "name": "doggie",
            "photoUrls": ["http://img"],
            "tags": [{"id": 0, "name": "tag"}],
            "status": "sold"
        });
        let pet: Pet = serde_json::from_value(body).unwrap();
        assert_eq!(pet.status, Some(PetStatus::Sold));
        assert_eq!(pet.photo_urls.unwrap(), vec!["http://img".to_string()]);
        assert_eq!(pet.category.unwrap().name.as_deref(), Some("dogs"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<Pet, _> = serde_json::from_value(json!({"status": "lost"}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_without_key_fails_before_sending() {
        // nothing listens on this port; reaching the network would be an Http error
        let client = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let api = PetApi::new(client, None);
        let err = api.delete_pet(5).await.unwrap_err();
        assert!(matches!(err, ProbeError::MissingConfig { ref key } if key == "api key"));
    }

    #[tokio::test]
    async fn test_delete_with_unusable_key_fails_before_sending() {
        let client = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let api = PetApi::new(client, Some("special\nkey".to_string()));
        let err = api.delete_pet(5).await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidConfig { ref key, .. } if key == "api key"));
        assert!(!matches!(err, ProbeError::MissingConfig { .. }));
    }
}
