//! HTTP gateway for a kancolle.io-style roster service: token login, JSON
//! envelope decoding, and the roster CRUD endpoints.

use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::roster::ship::ShipRecord;

use super::wire::{ApiEnvelope, LoginSession, RemoteShip};
use super::{RemoteError, RemoteGateway};

pub struct HttpGateway {
    client: Client,
    base_url: String,
    user: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, user: &str) -> HttpGateway {
        HttpGateway {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            token: None,
        }
    }

    /// POST `auth/login` and keep the returned session token for every later
    /// request.
    pub async fn login(&mut self, password: &str) -> Result<(), RemoteError> {
        let credentials = serde_json::json!({
            "username": self.user,
            "password": password,
        });
        let request = self
            .client
            .post(self.endpoint("auth/login"))
            .json(&credentials);
        let session: LoginSession = self.execute(request).await?;
        self.token = Some(session.token);
        debug!("logged in as {}", self.user);
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token);
        }
        request
    }

    /// Sends a request and decodes the service envelope. Classification order
    /// follows the service contract: an "error" status in the body wins over
    /// the HTTP status, which wins over body decode problems.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if let Some(rejection) = sniff_rejection(&text) {
            return Err(rejection);
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.data)
    }

    /// Delete variant: the service acknowledges with 204 and no body.
    async fn execute_no_content(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        let text = response.text().await?;
        if let Some(rejection) = sniff_rejection(&text) {
            return Err(rejection);
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// A body whose root carries `status: "error"` is a logical rejection with its
/// `message`, whatever the HTTP status said.
fn sniff_rejection(body: &str) -> Option<RemoteError> {
    let root: serde_json::Value = serde_json::from_str(body).ok()?;
    if root.get("status").and_then(|status| status.as_str()) != Some("error") {
        return None;
    }
    let message = root
        .get("message")
        .and_then(|message| message.as_str())
        .unwrap_or("unspecified error")
        .to_string();
    Some(RemoteError::Rejected { message })
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn create_ship(&self, ship: &ShipRecord) -> Result<RemoteShip, RemoteError> {
        let payload = RemoteShip::from_record(ship);
        let path = format!("roster/{}", self.user);
        debug!("POST {path} (ship {})", ship.instance_id);
        self.execute(self.authorized(Method::POST, &path).json(&payload))
            .await
    }

    async fn update_ship(
        &self,
        instance_id: i64,
        ship: &ShipRecord,
    ) -> Result<RemoteShip, RemoteError> {
        let payload = RemoteShip::from_record(ship);
        let path = format!("roster/{}/{instance_id}", self.user);
        debug!("PUT {path}");
        self.execute(self.authorized(Method::PUT, &path).json(&payload))
            .await
    }

    async fn delete_ship(&self, instance_id: i64) -> Result<(), RemoteError> {
        let path = format!("roster/{}/{instance_id}", self.user);
        debug!("DELETE {path}");
        self.execute_no_content(self.authorized(Method::DELETE, &path))
            .await
    }

    async fn fetch_roster(&self, fields: &[&str]) -> Result<Vec<RemoteShip>, RemoteError> {
        let path = format!("roster/{}", self.user);
        let request = self
            .authorized(Method::GET, &path)
            .query(&[("fields", fields.join(","))]);
        debug!("GET {path}?fields={}", fields.join(","));
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::{sniff_rejection, HttpGateway};
    use crate::remote::RemoteError;

    #[test]
    fn rejection_sniffing_reads_the_service_message() {
        let err = sniff_rejection(r#"{"status": "error", "message": "ship not found"}"#);
        match err {
            Some(RemoteError::Rejected { message }) => assert_eq!(message, "ship not found"),
            other => panic!("expected a rejection, got {other:?}"),
        }
        assert!(sniff_rejection(r#"{"status": "ok", "data": []}"#).is_none());
        assert!(sniff_rejection("not json").is_none());
    }

    #[test]
    fn endpoints_join_without_doubled_slashes() {
        let gateway = HttpGateway::new("http://api.example.test/v1/", "teitoku");
        assert_eq!(
            gateway.endpoint("auth/login"),
            "http://api.example.test/v1/auth/login"
        );
        assert!(!gateway.is_logged_in());
    }
}
