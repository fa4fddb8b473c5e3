use luncheon_shared::{
    api::{CreateCommentRequest, UpdateReactionRequest},
    Comment, CommentBody, ReactionKind, Scope,
};
use reqwest::{Client, RequestBuilder, StatusCode};

use super::CommentBackend;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Resource not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// REST client for the site's comment endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `token` as a bearer credential on every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Check if a credential is attached
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Add auth header if we have a token
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn comments_url(&self, scope: &Scope) -> String {
        let mut url = self.url("/comments");
        if let Some(show_id) = scope.show_id() {
            url.push_str(&format!("?showId={}", urlencoding::encode(show_id)));
        }
        url
    }

    /// Handle API response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            _ => Err(Self::error_for(status, response).await),
        }
    }

    /// Handle a response whose body we don't need
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(Self::error_for(status, response).await),
        }
    }

    async fn error_for(status: StatusCode, response: reqwest::Response) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                ApiError::Validation(text)
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                ApiError::Server(format!("{}: {}", status, text))
            }
        }
    }
}

impl CommentBackend for ApiClient {
    async fn list(&self, scope: &Scope) -> Result<Vec<Comment>, ApiError> {
        let response = self
            .authorize(self.client.get(self.comments_url(scope)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn create(&self, req: &CreateCommentRequest) -> Result<CommentBody, ApiError> {
        let response = self
            .authorize(self.client.post(self.url("/comments")))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn update_reaction(&self, comment_id: &str, kind: ReactionKind) -> Result<(), ApiError> {
        let req = UpdateReactionRequest { kind };
        let path = format!("/comments/{}/reactions", urlencoding::encode(comment_id));
        let response = self
            .authorize(self.client.post(self.url(&path)))
            .json(&req)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    async fn delete(&self, comment_id: &str) -> Result<(), ApiError> {
        let path = format!("/comments/{}", urlencoding::encode(comment_id));
        let response = self
            .authorize(self.client.delete(self.url(&path)))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}
