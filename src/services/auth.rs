use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::User;

use super::base_url;

const AUTHORIZE_PATH: &str = "auth/v1/authorize";
const USER_PATH: &str = "auth/v1/user";
const LOGOUT_PATH: &str = "auth/v1/logout";

/// Client for the record store's hosted auth service.
pub struct AuthClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl AuthClient {
    pub fn new(base: &str, api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url(base)?,
            api_key,
        })
    }

    /// URL that starts the OAuth flow with `provider` in a browser.
    pub fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.join(AUTHORIZE_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider);
            if let Some(redirect_to) = redirect_to {
                query.append_pair("redirect_to", redirect_to);
            }
        }
        Ok(url)
    }

    /// Resolves an access token to the signed-in user.
    pub async fn get_user(&self, access_token: &str) -> Result<User> {
        let response = self
            .client
            .get(self.base_url.join(USER_PATH)?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Auth("Session is invalid or expired".to_string()))
            }
            status => {
                let error_text = response.text().await?;
                Err(AppError::Auth(format!("API error ({status}): {error_text}")))
            }
        }
    }

    /// Revokes the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.base_url.join(LOGOUT_PATH)?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::Auth(format!("Sign-out failed ({status}): {error_text}")));
        }
        Ok(())
    }
}
