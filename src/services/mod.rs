//
// Copyright © 2025 Hardcore Engineering Inc.
//
// Licensed under the Eclipse Public License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may
// obtain a copy of the License at https://www.eclipse.org/legal/epl-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//
// See the License for the specific language governing permissions and
// limitations under the License.
//

use reqwest::{self, Response, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware as HttpClient, RequestBuilder};
use secrecy::SecretString;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{self as json, Value};
use tracing::*;

pub mod branch;
pub mod document;
pub mod employee;
pub mod expenditure;
pub mod types;
pub mod vacation;

use super::{Error, Result};
use crate::config::Config;

use branch::BranchClient;
use document::UploadClient;
use employee::EmployeeClient;
use expenditure::ExpenditureClient;
use vacation::VacationClient;

pub trait TokenProvider {
    fn provide_token(&self) -> Option<&str>;
}

pub(crate) trait RequestBuilderExt {
    fn send_ext(self) -> impl Future<Output = Result<Response>>;
}

impl RequestBuilderExt for RequestBuilder {
    async fn send_ext(self) -> Result<Response> {
        let response = self.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await?;

            Err(Error::HttpError(status, body))
        }
    }
}

pub trait ResponseExt {
    fn json_body<T: DeserializeOwned>(self) -> impl Future<Output = Result<T>>;
}

impl ResponseExt for reqwest::Response {
    async fn json_body<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;

        serde_json::from_str::<T>(&body).map_err(|error| {
            error!(%body, %error);
            Error::Serde(error)
        })
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    json::from_value(value).map_err(|error| {
        error!(%error, "Cannot deserialize response");
        Error::Serde(error)
    })
}

/// Plain REST verbs over the middleware client, with bearer injection and
/// trace logging.
pub(crate) trait JsonClient {
    fn get_json<U: TokenProvider, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
    ) -> impl Future<Output = Result<R>>;

    fn post_json<U: TokenProvider, Q: Serialize, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
        body: &Q,
    ) -> impl Future<Output = Result<R>>;

    fn put_json<U: TokenProvider, Q: Serialize, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
        body: &Q,
    ) -> impl Future<Output = Result<R>>;

    fn delete_json<U: TokenProvider, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
    ) -> impl Future<Output = Result<R>>;
}

impl JsonClient for HttpClient {
    #[tracing::instrument(
        level = "trace",
        skip(self, user, url),
        fields(%url, method = "get", type = "json")
    )]
    async fn get_json<U: TokenProvider, R: DeserializeOwned>(&self, user: U, url: Url) -> Result<R> {
        trace!("request");

        let mut request = self.get(url.clone());

        if let Some(token) = user.provide_token() {
            request = request.bearer_auth(token);
        }

        request.send_ext().await?.json_body::<R>().await
    }

    async fn post_json<U: TokenProvider, Q: Serialize, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
        body: &Q,
    ) -> Result<R> {
        let body = json::to_value(body)?;

        trace!(type="json", %url, method="post", %body, "http request");

        let mut request = self.post(url.clone()).json(&body);

        if let Some(token) = user.provide_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send_ext().await?.json::<Value>().await?;

        trace!(type="json", %url, method="post", %response, "http response");

        from_value(response)
    }

    async fn put_json<U: TokenProvider, Q: Serialize, R: DeserializeOwned>(
        &self,
        user: U,
        url: Url,
        body: &Q,
    ) -> Result<R> {
        let body = json::to_value(body)?;

        trace!(type="json", %url, method="put", %body, "http request");

        let mut request = self.put(url.clone()).json(&body);

        if let Some(token) = user.provide_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send_ext().await?.json::<Value>().await?;

        trace!(type="json", %url, method="put", %response, "http response");

        from_value(response)
    }

    async fn delete_json<U: TokenProvider, R: DeserializeOwned>(&self, user: U, url: Url) -> Result<R> {
        trace!(type="json", %url, method="delete", "http request");

        let mut request = self.delete(url.clone());

        if let Some(token) = user.provide_token() {
            request = request.bearer_auth(token);
        }

        request.send_ext().await?.json_body::<R>().await
    }
}

/// Failure payload the backend sends alongside `success: false`.
#[derive(Deserialize, Debug, Clone, thiserror::Error)]
pub struct ApiError {
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Write-endpoint response envelope.
#[derive(Deserialize, Debug, Clone)]
pub struct Ack {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub(crate) fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Api(ApiError {
                message: self
                    .message
                    .unwrap_or_else(|| String::from("request rejected")),
            }))
        }
    }
}

#[derive(Clone)]
pub struct ServiceFactory {
    config: Config,
    http: HttpClient,
}

impl ServiceFactory {
    pub fn new(config: Config) -> Self {
        #[cfg(feature = "reqwest_middleware")]
        let http = {
            use reqwest::StatusCode;
            use reqwest_retry::{
                RetryTransientMiddleware, Retryable, RetryableStrategy,
                default_on_request_failure, policies::ExponentialBackoff,
            };

            struct ApiStrategy;

            impl RetryableStrategy for ApiStrategy {
                #[tracing::instrument(level = "debug", skip_all)]
                fn handle(
                    &self,
                    res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
                ) -> Option<Retryable> {
                    match res {
                        Ok(success) => match success.status() {
                            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
                                let retry_after = success
                                    .headers()
                                    .get("Retry-After")
                                    .and_then(|h| h.to_str().ok())
                                    .unwrap_or("");

                                warn!(code = %success.status(), retry_after, "Transient error");

                                Some(Retryable::Transient)
                            }

                            other => {
                                if other.is_success() {
                                    None
                                } else {
                                    Some(Retryable::Fatal)
                                }
                            }
                        },
                        Err(error) => default_on_request_failure(error),
                    }
                }
            }

            let policy = ExponentialBackoff::builder().build_with_max_retries(3);

            ClientBuilder::new(reqwest::Client::new())
                .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                    policy,
                    ApiStrategy,
                ))
                .build()
        };

        #[cfg(not(feature = "reqwest_middleware"))]
        let http = { ClientBuilder::new(reqwest::Client::new()).build() };

        Self { config, http }
    }

    pub fn new_employee_client(&self, token: impl Into<SecretString>) -> EmployeeClient {
        EmployeeClient::new(&self.config, self.http.clone(), token)
    }

    pub fn new_branch_client(&self, token: impl Into<SecretString>) -> BranchClient {
        BranchClient::new(&self.config, self.http.clone(), token)
    }

    pub fn new_vacation_client(&self, token: impl Into<SecretString>) -> VacationClient {
        VacationClient::new(&self.config, self.http.clone(), token)
    }

    pub fn new_expenditure_client(&self, token: impl Into<SecretString>) -> ExpenditureClient {
        ExpenditureClient::new(&self.config, self.http.clone(), token)
    }

    pub fn new_upload_client(&self, token: impl Into<SecretString>) -> UploadClient {
        UploadClient::new(&self.config, self.http.clone(), token)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
