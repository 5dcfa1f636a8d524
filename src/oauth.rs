// Copyright 2026 pyke.io
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The three-legged OAuth handshake: register an app, send the operator to the consent page, trade the code they get
//! back for a bearer token.

use std::fmt;

use reqwest::{header, header::HeaderValue};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;

use crate::{
	config::OAuthConfig,
	error::{Error, RequestError},
	util::SimdJsonResponseBody
};

const USER_AGENT: &str = concat!("mastodon-stream/", env!("CARGO_PKG_VERSION"));

/// Credentials of the OAuth application registered for this run.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
	pub client_id: String,
	pub client_secret: String,
	pub redirect_uri: String
}

/// Bearer token authorizing requests on behalf of the operator.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	pub fn secret(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for AccessToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AccessToken(<redacted>)")
	}
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
	access_token: String
}

pub(crate) fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client, RequestError> {
	let mut headers = header::HeaderMap::new();
	headers.append(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
	Ok(reqwest::Client::builder()
		.default_headers(headers)
		.connect_timeout(timeout)
		.read_timeout(timeout)
		.build()?)
}

/// Joins `path` onto a base URL, keeping whatever path prefix the base already has.
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
	Url::parse(&format!("{}/{}", base_url.as_str().trim_end_matches('/'), path.trim_start_matches('/')))
}

/// `{base}/api/v1/apps`
pub fn apps_url(base_url: &Url) -> Result<Url, url::ParseError> {
	endpoint(base_url, "api/v1/apps")
}

/// `{base}/oauth/token`
pub fn token_url(base_url: &Url) -> Result<Url, url::ParseError> {
	endpoint(base_url, "oauth/token")
}

/// Builds the consent page URL the operator has to visit.
///
/// `target` is the server hosting the consent page, `redirect_uri` the one the application was registered with. Both are
/// handed to the server unchanged; it is up to the server to reconcile them. The client secret never goes into the URL.
pub fn authorization_url(client_id: &str, _client_secret: &str, target: &str, scope: &str, redirect_uri: &str) -> Result<Url, Error> {
	let base = Url::parse(target).map_err(Error::AuthorizationUrl)?;
	let page = endpoint(&base, "oauth/authorize").map_err(Error::AuthorizationUrl)?;
	Url::parse_with_params(page.as_str(), [
		("client_id", client_id),
		("response_type", "code"),
		("redirect_uri", redirect_uri),
		("scope", scope)
	])
	.map_err(Error::AuthorizationUrl)
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
	http: reqwest::Client,
	config: OAuthConfig
}

impl OAuthClient {
	pub fn new(config: OAuthConfig) -> Result<Self, Error> {
		let http = build_http_client(config.timeout).map_err(Error::Registration)?;
		Ok(Self { http, config })
	}

	async fn post_form<T: DeserializeOwned>(&self, url: Url, form: &[(&str, &str)]) -> Result<T, RequestError> {
		self.http.post(url).form(form).send().await?.simd_json().await
	}

	/// Registers a fresh OAuth application on the server at `base_url`.
	pub async fn register_app(&self, base_url: &Url) -> Result<AppCredentials, Error> {
		let url = apps_url(base_url).map_err(|e| Error::Registration(e.into()))?;
		tracing::debug!(%url, app_name = %self.config.app_name, "registering application");
		let credentials: AppCredentials = self
			.post_form(url, &[
				("client_name", self.config.app_name.as_str()),
				("redirect_uris", self.config.redirect_uri.as_str()),
				("scopes", self.config.scope.as_str())
			])
			.await
			.map_err(Error::Registration)?;
		tracing::debug!(client_id = %credentials.client_id, "application registered");
		Ok(credentials)
	}

	/// The consent page for `credentials`, on the configured authorization target.
	pub fn authorization_url(&self, credentials: &AppCredentials) -> Result<Url, Error> {
		authorization_url(
			&credentials.client_id,
			&credentials.client_secret,
			&self.config.authorization_target,
			&self.config.scope,
			&credentials.redirect_uri
		)
	}

	/// Redeems the code the operator copied from the consent page.
	pub async fn exchange_code(&self, credentials: &AppCredentials, auth_code: &str, base_url: &Url) -> Result<AccessToken, Error> {
		let url = token_url(base_url).map_err(|e| Error::TokenExchange(e.into()))?;
		tracing::debug!(%url, "exchanging authorization code");
		let response: TokenResponse = self
			.post_form(url, &[
				("grant_type", "authorization_code"),
				("code", auth_code.trim()),
				("client_id", credentials.client_id.as_str()),
				("client_secret", credentials.client_secret.as_str()),
				("redirect_uri", credentials.redirect_uri.as_str())
			])
			.await
			.map_err(Error::TokenExchange)?;
		Ok(AccessToken::new(response.access_token))
	}
}
