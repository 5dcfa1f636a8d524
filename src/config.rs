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

use std::{fmt, str::FromStr, time::Duration};

use url::Url;

use crate::{Error, util::MapNonempty};

pub const DEFAULT_BASE_URL: &str = "https://friends.nico";
pub const APP_NAME: &str = "mastodon-api-stream";
/// Server the consent page is requested from. Passed through to the authorization URL as-is.
pub const AUTHORIZATION_TARGET: &str = "https://friends.nico";
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const READ_SCOPE: &str = "read";
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which timeline to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
	/// The authenticated user's home timeline and notifications.
	User,
	/// Public posts from accounts local to the server.
	LocalTimeline,
	/// All public posts the server knows about.
	FederatedTimeline
}

impl StreamType {
	pub const ALL: [StreamType; 3] = [StreamType::User, StreamType::LocalTimeline, StreamType::FederatedTimeline];

	pub fn label(&self) -> &'static str {
		match self {
			StreamType::User => "User",
			StreamType::LocalTimeline => "Local Timeline",
			StreamType::FederatedTimeline => "Federated Timeline"
		}
	}

	/// Path of the streaming endpoint, relative to `{base}/api/v1/`.
	pub fn endpoint(&self) -> &'static str {
		match self {
			StreamType::User => "streaming/user",
			StreamType::LocalTimeline => "streaming/public/local",
			StreamType::FederatedTimeline => "streaming/public"
		}
	}
}

impl fmt::Display for StreamType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// A label didn't name any [`StreamType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStreamType(pub String);

impl fmt::Display for UnknownStreamType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown stream type `{}`", self.0)
	}
}

impl std::error::Error for UnknownStreamType {}

impl FromStr for StreamType {
	type Err = UnknownStreamType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		StreamType::ALL
			.into_iter()
			.find(|c| c.label().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownStreamType(s.to_string()))
	}
}

/// Parses an operator-supplied server address into a base URL.
///
/// Only `http` and `https` are accepted. A trailing slash (or several) is dropped so that endpoint paths can be appended
/// without doubling it.
pub fn parse_base_url(input: &str) -> Result<Url, Error> {
	let trimmed = input.trim().trim_end_matches('/');
	let url = trimmed
		.and_then_nonempty(|c| Url::parse(c).ok())
		.ok_or_else(|| Error::InvalidBaseUrl(input.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
		return Err(Error::InvalidBaseUrl(input.to_string()));
	}
	Ok(url)
}

/// Everything the operator chose before the handshake starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
	pub base_url: Url,
	pub stream_type: StreamType
}

impl SessionConfig {
	pub fn new(base_url: Url, stream_type: StreamType) -> Self {
		Self { base_url, stream_type }
	}

	/// `{base}/api/v1/{endpoint}` for the selected stream.
	pub fn stream_url(&self) -> Result<Url, url::ParseError> {
		crate::stream::stream_url(&self.base_url, self.stream_type)
	}
}

/// Fixed values used throughout the OAuth handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
	pub app_name: String,
	pub authorization_target: String,
	pub redirect_uri: String,
	pub scope: String,
	pub timeout: Duration
}

impl Default for OAuthConfig {
	fn default() -> Self {
		Self {
			app_name: APP_NAME.to_string(),
			authorization_target: AUTHORIZATION_TARGET.to_string(),
			redirect_uri: OOB_REDIRECT_URI.to_string(),
			scope: READ_SCOPE.to_string(),
			timeout: TRANSPORT_TIMEOUT
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
	/// Applied to connecting and to each read of the body, not to the lifetime of the stream.
	pub timeout: Duration
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self { timeout: TRANSPORT_TIMEOUT }
	}
}
