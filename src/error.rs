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

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single HTTP exchange with the server failed.
#[derive(Debug, Error)]
pub enum RequestError {
	#[error("request timed out")]
	TimedOut,
	#[error("request returned bad HTTP status: {0}")]
	BadStatus(StatusCode),
	#[error("error when deserializing: {0}")]
	Deserialization(#[from] simd_json::Error),
	#[error("request error: {0}")]
	Transport(reqwest::Error),
	#[error("malformed event stream: {0}")]
	MalformedEvent(String),
	#[error("Error parsing URL: {0}")]
	Url(#[from] url::ParseError)
}

impl From<reqwest::Error> for RequestError {
	fn from(value: reqwest::Error) -> Self {
		if value.is_timeout() {
			RequestError::TimedOut
		} else if let Some(status) = value.status().filter(|_| value.is_status()) {
			RequestError::BadStatus(status)
		} else {
			RequestError::Transport(value)
		}
	}
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("failed to register OAuth application: {0}")]
	Registration(#[source] RequestError),
	#[error("failed to build authorization URL: {0}")]
	AuthorizationUrl(#[source] url::ParseError),
	#[error("failed to exchange authorization code for a token: {0}")]
	TokenExchange(#[source] RequestError),
	#[error("stream error: {0}")]
	Stream(#[source] RequestError),
	#[error("Invalid base URL `{0}`")]
	InvalidBaseUrl(String),
	#[error("prompt error: {0}")]
	Prompt(#[from] rustyline::error::ReadlineError),
	#[error("input cancelled")]
	Cancelled
}

impl Error {
	/// The failed HTTP exchange behind this error, if there was one.
	pub fn request_error(&self) -> Option<&RequestError> {
		match self {
			Error::Registration(e) | Error::TokenExchange(e) | Error::Stream(e) => Some(e),
			_ => None
		}
	}
}
