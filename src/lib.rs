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

pub mod browser;
pub mod config;
pub mod error;
pub mod oauth;
pub mod prompt;
pub mod render;
pub mod stream;

pub(crate) mod util;

pub use self::{
	config::{OAuthConfig, SessionConfig, StreamConfig, StreamType},
	error::{Error, RequestError},
	oauth::{AccessToken, AppCredentials, OAuthClient},
	render::{RenderedLine, Renderer},
	stream::{Message, StreamClient, StreamEvent, Subscription}
};
