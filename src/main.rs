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

use std::process::ExitCode;

use anyhow::Context;
use futures_util::StreamExt;
use mastodon_stream::{
	Error, OAuthClient, OAuthConfig, RequestError, Renderer, StreamClient, StreamConfig, browser,
	prompt::{self, LineReader, Terminal}
};
use tracing_subscriber::EnvFilter;

enum Outcome {
	Closed,
	Interrupted,
	Failed(Error)
}

async fn run() -> anyhow::Result<()> {
	let mut terminal = Terminal::new()?;
	let session = prompt::collect_session(&mut terminal)?;

	let oauth = OAuthClient::new(OAuthConfig::default())?;
	let credentials = oauth.register_app(&session.base_url).await?;
	let authorization_url = oauth.authorization_url(&credentials)?;
	terminal.notice(&format!("Opening {authorization_url}"));
	browser::open_in_browser(&authorization_url);

	let auth_code = prompt::collect_auth_code(&mut terminal)?;
	let token = match oauth.exchange_code(&credentials, &auth_code, &session.base_url).await {
		Ok(token) => token,
		Err(e) => {
			if let Some(RequestError::BadStatus(status)) = e.request_error() {
				tracing::warn!(%status, "the authorization code may be wrong or expired");
			}
			return Err(e.into());
		}
	};

	let client = StreamClient::new(token, &StreamConfig::default())?;
	let mut subscription = client.subscribe(&session).await?;
	tracing::info!(stream_type = %session.stream_type, "subscribed");

	let mut renderer = Renderer::stdout();
	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);
	let outcome = loop {
		tokio::select! {
			next = subscription.next() => match next {
				Some(Ok(event)) => {
					if !renderer.write(&event.message()).context("failed to write to stdout")? {
						tracing::trace!(event = %event.event, "dropped event");
					}
				}
				Some(Err(e)) => break Outcome::Failed(e),
				None => break Outcome::Closed
			},
			_ = &mut ctrl_c => break Outcome::Interrupted
		}
	};
	subscription.close();

	match outcome {
		Outcome::Closed => {
			tracing::warn!("stream closed by the server");
			Ok(())
		}
		Outcome::Interrupted => Ok(()),
		Outcome::Failed(e) => Err(e.into())
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.init();

	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			if matches!(e.downcast_ref::<Error>(), Some(Error::Cancelled)) {
				return ExitCode::SUCCESS;
			}
			tracing::error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}
