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

use std::{
	fmt,
	pin::Pin,
	task::{Context, Poll}
};

use bytes::Bytes;
use eventsource_stream::{EventStream, EventStreamError, Eventsource};
use futures_util::Stream;
use pin_project_lite::pin_project;
use reqwest::header;
use url::Url;

use crate::{
	config::{SessionConfig, StreamConfig, StreamType},
	error::{Error, RequestError},
	oauth::{AccessToken, build_http_client, endpoint}
};

mod event;
pub use self::event::{Account, Message, StreamEvent};

pub type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// `{base}/api/v1/{endpoint}` for the given stream type.
pub fn stream_url(base_url: &Url, stream_type: StreamType) -> Result<Url, url::ParseError> {
	endpoint(base_url, &format!("api/v1/{}", stream_type.endpoint()))
}

/// Holds the access token and opens subscriptions with it.
#[derive(Debug)]
pub struct StreamClient {
	http: reqwest::Client,
	token: AccessToken
}

impl StreamClient {
	pub fn new(token: AccessToken, config: &StreamConfig) -> Result<Self, Error> {
		Ok(Self {
			http: build_http_client(config.timeout).map_err(Error::Stream)?,
			token
		})
	}

	/// Opens the streaming connection for `session`.
	///
	/// ```no_run
	/// use futures_util::StreamExt;
	/// use mastodon_stream::{AccessToken, SessionConfig, StreamClient, StreamConfig, StreamType};
	///
	/// # #[tokio::main]
	/// # async fn main() -> anyhow::Result<()> {
	/// let session = SessionConfig::new("https://example.test".parse()?, StreamType::LocalTimeline);
	/// let client = StreamClient::new(AccessToken::new("token"), &StreamConfig::default())?;
	/// let mut subscription = client.subscribe(&session).await?;
	/// while let Some(event) = subscription.next().await.transpose()? {
	/// 	println!("{}", event.event);
	/// }
	/// # Ok(())
	/// # }
	/// ```
	pub async fn subscribe(&self, session: &SessionConfig) -> Result<Subscription<ByteStream>, Error> {
		let url = session.stream_url().map_err(|e| Error::Stream(e.into()))?;
		tracing::debug!(%url, stream_type = %session.stream_type, "opening stream");
		let response = self
			.http
			.get(url)
			.bearer_auth(self.token.secret())
			.header(header::ACCEPT, "text/event-stream")
			.send()
			.await
			.and_then(|r| r.error_for_status())
			.map_err(|e| Error::Stream(e.into()))?;
		let body: ByteStream = Box::pin(response.bytes_stream());
		Ok(Subscription::new(body))
	}
}

pin_project! {
	/// A live subscription to a streaming endpoint.
	///
	/// Yields one [`StreamEvent`] per server-sent event until the server closes the connection. A transport or framing
	/// error is yielded once, after which the subscription is finished; it can't be restarted. An event still missing its
	/// terminating blank line when the body ends is dropped.
	pub struct Subscription<S> {
		#[pin]
		inner: EventStream<S>,
		finished: bool
	}
}

impl<S, B, E> Subscription<S>
where
	S: Stream<Item = Result<B, E>>,
	B: AsRef<[u8]>
{
	pub fn new(body: S) -> Self {
		Self { inner: body.eventsource(), finished: false }
	}
}

impl<S> Subscription<S> {
	/// Drops the underlying connection.
	pub fn close(self) {
		tracing::debug!("closing stream");
	}
}

impl<S> fmt::Debug for Subscription<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("finished", &self.finished).finish_non_exhaustive()
	}
}

fn stream_error<E: Into<RequestError>>(error: EventStreamError<E>) -> RequestError {
	match error {
		EventStreamError::Transport(e) => e.into(),
		EventStreamError::Utf8(e) => RequestError::MalformedEvent(e.to_string()),
		EventStreamError::Parser(e) => RequestError::MalformedEvent(e.to_string())
	}
}

impl<S, B, E> Stream for Subscription<S>
where
	S: Stream<Item = Result<B, E>>,
	B: AsRef<[u8]>,
	E: Into<RequestError>
{
	type Item = Result<StreamEvent, Error>;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		let this = self.project();
		if *this.finished {
			return Poll::Ready(None);
		}
		match futures_util::ready!(this.inner.poll_next(cx)) {
			Some(Ok(event)) => Poll::Ready(Some(Ok(StreamEvent { event: event.event, data: event.data }))),
			Some(Err(e)) => {
				*this.finished = true;
				Poll::Ready(Some(Err(Error::Stream(stream_error(e)))))
			}
			None => {
				*this.finished = true;
				Poll::Ready(None)
			}
		}
	}
}
