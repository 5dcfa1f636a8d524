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

use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_default_from_null, deserialize_string_from_number};

/// One server-sent event, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
	/// `update`, `notification`, `delete`, ...
	pub event: String,
	pub data: String
}

impl StreamEvent {
	/// Interprets the payload as a message.
	///
	/// Payloads that aren't a JSON object (`delete` events carry a bare status ID, for instance) come back as an empty
	/// [`Message`], which the renderer then drops.
	pub fn message(&self) -> Message {
		let mut data = self.data.clone().into_bytes();
		match simd_json::from_slice::<Message>(&mut data) {
			Ok(message) => message,
			Err(e) => {
				tracing::trace!(event = %self.event, error = %e, "payload is not a message");
				Message::default()
			}
		}
	}
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
	#[serde(deserialize_with = "deserialize_string_from_number")]
	pub id: String,
	#[serde(default, deserialize_with = "deserialize_default_from_null")]
	pub display_name: String,
	#[serde(default, deserialize_with = "deserialize_default_from_null")]
	pub acct: String
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
	#[serde(default)]
	pub account: Option<Account>,
	#[serde(default)]
	pub content: Option<String>
}
