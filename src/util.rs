// Copyright 2026 pyke.io
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::future::Future;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::RequestError;

pub trait MapNonempty {
	type T;

	fn and_then_nonempty<B, F>(self, f: F) -> Option<B>
	where
		Self: Sized,
		F: FnOnce(Self::T) -> Option<B>;
}

impl<'s> MapNonempty for &'s str {
	type T = &'s str;

	fn and_then_nonempty<B, F>(self, f: F) -> Option<B>
	where
		Self: Sized,
		F: FnOnce(Self::T) -> Option<B>
	{
		if self.is_empty() { None } else { f(self) }
	}
}

impl<'s> MapNonempty for Option<&'s str> {
	type T = &'s str;

	fn and_then_nonempty<B, F>(self, f: F) -> Option<B>
	where
		Self: Sized,
		F: FnOnce(Self::T) -> Option<B>
	{
		self.and_then(|c| c.and_then_nonempty(f))
	}
}

pub trait SimdJsonResponseBody {
	/// Checks the status, then decodes the body as JSON.
	fn simd_json<T: DeserializeOwned>(self) -> impl Future<Output = Result<T, RequestError>>;
}

impl SimdJsonResponseBody for Response {
	async fn simd_json<T: DeserializeOwned>(self) -> Result<T, RequestError> {
		let mut full = self.error_for_status()?.bytes().await?.to_vec();
		Ok(simd_json::from_slice(&mut full)?)
	}
}
