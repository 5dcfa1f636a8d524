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

use url::Url;

/// Opens `url` in the default browser without waiting for it. A failure is logged and otherwise ignored; the caller is
/// expected to have shown the URL some other way too.
pub fn open_in_browser(url: &Url) {
	match open::that_detached(url.as_str()) {
		Ok(()) => tracing::debug!(%url, "opened browser"),
		Err(e) => tracing::warn!(%url, error = %e, "could not open a browser")
	}
}
