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

//! Interactive questions asked before and during the handshake.

use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
	Error,
	config::{self, SessionConfig, StreamType}
};

pub const BASE_URL_PROMPT: &str = "Input target mastodon base url";
pub const STREAM_TYPE_PROMPT: &str = "Select target to subscribe";
pub const AUTH_CODE_PROMPT: &str = "Paste authorization code displaying after you logged in";
const EMPTY_HINT: &str = "Input something..";

/// Source of operator input.
pub trait LineReader {
	/// Reads one line, with `initial` pre-filled for editing. `Ok(None)` means the input has ended.
	fn read_line(&mut self, prompt: &str, initial: &str) -> Result<Option<String>, Error>;

	/// Shows a message that isn't a question, like a validation hint or a list of choices.
	fn notice(&mut self, message: &str);
}

/// Reads from the terminal through a line editor.
pub struct Terminal {
	editor: DefaultEditor
}

impl Terminal {
	pub fn new() -> Result<Self, Error> {
		Ok(Self { editor: DefaultEditor::new()? })
	}
}

impl LineReader for Terminal {
	fn read_line(&mut self, prompt: &str, initial: &str) -> Result<Option<String>, Error> {
		match self.editor.readline_with_initial(&format!("? {prompt}: "), (initial, "")) {
			Ok(line) => Ok(Some(line)),
			Err(ReadlineError::Eof) => Ok(None),
			Err(ReadlineError::Interrupted) => Err(Error::Cancelled),
			Err(e) => Err(e.into())
		}
	}

	fn notice(&mut self, message: &str) {
		println!("{message}");
	}
}

fn ask_nonempty(reader: &mut impl LineReader, prompt: &str, initial: &str) -> Result<String, Error> {
	loop {
		let line = reader.read_line(prompt, initial)?.ok_or(Error::Cancelled)?;
		let line = line.trim();
		if !line.is_empty() {
			return Ok(line.to_owned());
		}
		reader.notice(EMPTY_HINT);
	}
}

/// Asks for the server address, pre-filled with the default one.
pub fn ask_base_url(reader: &mut impl LineReader) -> Result<url::Url, Error> {
	loop {
		let input = ask_nonempty(reader, BASE_URL_PROMPT, config::DEFAULT_BASE_URL)?;
		match config::parse_base_url(&input) {
			Ok(url) => return Ok(url),
			Err(e) => reader.notice(&e.to_string())
		}
	}
}

/// Asks which stream to subscribe to. Either a label or its position in the list is accepted.
pub fn ask_stream_type(reader: &mut impl LineReader) -> Result<StreamType, Error> {
	let choices = StreamType::ALL
		.iter()
		.enumerate()
		.map(|(i, c)| format!("  {}) {c}", i + 1))
		.collect::<Vec<_>>()
		.join("\n");
	reader.notice(&choices);
	loop {
		let input = ask_nonempty(reader, STREAM_TYPE_PROMPT, "")?;
		let by_index = input.parse::<usize>().ok().and_then(|i| i.checked_sub(1)).and_then(|i| StreamType::ALL.get(i).copied());
		match by_index.map_or_else(|| input.parse::<StreamType>(), Ok) {
			Ok(stream_type) => return Ok(stream_type),
			Err(e) => reader.notice(&e.to_string())
		}
	}
}

/// Collects the base URL and stream type, in that order.
pub fn collect_session(reader: &mut impl LineReader) -> Result<SessionConfig, Error> {
	let base_url = ask_base_url(reader)?;
	let stream_type = ask_stream_type(reader)?;
	Ok(SessionConfig::new(base_url, stream_type))
}

/// Asks for the code shown once the operator has approved the application.
pub fn collect_auth_code(reader: &mut impl LineReader) -> Result<String, Error> {
	ask_nonempty(reader, AUTH_CODE_PROMPT, "")
}
