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
	borrow::Cow,
	fmt,
	io::{self, Write},
	sync::OnceLock
};

use crossterm::style::{Color, Stylize, style};
use regex::Regex;

use crate::{stream::Message, util::MapNonempty};

/// Author name colors. An author's color is picked by [`color_index`]; with only eight entries, collisions between
/// authors are expected.
pub const PALETTE: [Color; 8] = [
	Color::Black,
	Color::DarkRed,
	Color::DarkGreen,
	Color::DarkYellow,
	Color::DarkBlue,
	Color::DarkMagenta,
	Color::DarkCyan,
	Color::Grey
];

/// Index into [`PALETTE`] for an account.
///
/// Mastodon account IDs are decimal integers, so this is normally just `id % 8`. IDs that don't parse as one fall back
/// to an FNV-1a hash of their bytes.
pub fn color_index(account_id: &str) -> usize {
	let n = match account_id.trim().parse::<u64>() {
		Ok(n) => n,
		Err(_) => account_id.bytes().fold(0xcbf29ce484222325u64, |hash, b| (hash ^ b as u64).wrapping_mul(0x100000001b3))
	};
	(n % PALETTE.len() as u64) as usize
}

/// Removes every `<...>` tag, leaving the text between tags untouched. Entities are not decoded.
pub fn strip_markup(content: &str) -> Cow<'_, str> {
	static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
	TAG_REGEX
		.get_or_init(|| Regex::new(r#"<[A-Za-z/!?](?:[^>"']|"[^"]*"|'[^']*')*(?:>|\z)"#).unwrap())
		.replace_all(content, "")
}

/// One line ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
	pub name: String,
	pub color: Color,
	pub text: String
}

impl fmt::Display for RenderedLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", style(&self.name).with(self.color), style(&self.text).with(Color::DarkGrey))
	}
}

/// Turns a message into a line, or `None` if it has no content or no author.
pub fn render(message: &Message) -> Option<RenderedLine> {
	let content = message.content.as_deref().and_then_nonempty(Some)?;
	let account = message.account.as_ref()?;
	let name = account.display_name.as_str().and_then_nonempty(Some).unwrap_or(&account.acct);
	Some(RenderedLine {
		name: name.to_owned(),
		color: PALETTE[color_index(&account.id)],
		text: strip_markup(content).into_owned()
	})
}

/// Writes rendered messages to an output, one per line.
#[derive(Debug)]
pub struct Renderer<W> {
	out: W
}

impl Renderer<io::Stdout> {
	pub fn stdout() -> Self {
		Self::new(io::stdout())
	}
}

impl<W: Write> Renderer<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	/// Renders and writes `message`. Returns `false` if the message was dropped.
	pub fn write(&mut self, message: &Message) -> io::Result<bool> {
		match render(message) {
			Some(line) => {
				writeln!(self.out, "{line}")?;
				self.out.flush()?;
				Ok(true)
			}
			None => Ok(false)
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}
