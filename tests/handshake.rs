use std::{
	collections::VecDeque,
	io,
	sync::{Arc, Mutex}
};

use futures_util::StreamExt;
use mastodon_stream::{
	Error, OAuthClient, OAuthConfig, RequestError, StreamClient, StreamConfig, StreamType,
	prompt::{self, LineReader},
	render
};
use reqwest::StatusCode;
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::{TcpListener, TcpStream}
};

#[derive(Debug, Clone)]
struct Recorded {
	method: String,
	path: String,
	authorization: Option<String>,
	body: String
}

const STREAM_BODY: &str = concat!(
	":thump\n\n",
	"event: update\n",
	"data: {\"id\":\"100\",\"content\":\"<p>hello <b>world</b></p>\",\"account\":{\"id\":\"9\",\"acct\":\"alice\",\"display_name\":\"Alice\"}}\n\n",
	"event: delete\n",
	"data: 100\n\n"
);

async fn read_request(socket: &mut TcpStream) -> io::Result<Recorded> {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 1024];
	let header_end = loop {
		if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
			break pos + 4;
		}
		let n = socket.read(&mut chunk).await?;
		if n == 0 {
			return Err(io::ErrorKind::UnexpectedEof.into());
		}
		buf.extend_from_slice(&chunk[..n]);
	};

	let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
	let mut lines = head.split("\r\n");
	let mut request_line = lines.next().unwrap_or_default().split(' ');
	let method = request_line.next().unwrap_or_default().to_string();
	let path = request_line.next().unwrap_or_default().to_string();
	let mut content_length = 0;
	let mut authorization = None;
	for line in lines {
		if let Some((name, value)) = line.split_once(':') {
			match name.trim().to_ascii_lowercase().as_str() {
				"content-length" => content_length = value.trim().parse().unwrap_or(0),
				"authorization" => authorization = Some(value.trim().to_string()),
				_ => {}
			}
		}
	}

	while buf.len() < header_end + content_length {
		let n = socket.read(&mut chunk).await?;
		if n == 0 {
			return Err(io::ErrorKind::UnexpectedEof.into());
		}
		buf.extend_from_slice(&chunk[..n]);
	}
	let body = String::from_utf8_lossy(&buf[header_end..header_end + content_length]).into_owned();

	Ok(Recorded { method, path, authorization, body })
}

fn respond(request: &Recorded) -> String {
	let (status, content_type, body) = match (request.method.as_str(), request.path.as_str()) {
		("POST", "/api/v1/apps") => (
			"200 OK",
			"application/json",
			r#"{"id":"1","name":"mastodon-api-stream","client_id":"cid","client_secret":"csecret","redirect_uri":"urn:ietf:wg:oauth:2.0:oob"}"#.to_string()
		),
		("POST", "/oauth/token") if request.body.split('&').any(|c| c == "code=abc123") => {
			("200 OK", "application/json", r#"{"access_token":"tok","token_type":"Bearer","scope":"read","created_at":1}"#.to_string())
		}
		("POST", "/oauth/token") => ("400 Bad Request", "application/json", r#"{"error":"invalid_grant"}"#.to_string()),
		("GET", "/api/v1/streaming/user") if request.authorization.as_deref() == Some("Bearer tok") => {
			("200 OK", "text/event-stream", STREAM_BODY.to_string())
		}
		("GET", _) => ("401 Unauthorized", "application/json", r#"{"error":"unauthorized"}"#.to_string()),
		_ => ("404 Not Found", "text/plain", String::new())
	};
	format!("HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len())
}

/// Serves canned Mastodon responses, one request per connection, and records every request.
async fn spawn_server() -> (String, Arc<Mutex<Vec<Recorded>>>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let log = Arc::new(Mutex::new(Vec::new()));
	let server_log = Arc::clone(&log);
	tokio::spawn(async move {
		loop {
			let Ok((mut socket, _)) = listener.accept().await else {
				break;
			};
			let Ok(request) = read_request(&mut socket).await else {
				continue;
			};
			let response = respond(&request);
			server_log.lock().unwrap().push(request);
			let _ = socket.write_all(response.as_bytes()).await;
			let _ = socket.shutdown().await;
		}
	});
	(format!("http://{addr}"), log)
}

struct Scripted(VecDeque<String>);

impl LineReader for Scripted {
	fn read_line(&mut self, _prompt: &str, _initial: &str) -> Result<Option<String>, Error> {
		Ok(self.0.pop_front())
	}

	fn notice(&mut self, _message: &str) {}
}

#[tokio::test]
async fn test_full_handshake_and_stream() {
	let (base, log) = spawn_server().await;
	let mut reader = Scripted([base.as_str(), "User", "abc123"].into_iter().map(str::to_owned).collect());

	let session = prompt::collect_session(&mut reader).unwrap();
	assert_eq!(session.stream_type, StreamType::User);

	let oauth = OAuthClient::new(OAuthConfig::default()).unwrap();
	let credentials = oauth.register_app(&session.base_url).await.unwrap();
	assert_eq!(credentials.client_id, "cid");
	assert_eq!(credentials.client_secret, "csecret");

	let authorization_url = oauth.authorization_url(&credentials).unwrap();
	assert!(authorization_url.as_str().starts_with("https://friends.nico/oauth/authorize?"));

	let auth_code = prompt::collect_auth_code(&mut reader).unwrap();
	let token = oauth.exchange_code(&credentials, &auth_code, &session.base_url).await.unwrap();
	assert_eq!(token.secret(), "tok");

	let client = StreamClient::new(token, &StreamConfig::default()).unwrap();
	let subscription = client.subscribe(&session).await.unwrap();
	let events: Vec<_> = subscription.collect().await;
	let events: Vec<_> = events.into_iter().map(|c| c.unwrap()).collect();
	assert_eq!(events.len(), 2);

	let lines: Vec<_> = events.iter().filter_map(|c| render::render(&c.message())).collect();
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0].name, "Alice");
	assert_eq!(lines[0].text, "hello world");
	assert_eq!(lines[0].color, render::PALETTE[1]);

	let log = log.lock().unwrap().clone();
	let requests: Vec<_> = log.iter().map(|c| (c.method.as_str(), c.path.as_str())).collect();
	assert_eq!(requests, vec![("POST", "/api/v1/apps"), ("POST", "/oauth/token"), ("GET", "/api/v1/streaming/user")]);
	assert!(log[0].body.contains("client_name=mastodon-api-stream"));
	assert!(log[1].body.split('&').any(|c| c == "code=abc123"));
	assert!(log[1].body.split('&').any(|c| c == "grant_type=authorization_code"));
	assert_eq!(log[2].authorization.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn test_bad_code_fails_token_exchange() {
	let (base, _log) = spawn_server().await;
	let base_url: url::Url = base.parse().unwrap();
	let oauth = OAuthClient::new(OAuthConfig::default()).unwrap();
	let credentials = oauth.register_app(&base_url).await.unwrap();
	let err = oauth.exchange_code(&credentials, "wrong", &base_url).await.unwrap_err();
	assert!(matches!(err, Error::TokenExchange(RequestError::BadStatus(StatusCode::BAD_REQUEST))));
}

#[tokio::test]
async fn test_unreachable_server_fails_registration() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let oauth = OAuthClient::new(OAuthConfig::default()).unwrap();
	let err = oauth.register_app(&format!("http://{addr}").parse::<url::Url>().unwrap()).await.unwrap_err();
	assert!(matches!(err, Error::Registration(_)));
}

#[tokio::test]
async fn test_rejected_token_fails_subscribe() {
	let (base, _log) = spawn_server().await;
	let session = mastodon_stream::SessionConfig::new(base.parse::<url::Url>().unwrap(), StreamType::User);
	let client = StreamClient::new(mastodon_stream::AccessToken::new("nope"), &StreamConfig::default()).unwrap();
	let err = client.subscribe(&session).await.unwrap_err();
	assert!(matches!(err, Error::Stream(RequestError::BadStatus(StatusCode::UNAUTHORIZED))));
}
