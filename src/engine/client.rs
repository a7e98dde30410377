use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::character_state::CharacterState;
use crate::model::chat_turn::ChatTurn;
use crate::model::wire::{ChatRequest, ChatResponse, ErrorBody};

#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed, or its body could not be decoded.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("invalid game master address {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Non-success status. `message` is the server's `detail` when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Rejected { status, .. } => Some(*status),
            TransportError::Network(e) => e.status().map(|s| s.as_u16()),
            TransportError::InvalidUrl { .. } => None,
        }
    }
}

/// The three calls the client makes against the game master.
pub trait GameMaster {
    fn check_health(&self) -> Result<Value, TransportError>;

    fn get_game_state(&self, character_name: &str) -> Result<CharacterState, TransportError>;

    fn send_message(
        &self,
        message: &str,
        character_name: &str,
        session_history: &[ChatTurn],
    ) -> Result<ChatResponse, TransportError>;
}

/// Blocking HTTP client. One request per call: no retries, no timeout, no cache.
pub struct GameMasterClient {
    http: Client,
    base_url: String,
}

impl GameMasterClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(Option::<Duration>::None)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl GameMaster for GameMasterClient {
    fn check_health(&self) -> Result<Value, TransportError> {
        let url = self.endpoint("/health");
        debug!(%url, "health probe");

        decode(self.http.get(url).send()?)
    }

    fn get_game_state(&self, character_name: &str) -> Result<CharacterState, TransportError> {
        let raw = self.endpoint("/state");
        let url = Url::parse_with_params(&raw, &[("character_name", character_name)])
            .map_err(|e| TransportError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            })?;
        debug!(%url, "fetching character state");

        decode(self.http.get(url).send()?)
    }

    fn send_message(
        &self,
        message: &str,
        character_name: &str,
        session_history: &[ChatTurn],
    ) -> Result<ChatResponse, TransportError> {
        let url = self.endpoint("/chat");
        debug!(%url, turns = session_history.len(), "sending player message");

        let req = ChatRequest {
            message,
            character_name,
            session_history,
        };

        decode(self.http.post(url).json(&req).send()?)
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, TransportError> {
    if !resp.status().is_success() {
        return Err(rejection(resp));
    }
    Ok(resp.json::<T>()?)
}

/// Pulls a readable message out of an error response.
fn rejection(resp: Response) -> TransportError {
    let status = resp.status().as_u16();
    let body: ErrorBody = resp.json().unwrap_or_default();

    let message = match body.detail {
        Some(Value::String(detail)) if !detail.is_empty() => detail,
        None | Some(Value::Null) | Some(Value::String(_)) => {
            format!("Request failed with status {status}")
        }
        // FastAPI validation errors carry a list here
        Some(detail) => detail.to_string(),
    };

    TransportError::Rejected { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    /// Answers exactly one request with a canned response and hands back
    /// the raw request text.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        (format!("http://{addr}"), handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn health_returns_parsed_body() {
        let (base, server) = serve_once("200 OK", r#"{"status":"ok"}"#);
        let client = GameMasterClient::new(&base).unwrap();

        let body = client.check_health().unwrap();
        assert_eq!(body["status"], "ok");
        assert!(server.join().unwrap().starts_with("GET /health "));
    }

    #[test]
    fn state_fetch_encodes_character_name() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"name":"Kraven Ice","hp":10,"max_hp":10,"level":1}"#,
        );
        let client = GameMasterClient::new(&format!("{base}/")).unwrap();

        let state = client.get_game_state("Kraven Ice").unwrap();
        assert_eq!(state.name, "Kraven Ice");

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /state?character_name=Kraven+Ice "), "{request}");
    }

    #[test]
    fn state_fetch_with_bad_json_is_a_network_error() {
        let (base, server) = serve_once("200 OK", r#"{"hp":"lots"}"#);
        let client = GameMasterClient::new(&base).unwrap();

        let err = client.get_game_state("Kraven").unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "{err:?}");
        server.join().unwrap();
    }

    #[test]
    fn send_posts_full_payload() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"narration":"You see a glacier.","updated_state":{"name":"Kraven","hp":10,"max_hp":10,"level":1}}"#,
        );
        let client = GameMasterClient::new(&base).unwrap();
        let history = vec![ChatTurn::user("look around")];

        let reply = client.send_message("look around", "Kraven", &history).unwrap();
        assert_eq!(reply.narration, "You see a glacier.");
        assert_eq!(reply.updated_state.map(|s| s.hp), Some(10));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /chat "));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "message": "look around",
                "character_name": "Kraven",
                "session_history": [{ "role": "user", "content": "look around" }]
            })
        );
    }

    #[test]
    fn send_keeps_narration_when_state_is_not_a_character() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"narration":"The mists part.","out_of_character":"","updated_state":{"error":"Character Sora not found."}}"#,
        );
        let client = GameMasterClient::new(&base).unwrap();

        let reply = client.send_message("look around", "Sora", &[]).unwrap();
        assert_eq!(reply.narration, "The mists part.");
        assert!(reply.updated_state.is_none());
        server.join().unwrap();
    }

    #[test]
    fn send_rejection_surfaces_detail() {
        let (base, server) =
            serve_once("422 Unprocessable Entity", r#"{"detail":"invalid character"}"#);
        let client = GameMasterClient::new(&base).unwrap();

        let err = client.send_message("hi", "Nobody", &[]).unwrap_err();
        assert_eq!(err.to_string(), "invalid character");
        assert_eq!(err.status(), Some(422));
        server.join().unwrap();
    }

    #[test]
    fn send_rejection_without_detail_uses_status() {
        let (base, server) = serve_once("500 Internal Server Error", "oops");
        let client = GameMasterClient::new(&base).unwrap();

        let err = client.send_message("hi", "Kraven", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");
        server.join().unwrap();
    }

    #[test]
    fn validation_error_list_is_stringified() {
        let (base, server) = serve_once(
            "422 Unprocessable Entity",
            r#"{"detail":[{"loc":["body","message"],"msg":"field required"}]}"#,
        );
        let client = GameMasterClient::new(&base).unwrap();

        let err = client.send_message("hi", "Kraven", &[]).unwrap_err();
        assert!(err.to_string().contains("field required"), "{err}");
        server.join().unwrap();
    }

    #[test]
    fn unreachable_backend_is_a_network_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = GameMasterClient::new(&format!("http://{addr}")).unwrap();

        let err = client.check_health().unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "{err:?}");
    }
}
