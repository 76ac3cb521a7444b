use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Column, EntryId, NewRecord, Operation, Record, RecordPatch, RemoteError, RemoteStore};

pub const DEFAULT_TABLE: &str = "sit-leaderboard";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
	/// Project URL, without the `/rest/v1` suffix.
	pub base_url: String,
	#[serde(default = "default_table")]
	pub table: String,
	/// Sent as `apikey` and bearer token when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
}

fn default_table() -> String {
	DEFAULT_TABLE.to_string()
}

const fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT_SECS
}

impl RestConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			table: default_table(),
			api_key: None,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}
}

/// [`RemoteStore`] over a PostgREST endpoint, one table per store.
#[derive(Debug, Clone)]
pub struct RestStore {
	client: Client,
	config: RestConfig,
}

trait WithApiKey {
	fn with_api_key(self, api_key: Option<&str>) -> Self;
}

impl WithApiKey for RequestBuilder {
	fn with_api_key(self, api_key: Option<&str>) -> Self {
		match api_key {
			Some(key) => self
				.header("apikey", key)
				.header(header::AUTHORIZATION, format!("Bearer {key}")),
			None => self,
		}
	}
}

impl RestStore {
	pub fn new(config: RestConfig) -> Result<Self, RemoteError> {
		let client = Client::builder()
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()?;

		Ok(Self { client, config })
	}

	fn table_url(&self) -> String {
		format!(
			"{}/rest/v1/{}",
			self.config.base_url.trim_end_matches('/'),
			self.config.table
		)
	}

	fn request(&self, method: reqwest::Method) -> RequestBuilder {
		self.client
			.request(method, self.table_url())
			.with_api_key(self.config.api_key.as_deref())
	}

	fn list_request(&self, order_by: Column, descending: bool) -> RequestBuilder {
		let direction = if descending { "desc" } else { "asc" };

		self.request(reqwest::Method::GET)
			.query(&[("select", "*".to_string()), ("order", format!("{order_by}.{direction}"))])
	}

	fn insert_request(&self, record: &NewRecord) -> RequestBuilder {
		self.request(reqwest::Method::POST)
			.header("prefer", "return=representation")
			.json(&[record])
	}

	fn delete_request(&self, id: EntryId) -> RequestBuilder {
		self.request(reqwest::Method::DELETE)
			.query(&[("id", format!("eq.{id}"))])
	}

	fn update_request(&self, id: EntryId, patch: &RecordPatch) -> RequestBuilder {
		self.request(reqwest::Method::PATCH)
			.query(&[("id", format!("eq.{id}"))])
			.json(patch)
	}
}

async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
	let response = request.send().await?;
	let status = response.status();

	if status.is_success() {
		Ok(response)
	} else {
		let body = response.text().await.unwrap_or_default();
		Err(RemoteError::Status { status, body })
	}
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
	let bytes = response.bytes().await?;
	serde_json::from_slice(&bytes).map_err(Into::into)
}

#[async_trait]
impl RemoteStore for RestStore {
	#[instrument(skip(self), fields(table = %self.config.table), err)]
	async fn list_all(
		&self,
		order_by: Column,
		descending: bool,
	) -> Result<Vec<Record>, RemoteError> {
		let response = send(self.list_request(order_by, descending)).await?;
		let records: Vec<Record> = decode(response).await?;
		debug!(op = %Operation::List, count = records.len(), "remote rows received");
		Ok(records)
	}

	#[instrument(skip(self), fields(table = %self.config.table), err)]
	async fn insert(&self, record: NewRecord) -> Result<Vec<Record>, RemoteError> {
		decode(send(self.insert_request(&record)).await?).await
	}

	#[instrument(skip(self), fields(table = %self.config.table), err)]
	async fn delete_by_id(&self, id: EntryId) -> Result<(), RemoteError> {
		send(self.delete_request(id)).await.map(|_| ())
	}

	#[instrument(skip(self), fields(table = %self.config.table), err)]
	async fn update_by_id(&self, id: EntryId, patch: RecordPatch) -> Result<(), RemoteError> {
		send(self.update_request(id, &patch)).await.map(|_| ())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use tokio::{
		io::{AsyncReadExt, AsyncWriteExt},
		net::TcpListener,
	};

	fn store(api_key: Option<&str>) -> RestStore {
		RestStore::new(RestConfig {
			api_key: api_key.map(ToString::to_string),
			..RestConfig::new("https://example.supabase.co/")
		})
		.expect("client builds")
	}

	fn body(request: &reqwest::Request) -> serde_json::Value {
		let bytes = request
			.body()
			.and_then(reqwest::Body::as_bytes)
			.expect("request has a buffered body");
		serde_json::from_slice(bytes).expect("body is json")
	}

	#[test]
	fn list_orders_by_column_and_direction() {
		let request = store(None)
			.list_request(Column::Score, true)
			.build()
			.expect("request builds");

		assert_eq!(request.method(), reqwest::Method::GET);
		assert_eq!(
			request.url().as_str(),
			"https://example.supabase.co/rest/v1/sit-leaderboard?select=*&order=score.desc"
		);
		assert!(request.headers().get("apikey").is_none());
	}

	#[test]
	fn insert_sends_one_row_and_asks_for_it_back() {
		let request = store(None)
			.insert_request(&NewRecord {
				name: "Ann".to_string(),
				score: 50,
			})
			.build()
			.expect("request builds");

		assert_eq!(request.method(), reqwest::Method::POST);
		assert_eq!(
			request.headers().get("prefer").map(header::HeaderValue::as_bytes),
			Some(&b"return=representation"[..])
		);
		assert_eq!(body(&request), serde_json::json!([{ "name": "Ann", "score": 50 }]));
	}

	#[test]
	fn delete_and_update_filter_by_id() {
		let store = store(Some("anon"));

		let delete = store.delete_request(EntryId(7)).build().expect("request builds");
		assert_eq!(delete.method(), reqwest::Method::DELETE);
		assert_eq!(delete.url().query(), Some("id=eq.7"));

		let update = store
			.update_request(EntryId(7), &RecordPatch::name("Zed"))
			.build()
			.expect("request builds");
		assert_eq!(update.method(), reqwest::Method::PATCH);
		assert_eq!(update.url().query(), Some("id=eq.7"));
		assert_eq!(body(&update), serde_json::json!({ "name": "Zed" }));
		assert_eq!(
			update.headers().get(header::AUTHORIZATION).map(header::HeaderValue::as_bytes),
			Some(&b"Bearer anon"[..])
		);
	}

	#[test]
	fn config_fills_defaults() {
		let config: RestConfig =
			serde_json::from_str(r#"{ "base_url": "http://localhost:54321" }"#).expect("parses");

		assert_eq!(config, RestConfig::new("http://localhost:54321"));
	}

	/// Serves `response` to the first connection and closes it.
	async fn serve_once(response: &'static str) -> RestStore {
		let listener = TcpListener::bind("127.0.0.1:0").await.expect("binds");
		let addr = listener.local_addr().expect("has an address");

		tokio::spawn(async move {
			let (mut socket, _) = listener.accept().await.expect("accepts");
			let mut request = [0; 4096];
			let _ = socket.read(&mut request).await;
			let _ = socket.write_all(response.as_bytes()).await;
			let _ = socket.shutdown().await;
		});

		RestStore::new(RestConfig::new(format!("http://{addr}"))).expect("client builds")
	}

	#[tokio::test]
	async fn decodes_listed_rows() {
		let store = serve_once(
			"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 33\r\n\
			 connection: close\r\n\r\n[{\"id\":1,\"name\":\"Ann\",\"score\":5}]",
		)
		.await;

		let records = store.list_all(Column::Score, true).await.expect("rows decode");

		assert_eq!(
			records,
			[Record {
				id: EntryId(1),
				name: "Ann".to_string(),
				score: 5,
			}]
		);
	}

	#[tokio::test]
	async fn error_status_keeps_code_and_body() {
		let store = serve_once(
			"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 5\r\n\
			 connection: close\r\n\r\noops!",
		)
		.await;

		let err = store
			.delete_by_id(EntryId(1))
			.await
			.expect_err("500 is a failure");

		assert!(
			matches!(
				&err,
				RemoteError::Status { status, body }
					if *status == reqwest::StatusCode::INTERNAL_SERVER_ERROR && body == "oops!"
			),
			"unexpected error: {err:?}"
		);
	}

	#[tokio::test]
	async fn body_that_is_not_json_is_a_decode_error() {
		let store = serve_once(
			"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 9\r\n\
			 connection: close\r\n\r\nnot json!",
		)
		.await;

		let err = store
			.list_all(Column::Score, true)
			.await
			.expect_err("body does not decode");

		assert!(matches!(err, RemoteError::Decode(_)), "unexpected error: {err:?}");
	}

	#[tokio::test]
	async fn silent_server_times_out() {
		// Connections queue in the backlog but are never answered
		let listener = TcpListener::bind("127.0.0.1:0").await.expect("binds");
		let addr = listener.local_addr().expect("has an address");

		let store = RestStore::new(RestConfig {
			timeout_secs: 1,
			..RestConfig::new(format!("http://{addr}"))
		})
		.expect("client builds");

		let err = store
			.list_all(Column::Score, true)
			.await
			.expect_err("nothing answers");

		assert!(
			matches!(&err, RemoteError::Request(e) if e.is_timeout()),
			"unexpected error: {err:?}"
		);
		drop(listener);
	}

	#[tokio::test]
	async fn refused_connection_is_a_request_error() {
		let addr = {
			let listener = TcpListener::bind("127.0.0.1:0").await.expect("binds");
			listener.local_addr().expect("has an address")
		};

		let store =
			RestStore::new(RestConfig::new(format!("http://{addr}"))).expect("client builds");

		let err = store
			.update_by_id(EntryId(1), RecordPatch::score(1))
			.await
			.expect_err("nothing listens");

		assert!(matches!(err, RemoteError::Request(_)), "unexpected error: {err:?}");
	}
}
