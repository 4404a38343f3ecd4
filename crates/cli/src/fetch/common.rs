//! Shared infrastructure for provider fetch adapters.
//!
//! Each adapter reuses:
//! - `FetchClient`: HTTP client with retry, backoff and error classification
//! - `resolve_api_key`: flag > env > error

use std::thread;
use std::time::Duration;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

pub(super) const MAX_RETRIES: u32 = 3;
pub(super) const USER_AGENT: &str = concat!("benchcat/", env!("CARGO_PKG_VERSION"));

// ── FetchClient ─────────────────────────────────────────────────────

/// Shared HTTP client that handles retry, backoff, and error classification.
///
/// Adapters own their API key, base URL, and auth header. They pass a
/// request-building closure to [`FetchClient::request_with_retry`] which
/// runs the retry loop and maps HTTP status codes to the fetch exit codes.
pub(super) struct FetchClient {
    http: reqwest::blocking::Client,
    source_name: String,
    error_extractor: fn(&serde_json::Value, u16) -> String,
    initial_backoff: Duration,
}

impl FetchClient {
    pub(super) fn new(
        source_name: &str,
        error_extractor: fn(&serde_json::Value, u16) -> String,
    ) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError {
                code: exit_codes::EXIT_ERROR,
                message: format!("failed to build HTTP client: {e}"),
                hint: None,
            })?;

        Ok(Self {
            http,
            source_name: source_name.to_string(),
            error_extractor,
            initial_backoff: Duration::from_secs(1),
        })
    }

    /// Shorten the first retry delay (tests).
    #[cfg(test)]
    pub(super) fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn fail(&self, code: u8, message: String) -> CliError {
        CliError {
            code,
            message: format!("{} {}", self.source_name, message),
            hint: None,
        }
    }

    /// Make a GET request with retry + exponential backoff.
    ///
    /// `build_request` is called once per attempt and must return a fully
    /// configured `RequestBuilder` (URL, auth, headers).
    pub(super) fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value, CliError> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            let wait = match build_request(&self.http).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if (200..300).contains(&status) {
                        return self.parse_body(resp);
                    }

                    if status != 429 && status < 500 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(match status {
                            401 | 403 => self.fail(
                                exit_codes::EXIT_FETCH_AUTH,
                                format!("auth failed ({status}): {msg}"),
                            ),
                            400 => self.fail(
                                exit_codes::EXIT_FETCH_VALIDATION,
                                format!("request rejected ({status}): {msg}"),
                            ),
                            _ => self.fail(
                                exit_codes::EXIT_FETCH_UPSTREAM,
                                format!("error ({status}): {msg}"),
                            ),
                        });
                    }

                    // Retryable: 429, 5xx
                    if attempt == MAX_RETRIES {
                        return Err(if status == 429 {
                            self.fail(
                                exit_codes::EXIT_FETCH_RATE_LIMIT,
                                format!("rate limited after {MAX_RETRIES} retries ({status})"),
                            )
                        } else {
                            self.fail(
                                exit_codes::EXIT_FETCH_UPSTREAM,
                                format!("upstream error after {MAX_RETRIES} retries ({status})"),
                            )
                        });
                    }

                    let retry_after = resp
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok())
                        .filter(|_| status == 429)
                        .map(Duration::from_secs);
                    log::warn!(
                        "retry {}/{} in {:?} (HTTP {})",
                        attempt + 1,
                        MAX_RETRIES,
                        retry_after.unwrap_or(backoff),
                        status
                    );
                    retry_after.unwrap_or(backoff)
                }
                Err(e) => {
                    // Network/timeout errors: retry
                    if attempt == MAX_RETRIES {
                        return Err(self.fail(
                            exit_codes::EXIT_FETCH_UPSTREAM,
                            format!("upstream error after {MAX_RETRIES} retries: {e}"),
                        ));
                    }
                    log::warn!("retry {}/{} in {:?} ({})", attempt + 1, MAX_RETRIES, backoff, e);
                    backoff
                }
            };

            thread::sleep(wait);
            backoff *= 2;
            attempt += 1;
        }
    }

    fn parse_body(&self, resp: reqwest::blocking::Response) -> Result<serde_json::Value, CliError> {
        let text = resp.text().map_err(|e| {
            self.fail(
                exit_codes::EXIT_FETCH_UPSTREAM,
                format!("response body unreadable: {e}"),
            )
        })?;
        let trimmed = text.trim_start_matches('\u{feff}');
        serde_json::from_str(trimmed).map_err(|e| {
            let preview: String = trimmed.chars().take(200).collect();
            self.fail(
                exit_codes::EXIT_FETCH_UPSTREAM,
                format!("returned invalid JSON: {e} (body: {preview})"),
            )
        })
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

/// Resolve an API key: flag value > environment variable > error.
pub(super) fn resolve_api_key(
    flag: Option<String>,
    source_name: &str,
    env_var: &str,
) -> Result<String, CliError> {
    let missing = || CliError {
        code: exit_codes::EXIT_FETCH_NOT_AUTH,
        message: format!("missing {source_name} API key (use --api-key or set {env_var})"),
        hint: Some("or sync from a saved payload with --input FILE".into()),
    };

    if let Some(key) = flag {
        let trimmed = key.trim().to_string();
        if trimmed.is_empty() {
            return Err(missing());
        }
        return Ok(trimmed);
    }

    if let Ok(key) = std::env::var(env_var) {
        let trimmed = key.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    Err(missing())
}

// ── Tests ───────────────────────────────────────────────────────────
