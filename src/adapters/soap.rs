use crate::adapters::digest::{new_cnonce, DigestChallenge};
use crate::config::pipeline::SoapConfig;
use crate::domain::model::{Outcome, PreparedRecord};
use crate::domain::ports::RecordProcessor;
use crate::utils::error::{EtlError, Result};
use crate::utils::redact::sanitize_error_message;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Response, StatusCode};
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

pub const CONNECTION_FAILED: &str = "SICS server connection attempt has failed. Please try again.";

static EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:[\w.-]+:)?explanation(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?explanation>")
        .expect("valid pattern")
});
static FAULT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:[\w.-]+:)?faultstring(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?faultstring>")
        .expect("valid pattern")
});

/// Submits exchange-rate rows to the SICS `importCSVRecords` operation.
pub struct SoapRecordClient {
    client: reqwest::Client,
    config: SoapConfig,
    /// Request-URI used in the digest calculation.
    digest_uri: String,
    /// Last digest challenge and its nonce count.
    challenge: Mutex<Option<(DigestChallenge, u32)>>,
}

impl SoapRecordClient {
    pub fn new(config: SoapConfig) -> Result<Self> {
        let endpoint = url::Url::parse(&config.endpoint).map_err(|e| {
            EtlError::InvalidConfigValueError {
                field: "WSDL_URL".to_string(),
                value: config.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        let digest_uri = match endpoint.query() {
            Some(query) => format!("{}?{}", endpoint.path(), query),
            None => endpoint.path().to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            digest_uri,
            challenge: Mutex::new(None),
        })
    }

    pub fn envelope(&self, csv_record: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ws="{ns}">
  <soapenv:Body>
    <ws:importCSVRecords>
      <genericInput>
        <interactiveMessageResponses>
          <answerYes>{answer}</answerYes>
        </interactiveMessageResponses>
      </genericInput>
      <importCSVRecords>
        <csvRecords>{record}</csvRecords>
      </importCSVRecords>
    </ws:importCSVRecords>
  </soapenv:Body>
</soapenv:Envelope>"#,
            ns = xml_escape(&self.config.namespace),
            answer = xml_escape(&self.config.answer_yes),
            record = xml_escape(csv_record),
        )
    }

    /// `Ok(None)` when accepted, `Ok(Some(reason))` when the service rejects
    /// the record.
    pub async fn submit(&self, csv_record: &str) -> std::result::Result<Option<String>, reqwest::Error> {
        let body = self.envelope(csv_record);

        let mut response = self.post(&body).await?;
        if response.status() == StatusCode::UNAUTHORIZED && self.renegotiate(&response) {
            tracing::debug!("Digest challenge received, retrying with credentials");
            response = self.post(&body).await?;
        }

        let status = response.status();
        let text = response.text().await?;
        if let Some(reason) = fault_reason(&text) {
            return Ok(Some(reason));
        }
        if status.is_success() {
            Ok(None)
        } else {
            Ok(Some(format!("Web service returned HTTP {}", status)))
        }
    }

    async fn post(&self, body: &str) -> std::result::Result<Response, reqwest::Error> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(body.to_string());
        if let Some(authorization) = self.authorization() {
            request = request.header(AUTHORIZATION, authorization);
        }
        request.send().await
    }

    fn authorization(&self) -> Option<String> {
        let mut guard = self.challenge.lock().ok()?;
        let (challenge, nc) = guard.as_mut()?;
        *nc += 1;
        Some(challenge.authorization(
            &self.config.username,
            &self.config.password,
            "POST",
            &self.digest_uri,
            *nc,
            &new_cnonce(),
        ))
    }

    /// Stores a fresh challenge from a 401. Returns false when the response
    /// carries no usable digest challenge.
    fn renegotiate(&self, response: &Response) -> bool {
        let challenge = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(DigestChallenge::parse);

        match (challenge, self.challenge.lock()) {
            (Some(challenge), Ok(mut guard)) => {
                *guard = Some((challenge, 0));
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RecordProcessor for SoapRecordClient {
    async fn process(&self, record: &PreparedRecord) -> Outcome {
        let csv_record = record
            .values
            .iter()
            .map(|value| value.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");

        match self.submit(&csv_record).await {
            Ok(None) => Outcome::Success,
            Ok(Some(reason)) => Outcome::Failure(reason),
            Err(e) if e.is_timeout() || e.is_connect() => {
                tracing::warn!("Web service unreachable: {}", e);
                Outcome::Failure(CONNECTION_FAILED.to_string())
            }
            Err(e) => Outcome::Failure(sanitize_error_message(&e.to_string())),
        }
    }
}

/// Rejection reason carried by a SOAP fault: the `explanation` detail when
/// present, else `faultstring`, cut to its first sentence.
pub fn fault_reason(body: &str) -> Option<String> {
    let text = EXPLANATION
        .captures(body)
        .or_else(|| FAULT_STRING.captures(body))?
        .get(1)?
        .as_str();
    let text = xml_unescape(text.trim());
    let first_sentence = text.split(". ").next().unwrap_or_default().trim();
    Some(first_sentence.to_string())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn xml_unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
