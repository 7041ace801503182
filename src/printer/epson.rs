//! Epson Connect print gateway client

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use crate::clients::PrintGateway;
use crate::core::config::AppConfig;
use crate::errors::BotError;
use crate::utils::mime::is_printable_path;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    subject_id: String,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
    upload_uri: String,
}

/// A session token scoped to one printer.
struct PrinterSession {
    access_token: String,
    subject_id: String,
}

pub struct EpsonConnectClient {
    http: Client,
    base_url: String,
    printer_email: String,
    client_id: String,
    client_secret: String,
}

impl EpsonConnectClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build Epson HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.epson_base_url.trim_end_matches('/').to_string(),
            printer_email: config.printer_email.clone(),
            client_id: config.epson_client_id.clone(),
            client_secret: config.epson_client_secret.clone(),
        })
    }

    async fn authenticate(&self) -> Result<PrinterSession, BotError> {
        let response = self
            .http
            .post(format!(
                "{}/api/1/printing/oauth2/auth/token?subject=printer",
                self.base_url
            ))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.printer_email.as_str()),
                ("password", ""),
            ])
            .send()
            .await
            .map_err(|e| BotError::PrinterError(format!("Authentication request failed: {e}")))?;

        let auth: AuthResponse = read_json(response, "authenticate").await?;
        Ok(PrinterSession {
            access_token: auth.access_token,
            subject_id: auth.subject_id,
        })
    }

    async fn create_job(
        &self,
        session: &PrinterSession,
        job_name: &str,
    ) -> Result<JobResponse, BotError> {
        let response = self
            .http
            .post(format!(
                "{}/api/1/printing/printers/{}/jobs",
                self.base_url, session.subject_id
            ))
            .bearer_auth(&session.access_token)
            .json(&json!({ "job_name": job_name, "print_mode": "document" }))
            .send()
            .await
            .map_err(|e| BotError::PrinterError(format!("Job creation request failed: {e}")))?;

        read_json(response, "create job").await
    }

    async fn upload(&self, job: &JobResponse, path: &Path) -> Result<(), BotError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("pdf")
            .to_ascii_lowercase();
        let bytes = tokio::fs::read(path).await?;

        let mut upload_url = Url::parse(&job.upload_uri)
            .map_err(|e| BotError::PrinterError(format!("Invalid upload URI: {e}")))?;
        upload_url
            .query_pairs_mut()
            .append_pair("File", &format!("1.{extension}"));

        let response = self
            .http
            .post(upload_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| BotError::PrinterError(format!("Upload request failed: {e}")))?;

        check_status(response, "upload").await?;
        Ok(())
    }

    async fn start(&self, session: &PrinterSession, job_id: &str) -> Result<(), BotError> {
        let response = self
            .http
            .post(format!(
                "{}/api/1/printing/printers/{}/jobs/{job_id}/print",
                self.base_url, session.subject_id
            ))
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| BotError::PrinterError(format!("Print request failed: {e}")))?;

        check_status(response, "print").await?;
        Ok(())
    }
}

#[async_trait]
impl PrintGateway for EpsonConnectClient {
    async fn print(&self, path: &Path) -> Result<String, BotError> {
        if !is_printable_path(path) {
            return Err(BotError::PrinterError(
                "Only PDF and JPEG files are supported.".to_string(),
            ));
        }

        let job_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("printbot")
            .chars()
            .take(256)
            .collect::<String>();

        let session = self.authenticate().await?;
        let job = self.create_job(&session, &job_name).await?;
        self.upload(&job, path).await?;
        self.start(&session, &job.id).await?;

        info!(job_id = %job.id, "Print job submitted");
        Ok(job.id)
    }
}

async fn check_status(
    response: reqwest::Response,
    step: &str,
) -> Result<reqwest::Response, BotError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read body>".to_string());
    error!("Epson {} failed: status={} body={}", step, status, body);
    Err(BotError::PrinterError(format!(
        "{step} failed (status {status}): {body}"
    )))
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    step: &str,
) -> Result<T, BotError> {
    check_status(response, step)
        .await?
        .json()
        .await
        .map_err(|e| BotError::PrinterError(format!("Invalid {step} response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_response_deserializes() {
        let job: JobResponse = serde_json::from_str(
            r#"{"id":"job-1","upload_uri":"https://up.example/x?Key=abc"}"#,
        )
        .unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.upload_uri, "https://up.example/x?Key=abc");
    }

    #[tokio::test]
    async fn rejects_unprintable_files_before_any_request() {
        let config = crate::core::config::AppConfig::from_vars(|key| match key {
            "SLACK_BOT_TOKEN" => Some("xoxb".to_string()),
            "OPENAI_API_KEY" => Some("sk".to_string()),
            "PRINTER_EMAIL" => Some("p@print.epsonconnect.com".to_string()),
            "EPSON_CLIENT_ID" => Some("id".to_string()),
            "EPSON_CLIENT_SECRET" => Some("secret".to_string()),
            "EPSON_BASE_URL" => Some("http://127.0.0.1:9".to_string()),
            _ => None,
        })
        .unwrap();
        let client = EpsonConnectClient::new(&config).unwrap();

        let err = client.print(Path::new("/tmp/notes.docx")).await.unwrap_err();
        assert!(matches!(err, BotError::PrinterError(_)));
    }
}
