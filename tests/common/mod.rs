#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use printbot::clients::{CallbackSink, ChatPlatform, CompletionRequest, Completions, PrintGateway};
use printbot::core::config::AppConfig;
use printbot::core::models::{Channel, ChatFile, ChatMessage, ChatUser, Download};
use printbot::documents::PdfRenderer;
use printbot::errors::BotError;
use printbot::features::Services;
use printbot::worker::Dispatcher;
use zip::write::SimpleFileOptions;

#[derive(Default)]
pub struct FakeChat {
    pub channels: Vec<Channel>,
    pub history: HashMap<String, Vec<ChatMessage>>,
    pub users: Vec<ChatUser>,
    pub downloads: HashMap<String, Download>,
    pub unjoinable: HashSet<String>,
    pub fail_listing: bool,
}

impl FakeChat {
    pub fn with_channel(mut self, id: &str, name: &str, messages: Vec<ChatMessage>) -> Self {
        self.channels.push(Channel {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.history.insert(id.to_string(), messages);
        self
    }

    pub fn with_download(mut self, url: &str, bytes: &[u8], content_type: &str) -> Self {
        self.downloads.insert(
            url.to_string(),
            Download::Fetched {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub fn with_user(mut self, id: &str, real_name: &str, display_name: &str) -> Self {
        self.users.push(ChatUser {
            id: id.to_string(),
            real_name: Some(real_name.to_string()),
            display_name: Some(display_name.to_string()),
        });
        self
    }
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn list_channels(&self) -> Result<Vec<Channel>, BotError> {
        if self.fail_listing {
            return Err(BotError::ApiError("ratelimited".to_string()));
        }
        Ok(self.channels.clone())
    }

    async fn join_channel(&self, channel_id: &str) -> Result<(), BotError> {
        if self.unjoinable.contains(channel_id) {
            return Err(BotError::ApiError("is_archived".to_string()));
        }
        Ok(())
    }

    async fn channel_history(
        &self,
        channel_id: &str,
        _oldest: i64,
    ) -> Result<Vec<ChatMessage>, BotError> {
        Ok(self.history.get(channel_id).cloned().unwrap_or_default())
    }

    async fn list_users(&self) -> Result<Vec<ChatUser>, BotError> {
        Ok(self.users.clone())
    }

    async fn download_file(&self, url: &str) -> Result<Download, BotError> {
        Ok(self
            .downloads
            .get(url)
            .cloned()
            .unwrap_or(Download::Failed { status: 404 }))
    }
}

#[derive(Default)]
pub struct FakeLlm {
    /// `None` makes every completion fail.
    pub reply: Option<String>,
    pub image_url: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completions for FakeLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BotError> {
        self.requests.lock().unwrap().push(request);
        self.reply
            .clone()
            .ok_or_else(|| BotError::OpenAIError("model overloaded".to_string()))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, BotError> {
        self.image_url
            .clone()
            .ok_or_else(|| BotError::OpenAIError("content policy".to_string()))
    }
}

/// What the printer saw for one job.
#[derive(Debug, Clone)]
pub struct PrintedFile {
    pub path: PathBuf,
    pub existed: bool,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct FakePrinter {
    pub fail: bool,
    pub printed: Mutex<Vec<PrintedFile>>,
}

impl FakePrinter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn printed(&self) -> Vec<PrintedFile> {
        self.printed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrintGateway for FakePrinter {
    async fn print(&self, path: &Path) -> Result<String, BotError> {
        let mut printed = self.printed.lock().unwrap();
        printed.push(PrintedFile {
            path: path.to_path_buf(),
            existed: path.exists(),
            bytes: std::fs::read(path).unwrap_or_default(),
        });
        if self.fail {
            return Err(BotError::PrinterError("printer offline".to_string()));
        }
        Ok(format!("job-{}", printed.len()))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn delivered(&self) -> Vec<(String, Value)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn texts_for(&self, url: &str) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter(|(u, _)| u == url)
            .filter_map(|(_, payload)| payload["text"].as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl CallbackSink for RecordingSink {
    async fn deliver(&self, callback_url: &str, payload: &Value) -> Result<(), BotError> {
        self.delivered
            .lock()
            .unwrap()
            .push((callback_url.to_string(), payload.clone()));
        Ok(())
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub services: Arc<Services>,
    pub llm: Arc<FakeLlm>,
    pub printer: Arc<FakePrinter>,
    pub sink: Arc<RecordingSink>,
}

pub fn harness(chat: FakeChat, llm: FakeLlm, printer: FakePrinter) -> Harness {
    let llm = Arc::new(llm);
    let printer = Arc::new(printer);
    let sink = Arc::new(RecordingSink::default());
    let services = Arc::new(Services::new(
        Arc::new(chat),
        llm.clone(),
        printer.clone(),
        PdfRenderer::new(80),
    ));
    let dispatcher = Dispatcher::new(services.clone(), sink.clone());
    Harness {
        dispatcher,
        services,
        llm,
        printer,
        sink,
    }
}

pub fn test_config(signing_secret: Option<&str>) -> AppConfig {
    AppConfig::from_vars(|key| match key {
        "SLACK_BOT_TOKEN" => Some("xoxb-test".to_string()),
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "PRINTER_EMAIL" => Some("office@print.epsonconnect.com".to_string()),
        "EPSON_CLIENT_ID" => Some("client".to_string()),
        "EPSON_CLIENT_SECRET" => Some("secret".to_string()),
        "SLACK_SIGNING_SECRET" => signing_secret.map(str::to_string),
        _ => None,
    })
    .unwrap()
}

pub fn message(user: &str, text: &str) -> ChatMessage {
    ChatMessage {
        user: Some(user.to_string()),
        text: text.to_string(),
        is_channel_join: false,
        files: Vec::new(),
    }
}

pub fn join_notice(user: &str) -> ChatMessage {
    ChatMessage {
        is_channel_join: true,
        ..message(user, &format!("<@{user}> has joined the channel"))
    }
}

pub fn file_message(user: &str, file_name: &str, url: &str) -> ChatMessage {
    ChatMessage {
        files: vec![ChatFile {
            id: format!("F-{file_name}"),
            name: Some(file_name.to_string()),
            url_private: Some(url.to_string()),
        }],
        ..message(user, "")
    }
}

/// A file Slack listed without a name.
pub fn unnamed_file_message(user: &str, url: &str) -> ChatMessage {
    ChatMessage {
        files: vec![ChatFile {
            id: "F-unnamed".to_string(),
            name: None,
            url_private: Some(url.to_string()),
        }],
        ..message(user, "")
    }
}

/// A minimal Word document with one paragraph per entry.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
