use std::env;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_EPSON_BASE_URL: &str = "https://api.epsonconnect.com";
pub const DEFAULT_MAX_CHARS_PER_LINE: usize = 80;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_host: String,
    pub app_port: u16,
    pub slack_bot_token: String,
    /// When unset, inbound requests are not signature-checked.
    pub slack_signing_secret: Option<String>,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub openai_image_model: String,
    pub openai_base_url: String,
    pub printer_email: String,
    pub epson_client_id: String,
    pub epson_client_secret: String,
    pub epson_base_url: String,
    pub pdf_max_chars_per_line: usize,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{key}: environment variable not found"))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = match optional("OPENAI_API_KEY") {
            Some(key) => key,
            None => required("OPEN_AI_KEY").map_err(|_| {
                "OPENAI_API_KEY: environment variable not found".to_string()
            })?,
        };

        let app_port = match optional("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("APP_PORT: {e}"))?,
            None => 8080,
        };

        let pdf_max_chars_per_line = match optional("PDF_MAX_CHARS_PER_LINE") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => return Err("PDF_MAX_CHARS_PER_LINE: must be positive".to_string()),
                Ok(n) => n,
                Err(e) => return Err(format!("PDF_MAX_CHARS_PER_LINE: {e}")),
            },
            None => DEFAULT_MAX_CHARS_PER_LINE,
        };

        Ok(Self {
            app_host: optional("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            app_port,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: optional("SLACK_SIGNING_SECRET"),
            openai_api_key,
            openai_org_id: optional("OPENAI_ORG_ID"),
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_image_model: optional("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_IMAGE_MODEL.to_string()),
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            printer_email: required("PRINTER_EMAIL")?,
            epson_client_id: required("EPSON_CLIENT_ID")?,
            epson_client_secret: required("EPSON_CLIENT_SECRET")?,
            epson_base_url: optional("EPSON_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EPSON_BASE_URL.to_string()),
            pdf_max_chars_per_line,
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SLACK_BOT_TOKEN", "xoxb-test"),
            ("OPENAI_API_KEY", "sk-test"),
            ("PRINTER_EMAIL", "printer@print.epsonconnect.com"),
            ("EPSON_CLIENT_ID", "client"),
            ("EPSON_CLIENT_SECRET", "secret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, String> {
        AppConfig::from_vars(|k| vars.get(k).map(|v| (*v).to_string()))
    }

    #[test]
    fn applies_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.openai_image_model, DEFAULT_OPENAI_IMAGE_MODEL);
        assert_eq!(config.pdf_max_chars_per_line, 80);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.slack_signing_secret.is_none());
    }

    #[test]
    fn accepts_legacy_openai_key_name() {
        let mut vars = base_vars();
        vars.remove("OPENAI_API_KEY");
        vars.insert("OPEN_AI_KEY", "sk-legacy");
        let config = load(&vars).unwrap();
        assert_eq!(config.openai_api_key, "sk-legacy");
    }

    #[test]
    fn reports_missing_required_variable() {
        let mut vars = base_vars();
        vars.remove("PRINTER_EMAIL");
        let err = load(&vars).unwrap_err();
        assert!(err.starts_with("PRINTER_EMAIL"));
    }

    #[test]
    fn rejects_zero_line_width() {
        let mut vars = base_vars();
        vars.insert("PDF_MAX_CHARS_PER_LINE", "0");
        assert!(load(&vars).is_err());
    }
}
