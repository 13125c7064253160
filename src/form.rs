//! Browser form for the translation endpoint.
//!
//! The page is rendered server-side; submissions go through [`FormClient`],
//! which calls `/translate` over HTTP like any other client would and sorts
//! the answer into one [`FormOutcome`].

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::translate::TranslateRequest;

pub const LANGUAGE_OPTIONS: &[&str] = &[
    "French", "Spanish", "German", "Japanese", "Hindi", "Italian",
];
pub const DEFAULT_TEXT: &str = "Hello, how are you today?";

/// What one form submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Translated(String),
    /// 2xx without a `translation` string.
    MalformedResponse,
    HttpError { status: u16, body: String },
    ConnectionFailed(String),
    /// Nothing was sent.
    MissingInput,
    /// Language outside [`LANGUAGE_OPTIONS`]; nothing was sent.
    UnsupportedLanguage(String),
}

/// Fields posted by the form.
#[derive(Debug, Clone, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub text: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            language: LANGUAGE_OPTIONS[0].to_string(),
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormClient {
    client: Client,
    api_url: String,
}

impl FormClient {
    pub fn new(api_url: String) -> anyhow::Result<Self> {
        Ok(Self::with_client(Client::builder().build()?, api_url))
    }

    pub fn with_client(client: Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Send one translation request. Never retries.
    pub async fn submit(&self, language: &str, text: &str) -> FormOutcome {
        if language.trim().is_empty() || text.trim().is_empty() {
            return FormOutcome::MissingInput;
        }
        if !LANGUAGE_OPTIONS.contains(&language) {
            warn!(language, "form submitted with a language outside the offered list");
            return FormOutcome::UnsupportedLanguage(language.to_string());
        }

        let request = TranslateRequest {
            language: language.to_string(),
            text: text.to_string(),
        };
        info!(api_url = %self.api_url, language, "submitting translation form");

        let response = match self.client.post(&self.api_url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(api_url = %self.api_url, error = %e, "could not reach translation API");
                return FormOutcome::ConnectionFailed(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FormOutcome::ConnectionFailed(e.to_string()),
        };

        if !status.is_success() {
            return FormOutcome::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        classify_success_body(&body)
    }
}

fn classify_success_body(body: &str) -> FormOutcome {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("translation")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .map(FormOutcome::Translated)
        .unwrap_or(FormOutcome::MalformedResponse)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_outcome(outcome: &FormOutcome) -> String {
    match outcome {
        FormOutcome::Translated(text) => format!(
            r#"<div class="success">Translation successful!</div>
<h3>Translated Text:</h3>
<textarea id="result" rows="6" readonly>{}</textarea>"#,
            escape_html(text)
        ),
        FormOutcome::MalformedResponse => {
            r#"<div class="error">The API answered successfully but sent no translation. No translation found.</div>"#
                .to_string()
        }
        FormOutcome::HttpError { status, body } => format!(
            r#"<div class="error">Error from API: {} - {}</div>"#,
            status,
            escape_html(body)
        ),
        FormOutcome::ConnectionFailed(details) => format!(
            r#"<div class="error">Could not connect to the backend API. Please ensure the translation server is running.</div>
<div class="error">Details: {}</div>"#,
            escape_html(details)
        ),
        FormOutcome::UnsupportedLanguage(language) => format!(
            r#"<div class="warning">"{}" is not one of the offered languages.
Please select a language from the list.</div>"#,
            escape_html(language)
        ),
        FormOutcome::MissingInput => {
            r#"<div class="warning">Please enter text to translate and select a language.</div>"#
                .to_string()
        }
    }
}

/// Render the whole page, optionally with the result of a submission.
pub fn render_page(input: &FormInput, outcome: Option<&FormOutcome>) -> String {
    let options: String = LANGUAGE_OPTIONS
        .iter()
        .map(|lang| {
            let selected = if *lang == input.language { " selected" } else { "" };
            format!(r#"<option value="{lang}"{selected}>{lang}</option>"#)
        })
        .collect();
    let result = outcome.map(render_outcome).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Text Translator</title>
<style>
body {{ font-family: sans-serif; max-width: 42rem; margin: 2rem auto; }}
textarea, select {{ width: 100%; }}
.success {{ color: #1b5e20; }}
.error {{ color: #b71c1c; }}
.warning {{ color: #e65100; }}
#busy {{ display: none; }}
</style>
</head>
<body>
<h1>Text Translator</h1>
<p>This page sends your text to the translation API, which uses a large language model.</p>
<form method="post" action="/ui/translate" onsubmit="document.getElementById('busy').textContent = 'Translating to ' + this.language.value + '...'; document.getElementById('busy').style.display = 'block'; this.submit_button.disabled = true;">
<h2>Enter the text you want to translate</h2>
<textarea name="text" rows="6">{text}</textarea>
<h2>Select the target language</h2>
<select name="language">{options}</select>
<p><button type="submit" name="submit_button">Translate</button></p>
<div id="busy"></div>
</form>
{result}
</body>
</html>
"#,
        text = escape_html(&input.text),
        options = options,
        result = result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    fn client(api_url: String) -> FormClient {
        FormClient::with_client(Client::builder().no_proxy().build().unwrap(), api_url)
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/translate", addr)
    }

    #[tokio::test]
    async fn success_with_translation_is_rendered() {
        let url = serve(Router::new().route(
            "/translate",
            post(|Json(req): Json<TranslateRequest>| async move {
                assert_eq!(req.language, "Spanish");
                Json(json!({"translation": "Hola"}))
            }),
        ))
        .await;

        let outcome = client(url).submit("Spanish", "Hello").await;
        assert_eq!(outcome, FormOutcome::Translated("Hola".into()));
    }

    #[tokio::test]
    async fn success_without_translation_is_malformed() {
        let url =
            serve(Router::new().route("/translate", post(|| async { Json(json!({})) }))).await;

        let outcome = client(url).submit("French", "Hi").await;
        assert_eq!(outcome, FormOutcome::MalformedResponse);
    }

    #[tokio::test]
    async fn error_status_keeps_code_and_body() {
        let url = serve(Router::new().route(
            "/translate",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"detail": "Translation service unavailable"})),
                )
            }),
        ))
        .await;

        match client(url).submit("French", "Hi").await {
            FormOutcome::HttpError { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("Translation service unavailable"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_connection_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = client(format!("http://{}/translate", addr))
            .submit("French", "Hi")
            .await;
        assert!(matches!(outcome, FormOutcome::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn blank_input_sends_nothing() {
        // Port 9 on localhost is never contacted because validation short-circuits.
        let client = client("http://127.0.0.1:9/translate".into());
        assert_eq!(client.submit("French", "   ").await, FormOutcome::MissingInput);
        assert_eq!(client.submit("", "Hello").await, FormOutcome::MissingInput);
    }

    #[tokio::test]
    async fn unlisted_language_sends_nothing() {
        // Port 9 is never contacted because the language check short-circuits.
        let client = client("http://127.0.0.1:9/translate".into());
        assert_eq!(
            client.submit("Klingon", "Hello").await,
            FormOutcome::UnsupportedLanguage("Klingon".into())
        );
        let page = render_outcome(&FormOutcome::UnsupportedLanguage("<Klingon>".into()));
        assert!(page.contains("&lt;Klingon&gt;"));
        assert!(page.contains("offered languages"));
    }

    #[test]
    fn malformed_and_connection_messages_differ() {
        let malformed = render_outcome(&FormOutcome::MalformedResponse);
        let connection = render_outcome(&FormOutcome::ConnectionFailed("refused".into()));
        assert!(malformed.contains("No translation found"));
        assert!(!malformed.contains("Could not connect"));
        assert!(connection.contains("Could not connect"));
        assert!(connection.contains("refused"));
    }

    #[test]
    fn page_escapes_user_text_and_selects_language() {
        let input = FormInput {
            language: "Hindi".into(),
            text: "<script>alert(1)</script>".into(),
        };
        let page = render_page(&input, Some(&FormOutcome::HttpError {
            status: 500,
            body: "Translation failed: <boom>".into(),
        }));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains(r#"<option value="Hindi" selected>Hindi</option>"#));
        assert!(page.contains("Error from API: 500 - Translation failed: &lt;boom&gt;"));
    }

    #[test]
    fn non_json_success_body_is_malformed() {
        assert_eq!(classify_success_body("<html>"), FormOutcome::MalformedResponse);
        assert_eq!(
            classify_success_body(r#"{"translation": 42}"#),
            FormOutcome::MalformedResponse
        );
    }
}
