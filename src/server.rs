//! Thin HTTP surface over the pipeline: an HTML form, `POST /upload`, and
//! `POST /ask`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::ingestion::Ingestor;
use crate::pipeline::{AskOutcome, RagPipeline};
use crate::types::RagError;

/// Shared handler state; collaborators are constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
    pub pipeline: Arc<RagPipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/upload", post(upload))
        .route("/ask", post(ask))
        .with_state(state)
}

#[derive(Deserialize)]
struct UploadForm {
    text: String,
}

#[derive(Deserialize)]
struct AskForm {
    question: String,
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn upload(
    State(state): State<AppState>,
    Form(form): Form<UploadForm>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state
        .ingestor
        .ingest(&form.text, "user")
        .await
        .map_err(internal_error)?;
    Ok(Json(json!({ "status": "success" })))
}

async fn ask(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let outcome = state
        .pipeline
        .ask(&form.question)
        .await
        .map_err(internal_error)?;

    match outcome {
        AskOutcome::NoContext { .. } => Ok(Html(
            "<h3>No relevant context found.</h3><a href='/'>Back</a>".to_string(),
        )),
        AskOutcome::Answered {
            answer,
            sources,
            elapsed,
        } => {
            let mut html = format!(
                "<h2>Answer</h2>\n\
                 <div class=\"answer-box\" style=\"white-space: pre-wrap;\">{}</div>\n\
                 <h3>Sources</h3>\n",
                escape_html(&answer)
            );
            for (i, source) in sources.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"source\">[{}] {} | position {}</div>\n",
                    i + 1,
                    escape_html(&source.source),
                    source.position
                ));
            }
            html.push_str(&format!(
                "<p><b>Time taken:</b> {:.2} seconds</p>\n<a href=\"/\">Ask another question</a>",
                elapsed.as_secs_f64()
            ));
            Ok(Html(html))
        }
    }
}

fn internal_error(err: RagError) -> (StatusCode, String) {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>ragweave</title>
    <style>
        body { font-family: Arial; margin: 40px; }
        textarea { width: 100%; height: 120px; }
        input[type=text] { width: 100%; padding: 8px; }
        button { padding: 10px 20px; margin-top: 10px; }
        .box { border: 1px solid #ccc; padding: 15px; margin-top: 20px; }
        .source { font-size: 14px; color: #555; margin-top: 5px; }
        #upload-status { color: green; margin-top: 10px; }
    </style>
</head>
<body>

<h2>ragweave</h2>

<div class="box">
<h3>1. Upload / Paste Text</h3>
<textarea id="upload-text" placeholder="Paste document text here"></textarea>
<br>
<button onclick="uploadText()">Upload</button>
<div id="upload-status"></div>
</div>

<div class="box">
<h3>2. Ask Question</h3>
<form action="/ask" method="post">
    <input type="text" name="question" placeholder="Ask a question">
    <br>
    <button type="submit">Ask</button>
</form>
</div>

<script>
async function uploadText() {
    const text = document.getElementById('upload-text').value;
    if (!text.trim()) {
        alert('Please enter text to upload.');
        return;
    }

    const body = new URLSearchParams();
    body.append('text', text);

    try {
        const response = await fetch('/upload', { method: 'POST', body });
        if (response.ok) {
            document.getElementById('upload-status').innerText = 'Text stored in vector index';
            document.getElementById('upload-text').value = '';
        } else {
            document.getElementById('upload-status').innerText = 'Upload failed';
        }
    } catch (err) {
        document.getElementById('upload-status').innerText = 'Error: ' + err;
    }
}
</script>

</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_escaped() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }
}
