//! Server-side HTML rendering for the single form page. No templating
//! engine: one page, one renderer, user text escaped before interpolation.

use crate::llm_client::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::store::SavedState;

/// Current form values, echoed back on every render so the user never
/// loses what they typed.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub resume: String,
    pub job_description: String,
    pub misc_criteria: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl FormValues {
    /// Initial page load: prefill from the persisted state, defaults elsewhere.
    pub fn from_saved(saved: &SavedState) -> Self {
        Self {
            resume: saved.resume_text.clone(),
            job_description: String::new(),
            misc_criteria: saved.misc_criteria.clone(),
            api_key: saved.api_key.clone(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// What happened to the submission, rendered below the form.
#[derive(Debug)]
pub enum Outcome {
    Success {
        content: String,
        raw_pretty: String,
    },
    Failure {
        message: String,
        raw_pretty: Option<String>,
    },
}

impl Outcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
            raw_pretty: None,
        }
    }
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_page(
    values: &FormValues,
    outcome: Option<&Outcome>,
    save_warning: Option<&str>,
) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Career Match Evaluator</title>\n\
         <style>\n\
         body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; color: #1a1a1a; }\n\
         h1 { margin-bottom: 0.25rem; }\n\
         .caption { color: #666; margin-top: 0; }\n\
         label { display: block; font-weight: 600; margin: 1rem 0 0.25rem; }\n\
         textarea, input[type=text], input[type=password] { width: 100%; box-sizing: border-box; font: inherit; padding: 0.5rem; border: 1px solid #ccc; border-radius: 4px; }\n\
         button { margin-top: 1.25rem; font: inherit; font-weight: 600; padding: 0.5rem 1.5rem; border: none; border-radius: 4px; background: #d33; color: #fff; cursor: pointer; }\n\
         .error { background: #fdecea; border: 1px solid #f5c6cb; padding: 0.75rem; border-radius: 4px; }\n\
         .warning { background: #fff8e1; border: 1px solid #ffe082; padding: 0.75rem; border-radius: 4px; }\n\
         .result { background: #f6f8fa; padding: 1rem; border-radius: 4px; white-space: pre-wrap; overflow-x: auto; }\n\
         details { margin-top: 1rem; }\n\
         details pre { background: #f6f8fa; padding: 1rem; border-radius: 4px; overflow-x: auto; }\n\
         </style>\n</head>\n<body>\n\
         <h1>Career Match Evaluator</h1>\n\
         <p class=\"caption\">Analyze how well a role matches your resume and preferences.</p>\n\
         <form method=\"post\" action=\"/\">\n",
    );

    html.push_str(&format!(
        "<label for=\"resume\">Your Resume</label>\n\
         <textarea id=\"resume\" name=\"resume\" rows=\"14\" \
         placeholder=\"Paste your resume text here...\">{}</textarea>\n",
        escape_html(&values.resume)
    ));

    html.push_str(&format!(
        "<label for=\"job_description\">Job Description</label>\n\
         <textarea id=\"job_description\" name=\"job_description\" rows=\"14\" \
         placeholder=\"Paste the job description here...\">{}</textarea>\n",
        escape_html(&values.job_description)
    ));

    html.push_str(&format!(
        "<label for=\"misc_criteria\">Misc Criteria / Preferences</label>\n\
         <textarea id=\"misc_criteria\" name=\"misc_criteria\" rows=\"6\" \
         placeholder=\"e.g., Remote-first, growth-stage startups, fintech domain, base salary range, visa support, etc.\">{}</textarea>\n",
        escape_html(&values.misc_criteria)
    ));

    html.push_str(&format!(
        "<label for=\"api_key\">OpenRouter API Key</label>\n\
         <input id=\"api_key\" name=\"api_key\" type=\"password\" value=\"{}\" \
         placeholder=\"Leave empty to use OPENROUTER_API_KEY\">\n",
        escape_html(&values.api_key)
    ));

    html.push_str(&format!(
        "<label for=\"model\">Model</label>\n\
         <input id=\"model\" name=\"model\" type=\"text\" value=\"{}\">\n",
        escape_html(&values.model)
    ));

    html.push_str(&format!(
        "<label for=\"temperature\">Temperature</label>\n\
         <input id=\"temperature\" name=\"temperature\" type=\"range\" \
         min=\"0\" max=\"1\" step=\"0.05\" value=\"{t}\" \
         oninput=\"this.nextElementSibling.value = this.value\"> <output>{t}</output>\n",
        t = values.temperature
    ));

    html.push_str("<button type=\"submit\">Run Evaluation</button>\n</form>\n");

    if let Some(warning) = save_warning {
        html.push_str(&format!(
            "<p class=\"warning\">{}</p>\n",
            escape_html(warning)
        ));
    }

    match outcome {
        Some(Outcome::Success {
            content,
            raw_pretty,
        }) => {
            html.push_str(&format!(
                "<h2>Results</h2>\n<pre class=\"result\">{}</pre>\n",
                escape_html(content)
            ));
            push_raw_details(&mut html, raw_pretty);
        }
        Some(Outcome::Failure {
            message,
            raw_pretty,
        }) => {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(message)));
            if let Some(raw) = raw_pretty {
                push_raw_details(&mut html, raw);
            }
        }
        None => {}
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_raw_details(html: &mut String, raw: &str) {
    html.push_str(&format!(
        "<details>\n<summary>Show raw response</summary>\n<pre>{}</pre>\n</details>\n",
        escape_html(raw)
    ));
}
