//! HTML rendering for the single-page UI.

use pulldown_cmark::{html, Event, Options, Parser};

/// What the page shows below the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// First visit: nothing uploaded yet.
    Empty,
    Success { file_name: String, analysis: String },
    Failure { message: String },
}

const STYLE: &str = r#"
body { background-color: #0e1117; color: #fafafa; font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 24px; }
h1 { text-align: center; color: #00ffcc; }
.columns { display: flex; gap: 24px; }
.columns > div { flex: 1; }
textarea { width: 100%; min-height: 160px; background-color: #1e222b; color: #fafafa; border-radius: 8px; }
button { background-color: #00ffcc; color: #000; border: none; border-radius: 8px; padding: 10px 20px; font-weight: bold; }
button:hover { background-color: #00ccaa; color: #fff; }
.notice { border-radius: 8px; padding: 10px 14px; margin: 12px 0; }
.info { background-color: #172d43; }
.success { background-color: #173928; }
.error { background-color: #3e1c1c; }
"#;

pub fn render_page(outcome: &Outcome, job_description: &str) -> String {
    let result = match outcome {
        Outcome::Empty => notice("info", "📌 Please upload a resume in PDF format."),
        Outcome::Success {
            file_name,
            analysis,
        } => format!(
            "{}{}<section class=\"analysis\">{}</section>",
            notice(
                "success",
                &format!("✅ {} uploaded successfully!", escape_html(file_name))
            ),
            notice("success", "✅ Analysis complete!"),
            render_markdown(analysis)
        ),
        Outcome::Failure { message } => {
            notice("error", &format!("❌ {}", escape_html(message)))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Analyzer</title>
<style>{STYLE}</style>
</head>
<body>
<h1>📄 AI Resume Analyzer</h1>
<p style="text-align:center;">Upload your resume and match it with job descriptions using <b>Google Gemini</b>.</p>
<form method="post" action="/analyze" enctype="multipart/form-data">
<div class="columns">
<div>
<label for="resume">📤 Upload your resume (PDF)</label><br>
<input type="file" id="resume" name="resume" accept=".pdf,application/pdf" required>
</div>
<div>
<label for="job_description">📝 Enter Job Description</label><br>
<textarea id="job_description" name="job_description" placeholder="Paste the job description here...">{jd}</textarea>
</div>
</div>
<p><button type="submit">🔍 Analyze Resume</button></p>
</form>
{result}
</body>
</html>
"#,
        jd = escape_html(job_description),
    )
}

fn notice(kind: &str, html_message: &str) -> String {
    format!("<div class=\"notice {kind}\">{html_message}</div>")
}

/// Renders model output as Markdown. Raw HTML in the output is shown as text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
