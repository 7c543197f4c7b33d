//! HTML pages for the browser-facing routes
//!
//! Anything user supplied is escaped with `html-escape` before it lands in a page.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::UserInfo;

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: 'Segoe UI', -apple-system, BlinkMacSystemFont, sans-serif;
    background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
    min-height: 100vh;
    padding: 40px 20px;
    color: #e8e8e8;
}
.container {
    max-width: 620px;
    margin: 0 auto;
    background: rgba(255, 255, 255, 0.05);
    border-radius: 20px;
    padding: 40px;
    border: 1px solid rgba(255, 255, 255, 0.1);
}
h1, h2 { color: #00d4ff; margin-bottom: 24px; }
.form-group { margin: 20px 0; }
label { display: block; margin-bottom: 8px; color: #b8b8b8; }
input, textarea {
    width: 100%;
    padding: 12px 14px;
    border: 2px solid rgba(255, 255, 255, 0.1);
    border-radius: 10px;
    background: rgba(0, 0, 0, 0.3);
    color: #fff;
}
textarea { height: 110px; resize: vertical; }
button, .btn {
    display: inline-block;
    background: #00d4ff;
    color: #000;
    border: none;
    padding: 12px 24px;
    border-radius: 10px;
    font-weight: 600;
    text-decoration: none;
    cursor: pointer;
    margin-top: 12px;
}
.hint { font-size: 12px; color: #888; margin-top: 6px; }
.notice { background: rgba(255, 170, 0, 0.15); padding: 12px; border-radius: 10px; margin-bottom: 16px; }
.error { color: #ff6b6b; }
.info-item { display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid rgba(255, 255, 255, 0.08); }
.uuid { font-family: monospace; }
.links { margin-top: 28px; display: flex; flex-wrap: wrap; gap: 12px; }
.links a { color: #00d4ff; text-decoration: none; }
"#;

const NAV: &str = r#"<div class="links">
    <a href="/llmaget/set">Settings</a>
    <a href="/llmaget/refresh">Refresh</a>
    <a href="/llmaget/status">Status</a>
    <a href="/llmaget/ff_info">Character</a>
    <a href="/llmaget/sign_in">Sign in</a>
    <a href="/llmaget/search">Search</a>
</div>"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Risingstones - {title}</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
{body}
{NAV}
    </div>
</body>
</html>"#,
        title = encode_text(title),
    )
}

/// Credentials form, submitted back to `/llmaget/set` as a GET
pub fn config_page() -> String {
    layout(
        "Settings",
        r#"<h1>Risingstones settings</h1>
<form method="GET" action="/llmaget/set">
    <div class="form-group">
        <label for="cookie">Cookie (value of ff14risingstones)</label>
        <textarea id="cookie" name="cookie" placeholder="Paste the ff14risingstones cookie value"></textarea>
        <div class="hint">Log in to the site, open the developer tools and copy the ff14risingstones cookie.</div>
    </div>
    <div class="form-group">
        <label for="ua">User-Agent (optional)</label>
        <input id="ua" type="text" name="ua" placeholder="Leave empty to keep the current value">
    </div>
    <button type="submit">Save</button>
</form>"#,
    )
}

pub fn config_saved_page() -> String {
    layout(
        "Saved",
        r#"<h1>Settings saved</h1>
<p>The new credentials are in use. Trigger a refresh to fetch your profile.</p>
<a class="btn" href="/llmaget/refresh">Refresh now</a>"#,
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            r#"<h1>Something went wrong</h1>
<p class="error">{}</p>
<a class="btn" href="/llmaget/set">Back to settings</a>"#,
            encode_text(message)
        ),
    )
}

fn search_form(name: &str, server: &str) -> String {
    format!(
        r#"<form method="GET" action="/llmaget/search">
    <div class="form-group">
        <label for="name">Character name</label>
        <input id="name" type="text" name="name" value="{}" required>
    </div>
    <div class="form-group">
        <label for="server_name">Server or region (optional)</label>
        <input id="server_name" type="text" name="server_name" value="{}">
        <div class="hint">A server name, or a region alias: n/鸟 陆行鸟, z/猪 莫古力, m/猫 猫小胖, g/狗 豆豆柴</div>
    </div>
    <button type="submit">Search</button>
</form>"#,
        encode_double_quoted_attribute(name),
        encode_double_quoted_attribute(server),
    )
}

/// Empty search form; `notice` is shown above it when set
pub fn search_page(notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| {
            format!(
                r#"<div class="notice">{} <a href="/llmaget/set">Open settings</a></div>"#,
                encode_text(n)
            )
        })
        .unwrap_or_default();

    layout(
        "Search",
        &format!("<h1>Character search</h1>\n{notice}\n{}", search_form("", "")),
    )
}

/// Search outcome with the form pre-filled for another try
pub fn search_result_page(name: &str, server: &str, result: Result<&UserInfo, &str>) -> String {
    let content = match result {
        Ok(user) => {
            let area = if user.area_name.is_empty() {
                "-"
            } else {
                user.area_name.as_str()
            };
            format!(
                r#"<h2>User found</h2>
<div class="info-item"><span>Character</span><span>{}</span></div>
<div class="info-item"><span>Server</span><span>{}</span></div>
<div class="info-item"><span>Region</span><span>{}</span></div>
<div class="info-item"><span>UUID</span><span class="uuid">{}</span></div>"#,
                encode_text(&user.user_name),
                encode_text(&user.group_name),
                encode_text(area),
                encode_text(&user.uuid),
            )
        }
        Err(message) => format!(
            r#"<h2>Search failed</h2>
<p class="error">{}</p>"#,
            encode_text(message)
        ),
    };

    layout(
        "Search result",
        &format!("<h1>Character search</h1>\n{content}\n{}", search_form(name, server)),
    )
}
