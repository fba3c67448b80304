//! HTML for the demo page
//!
//! The page is driven by htmx: each button swaps in the fragment returned by
//! the next endpoint. Media is handled by the Ultravox browser client.

use crate::provider::CallDetails;

const BUTTON_CLASS: &str = "bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded mt-4";

const HEAD: &str = r#"<script src="https://cdn.tailwindcss.com"></script>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>"#;

/// Creates the browser-side session once, on page load
const SESSION_SETUP_JS: &str = r#"
import { UltravoxSession } from 'https://esm.sh/ultravox-client';
const debugMessages = new Set(["debug"]);
window.UVSession = new UltravoxSession({ experimentalMessages: debugMessages });
"#;

/// Full page with the "Start call" control
pub fn index_page() -> String {
    format!(
        r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Ultravox Stages Example</title>
{HEAD}
</head>
<body>
<main>
<div class="mx-auto max-w-7xl px-4 sm:px-6 lg:px-8">
<div class="mx-auto max-w-3xl">
<script type="module">{SESSION_SETUP_JS}</script>
<h1 class="text-xl font-bold mt-8">Ultravox Stages Example</h1>
<div id="call-mgmt">
<div>Status: <span id="call-status" class="font-bold">Waiting</span></div>
<div>Call ID: <span id="call-id" class="font-bold">N/A</span></div>
<div><button hx-post="/start" hx-target="#call-mgmt" hx-swap="outerHTML" class="{BUTTON_CLASS}">Start call</button></div>
</div>
</div>
</div>
</main>
</body>
</html>"##
    )
}

/// Fragment replacing `#call-mgmt` once the provider created the call
pub fn call_fragment(call: &CallDetails) -> String {
    let call_id = escape_html(&call.call_id);
    let script = join_call_js(&call.join_url);
    format!(
        r#"<div id="call-mgmt">
<div>Status: <span id="call-status" class="font-bold">Initializing</span></div>
<div>Call ID: <span id="call-id" class="font-bold">{call_id}</span></div>
<button id="end-call" hx-get="/end" hx-swap="outerHTML" class="{BUTTON_CLASS}">End call</button>
<div id="transcript"></div>
<script>{script}</script>
</div>"#
    )
}

/// Shown in place of the call controls when the provider refused the call
pub fn provider_error_fragment(detail: &str) -> String {
    format!(
        r#"<div id="call-mgmt">
<div class="font-bold text-red-600">Could not start call</div>
<pre id="call-error" class="whitespace-pre-wrap">{}</pre>
<button hx-get="/" hx-target="body" hx-boost="false" class="{BUTTON_CLASS}">Restart</button>
</div>"#,
        escape_html(detail)
    )
}

pub fn restart_button() -> String {
    format!(r#"<button hx-get="/" hx-target="body" hx-boost="false" class="{BUTTON_CLASS}">Restart</button>"#)
}

/// Joins the call and mirrors status and agent transcripts into the page.
/// Leaving the call is done here in the browser; `/end` only swaps the UI.
fn join_call_js(join_url: &str) -> String {
    let join_url = js_string(join_url);
    format!(
        r##"
async function joinCall() {{
    const callStatus = await window.UVSession.joinCall({join_url});
    console.log(callStatus);
}}

window.UVSession.addEventListener('status', (e) => {{
    let statusDiv = htmx.find("#call-status");
    statusDiv.innerText = e.target._status;
}});

window.UVSession.addEventListener('transcripts', (e) => {{
    let transcripts = e.target._transcripts;
    let transcript = htmx.find("#transcript");
    transcript.innerText = transcripts.filter(t => t && t.speaker !== "user").map(t => t ? t.text : "").join("\n");
}});

window.UVSession.addEventListener('experimental_message', (msg) => {{
    console.log('Debug: ', JSON.stringify(msg));
}});

joinCall();

htmx.on("#end-call", "click", async (e) => {{
    try {{
        await window.UVSession.leaveCall();
    }} catch (error) {{
        console.error("Error leaving call:", error);
    }}
}});
"##
    )
}

/// JSON string literal that is also safe inside a `<script>` element
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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
