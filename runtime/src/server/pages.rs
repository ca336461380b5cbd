//! Informational HTML pages.

use axum::response::Html;

const HOME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>ytdl-gateway</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <h1>ytdl-gateway</h1>
  <p>Media metadata from any page yt-dlp understands, as JSON over HTTP.</p>
  <form action="/ytdl" method="get">
    <input type="url" name="url" placeholder="https://www.youtube.com/watch?v=..." required>
    <button type="submit">Extract</button>
  </form>
  <p><a href="/docs">API documentation</a></p>
</body>
</html>
"#;

const DOCS: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>ytdl-gateway API</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <h1>API</h1>

  <h2>GET /ytdl?url=&lt;url&gt;</h2>
  <p>Runs <code>yt-dlp --dump-json</code> against the URL.</p>
  <pre>200 {"success": true, "data": { ... }}
400 {"error": "URL query parameter is required"}
500 {"success": false, "error": "..."}</pre>

  <h2>POST /ytdl</h2>
  <p>Same as above with a JSON body:</p>
  <pre>{"url": "https://www.youtube.com/watch?v=..."}</pre>

  <h2>GET /proxy?url=&lt;image url&gt;</h2>
  <p>Relays the image bytes through this server with
  <code>Content-Type: image/jpeg</code>. Failures answer 500 with a plain-text message.</p>

  <p><a href="/">Back</a></p>
</body>
</html>
"#;

pub async fn home() -> Html<&'static str> {
    Html(HOME)
}

pub async fn docs() -> Html<&'static str> {
    Html(DOCS)
}
