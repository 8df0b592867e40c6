use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录存在
    if !dist_path.exists() {
        println!("cargo:warning=frontend/dist not found, embedding a placeholder page");
        create_placeholder(&dist_path);
    }
}

fn create_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path).expect("Failed to create dist directory");

    let placeholder = r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%SYSTEM_NAME%</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 560px;
            margin: 96px auto;
            padding: 16px;
        }
        code {
            background: #f1f3f4;
            padding: 2px 6px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <h1>%SYSTEM_NAME%</h1>
    <p>The web client has not been built. The API is available under <code>/api/v1</code>.</p>
    <p><code>cd frontend && bun install && bun run build</code></p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), placeholder)
        .expect("Failed to write placeholder index.html");
    fs::write(dist_path.join("favicon.ico"), []).expect("Failed to write placeholder favicon");
}
