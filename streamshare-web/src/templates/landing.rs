//! Landing page: shared files, connection details and the upload form

use std::sync::Arc;

use streamshare_core::{FileDescriptor, ServerConfig};

use super::base::{base_template, escape_html};

const QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

const UPLOAD_WIDGET: &str = r#"<div class="upload">
    <h3>Send a file to this computer</h3>
    <input type="file" id="upload-input">
    <button class="btn" id="upload-button">Upload</button>
    <p id="upload-status"></p>
</div>
<script>
    document.getElementById('upload-button').addEventListener('click', async () => {
        const input = document.getElementById('upload-input');
        const status = document.getElementById('upload-status');
        const file = input.files[0];
        if (!file) {
            status.textContent = 'Choose a file first.';
            return;
        }
        status.textContent = 'Uploading ' + file.name + '...';
        try {
            const response = await fetch('/upload?name=' + encodeURIComponent(file.name), {
                method: 'POST',
                body: file,
            });
            if (!response.ok) {
                throw new Error(await response.text());
            }
            status.textContent = 'Uploaded ' + file.name;
            window.location.reload();
        } catch (err) {
            status.textContent = 'Upload failed: ' + err.message;
        }
    });
</script>"#;

/// Renders the landing page for `files` as reachable through `server`.
pub fn landing_page(files: &[Arc<FileDescriptor>], server: &ServerConfig) -> String {
    let network_url = server.network_url();
    let content = format!(
        r#"<h1>StreamShare</h1>
{share}
{list}
{upload}"#,
        share = share_section(&server.local_url(), &network_url),
        list = file_list(files),
        upload = UPLOAD_WIDGET,
    );
    base_template("Shared Files", &content)
}

fn share_section(local_url: &str, network_url: &str) -> String {
    format!(
        r#"<div class="share">
    <img src="{QR_SERVICE}{qr_data}" alt="QR code for {network}" width="200" height="200">
    <p>Local: <code>{local}</code></p>
    <p>Network: <code>{network}</code></p>
</div>"#,
        qr_data = urlencoding::encode(network_url),
        local = escape_html(local_url),
        network = escape_html(network_url),
    )
}

fn file_list(files: &[Arc<FileDescriptor>]) -> String {
    if files.is_empty() {
        return r#"<p class="empty">No files shared yet. Upload one below.</p>"#.to_string();
    }

    let items: String = files.iter().map(|file| file_item(file)).collect();
    format!(r#"<ul class="files">{items}</ul>"#)
}

fn file_item(file: &FileDescriptor) -> String {
    let href = format!("/{}", urlencoding::encode(&file.display_name));
    let watch = if file.is_video() {
        format!(r#"<a class="btn secondary" href="{href}">Watch</a>"#)
    } else {
        String::new()
    };

    format!(
        r#"
    <li>
        <span class="name">{name}</span>
        <span class="size">{size:.2} MB</span>
        {watch}
        <a class="btn" href="{href}?download=true">Download</a>
    </li>"#,
        name = escape_html(&file.display_name),
        size = file.size_bytes as f64 / (1024.0 * 1024.0),
    )
}
