//! In-browser player page for video files

use streamshare_core::FileDescriptor;

use super::base::{base_template, escape_html};

/// Page embedding a `<video>` element that streams the raw file.
pub fn watch_page(file: &FileDescriptor) -> String {
    const WATCH_TEMPLATE: &str = r#"<h1>{{ name }}</h1>
<video controls autoplay src="{{ source }}"></video>
<p style="text-align: center">
    <a class="btn" href="{{ download }}">Download</a>
    <a class="btn secondary" href="/">All files</a>
</p>"#;

    let path = format!("/{}", urlencoding::encode(&file.display_name));
    let content = WATCH_TEMPLATE
        .replace("{{ name }}", &escape_html(&file.display_name))
        .replace("{{ source }}", &format!("{path}?raw=true"))
        .replace("{{ download }}", &format!("{path}?download=true"));

    base_template(&file.display_name, &content)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_video_source_requests_raw_stream() {
        let file = FileDescriptor::new(PathBuf::from("/srv/holiday clip.mp4"), 10);
        let page = watch_page(&file);

        assert!(page.contains(r#"<video controls autoplay src="/holiday%20clip.mp4?raw=true""#));
        assert!(page.contains(r#"href="/holiday%20clip.mp4?download=true""#));
        assert!(page.contains("<h1>holiday clip.mp4</h1>"));
    }
}
