//! Base HTML template with common styles

/// Wraps page content in the shared document shell.
pub fn base_template(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - StreamShare</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        * {{ box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
               background: #f4f4f4; color: #333; margin: 0; padding: 40px 20px; text-align: center; }}
        .card {{ background: #fff; padding: 30px; border-radius: 10px; box-shadow: 0 4px 6px rgba(0,0,0,0.1);
                 display: inline-block; max-width: 720px; width: 100%; text-align: left; }}
        h1 {{ margin-top: 0; text-align: center; }}
        p {{ color: #666; }}
        .btn {{ background: #007bff; color: #fff; padding: 8px 16px; text-decoration: none; border-radius: 5px;
                font-weight: bold; border: none; cursor: pointer; display: inline-block; }}
        .btn:hover {{ background: #0056b3; }}
        .btn.secondary {{ background: #6c757d; }}
        .files {{ list-style: none; padding: 0; }}
        .files li {{ display: flex; align-items: center; gap: 10px; padding: 10px 0; border-bottom: 1px solid #eee; }}
        .files .name {{ flex: 1; word-break: break-all; }}
        .files .size {{ color: #999; white-space: nowrap; }}
        .empty {{ text-align: center; font-style: italic; }}
        .share {{ text-align: center; margin: 20px 0; }}
        .share code {{ background: #f0f0f0; padding: 2px 6px; border-radius: 4px; }}
        .upload {{ border-top: 1px solid #eee; padding-top: 20px; margin-top: 20px; }}
        video {{ width: 100%; max-height: 80vh; background: #000; border-radius: 6px; }}
    </style>
</head>
<body>
    <div class="card">
        {content}
    </div>
</body>
</html>"#
    )
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_title_is_escaped() {
        let page = base_template("<b>", "");
        assert!(page.contains("<title>&lt;b&gt; - StreamShare</title>"));
    }
}
