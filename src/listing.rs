use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::io;
use std::path::Path;

// Characters that can't appear raw in an href attribute.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&');

/// Render the index page for a directory with no index file.
pub async fn render(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let items = entries
        .iter()
        .map(|name| {
            format!(
                "<li><a href=\"{href}\">{text}</a></li>",
                href = utf8_percent_encode(name, HREF),
                text = escape_html(name),
            )
        })
        .collect::<Vec<_>>()
        .join("");

    Ok(format!(
        concat!(
            "<!DOCTYPE html>",
            "<html>",
            "<head><title>Directory listing for {path}</title></head>",
            "<body>",
            "<h1>Directory listing for {path}</h1>",
            "<hr>",
            "<ul>{items}</ul>",
            "<hr>",
            "</body>",
            "</html>",
        ),
        path = escape_html(request_path),
        items = items,
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_clean() {
        assert_eq!(escape_html("notes.txt"), "notes.txt");
    }

    #[test]
    fn escape_html_markup() {
        assert_eq!(
            escape_html(r#"<b>&"quoted"'</b>"#),
            "&lt;b&gt;&amp;&quot;quoted&quot;&#x27;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn lists_entries_sorted_with_dir_suffix() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("zebra.txt"), b"z").await.unwrap();
        tokio::fs::write(dir.path().join("apple.txt"), b"a").await.unwrap();
        tokio::fs::create_dir(dir.path().join("middle")).await.unwrap();

        let html = render(dir.path(), "/").await.unwrap();
        let apple = html.find("apple.txt").unwrap();
        let middle = html.find("middle/").unwrap();
        let zebra = html.find("zebra.txt").unwrap();
        assert!(apple < middle && middle < zebra);
        assert!(html.contains("Directory listing for /"));
    }

    #[tokio::test]
    async fn encodes_hrefs_and_escapes_names() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a b&c.txt"), b"x").await.unwrap();

        let html = render(dir.path(), "/").await.unwrap();
        assert!(html.contains(r#"href="a%20b%26c.txt""#));
        assert!(!html.contains(r#"href="a%20b&c.txt""#));
        assert!(html.contains(">a b&amp;c.txt</a>"));
    }
}
