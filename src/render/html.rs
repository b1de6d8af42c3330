//! HTML page pieces shared by both summary layouts.

use super::inline::{escape_attr, escape_html};
use super::{Block, SummarySection};
use crate::storyboard::ImageCandidate;
use crate::timestamp;
use std::path::Path;

const STYLE: &[&str] = &[
    "body{font-family:sans-serif;line-height:1.7em;padding:1em;background:#121212;color:#fff}",
    "h1,h2,h3,h4{color:#ff9800;border-bottom:1px solid #333;padding-bottom:.3em;margin-top:1.5em}",
    "ul,ol{margin-left:1.5em}",
    "li{margin-bottom:.3em}",
    "p{margin-top:.8em}",
    "a{color:#4fc3f7;text-decoration:none}",
    "[data-ts],.section{margin:1.5em 0}",
    ".thumbnail{max-width:480px;width:100%;border-radius:4px}",
    ".timestamp-images{display:grid;grid-template-columns:repeat(6,1fr);gap:16px;margin-top:.8em}",
    ".timestamp-image{width:100%;aspect-ratio:16/9;object-fit:contain;background:#eee;border-radius:4px;box-shadow:0 2px 4px rgba(0,0,0,.1);transition:transform .3s ease,box-shadow .3s ease;cursor:pointer}",
    ".timestamp-image:hover{transform:scale(2);z-index:10;box-shadow:0 8px 16px rgba(0,0,0,.2);border:2px solid #ff9800}",
    ".subtitle-excerpt{background:#1e1e1e;border-left:3px solid #555;padding:.5em 1em;margin-top:.8em;color:#ccc;font-size:.9em}",
    ".subtitle-excerpt summary{cursor:pointer;color:#aaa}",
    ".jump-link{background:#333;padding:10px;margin:10px 0;border-radius:5px;text-align:center}",
    ".detail-section{border-top:2px solid #666;margin-top:2em;padding-top:2em}",
    ".preview{position:fixed;right:1em;bottom:1em;width:480px;aspect-ratio:16/9;z-index:20;background:#000;box-shadow:0 8px 24px rgba(0,0,0,.6)}",
    ".preview iframe{width:100%;height:100%;border:0}",
];

/// Opening lines of the page, up to and including `<body>`.
pub fn page_head(title: Option<&str>, generated: &str) -> Vec<String> {
    let mut lines = vec![
        "<html>".to_string(),
        "<head><meta charset='utf-8'>".to_string(),
        format!("<meta name='generator' content='yoyaku {}'>", env!("CARGO_PKG_VERSION")),
        format!("<meta name='date' content='{}'>", escape_attr(generated)),
    ];
    if let Some(title) = title {
        lines.push(format!("<title>{}</title>", escape_html(title)));
    }
    lines.push("<style>".to_string());
    lines.extend(STYLE.iter().map(|s| s.to_string()));
    lines.push("</style>".to_string());
    lines.push("</head>".to_string());
    lines.push("<body>".to_string());
    lines
}

pub fn page_tail() -> &'static str {
    "</body></html>"
}

pub fn thumbnail(url: &str) -> String {
    format!("<p><img src=\"{}\" class='thumbnail' alt='thumbnail'></p>", escape_attr(url))
}

pub fn jump_link() -> String {
    "<div class='jump-link'>\n<a href='#detail-section'>📄 詳細に飛ぶ</a>\n</div>".to_string()
}

/// The deep link shown under a section.
pub fn video_link(url_base: &str, seconds: u32) -> String {
    format!(
        "<p><a href=\"{}{}\" target=\"_blank\">▶ 動画：{}</a></p>",
        escape_attr(url_base),
        seconds,
        timestamp::format(seconds)
    )
}

/// A grid of clickable frames, each linking to its own moment.
pub fn image_grid(images: &[ImageCandidate], url_base: &str, html_dir: Option<&Path>) -> String {
    let mut buf = vec!["<div class='timestamp-images'>".to_string()];
    for image in images {
        let start = image.start.max(0.0) as u64;
        buf.push(format!(
            "<a href=\"{}{}\" target=\"_blank\"><img src=\"{}\" class=\"timestamp-image\" data-start=\"{}\" alt=\"Screenshot at {}\" title=\"クリックして{}の動画を開く\"></a>",
            escape_attr(url_base),
            start,
            escape_attr(&relative_src(&image.path, html_dir)),
            start,
            timestamp::format_clock(image.start),
            timestamp::format_minutes_label(image.start),
        ));
    }
    buf.push("</div>".to_string());
    buf.join("\n")
}

/// Collapsible caption text for the section's time range.
pub fn subtitle_excerpt(text: &str) -> String {
    let body = text
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>\n");
    format!(
        "<details class='subtitle-excerpt'>\n<summary>字幕を表示</summary>\n<p>{}</p>\n</details>",
        body
    )
}

/// Image `src` relative to the page's directory, with `/` separators.
pub fn relative_src(path: &Path, html_dir: Option<&Path>) -> String {
    let rel = html_dir
        .and_then(|dir| path.strip_prefix(dir).ok())
        .unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Render one section block in fixed order: heading, body, images, link,
/// caption excerpt.
pub fn section(section: &SummarySection, url_base: &str, html_dir: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();

    match section.timestamp {
        Some(ts) => lines.push(format!("<div class='timestamp-section' data-ts='{}'>", ts)),
        None => lines.push("<div class='section'>".to_string()),
    }

    if let Some(heading) = &section.heading {
        let level = heading.level.clamp(1, 4);
        lines.push(format!("<h{}>{}</h{}>", level, heading.html, level));
    }

    lines.extend(section.body.iter().map(Block::to_html));

    if let Some(ts) = section.timestamp {
        if !section.images.is_empty() {
            lines.push(image_grid(&section.images, url_base, html_dir));
        }
        lines.push(video_link(url_base, ts));
        if let Some(excerpt) = &section.subtitle_excerpt {
            lines.push(subtitle_excerpt(excerpt));
        }
    }

    lines.push("</div>".to_string());
    lines
}

/// Hover a frame to load an embedded player at that moment; click the
/// player to close it.
pub fn preview_script(embed_base: &str) -> String {
    let base = serde_json::to_string(embed_base).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"<div id='preview' class='preview' hidden><iframe allow='autoplay; encrypted-media' allowfullscreen></iframe></div>
<script>
(function() {{
  var base = {base};
  var box = document.getElementById('preview');
  var frame = box.querySelector('iframe');
  var timer = null;
  document.querySelectorAll('img[data-start]').forEach(function(img) {{
    img.addEventListener('mouseenter', function() {{
      clearTimeout(timer);
      timer = setTimeout(function() {{
        var src = base + img.dataset.start;
        if (frame.src !== src) {{ frame.src = src; }}
        box.hidden = false;
      }}, 600);
    }});
    img.addEventListener('mouseleave', function() {{ clearTimeout(timer); }});
  }});
  box.addEventListener('click', function() {{
    box.hidden = true;
    frame.src = 'about:blank';
  }});
}})();
</script>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Heading;
    use std::path::PathBuf;

    #[test]
    fn test_video_link() {
        assert_eq!(
            video_link("https://www.youtube.com/watch?v=abc&t=", 987),
            "<p><a href=\"https://www.youtube.com/watch?v=abc&amp;t=987\" target=\"_blank\">▶ 動画：16分27秒頃</a></p>"
        );
    }

    #[test]
    fn test_relative_src() {
        let dir = PathBuf::from("/out/video");
        assert_eq!(
            relative_src(Path::new("/out/video/images/a.jpg"), Some(&dir)),
            "images/a.jpg"
        );
        assert_eq!(relative_src(Path::new("/elsewhere/a.jpg"), Some(&dir)), "/elsewhere/a.jpg");
        assert_eq!(relative_src(Path::new("images/a.jpg"), None), "images/a.jpg");
    }

    #[test]
    fn test_image_grid() {
        let images = vec![ImageCandidate::new("/out/images/f.jpg", 125.4, 130.0)];
        let html = image_grid(&images, "u?t=", Some(Path::new("/out")));
        assert!(html.contains("href=\"u?t=125\""));
        assert!(html.contains("src=\"images/f.jpg\""));
        assert!(html.contains("alt=\"Screenshot at 2:05\""));
        assert!(html.contains("クリックして2分05秒の動画を開く"));
    }

    #[test]
    fn test_subtitle_excerpt_escapes() {
        let html = subtitle_excerpt("a <b> & c\nnext");
        assert!(html.contains("a &lt;b&gt; &amp; c<br>\nnext"));
    }

    #[test]
    fn test_section_order() {
        let section = SummarySection {
            heading: Some(Heading {
                level: 3,
                html: "見出し".to_string(),
            }),
            body: vec![Block::Paragraph("本文".to_string())],
            timestamp: Some(10),
            images: vec![ImageCandidate::new("a.jpg", 5.0, 15.0)],
            subtitle_excerpt: Some("字幕".to_string()),
        };
        let html = section_html(&section);
        let h = html.find("<h3>").unwrap();
        let p = html.find("<p>本文").unwrap();
        let img = html.find("timestamp-images").unwrap();
        let link = html.find("▶ 動画").unwrap();
        let details = html.find("<details").unwrap();
        assert!(h < p && p < img && img < link && link < details);
    }

    #[test]
    fn test_untimed_section_has_no_link() {
        let section = SummarySection {
            heading: Some(Heading {
                level: 1,
                html: "タイトル".to_string(),
            }),
            ..SummarySection::default()
        };
        let html = section_html(&section);
        assert!(html.starts_with("<div class='section'>"));
        assert!(!html.contains("▶"));
    }

    fn section_html(s: &SummarySection) -> String {
        section(s, "u?t=", None).join("\n")
    }
}
