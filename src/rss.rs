use crate::data::Portfolio;
use crate::render::RenderOptions;

/// Escape text for inclusion in XML element content
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the RSS 2.0 feed for the blog page
///
/// Each post links to its anchor on the blog page. Posts whose date cannot
/// be parsed are still listed, just without a `pubDate`.
pub fn render_rss(portfolio: &Portfolio, options: &RenderOptions) -> String {
    let site = format!(
        "{}{}",
        options.site_url.trim_end_matches('/'),
        options.base_path
    );
    let blog_url = format!("{}/blog/", site);
    let name = &portfolio.personal.name;

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n<channel>\n");
    xml.push_str(&format!("  <title>{} - Blog</title>\n", xml_escape(name)));
    xml.push_str(&format!("  <link>{}</link>\n", xml_escape(&blog_url)));
    xml.push_str(&format!(
        "  <description>Thoughts and insights from {}</description>\n",
        xml_escape(name)
    ));

    for post in &portfolio.blog {
        let link = format!("{}#{}", blog_url, post.slug);
        xml.push_str("  <item>\n");
        xml.push_str(&format!("    <title>{}</title>\n", xml_escape(&post.title)));
        xml.push_str(&format!("    <link>{}</link>\n", xml_escape(&link)));
        xml.push_str(&format!("    <guid>{}</guid>\n", xml_escape(&link)));
        xml.push_str(&format!(
            "    <description>{}</description>\n",
            xml_escape(&post.excerpt)
        ));
        if let Some(date) = post.published_on().and_then(|d| d.and_hms_opt(0, 0, 0)) {
            xml.push_str(&format!(
                "    <pubDate>{}</pubDate>\n",
                date.and_utc().to_rfc2822()
            ));
        }
        xml.push_str("  </item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample;

    #[test]
    fn feed_lists_posts_with_escaped_titles() {
        let options = RenderOptions {
            site_url: "https://ada.example.org/".to_string(),
            ..Default::default()
        };
        let xml = render_rss(&sample(), &options);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<title>Post &amp; &lt;Notes&gt;</title>"));
        assert!(xml.contains("<link>https://ada.example.org/blog/#post</link>"));
        assert!(xml.contains("<pubDate>Sun, 15 Dec 2024 00:00:00 +0000</pubDate>"));
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(xml_escape("a \"b\" 'c'"), "a &quot;b&quot; &apos;c&apos;");
    }
}
