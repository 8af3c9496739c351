//! RSS feed over the same post listing the home page shows.

use std::sync::Arc;

use time::format_description::well_known::Rfc2822;

use crate::application::chrome::canonical_url;
use crate::application::posts::PostRepository;
use crate::config::SiteSettings;

#[derive(Clone)]
pub struct SyndicationService {
    posts: PostRepository,
    site: Arc<SiteSettings>,
}

impl SyndicationService {
    pub fn new(posts: PostRepository, site: Arc<SiteSettings>) -> Self {
        Self { posts, site }
    }

    /// Generate RSS 2.0 feed XML.
    pub async fn rss_feed(&self) -> String {
        let posts = self.posts.list_posts().await;
        let base = canonical_url(&self.site.public_url, "/");

        let mut items = String::new();
        for post in posts {
            let link = canonical_url(&self.site.public_url, &format!("/posts/{}", post.slug));
            let pub_date = post
                .published_at
                .and_then(|published| published.format(&Rfc2822).ok())
                .map(|date| format!("      <pubDate>{date}</pubDate>\n"))
                .unwrap_or_default();
            let categories: String = post
                .tags
                .iter()
                .flatten()
                .map(|tag| format!("      <category>{}</category>\n", xml_escape(tag)))
                .collect();

            items.push_str(&format!(
                "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid>{}</guid>\n{}{}      <description><![CDATA[{}]]></description>\n    </item>\n",
                xml_escape(&post.title),
                xml_escape(&link),
                xml_escape(&link),
                pub_date,
                categories,
                post.excerpt.replace("]]>", "]]]]><![CDATA[>"),
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>{}</title>\n    <link>{}</link>\n    <description>{}</description>\n{}  </channel>\n</rss>\n",
            xml_escape(&self.site.title),
            xml_escape(&base),
            xml_escape(&self.site.description),
            items
        )
    }
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
