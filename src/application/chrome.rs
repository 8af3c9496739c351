use std::sync::Arc;

use crate::config::SiteSettings;
use crate::presentation::views::{BrandView, LayoutChrome, PageMetaView};

/// Site-wide layout pieces shared by every page.
#[derive(Clone)]
pub struct ChromeService {
    site: Arc<SiteSettings>,
}

impl ChromeService {
    pub fn new(site: Arc<SiteSettings>) -> Self {
        Self { site }
    }

    pub fn load(&self) -> LayoutChrome {
        LayoutChrome {
            brand: BrandView {
                title: self.site.title.clone(),
                href: "/".to_string(),
            },
            meta: PageMetaView {
                title: self.site.title.clone(),
                description: self.site.description.clone(),
                canonical: canonical_url(&self.site.public_url, "/"),
            },
            contact_href: format!("mailto:{}", self.site.contact_email),
            feed_href: "/rss.xml".to_string(),
        }
    }

    /// Absolute URL for a site path.
    pub fn canonical(&self, path: &str) -> String {
        canonical_url(&self.site.public_url, path)
    }
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = format!("{}/", base.trim_end_matches('/'));
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root
    } else {
        format!("{root}{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_reflects_site_settings() {
        let chrome = ChromeService::new(Arc::new(SiteSettings {
            contact_email: "me@blog.dev".to_string(),
            public_url: "https://blog.dev".to_string(),
            ..SiteSettings::default()
        }))
        .load();

        assert_eq!(chrome.brand.title, "Personal Blog | Next.js + Supabase");
        assert_eq!(chrome.meta.canonical, "https://blog.dev/");
        assert_eq!(chrome.contact_href, "mailto:me@blog.dev");
        assert_eq!(chrome.feed_href, "/rss.xml");
    }

    #[test]
    fn canonical_url_joins_without_double_slashes() {
        assert_eq!(
            canonical_url("https://blog.dev/", "/posts/a"),
            "https://blog.dev/posts/a"
        );
        assert_eq!(canonical_url("https://blog.dev", ""), "https://blog.dev/");
    }
}
