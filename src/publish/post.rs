//! Blog Post Preparation
//!
//! Turns generated markdown into a publishable document: title extraction,
//! slug derivation, the deterministic repository path, and YAML front matter.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::constants::publish::UNTITLED_POST;
use crate::types::Result;

/// First level-one heading
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)\s*$").expect("valid title regex"));

/// Anything other than ASCII word characters, whitespace and hyphens
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Title of the first `# ` heading, or the untitled placeholder
pub fn extract_title(content: &str) -> String {
    TITLE
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_POST.to_string())
}

/// URL-safe slug of a title
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = NON_SLUG.replace_all(&lower, "");
    let hyphenated = WHITESPACE.replace_all(stripped.trim(), "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    let slug = collapsed.trim_matches('-');

    if slug.is_empty() && title != UNTITLED_POST {
        slugify(UNTITLED_POST)
    } else {
        slug.to_string()
    }
}

/// Metadata block written above the markdown body
#[derive(Debug, Clone, Serialize)]
pub struct FrontMatter {
    pub title: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
}

/// Author and tags applied to every post
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub author: String,
    pub tags: Vec<String>,
}

/// A post ready to be written anywhere
#[derive(Debug, Clone)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    /// `{YYYY-MM-DD}-{slug}.md`
    pub file_name: String,
    /// `{blog_path}/{file_name}`, relative to the repository root
    pub file_path: String,
    /// Front matter followed by the original content
    pub document: String,
    pub published_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn prepare(
        content: &str,
        blog_path: &str,
        defaults: &PostDefaults,
        featured: bool,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let title = extract_title(content);
        let slug = slugify(&title);
        let file_name = format!("{}-{}.md", now.format("%Y-%m-%d"), slug);
        let file_path = format!("{}/{}", blog_path.trim_matches('/'), file_name);

        let front_matter = FrontMatter {
            title: title.clone(),
            date: now.to_rfc3339(),
            author: defaults.author.clone(),
            tags: defaults.tags.clone(),
            published: true,
            featured,
        };
        let document = render(&front_matter, content)?;

        Ok(Self {
            title,
            slug,
            file_name,
            file_path,
            document,
            published_at: now,
        })
    }

    pub fn commit_message(&self) -> String {
        format!("Auto-generated: {}", self.title)
    }

    /// Public URL of the post once the site deploys
    pub fn live_url(&self, site_url: Option<&str>, blog_path: &str) -> Option<String> {
        site_url.map(|base| {
            format!(
                "{}/{}/{}",
                base.trim_end_matches('/'),
                blog_path.trim_matches('/'),
                self.slug
            )
        })
    }
}

fn render(front_matter: &FrontMatter, content: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(front_matter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, content))
}
