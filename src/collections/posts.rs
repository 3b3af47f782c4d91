use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;
use serde_json::Value;

use super::date::{format_date, parse_date};
use super::{load_all, post_addresses};
use crate::config::Config;
use crate::document::{Record, Resource};
use crate::source::ResourceSource;
use crate::utils::error::Result;
use crate::utils::path::{get_stem, split_date_prefix};

/// One blog post with its derived identity
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub resource: Resource,
    pub slug: String,
    pub date: Option<NaiveDateTime>,
}

impl Post {
    /// Slug from `slug`, else the file stem without its date prefix. Date from
    /// `date`, else the file name prefix.
    pub fn new(resource: Resource) -> Self {
        let stem = get_stem(&resource.url);
        let (prefix_date, bare_stem) = split_date_prefix(stem);

        let slug = match resource.front_matter.slug() {
            Some(slug) => slug.to_string(),
            None => bare_stem.to_string(),
        };

        let date = resource
            .front_matter
            .get("date")
            .and_then(parse_date)
            .or_else(|| prefix_date.and_then(|d| parse_date(&serde_yaml::Value::from(d))));

        Post { resource, slug, date }
    }

    pub fn tags(&self) -> Vec<String> {
        self.resource.front_matter.tags()
    }

    /// Record with `date` replaced by its normalised form
    pub fn to_record(&self) -> Record {
        let mut record = self.resource.to_record(&self.slug);
        if let Some(date) = &self.date {
            record.insert("date".to_string(), Value::String(format_date(date)));
        }
        record
    }
}

/// Every post keyed by slug, plus a newest-first sequence and a tag index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsDictionary {
    pub posts: BTreeMap<String, Record>,
    pub chronological: Vec<Record>,
    pub tags: BTreeMap<String, BTreeSet<String>>,
}

impl PostsDictionary {
    /// Enumerate, fetch and index every post
    pub async fn load(source: &dyn ResourceSource, config: &Config) -> Result<Self> {
        let addresses = post_addresses(source, config).await?;
        let resources = load_all(source, "posts", &addresses).await?;
        Ok(Self::from_resources(resources))
    }

    /// Build all three indexes. Posts without a date sort last; posts with
    /// equal dates keep their enumeration order.
    pub fn from_resources(resources: Vec<Resource>) -> Self {
        let mut posts: Vec<Post> = resources.into_iter().map(Post::new).collect();

        let mut winners: BTreeMap<&str, &Post> = BTreeMap::new();
        for post in &posts {
            if let Some(previous) = winners.insert(&post.slug, post) {
                warn!(
                    "Post slug '{}' is used by {} and {}; keeping the latter",
                    post.slug, previous.resource.url, post.resource.url
                );
            }
        }

        // Tags come from the posts the slug index kept
        let mut tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for post in winners.values() {
            for tag in post.tags() {
                tags.entry(tag).or_default().insert(post.slug.clone());
            }
        }
        let by_slug = winners
            .into_iter()
            .map(|(slug, post)| (slug.to_string(), post.to_record()))
            .collect();

        // Stable: ties stay in enumeration order
        posts.sort_by(|a, b| match (&a.date, &b.date) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        let chronological = posts.iter().map(Post::to_record).collect();

        PostsDictionary {
            posts: by_slug,
            chronological,
            tags,
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Record> {
        self.posts.get(slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(url: &str, raw: &str) -> Resource {
        Resource::parse(url, raw.to_string()).unwrap()
    }

    fn slugs(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r["slug"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_slug_and_date_from_file_name() {
        let post = Post::new(resource("_posts/2024-02-03-hello-world.md", "---\n---\n"));

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.to_record()["date"], "2024-02-03 00:00:00");
    }

    #[test]
    fn test_front_matter_overrides_file_name() {
        let post = Post::new(resource(
            "_posts/2024-02-03-hello.md",
            "---\nslug: greeting\ndate: 2024-05-06 07:08:09\n---\n",
        ));

        assert_eq!(post.slug, "greeting");
        assert_eq!(post.to_record()["date"], "2024-05-06 07:08:09");
    }

    #[test]
    fn test_chronological_is_newest_first_and_stable() {
        let posts = PostsDictionary::from_resources(vec![
            resource("_posts/2023-01-01-old.md", "---\n---\n"),
            resource("_posts/undated.md", "---\n---\n"),
            resource("_posts/2024-06-01-tie-a.md", "---\n---\n"),
            resource("_posts/2024-06-01-tie-b.md", "---\n---\n"),
            resource("_posts/2024-07-01-new.md", "---\n---\n"),
        ]);

        assert_eq!(
            slugs(&posts.chronological),
            vec!["new", "tie-a", "tie-b", "old", "undated"]
        );
    }

    #[test]
    fn test_tag_index() {
        let posts = PostsDictionary::from_resources(vec![
            resource("_posts/2024-01-01-a.md", "---\ntags: [rust, web]\n---\n"),
            resource("_posts/2024-01-02-b.md", "---\ntags: rust rust\n---\n"),
            resource("_posts/2024-01-03-c.md", "---\ntitle: untagged\n---\n"),
        ]);

        let rust: Vec<&str> = posts.tags["rust"].iter().map(String::as_str).collect();
        assert_eq!(rust, vec!["a", "b"]);
        assert_eq!(posts.tags["web"].len(), 1);
        assert_eq!(posts.tags.len(), 2);
        assert!(posts.tags.values().all(|slugs| !slugs.contains("c")));
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let source = crate::source::MemorySource::with_files([
            ("_posts/2024-01-01-a.md", "---\ntitle: A\n---\n"),
            ("_posts/2024-02-01-b.md", "---\ntitle: B\n---\n"),
        ]);
        let posts = PostsDictionary::load(&source, &Config::default()).await.unwrap();

        assert_eq!(slugs(&posts.chronological), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_slug_keeps_both_in_sequence() {
        let posts = PostsDictionary::from_resources(vec![
            resource("_posts/2024-01-01-same.md", "---\ntitle: first\n---\n"),
            resource("_posts/2024-01-02-same.md", "---\ntitle: second\n---\n"),
        ]);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts.get("same").unwrap()["title"], "second");
        assert_eq!(posts.chronological.len(), 2);
    }

    #[test]
    fn test_replaced_post_leaves_no_tags_behind() {
        let posts = PostsDictionary::from_resources(vec![
            resource("_posts/2024-01-01-same.md", "---\ntags: [old]\n---\n"),
            resource("_posts/2024-01-02-same.md", "---\ntags: [new]\n---\n"),
        ]);

        assert_eq!(posts.get("same").unwrap()["tags"], serde_json::json!(["new"]));
        assert!(posts.tags["new"].contains("same"));
        assert!(!posts.tags.contains_key("old"));
    }
}
