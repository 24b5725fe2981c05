use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::types::Article;

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// The four list orderings. All of them are total: records missing a
/// timestamp sort as the earliest possible instant, records missing a
/// title sort as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
            SortOrder::TitleAsc => "Title (A-Z)",
            SortOrder::TitleDesc => "Title (Z-A)",
        }
    }

    pub fn next(&self) -> SortOrder {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::TitleAsc,
            SortOrder::TitleAsc => SortOrder::TitleDesc,
            SortOrder::TitleDesc => SortOrder::Newest,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title-asc" => Ok(SortOrder::TitleAsc),
            "title-desc" => Ok(SortOrder::TitleDesc),
            other => Err(format!(
                "unknown sort order '{}' (expected newest, oldest, title-asc or title-desc)",
                other
            )),
        }
    }
}

/// Source filter. `All` is the sentinel that keeps everything; any other
/// value is an exact, case-sensitive match on the article's source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Source(String),
}

impl SourceFilter {
    pub fn from_arg(value: &str) -> SourceFilter {
        if value == "all" {
            SourceFilter::All
        } else {
            SourceFilter::Source(value.to_string())
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Source(wanted) => article.source.as_deref() == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFilter::All => write!(f, "all"),
            SourceFilter::Source(s) => write!(f, "{}", s),
        }
    }
}

/// A source offered in the filter dropdown: a distinct non-empty source
/// value plus its article count in the unfiltered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    pub name: String,
    pub count: usize,
}

/// Distinct non-empty sources across ALL fetched articles (never the
/// filtered subset), sorted ascending, with unfiltered counts.
pub fn source_options(articles: &[Article]) -> Vec<SourceOption> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for article in articles {
        if let Some(source) = article.source.as_deref() {
            *counts.entry(source).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| SourceOption {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// The list-view query: search text, source filter, sort order and the
/// 1-based page cursor. The setters reset the page to 1 so a
/// filter-defining change can never leave the cursor past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub search: String,
    pub source: SourceFilter,
    pub sort: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        ArticleQuery {
            search: String::new(),
            source: SourceFilter::All,
            sort: SortOrder::Newest,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Output of one pipeline run: the visible page, plus the totals the
/// header and pagination footer need.
#[derive(Debug)]
pub struct QueryResult<'a> {
    pub items: Vec<&'a Article>,
    pub total_matches: usize,
    pub total_pages: usize,
}

impl ArticleQuery {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_source(&mut self, source: SourceFilter) {
        self.source = source;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    /// Run the pipeline: search filter, then source filter, then a stable
    /// sort, then the page slice. Pure and synchronous.
    pub fn run<'a>(&self, articles: &'a [Article]) -> QueryResult<'a> {
        let needle = self.search.trim().to_lowercase();

        let mut matched: Vec<&Article> = articles
            .iter()
            .filter(|a| needle.is_empty() || matches_search(a, &needle))
            .filter(|a| self.source.matches(a))
            .collect();

        // Vec::sort_by is stable, so equal keys keep their fetch order.
        matched.sort_by(|a, b| match self.sort {
            SortOrder::Newest => published(b).cmp(&published(a)),
            SortOrder::Oldest => published(a).cmp(&published(b)),
            SortOrder::TitleAsc => title_key(a).cmp(&title_key(b)),
            SortOrder::TitleDesc => title_key(b).cmp(&title_key(a)),
        });

        let total_matches = matched.len();
        let total_pages = if self.page_size == 0 {
            0
        } else {
            (total_matches + self.page_size - 1) / self.page_size
        };

        let start = self.page.saturating_sub(1) * self.page_size;
        let items = if start >= total_matches {
            Vec::new()
        } else {
            matched[start..total_matches.min(start + self.page_size)].to_vec()
        };

        QueryResult {
            items,
            total_matches,
            total_pages,
        }
    }
}

/// Case-insensitive substring test against title, content and summary;
/// a hit on any one keeps the record. `needle` is already lowercased.
fn matches_search(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.content.to_lowercase().contains(needle)
        || article
            .summary
            .as_deref()
            .map(|s| s.to_lowercase().contains(needle))
            .unwrap_or(false)
}

fn published(article: &Article) -> DateTime<Utc> {
    article.published_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn title_key(article: &Article) -> String {
    article.title.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str, source: &str, published_at: Option<&str>) -> Article {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": title,
            "content": format!("content of {}", title),
            "source": source,
            "published_at": published_at,
            "url": "https://example.org/a"
        }))
        .unwrap()
    }

    fn fixture() -> Vec<Article> {
        vec![
            article("1", "Rust ships 1.80", "wire", Some("2024-01-01T00:00:00Z")),
            article("2", "markets wobble", "ledger", None),
            article("3", "Elections ahead", "wire", Some("2024-06-01T00:00:00Z")),
        ]
    }

    #[test]
    fn empty_search_keeps_everything() {
        let articles = fixture();
        let query = ArticleQuery {
            search: "   ".into(),
            ..Default::default()
        };
        assert_eq!(query.run(&articles).total_matches, 3);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let articles = vec![
            article("1", "Rust ships", "wire", None),
            article("2", "other", "wire", None),
        ];
        let mut query = ArticleQuery::default();
        query.set_search("RUST");
        assert_eq!(query.run(&articles).total_matches, 1);

        // matches content too ("content of other")
        query.set_search("OF OTHER");
        let result = query.run(&articles);
        assert_eq!(result.total_matches, 1);
        assert_eq!(result.items[0].title, "other");
    }

    #[test]
    fn search_matches_summary() {
        let summarized: Article = serde_json::from_value(serde_json::json!({
            "_id": "s",
            "title": "x",
            "content": "y",
            "summary": "A deep dive into borrow checking"
        }))
        .unwrap();
        let articles = vec![summarized, article("2", "other", "wire", None)];
        let mut query = ArticleQuery::default();
        query.set_search("borrow");
        assert_eq!(query.run(&articles).total_matches, 1);
    }

    #[test]
    fn source_all_is_a_no_op() {
        let articles = fixture();
        let query = ArticleQuery::default();
        assert_eq!(query.source, SourceFilter::All);
        assert_eq!(query.run(&articles).total_matches, 3);
    }

    #[test]
    fn source_filter_is_exact_and_case_sensitive() {
        let articles = fixture();
        let mut query = ArticleQuery::default();
        query.set_source(SourceFilter::from_arg("wire"));
        assert_eq!(query.run(&articles).total_matches, 2);

        query.set_source(SourceFilter::from_arg("Wire"));
        assert_eq!(query.run(&articles).total_matches, 0);
    }

    #[test]
    fn newest_sorts_missing_timestamp_last() {
        let articles = fixture();
        let query = ArticleQuery::default();
        let titles: Vec<&str> = query
            .run(&articles)
            .items
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["Elections ahead", "Rust ships 1.80", "markets wobble"]);
    }

    #[test]
    fn oldest_sorts_missing_timestamp_first() {
        let articles = fixture();
        let query = ArticleQuery {
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let titles: Vec<&str> = query
            .run(&articles)
            .items
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["markets wobble", "Rust ships 1.80", "Elections ahead"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let articles = fixture();
        let query = ArticleQuery {
            sort: SortOrder::TitleAsc,
            ..Default::default()
        };
        let titles: Vec<&str> = query
            .run(&articles)
            .items
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["Elections ahead", "markets wobble", "Rust ships 1.80"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let articles = vec![
            article("1", "first", "wire", Some("2024-01-01T00:00:00Z")),
            article("2", "second", "wire", Some("2024-01-01T00:00:00Z")),
        ];
        let query = ArticleQuery::default();
        let ids: Vec<_> = query
            .run(&articles)
            .items
            .iter()
            .map(|a| a.id.as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn pagination_slices_and_counts() {
        let articles: Vec<Article> = (0..20)
            .map(|i| article(&i.to_string(), &format!("t{:02}", i), "wire", None))
            .collect();
        let mut query = ArticleQuery::default();
        assert_eq!(query.page_size, 9);

        let page1 = query.run(&articles);
        assert_eq!(page1.items.len(), 9);
        assert_eq!(page1.total_pages, 3);
        assert_eq!(page1.total_matches, 20);

        query.page = 3;
        assert_eq!(query.run(&articles).items.len(), 2);

        query.page = 4;
        assert!(query.run(&articles).items.is_empty());
    }

    #[test]
    fn zero_matches_means_zero_pages() {
        let articles = fixture();
        let mut query = ArticleQuery::default();
        query.set_search("no such thing anywhere");
        let result = query.run(&articles);
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.total_pages, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn filter_changes_reset_page() {
        let mut query = ArticleQuery {
            page: 3,
            ..Default::default()
        };
        query.set_search("rust");
        assert_eq!(query.page, 1);

        query.page = 3;
        query.set_source(SourceFilter::from_arg("wire"));
        assert_eq!(query.page, 1);

        query.page = 3;
        query.set_sort(SortOrder::Oldest);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn source_options_cover_unfiltered_set() {
        let articles = fixture();
        let options = source_options(&articles);
        assert_eq!(
            options,
            vec![
                SourceOption { name: "ledger".into(), count: 1 },
                SourceOption { name: "wire".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn sort_order_round_trips_through_strings() {
        for sort in SortOrder::ALL {
            assert_eq!(sort.to_string().parse::<SortOrder>().unwrap(), sort);
        }
        assert!("upside-down".parse::<SortOrder>().is_err());
    }
}
