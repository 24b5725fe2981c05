//! Remote data gateway for the `/articles` REST endpoint.
//!
//! A thin request-construction layer over `reqwest`: list, paged list,
//! fetch-by-id, create, update, delete. No retries, no backoff, no
//! authentication; failures map onto `nd_core::Error` and are surfaced by
//! the callers.

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use nd_core::{Article, ArticleDraft, Error, Result, SortOrder};

/// Query parameters for the server-side list endpoint
/// (`_page`, `_limit`, `_sort`, `_order`, `q`).
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub sort: SortOrder,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            page: 1,
            limit: 10,
            sort: SortOrder::Newest,
            search: None,
        }
    }
}

impl ListQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let (sort, order) = match self.sort {
            SortOrder::Newest => ("published_at", "desc"),
            SortOrder::Oldest => ("published_at", "asc"),
            SortOrder::TitleAsc => ("title", "asc"),
            SortOrder::TitleDesc => ("title", "desc"),
        };
        let mut params = vec![
            ("_page", self.page.to_string()),
            ("_limit", self.limit.to_string()),
            ("_sort", sort.to_string()),
            ("_order", order.to_string()),
        ];
        if let Some(q) = self.search.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        params
    }
}

/// One server-side page plus the total count from `x-total-count`.
#[derive(Debug)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct ArticleGateway {
    http: Client,
    base_url: Url,
}

impl ArticleGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
        // Url::join treats a path without a trailing slash as a file.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(ArticleGateway {
            http: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidUrl(path.to_string()))
    }

    /// `GET /articles` — the full, unpaginated collection. All read
    /// screens fetch this and run the query pipeline client-side.
    pub async fn list(&self) -> Result<Vec<Article>> {
        let url = self.endpoint("articles")?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let articles = check(response).await?.json::<Vec<Article>>().await?;
        Ok(articles)
    }

    /// `GET /articles?_page&_limit&_sort&_order&q` — server-side paging.
    /// The total count travels in the `x-total-count` response header.
    pub async fn list_page(&self, query: &ListQuery) -> Result<ArticlePage> {
        let url = self.endpoint("articles")?;
        debug!("GET {} (paged)", url);
        let response = self.http.get(url).query(&query.params()).send().await?;
        let response = check(response).await?;
        let total = response
            .headers()
            .get("x-total-count")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let articles = response.json::<Vec<Article>>().await?;
        Ok(ArticlePage { articles, total })
    }

    /// Fetch one article by its normalized identifier. Emulated
    /// client-side: the backend's identifier shapes are inconsistent, so
    /// we fetch the collection and search it rather than trusting
    /// `GET /articles/{id}` to match.
    pub async fn get(&self, id: &str) -> Result<Article> {
        let articles = self.list().await?;
        articles
            .into_iter()
            .find(|a| a.id.matches(id))
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))
    }

    /// `POST /articles`. The body is the draft plus a client-set
    /// `published_at` and a derived `metadata.base_url`.
    pub async fn create(&self, draft: &ArticleDraft) -> Result<Article> {
        draft.validate()?;
        let url = self.endpoint("articles")?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .json(&write_payload(draft)?)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// `PUT /articles/{id}`, same body shape as create.
    pub async fn update(&self, id: &str, draft: &ArticleDraft) -> Result<Article> {
        draft.validate()?;
        let url = self.endpoint(&format!("articles/{}", id))?;
        debug!("PUT {}", url);
        let response = self
            .http
            .put(url)
            .json(&write_payload(draft)?)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// `DELETE /articles/{id}`. No body either way.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("articles/{}", id))?;
        debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        check(response).await?;
        Ok(())
    }
}

/// Write-time body: draft fields, a `published_at` (the draft's if set,
/// otherwise now) and `metadata.base_url` = origin of the submitted URL.
fn write_payload(draft: &ArticleDraft) -> Result<Value> {
    let published_at = draft.published_at.unwrap_or_else(Utc::now);
    Ok(json!({
        "title": draft.title,
        "content": draft.content,
        "summary": draft.summary.clone().unwrap_or_default(),
        "url": draft.url,
        "source": draft.source.clone().unwrap_or_default(),
        "img_url": draft.img_url,
        "published_at": published_at.to_rfc3339(),
        "metadata": { "base_url": draft.origin()? },
    }))
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Api(status.as_u16()))
    }
}
