use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use nd_client::ArticleGateway;
use nd_core::{
    source_options, Article, ArticleDraft, ArticleQuery, Error, QueryResult, SourceFilter,
};

use crate::notify::{NoticeKind, Notifications};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail { id: String },
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Form fields in focus order. Title, content and URL are required.
pub const FORM_FIELDS: [&str; 7] = [
    "Title",
    "URL",
    "Source",
    "Summary",
    "Content",
    "Image URL",
    "Published (YYYY-MM-DD)",
];

#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub values: [String; 7],
    pub focus: usize,
    pub error: Option<String>,
}

impl ArticleForm {
    pub fn blank() -> Self {
        let mut form = ArticleForm::default();
        form.values[6] = Utc::now().format("%Y-%m-%d").to_string();
        form
    }

    pub fn from_article(article: &Article) -> Self {
        let mut form = ArticleForm::blank();
        form.values[0] = article.title.clone();
        form.values[1] = article.url.clone();
        form.values[2] = article.source.clone().unwrap_or_default();
        form.values[3] = article.summary.clone().unwrap_or_default();
        form.values[4] = article.content.clone();
        form.values[5] = article.img_url.clone().unwrap_or_default();
        if let Some(dt) = article.published_at {
            form.values[6] = dt.format("%Y-%m-%d").to_string();
        }
        form
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    pub fn input(&mut self, c: char) {
        self.values[self.focus].push(c);
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    /// Turn the field values into a draft. Dates are day-granular in the
    /// form and become midnight UTC, matching what the backend stores.
    pub fn draft(&self) -> ArticleDraft {
        let non_empty = |s: &String| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        ArticleDraft {
            title: self.values[0].trim().to_string(),
            url: self.values[1].trim().to_string(),
            source: non_empty(&self.values[2]),
            summary: non_empty(&self.values[3]),
            content: self.values[4].trim().to_string(),
            img_url: non_empty(&self.values[5]),
            published_at: NaiveDate::parse_from_str(self.values[6].trim(), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
        }
    }
}

pub struct App {
    gateway: ArticleGateway,
    pub articles: Vec<Article>,
    pub load: LoadState,
    pub query: ArticleQuery,
    pub selected: usize,
    pub screen: Screen,
    pub detail: Option<Article>,
    pub form: ArticleForm,
    pub notices: Notifications,
    pub search_focused: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(gateway: ArticleGateway) -> Self {
        App {
            gateway,
            articles: Vec::new(),
            load: LoadState::Loading,
            query: ArticleQuery::default(),
            selected: 0,
            screen: Screen::List,
            detail: None,
            form: ArticleForm::blank(),
            notices: Notifications::default(),
            search_focused: false,
            should_quit: false,
        }
    }

    /// Full refetch of the collection. One fetch per mount or
    /// dependency-change; nothing in flight is cancelled.
    pub async fn refresh(&mut self) {
        self.load = LoadState::Loading;
        match self.gateway.list().await {
            Ok(articles) => {
                self.articles = articles;
                self.load = LoadState::Ready;
            }
            Err(e) => {
                warn!("list fetch failed: {}", e);
                self.load = LoadState::Failed("Failed to fetch articles".into());
                self.notices
                    .push("Failed to fetch articles", NoticeKind::Error);
            }
        }
        self.selected = 0;
    }

    pub fn visible(&self) -> QueryResult<'_> {
        self.query.run(&self.articles)
    }

    fn selected_id(&self) -> Option<String> {
        let page = self.visible();
        page.items
            .get(self.selected)
            .and_then(|a| a.id.as_str())
            .map(str::to_string)
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().items.len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    /// Cycle the source filter through "all" plus every distinct source
    /// in the unfiltered set.
    pub fn cycle_source(&mut self) {
        let options = source_options(&self.articles);
        let mut ring: Vec<SourceFilter> = vec![SourceFilter::All];
        ring.extend(
            options
                .into_iter()
                .map(|o| SourceFilter::Source(o.name)),
        );
        let current = ring
            .iter()
            .position(|f| *f == self.query.source)
            .unwrap_or(0);
        let next = ring[(current + 1) % ring.len()].clone();
        self.query.set_source(next);
        self.selected = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.query.set_sort(self.query.sort.next());
        self.selected = 0;
    }

    fn page_forward(&mut self) {
        let total = self.visible().total_pages;
        if self.query.page < total {
            self.query.page += 1;
            self.selected = 0;
        }
    }

    fn page_back(&mut self) {
        if self.query.page > 1 {
            self.query.page -= 1;
            self.selected = 0;
        }
    }

    async fn open_detail(&mut self) {
        let Some(id) = self.selected_id() else {
            // A record without a usable identifier is not actionable.
            self.notices
                .push("Article has no usable identifier", NoticeKind::Warning);
            return;
        };
        self.screen = Screen::Detail { id: id.clone() };
        self.load = LoadState::Loading;
        match self.gateway.get(&id).await {
            Ok(article) => {
                self.detail = Some(article);
                self.load = LoadState::Ready;
            }
            Err(e) => {
                warn!("detail fetch failed: {}", e);
                self.detail = None;
                // Not-found and transport failures read differently.
                let message = match e {
                    Error::NotFound(_) => "Article not found",
                    _ => "Failed to fetch article",
                };
                self.load = LoadState::Failed(message.into());
            }
        }
    }

    async fn open_edit(&mut self, id: String) {
        self.screen = Screen::Edit { id: id.clone() };
        self.load = LoadState::Loading;
        match self.gateway.get(&id).await {
            Ok(article) => {
                self.form = ArticleForm::from_article(&article);
                self.load = LoadState::Ready;
            }
            Err(e) => {
                warn!("edit prefill failed: {}", e);
                self.load = LoadState::Failed("Failed to fetch article".into());
                self.notices
                    .push("Failed to fetch article", NoticeKind::Error);
            }
        }
    }

    fn open_create(&mut self) {
        self.form = ArticleForm::blank();
        self.screen = Screen::Create;
        self.load = LoadState::Ready;
    }

    async fn back_to_list(&mut self) {
        self.screen = Screen::List;
        self.detail = None;
        self.refresh().await;
    }

    pub(crate) fn remove_local(&mut self, id: &str) -> Option<(usize, Article)> {
        let index = self.articles.iter().position(|a| a.id.matches(id))?;
        Some((index, self.articles.remove(index)))
    }

    pub(crate) fn restore_local(&mut self, index: usize, article: Article) {
        let index = index.min(self.articles.len());
        self.articles.insert(index, article);
    }

    /// Optimistic delete: drop the record from the local list first, then
    /// run the request. On failure the record goes back to its original
    /// position and an error notice is raised. No refetch on success.
    pub async fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.notices
                .push("Article has no usable identifier", NoticeKind::Warning);
            return;
        };
        let removed = self.remove_local(&id);
        self.clamp_selection();
        match self.gateway.delete(&id).await {
            Ok(()) => {
                self.notices
                    .push("Article deleted successfully", NoticeKind::Success);
            }
            Err(e) => {
                warn!("delete failed: {}", e);
                if let Some((index, article)) = removed {
                    self.restore_local(index, article);
                }
                self.notices
                    .push("Failed to delete article", NoticeKind::Error);
            }
        }
    }

    async fn submit_form(&mut self) {
        let draft = self.form.draft();
        if let Err(e) = draft.validate() {
            self.form.error = Some(e.to_string());
            self.notices.push(e.to_string(), NoticeKind::Error);
            return;
        }
        let outcome = match &self.screen {
            Screen::Create => self
                .gateway
                .create(&draft)
                .await
                .map(|_| "Article created successfully!"),
            Screen::Edit { id } => self
                .gateway
                .update(id, &draft)
                .await
                .map(|_| "Article updated successfully!"),
            _ => return,
        };
        match outcome {
            Ok(message) => {
                self.form.error = None;
                self.notices.push(message, NoticeKind::Success);
                self.back_to_list().await;
            }
            Err(e) => {
                warn!("save failed: {}", e);
                let message = match self.screen {
                    Screen::Create => "Failed to create article",
                    _ => "Failed to update article",
                };
                self.form.error = Some(message.into());
                self.notices.push(message, NoticeKind::Error);
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen.clone() {
            Screen::List => self.handle_list_key(key).await,
            Screen::Detail { id } => self.handle_detail_key(key, id).await,
            Screen::Create | Screen::Edit { .. } => self.handle_form_key(key).await,
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        if self.search_focused {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.search_focused = false,
                KeyCode::Backspace => {
                    let mut search = self.query.search.clone();
                    search.pop();
                    self.query.set_search(search);
                    self.selected = 0;
                }
                KeyCode::Char(c) => {
                    let mut search = self.query.search.clone();
                    search.push(c);
                    self.query.set_search(search);
                    self.selected = 0;
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Char('f') => self.cycle_source(),
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Char('n') => self.open_create(),
            KeyCode::Char('d') => self.delete_selected().await,
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.open_edit(id).await;
                } else {
                    self.notices
                        .push("Article has no usable identifier", NoticeKind::Warning);
                }
            }
            KeyCode::Char('x') => self.notices.dismiss_front(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Left => self.page_back(),
            KeyCode::Right => self.page_forward(),
            KeyCode::Enter => self.open_detail().await,
            _ => {}
        }
    }

    async fn handle_detail_key(&mut self, key: KeyEvent, id: String) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.back_to_list().await,
            KeyCode::Char('e') => self.open_edit(id).await,
            KeyCode::Char('x') => self.notices.dismiss_front(),
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.back_to_list().await,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form().await,
            KeyCode::Char(c) => self.form.input(c),
            _ => {}
        }
    }
}
