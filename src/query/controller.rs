//! Query controller: loading, empty and failure handling around the backend.

use crate::api::{BackendClient, SearchResult};
use crate::error::Result;
use crate::net::Fetch;
use crate::render::Renderer;
use crate::view::{Container, ViewState};

/// User-facing status lines.
#[derive(Debug, Clone)]
pub struct QueryMessages {
    pub searching: String,
    pub search_empty: String,
    pub search_failed: String,
    pub trending_loading: String,
    pub trending_empty: String,
    pub trending_failed: String,
}

impl Default for QueryMessages {
    fn default() -> Self {
        Self {
            searching: "Searching...".to_string(),
            search_empty: "No results found.".to_string(),
            search_failed: "Search failed. Try again.".to_string(),
            trending_loading: "Loading...".to_string(),
            trending_empty: "Trending unavailable right now.".to_string(),
            trending_failed: "Trending failed to load.".to_string(),
        }
    }
}

/// Drives search and trending requests into their containers.
///
/// Overlapping calls are not sequenced: whichever response resolves last
/// owns the container, even if it belongs to an older request.
pub struct QueryController<F> {
    backend: BackendClient<F>,
    renderer: Renderer,
    results: Container,
    trending: Container,
    messages: QueryMessages,
}

impl<F: Fetch> QueryController<F> {
    pub fn new(
        backend: BackendClient<F>,
        renderer: Renderer,
        results: Container,
        trending: Container,
    ) -> Self {
        Self {
            backend,
            renderer,
            results,
            trending,
            messages: QueryMessages::default(),
        }
    }

    pub fn with_messages(mut self, messages: QueryMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn results(&self) -> &Container {
        &self.results
    }

    pub fn trending(&self) -> &Container {
        &self.trending
    }

    /// Run a user search. Blank queries are ignored without touching the view.
    pub async fn run_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }

        self.results
            .replace(ViewState::Loading(self.messages.searching.clone()));

        let outcome = self.backend.search(query).await;
        self.settle(
            &self.results,
            outcome,
            &self.messages.search_empty,
            &self.messages.search_failed,
        );
    }

    /// Load the trending list.
    pub async fn load_trending(&self) {
        self.trending
            .replace(ViewState::Loading(self.messages.trending_loading.clone()));

        let outcome = self.backend.trending().await;
        self.settle(
            &self.trending,
            outcome,
            &self.messages.trending_empty,
            &self.messages.trending_failed,
        );
    }

    fn settle(
        &self,
        container: &Container,
        outcome: Result<Vec<SearchResult>>,
        empty_message: &str,
        failed_message: &str,
    ) {
        match outcome {
            Ok(results) => {
                tracing::debug!("{} results for {}", results.len(), container.name());
                self.renderer
                    .render_with_empty_message(&results, container, empty_message);
            }
            Err(e) => {
                tracing::warn!("Loading {} failed: {}", container.name(), e);
                container.replace(ViewState::Failed(failed_message.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Endpoints;
    use crate::api::PreviewKind;
    use crate::error::Error;
    use crate::net::FetchResponse;
    use crate::render::RenderOptions;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;

    enum Reply {
        Body(&'static str),
        Status(u16),
        Refused,
    }

    struct FakeBackend {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        urls: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetch for FakeBackend {
        async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            let (status, body) = match self.reply {
                Reply::Body(body) => (200, body),
                Reply::Status(status) => (status, ""),
                Reply::Refused => return Err(Error::network(url, "connection refused")),
            };
            Ok(FetchResponse {
                url: url.to_string(),
                status,
                content_type: Some("application/json".to_string()),
                content_disposition: None,
                body: body.as_bytes().to_vec(),
            })
        }
    }

    fn controller(reply: Reply) -> (QueryController<FakeBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let endpoints = Endpoints::new("http://localhost:5000").unwrap();
        let backend = BackendClient::new(
            endpoints.clone(),
            FakeBackend {
                reply,
                calls: calls.clone(),
                urls: std::sync::Mutex::new(Vec::new()),
            },
        );
        let renderer = Renderer::new(endpoints, RenderOptions::default());
        let controller = QueryController::new(
            backend,
            renderer,
            Container::new("results"),
            Container::new("trending-results"),
        );
        (controller, calls)
    }

    #[tokio::test]
    async fn test_blank_search_is_noop() {
        let (controller, calls) = controller(Reply::Body(r#"{"results": []}"#));
        controller.run_search("").await;
        controller.run_search("   \t ").await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(matches!(controller.results().snapshot(), ViewState::Idle));
    }

    #[tokio::test]
    async fn test_search_end_to_end() {
        let (controller, calls) = controller(Reply::Body(
            r#"{"results": [
                {"id": "a1", "title": "Amapiano Mix 1", "author": "DJ", "duration": 245},
                {"id": "b2", "title": "Amapiano Mix 2", "author": "DJ", "duration": 720}
            ]}"#,
        ));
        controller.run_search("amapiano mix").await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.backend.fetcher_urls(),
            vec!["http://localhost:5000/search?q=amapiano+mix".to_string()]
        );

        let state = controller.results().snapshot();
        let blocks = state.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].preview.kind, PreviewKind::Audio);
        assert_eq!(blocks[1].preview.kind, PreviewKind::Video);
        for block in blocks {
            assert_eq!(
                block.download_formats(),
                vec![crate::api::MediaFormat::Mp3, crate::api::MediaFormat::Mp4]
            );
        }

        let html = controller.results().to_html();
        assert_eq!(html.matches(r#"<div class="result""#).count(), 2);
        assert!(matches!(controller.trending().snapshot(), ViewState::Idle));
    }

    #[tokio::test]
    async fn test_null_author_does_not_fail_the_list() {
        let (controller, _) = controller(Reply::Body(
            r#"{"results": [
                {"id": "a", "title": "Amapiano Mix", "author": "DJ", "duration": 245},
                {"id": "b", "title": "X", "author": null, "duration": 720}
            ]}"#,
        ));
        controller.run_search("amapiano mix").await;

        let state = controller.results().snapshot();
        let blocks = state.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].author, "");
        assert_eq!(blocks[1].preview.kind, PreviewKind::Video);
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let (controller, _) = controller(Reply::Body("{}"));
        controller.run_search("nothing here").await;
        assert_eq!(
            controller.results().snapshot().message(),
            Some("No results found.")
        );
    }

    #[tokio::test]
    async fn test_search_failure_is_absorbed() {
        let (controller, _) = controller(Reply::Refused);
        controller.run_search("kabza").await;
        match controller.results().snapshot() {
            ViewState::Failed(message) => assert_eq!(message, "Search failed. Try again."),
            other => panic!("expected failure state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trending_failure_replaces_loading() {
        let (controller, calls) = controller(Reply::Status(500));
        controller.load_trending().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let state = controller.trending().snapshot();
        assert!(!state.is_loading());
        assert_eq!(state.message(), Some("Trending failed to load."));
    }

    #[tokio::test]
    async fn test_trending_parse_failure() {
        let (controller, _) = controller(Reply::Body("not json"));
        controller.load_trending().await;
        assert!(matches!(
            controller.trending().snapshot(),
            ViewState::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_trending_empty() {
        let (controller, _) = controller(Reply::Body(r#"{"results": null}"#));
        controller.load_trending().await;
        assert_eq!(
            controller.trending().snapshot().message(),
            Some("Trending unavailable right now.")
        );
    }

    impl BackendClient<FakeBackend> {
        fn fetcher_urls(&self) -> Vec<String> {
            self.fetcher().urls.lock().unwrap().clone()
        }
    }
}
