//! Client side of the file selector. The server renders the directory
//! listing; this only fetches it and relays the user's choice.

use std::sync::Arc;

use shared::protocol::SelectorQuery;
use tracing::debug;

use crate::{error::ClientError, transport::StoreTransport};

type FileChosen = Box<dyn Fn(&str) + Send + Sync>;

pub struct FileSelector {
    transport: Arc<dyn StoreTransport>,
    on_file_chosen: FileChosen,
    query: SelectorQuery,
    current: String,
}

impl FileSelector {
    pub fn new(
        transport: Arc<dyn StoreTransport>,
        show_all: bool,
        inc_tail: bool,
        on_file_chosen: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            transport,
            on_file_chosen: Box::new(on_file_chosen),
            query: SelectorQuery { show_all, inc_tail },
            current: String::new(),
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current
    }

    pub fn query(&self) -> &SelectorQuery {
        &self.query
    }

    /// Fetches the rendered listing for `path` and makes it current.
    pub async fn load(&mut self, path: &str) -> Result<String, ClientError> {
        let params = [
            ("show_all".to_string(), self.query.show_all.to_string()),
            ("inc_tail".to_string(), self.query.inc_tail.to_string()),
        ];
        let html = self
            .transport
            .fetch_raw(&format!("/selector/{path}"), &params)
            .await?;
        debug!(path, bytes = html.len(), "selector loaded");
        self.current = path.to_string();
        Ok(html)
    }

    /// Reloads the current directory with a new show-all setting.
    pub async fn set_show_all(&mut self, show_all: bool) -> Result<String, ClientError> {
        self.query.show_all = show_all;
        let current = self.current.clone();
        self.load(&current).await
    }

    pub fn choose(&self, path: &str) {
        (self.on_file_chosen)(path);
    }
}
