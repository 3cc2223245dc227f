//! One-shot page actions: checkpoints, job and node control, emergency
//! stop/start and render job submission.

use std::sync::Arc;

use chrono::{DateTime, Local};
use shared::{
    domain::{JobId, NodeIdent, ResourcePath},
    protocol::{is_truthy, FileInfo, RenderJobDraft},
};
use tracing::{info, warn};

use crate::{error::ClientError, transport::StoreTransport};

pub struct ActionClient {
    transport: Arc<dyn StoreTransport>,
}

impl ActionClient {
    pub fn new(transport: Arc<dyn StoreTransport>) -> Self {
        Self { transport }
    }

    async fn call(
        &self,
        action: &'static str,
        path: &str,
        params: &[(String, String)],
        failure: &str,
    ) -> Result<(), ClientError> {
        let response = self.transport.fetch_json(path, params).await?;
        if is_truthy(response.as_ref()) {
            info!(action, path, "action accepted");
            Ok(())
        } else {
            warn!(action, path, ?response, "action rejected");
            Err(ClientError::rejected(action, failure))
        }
    }

    async fn set_pause(
        &self,
        action: &'static str,
        resource: ResourcePath,
        paused: bool,
        failure: &str,
    ) -> Result<(), ClientError> {
        let params = [
            ("key".to_string(), "pause".to_string()),
            ("value".to_string(), paused.to_string()),
        ];
        self.call(action, &format!("/store/{resource}"), &params, failure)
            .await
    }

    /// Returns the local time the checkpoint was confirmed.
    pub async fn checkpoint(&self, asset: &str) -> Result<DateTime<Local>, ClientError> {
        self.call(
            "checkpoint",
            &format!("/action/checkpoint/{asset}"),
            &[],
            "Error: Checkpoint not created",
        )
        .await?;
        Ok(Local::now())
    }

    pub async fn reset_stats(&self, asset: &str) -> Result<(), ClientError> {
        self.call(
            "reset_stats",
            &format!("/action/reset_stats/{asset}"),
            &[],
            "Error reseting render statistics",
        )
        .await
    }

    pub async fn delete_asset(&self, asset: &str) -> Result<(), ClientError> {
        self.call(
            "delete",
            &format!("/action/delete/{asset}"),
            &[],
            "Failed to delete file",
        )
        .await
    }

    pub async fn emergency_stop(&self) -> Result<(), ClientError> {
        self.call(
            "emergency_stop",
            "/action/emergency/stop",
            &[],
            "Error performing an emergency stop",
        )
        .await
    }

    pub async fn emergency_start(&self) -> Result<(), ClientError> {
        self.call(
            "emergency_start",
            "/action/emergency/start",
            &[],
            "Error performing an emergency start",
        )
        .await
    }

    pub async fn pause_job(&self, job: JobId) -> Result<(), ClientError> {
        self.set_pause("pause_job", ResourcePath::job(job), true, "Error pausing job")
            .await
    }

    pub async fn resume_job(&self, job: JobId) -> Result<(), ClientError> {
        self.set_pause("resume_job", ResourcePath::job(job), false, "Error resuming job")
            .await
    }

    pub async fn remove_job(&self, job: JobId) -> Result<(), ClientError> {
        self.call(
            "remove_job",
            &format!("/remove/job/{job}"),
            &[],
            "Error removing job",
        )
        .await
    }

    pub async fn pause_node(&self, node: &NodeIdent) -> Result<(), ClientError> {
        self.set_pause("pause_node", ResourcePath::node(node), true, "Error pausing node")
            .await
    }

    pub async fn resume_node(&self, node: &NodeIdent) -> Result<(), ClientError> {
        self.set_pause(
            "resume_node",
            ResourcePath::node(node),
            false,
            "Error resuming node",
        )
        .await
    }

    /// Metadata the server extracts from a render file, used to prefill a
    /// [`RenderJobDraft`] after a selector choice.
    pub async fn file_info(&self, path: &str) -> Result<FileInfo, ClientError> {
        let endpoint = format!("/info/{path}");
        let response = self
            .transport
            .fetch_json(&endpoint, &[])
            .await?
            .ok_or_else(|| ClientError::rejected("file_info", "No information for file"))?;
        serde_json::from_value(response).map_err(|source| ClientError::Decode {
            path: endpoint,
            source,
        })
    }

    pub async fn submit_render_job(&self, draft: &RenderJobDraft) -> Result<(), ClientError> {
        draft.validate()?;
        self.call(
            "add_job",
            &format!("/add/job/{}", draft.path),
            &draft.query_pairs(),
            "Error creating render job",
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
