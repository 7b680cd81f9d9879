use std::path::Path;
use std::sync::Arc;

use log::debug;
use reqwest::multipart::Form;

use crate::connection::{Connection, Body, convert_api_output_obj};
use crate::models::upload::UploadData;
use crate::types::Result;

/// File upload API endpoints
pub struct File {
    connection: Arc<Connection>,
}

impl File {
    pub (crate) fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Upload a file to a check.
    /// The file is read as text and sent in the `file` field of a multipart form.
    pub async fn upload(&self, check_id: u64, path: &Path) -> Result<Vec<UploadData>> {
        let content = tokio::fs::read_to_string(path).await?;
        debug!("Uploading {} to check {check_id}", path.display());
        self.upload_content(check_id, content).await
    }

    /// Upload already loaded file content to a check
    pub async fn upload_content(&self, check_id: u64, content: String) -> Result<Vec<UploadData>> {
        let form = Form::new()
            .text("file", content)
            .text("check_id", check_id.to_string());

        let url = self.connection.upload_url().to_owned();
        self.connection.post(&url, Body::<()>::Multipart(form), convert_api_output_obj).await
    }
}
