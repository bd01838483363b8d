//
// Copyright © 2025 Hardcore Engineering Inc.
//
// Licensed under the Eclipse Public License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may
// obtain a copy of the License at https://www.eclipse.org/legal/epl-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//
// See the License for the specific language governing permissions and
// limitations under the License.
//

use reqwest::multipart::{Form, Part};
use reqwest_middleware::ClientWithMiddleware as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::services::types::{BranchId, DocumentKind, DocumentRecord, EmployeeId, Timestamp};
use crate::services::{ApiError, RequestBuilderExt, ResponseExt};
use crate::{Error, Result};

/// Entity a document is stored on, addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOwner {
    Employee(EmployeeId),
    TempEmployee(EmployeeId),
    Branch(BranchId),
}

impl DocumentOwner {
    fn path(&self) -> String {
        match self {
            DocumentOwner::Employee(id) => format!("employees/{id}/documents"),
            DocumentOwner::TempEmployee(id) => format!("temp-employees/{id}/documents"),
            DocumentOwner::Branch(id) => format!("branches/{id}/documents"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub file_name: String,
    pub uploaded_at: Timestamp,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,

    #[serde(default)]
    pub s3_url: Option<String>,

    #[serde(default)]
    pub document: Option<UploadedDocument>,

    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    fn into_record(self) -> Result<DocumentRecord> {
        if !self.success {
            return Err(Error::Api(ApiError {
                message: self
                    .message
                    .unwrap_or_else(|| String::from("upload rejected")),
            }));
        }

        match (self.s3_url, self.document) {
            (Some(url), Some(document)) => Ok(DocumentRecord {
                url,
                file_name: document.file_name,
                uploaded_at: document.uploaded_at,
            }),
            _ => Err(Error::Other("upload response missing document")),
        }
    }
}

/// One file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub kind: DocumentKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Result of a batch upload. Uploads run one at a time and there is no
/// rollback, so a failed file leaves the earlier ones stored; the split
/// makes that partial state visible to the caller.
#[derive(Debug)]
pub struct UploadOutcome {
    pub uploaded: Vec<(DocumentKind, DocumentRecord)>,
    pub failed: Vec<(DocumentKind, Error)>,
}

impl UploadOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct UploadClient {
    token: SecretString,
    base: Url,
    http: HttpClient,
}

impl PartialEq for UploadClient {
    fn eq(&self, other: &Self) -> bool {
        self.token.expose_secret() == other.token.expose_secret() && self.base == other.base
    }
}

impl UploadClient {
    pub(crate) fn new(config: &Config, http: HttpClient, token: impl Into<SecretString>) -> Self {
        Self {
            http,
            base: config.upload_service().clone(),
            token: token.into(),
        }
    }

    pub async fn upload(
        &self,
        owner: DocumentOwner,
        kind: DocumentKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentRecord> {
        let url = self.base.join(&owner.path())?;

        let form = Form::new()
            .text("type", kind.to_string())
            .part("document", Part::bytes(bytes).file_name(file_name.to_owned()));

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(self.token.expose_secret())
            .multipart(form)
            .send_ext()
            .await?
            .json_body::<UploadResponse>()
            .await?;

        tracing::trace!(%url, %kind, file_name, "upload");

        response.into_record()
    }

    pub async fn upload_many(&self, owner: DocumentOwner, files: Vec<UploadFile>) -> UploadOutcome {
        let mut outcome = UploadOutcome {
            uploaded: Vec::new(),
            failed: Vec::new(),
        };

        for file in files {
            match self
                .upload(owner, file.kind, &file.file_name, file.bytes)
                .await
            {
                Ok(record) => outcome.uploaded.push((file.kind, record)),
                Err(error) => {
                    tracing::warn!(kind = %file.kind, %error, "upload failed");
                    outcome.failed.push((file.kind, error));
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_response_becomes_a_document_record() {
        let raw = r#"{
            "success": true,
            "s3Url": "https://bucket.s3.amazonaws.com/docs/qid.pdf",
            "document": {"fileName": "qid.pdf", "uploadedAt": "2024-06-01T10:00:00Z"},
            "message": "uploaded"
        }"#;

        let response: UploadResponse = serde_json::from_str(raw).unwrap();
        let record = response.into_record().unwrap();

        assert_eq!(record.file_name, "qid.pdf");
        assert!(record.url.starts_with("https://bucket"));
    }

    #[test]
    fn rejected_response_surfaces_the_server_message() {
        let raw = r#"{"success": false, "message": "file too large"}"#;

        let response: UploadResponse = serde_json::from_str(raw).unwrap();

        match response.into_record() {
            Err(Error::Api(api)) => assert_eq!(api.message, "file too large"),
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
