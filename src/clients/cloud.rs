//! Cloud document store client
//!
//! The shared state lives in a hosted JSON document store reached over
//! plain REST: one document for the question sequence, one collection for
//! learner feedback. The client fetches and replaces whole documents;
//! change notifications are synthesized by the store controller polling
//! `fetch_document` and comparing `updatedAt`.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::{CloudError, Result};
use crate::models::question::{Feedback, Question, QuizDocument};

/// Path of the shared question document.
const QUESTIONS_DOCUMENT: &str = "config/questions_data";

/// Path of the feedback collection.
const FEEDBACK_COLLECTION: &str = "feedback";

/// Cloud document store client.
pub struct CloudStore {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl CloudStore {
    /// Create a new client from the program configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.cloud_base_url.trim_end_matches('/').to_string(),
            auth_token: config.cloud_auth_token.clone(),
        }
    }

    /// Fetch the shared question document.
    ///
    /// A missing document (`null` body) is an empty one. The document body
    /// is extracted field-by-field so a partially-written or drifted
    /// document degrades to defaults instead of failing the fetch; the
    /// `questions` payload stays untrusted for the sanitizer.
    pub async fn fetch_document(&self) -> Result<QuizDocument> {
        let endpoint = self.endpoint(QUESTIONS_DOCUMENT);
        let body = self.get_json(&endpoint).await?;

        if body.is_null() {
            debug!("☁️ question document absent, treating as empty");
            return Ok(QuizDocument::default());
        }

        Ok(QuizDocument {
            questions: body
                .get("questions")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            updated_at: body
                .get("updatedAt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Replace the shared question document with `questions`, tagged with
    /// a fresh write timestamp.
    pub async fn push_questions(&self, questions: &[Question]) -> Result<()> {
        let endpoint = self.endpoint(QUESTIONS_DOCUMENT);
        let document = json!({
            "questions": questions,
            "updatedAt": Utc::now().to_rfc3339(),
        });

        let response = self
            .http
            .put(&endpoint)
            .json(&document)
            .send()
            .await
            .map_err(|source| CloudError::RequestFailed {
                endpoint: endpoint.clone(),
                source,
            })?;

        self.check_status(&endpoint, response.status())?;
        debug!("☁️ pushed {} records", questions.len());
        Ok(())
    }

    /// Append a feedback entry; returns the store-assigned id.
    pub async fn add_feedback(&self, username: &str, text: &str) -> Result<String> {
        let endpoint = self.endpoint(FEEDBACK_COLLECTION);
        let entry = json!({
            "username": username,
            "text": text,
            "createdAt": Utc::now().to_rfc3339(),
        });

        let response = self
            .http
            .post(&endpoint)
            .json(&entry)
            .send()
            .await
            .map_err(|source| CloudError::RequestFailed {
                endpoint: endpoint.clone(),
                source,
            })?;

        self.check_status(&endpoint, response.status())?;
        let body: Value =
            response
                .json()
                .await
                .map_err(|source| CloudError::InvalidDocument {
                    endpoint: endpoint.clone(),
                    source,
                })?;

        Ok(body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// List feedback entries, newest first.
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        let endpoint = self.endpoint(FEEDBACK_COLLECTION);
        let body = self.get_json(&endpoint).await?;

        let mut entries: Vec<Feedback> = match body {
            Value::Object(map) => map
                .into_iter()
                .map(|(id, entry)| Feedback {
                    id: Some(id),
                    username: entry
                        .get("username")
                        .and_then(Value::as_str)
                        .unwrap_or("Anonymous")
                        .to_string(),
                    text: entry
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    created_at: entry
                        .get("createdAt")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Delete one feedback entry by id.
    pub async fn delete_feedback(&self, id: &str) -> Result<()> {
        let endpoint = self.endpoint(&format!("{FEEDBACK_COLLECTION}/{id}"));
        let response = self.http.delete(&endpoint).send().await.map_err(|source| {
            CloudError::RequestFailed {
                endpoint: endpoint.clone(),
                source,
            }
        })?;
        self.check_status(&endpoint, response.status())?;
        Ok(())
    }

    // ========== helpers ==========

    fn endpoint(&self, path: &str) -> String {
        if self.auth_token.is_empty() {
            format!("{}/{}.json", self.base_url, path)
        } else {
            format!("{}/{}.json?auth={}", self.base_url, path, self.auth_token)
        }
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let response =
            self.http
                .get(endpoint)
                .send()
                .await
                .map_err(|source| CloudError::RequestFailed {
                    endpoint: endpoint.to_string(),
                    source,
                })?;

        self.check_status(endpoint, response.status())?;

        let body = response
            .json()
            .await
            .map_err(|source| CloudError::InvalidDocument {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(body)
    }

    fn check_status(&self, endpoint: &str, status: reqwest::StatusCode) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        Err(CloudError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        }
        .into())
    }
}
