//! Reconciliation controller
//!
//! Owns the authoritative in-memory question sequence and keeps three
//! views eventually consistent: the local cache blob, the shared cloud
//! document and whatever UI layer subscribes to the watch channel. Every
//! replacement sequence passes the canonical gate (`Question::normalized`
//! for typed input, the sanitizer for raw payloads); the cloud push is
//! fire-and-forget and only ever surfaces as the connectivity flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clients::cloud::CloudStore;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::question::{Feedback, Question, QuestionType};
use crate::services::local_cache::LocalCache;
use crate::services::sanitizer::sanitize_questions;

/// Session role. Only administrators write to the cloud document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Learner,
    Administrator,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Administrator)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Learner => write!(f, "learner"),
            UserRole::Administrator => write!(f, "administrator"),
        }
    }
}

/// Tri-state connectivity indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudStatus {
    Disconnected,
    Connected,
    Error,
}

impl std::fmt::Display for CloudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudStatus::Disconnected => write!(f, "disconnected"),
            CloudStatus::Connected => write!(f, "connected"),
            CloudStatus::Error => write!(f, "error"),
        }
    }
}

/// Direction for `reorder_subject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Owned session state container with an explicit `init`/`dispose`
/// lifecycle; subscribers observe the sequence and the connectivity flag
/// through watch channels.
pub struct QuizStore {
    cache: LocalCache,
    cloud: Arc<CloudStore>,
    poll_interval: Duration,
    questions_tx: watch::Sender<Vec<Question>>,
    questions_rx: watch::Receiver<Vec<Question>>,
    status_tx: watch::Sender<CloudStatus>,
    status_rx: watch::Receiver<CloudStatus>,
    listening: Arc<AtomicBool>,
    listen_task: Option<JoinHandle<()>>,
}

impl QuizStore {
    /// Create a store from the program configuration. No I/O happens
    /// until `init`.
    pub fn new(config: &Config) -> Self {
        let (questions_tx, questions_rx) = watch::channel(Vec::new());
        let (status_tx, status_rx) = watch::channel(CloudStatus::Disconnected);
        Self {
            cache: LocalCache::new(&config.cache_file),
            cloud: Arc::new(CloudStore::new(config)),
            poll_interval: Duration::from_secs(config.cloud_poll_secs.max(1)),
            questions_tx,
            questions_rx,
            status_tx,
            status_rx,
            listening: Arc::new(AtomicBool::new(false)),
            listen_task: None,
        }
    }

    /// Start the session: load the cached sequence into memory, then
    /// subscribe to the cloud document. Guarded — re-invocations while a
    /// subscription is live are no-ops.
    pub fn init(&mut self) {
        if self.listening.swap(true, Ordering::SeqCst) {
            debug!("subscription already active, ignoring repeated init");
            return;
        }

        match self.cache.load() {
            Ok(raw) => {
                let cached = sanitize_questions(&raw);
                if !cached.is_empty() {
                    info!("📂 restored {} records from local cache", cached.len());
                }
                self.questions_tx.send_replace(cached);
            }
            Err(e) => warn!("⚠️ local cache unreadable, starting empty: {e}"),
        }

        self.spawn_listener();
    }

    /// End the session: tear down the cloud subscription. The in-memory
    /// sequence stays readable.
    pub fn dispose(&mut self) {
        if let Some(task) = self.listen_task.take() {
            task.abort();
        }
        self.listening.store(false, Ordering::SeqCst);
        self.status_tx.send_replace(CloudStatus::Disconnected);
        debug!("cloud subscription torn down");
    }

    // ========== reconciliation ==========

    /// Replace the authoritative sequence.
    ///
    /// Every record is re-normalized, the result is published to
    /// subscribers and persisted to the local cache, and — administrator
    /// role only — pushed to the cloud document on a spawned task.
    /// Neither a cache nor a cloud failure rolls the local state back;
    /// the cloud outcome surfaces only through the connectivity flag.
    pub fn replace_all(&self, new_sequence: Vec<Question>, role: UserRole) {
        let cleaned: Vec<Question> = new_sequence
            .into_iter()
            .map(Question::normalized)
            .collect();

        self.questions_tx.send_replace(cleaned.clone());

        if let Err(e) = self.cache.save(&cleaned) {
            warn!("💾 local cache write failed: {e}");
        }

        if role.is_admin() {
            let cloud = Arc::clone(&self.cloud);
            let status_tx = self.status_tx.clone();
            tokio::spawn(async move {
                match cloud.push_questions(&cleaned).await {
                    Ok(()) => {
                        status_tx.send_replace(CloudStatus::Connected);
                    }
                    Err(e) => {
                        warn!("☁️ cloud push failed: {e}");
                        status_tx.send_replace(CloudStatus::Error);
                    }
                }
            });
        }
    }

    /// Replace from an untrusted raw payload (generator output, imported
    /// JSON). The sanitizer runs before `replace_all` re-normalizes.
    pub fn replace_all_raw(&self, raw: &[Value], role: UserRole) {
        self.replace_all(sanitize_questions(raw), role);
    }

    /// Append one record.
    pub fn add(&self, record: Question, role: UserRole) {
        let mut sequence = self.questions();
        sequence.push(record);
        self.replace_all(sequence, role);
    }

    /// Append a parsed batch (bulk import path).
    pub fn add_many(&self, records: Vec<Question>, role: UserRole) {
        let mut sequence = self.questions();
        sequence.extend(records);
        self.replace_all(sequence, role);
    }

    /// Replace the record at `index`; an out-of-range index leaves the
    /// sequence unchanged.
    pub fn update(&self, index: usize, record: Question, role: UserRole) {
        let mut sequence = self.questions();
        if let Some(slot) = sequence.get_mut(index) {
            *slot = record;
        }
        self.replace_all(sequence, role);
    }

    /// Delete the record at `index`; an out-of-range index leaves the
    /// sequence unchanged.
    pub fn remove(&self, index: usize, role: UserRole) {
        let mut sequence = self.questions();
        if index < sequence.len() {
            sequence.remove(index);
        }
        self.replace_all(sequence, role);
    }

    // ========== grouped operations, keyed by (subject, type) ==========

    /// Activate or deactivate every record in the group.
    pub fn toggle_subject_active(
        &self,
        subject: &str,
        question_type: QuestionType,
        active: bool,
        role: UserRole,
    ) {
        let sequence = self
            .questions()
            .into_iter()
            .map(|mut q| {
                if q.in_group(subject, question_type) {
                    q.is_active = active;
                }
                q
            })
            .collect();
        self.replace_all(sequence, role);
    }

    /// Rename the group. The new name is trimmed; an empty or unchanged
    /// name is a no-op.
    pub fn rename_subject(
        &self,
        old_name: &str,
        question_type: QuestionType,
        new_name: &str,
        role: UserRole,
    ) {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == old_name {
            return;
        }
        let sequence = self
            .questions()
            .into_iter()
            .map(|mut q| {
                if q.in_group(old_name, question_type) {
                    q.subject = new_name.to_string();
                }
                q
            })
            .collect();
        self.replace_all(sequence, role);
    }

    /// Delete every record in the group; records of the other type keep
    /// the subject name untouched.
    pub fn remove_subject(&self, subject: &str, question_type: QuestionType, role: UserRole) {
        let sequence = self
            .questions()
            .into_iter()
            .filter(|q| !q.in_group(subject, question_type))
            .collect();
        self.replace_all(sequence, role);
    }

    /// Swap the group's block with its neighbor among distinct same-type
    /// subjects (first-occurrence order). A request at either boundary is
    /// a no-op. Records of the other type follow the reordered blocks in
    /// their original relative order.
    pub fn reorder_subject(
        &self,
        subject: &str,
        question_type: QuestionType,
        direction: ReorderDirection,
        role: UserRole,
    ) {
        let current = self.questions();

        let mut subjects: Vec<String> = Vec::new();
        for q in current.iter().filter(|q| q.question_type == question_type) {
            if !subjects.iter().any(|s| s == &q.subject) {
                subjects.push(q.subject.clone());
            }
        }

        let Some(index) = subjects.iter().position(|s| s == subject) else {
            return;
        };
        let neighbor = match direction {
            ReorderDirection::Up => {
                if index == 0 {
                    return;
                }
                index - 1
            }
            ReorderDirection::Down => {
                if index + 1 >= subjects.len() {
                    return;
                }
                index + 1
            }
        };
        subjects.swap(index, neighbor);

        let mut reordered = Vec::with_capacity(current.len());
        for s in &subjects {
            reordered.extend(
                current
                    .iter()
                    .filter(|q| q.in_group(s, question_type))
                    .cloned(),
            );
        }
        reordered.extend(
            current
                .iter()
                .filter(|q| q.question_type != question_type)
                .cloned(),
        );

        self.replace_all(reordered, role);
    }

    // ========== feedback passthrough ==========

    /// Append a feedback entry (any role).
    pub async fn submit_feedback(&self, username: &str, text: &str) -> Result<String> {
        self.cloud.add_feedback(username, text).await
    }

    /// List feedback entries, newest first.
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        self.cloud.list_feedback().await
    }

    /// Delete a feedback entry. Administrator only.
    pub async fn delete_feedback(&self, id: &str, role: UserRole) -> Result<()> {
        if !role.is_admin() {
            return Err(AppError::AdminRequired);
        }
        self.cloud.delete_feedback(id).await
    }

    // ========== observation ==========

    /// Snapshot of the authoritative sequence.
    pub fn questions(&self) -> Vec<Question> {
        self.questions_rx.borrow().clone()
    }

    /// Subscribe to sequence replacements.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Question>> {
        self.questions_tx.subscribe()
    }

    /// Current connectivity flag.
    pub fn status(&self) -> CloudStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to connectivity changes.
    pub fn subscribe_status(&self) -> watch::Receiver<CloudStatus> {
        self.status_tx.subscribe()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    // ========== cloud subscription ==========

    /// Poll the cloud document and apply fresh snapshots. The remote is
    /// last-writer-wins on this path: a snapshot with a new `updatedAt`
    /// replaces memory and cache unconditionally. Fetch failures flip the
    /// connectivity flag and leave the last-known sequence usable.
    fn spawn_listener(&mut self) {
        let cloud = Arc::clone(&self.cloud);
        let cache = self.cache.clone();
        let questions_tx = self.questions_tx.clone();
        let status_tx = self.status_tx.clone();
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut last_applied: Option<String> = None;
            loop {
                match cloud.fetch_document().await {
                    Ok(document) => {
                        status_tx.send_replace(CloudStatus::Connected);
                        if last_applied.as_deref() != Some(document.updated_at.as_str()) {
                            let cleaned = sanitize_questions(&document.questions);
                            debug!(
                                "☁️ applying cloud snapshot: {} records (updatedAt '{}')",
                                cleaned.len(),
                                document.updated_at
                            );
                            if let Err(e) = cache.save(&cleaned) {
                                warn!("💾 local cache write failed: {e}");
                            }
                            questions_tx.send_replace(cleaned);
                            last_applied = Some(document.updated_at);
                        }
                    }
                    Err(e) => {
                        warn!("☁️ cloud connection error: {e}");
                        status_tx.send_replace(CloudStatus::Error);
                    }
                }
                tokio::time::sleep(poll_interval).await;
            }
        });

        self.listen_task = Some(task);
    }
}

impl Drop for QuizStore {
    fn drop(&mut self) {
        if let Some(task) = self.listen_task.take() {
            task.abort();
        }
    }
}
