//! Test doubles for the client core

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{Collection, StatusSnapshot};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::{oneshot, Notify};

use crate::services::{ApiError, RecordApi, RecordWrite};

type Pending<T> = VecDeque<oneshot::Sender<Result<T, ApiError>>>;

#[derive(Default)]
struct FakeState {
    status: StatusSnapshot,
    fetch_failure: Option<ApiError>,
    gate_fetches: bool,
    pending_fetches: Pending<StatusSnapshot>,
    fetch_count: usize,
    collections: HashMap<Collection, Value>,
    write_failure: Option<ApiError>,
    gate_writes: bool,
    pending_writes: Pending<Value>,
    writes: Vec<RecordWrite>,
}

/// In-memory [`RecordApi`] whose answers are set by the test.
///
/// With gating on, calls park until the test releases them one by one, which
/// lets a test resolve responses in any order.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
    parked: Notify,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, status: StatusSnapshot) {
        self.state.lock().unwrap().status = status;
    }

    pub fn set_collection(&self, collection: Collection, body: Value) {
        self.state.lock().unwrap().collections.insert(collection, body);
    }

    pub fn fail_fetches(&self, error: Option<ApiError>) {
        self.state.lock().unwrap().fetch_failure = error;
    }

    pub fn fail_writes(&self, error: Option<ApiError>) {
        self.state.lock().unwrap().write_failure = error;
    }

    pub fn gate_fetches(&self, gated: bool) {
        self.state.lock().unwrap().gate_fetches = gated;
    }

    pub fn gate_writes(&self, gated: bool) {
        self.state.lock().unwrap().gate_writes = gated;
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetch_count
    }

    pub fn writes(&self) -> Vec<RecordWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    pub async fn wait_for_pending_fetches(&self, count: usize) {
        loop {
            if self.state.lock().unwrap().pending_fetches.len() >= count {
                return;
            }
            self.parked.notified().await;
        }
    }

    pub async fn wait_for_pending_writes(&self, count: usize) {
        loop {
            if self.state.lock().unwrap().pending_writes.len() >= count {
                return;
            }
            self.parked.notified().await;
        }
    }

    /// Resolve the parked fetch at `index` (in call order among those still parked)
    pub fn release_fetch(&self, index: usize, result: Result<StatusSnapshot, ApiError>) {
        let sender = self.state.lock().unwrap().pending_fetches.remove(index).unwrap();
        let _ = sender.send(result);
    }

    pub fn release_write(&self, index: usize, result: Result<Value, ApiError>) {
        let sender = self.state.lock().unwrap().pending_writes.remove(index).unwrap();
        let _ = sender.send(result);
    }

    async fn park<T>(&self, receiver: oneshot::Receiver<Result<T, ApiError>>) -> Result<T, ApiError> {
        self.parked.notify_one();
        receiver
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("released without answer".to_string())))
    }
}

#[async_trait]
impl RecordApi for FakeApi {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        let receiver = {
            let mut state = self.state.lock().unwrap();
            state.fetch_count += 1;
            if !state.gate_fetches {
                return match &state.fetch_failure {
                    Some(e) => Err(e.clone()),
                    None => Ok(state.status.clone()),
                };
            }
            let (sender, receiver) = oneshot::channel();
            state.pending_fetches.push_back(sender);
            receiver
        };
        self.park(receiver).await
    }

    async fn fetch_collection(&self, collection: Collection) -> Result<Value, ApiError> {
        let state = self.state.lock().unwrap();
        if let Some(e) = &state.fetch_failure {
            return Err(e.clone());
        }
        Ok(state
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn send(&self, write: RecordWrite) -> Result<Value, ApiError> {
        let receiver = {
            let mut state = self.state.lock().unwrap();
            state.writes.push(write.clone());
            if !state.gate_writes {
                return match &state.write_failure {
                    Some(e) => Err(e.clone()),
                    None => Ok(json!({ "success": true })),
                };
            }
            let (sender, receiver) = oneshot::channel();
            state.pending_writes.push_back(sender);
            receiver
        };
        self.park(receiver).await
    }
}

pub fn wire_medication(id: &str, name: &str, timestamp: &str) -> shared::Medication {
    shared::Medication {
        id: id.to_string(),
        name: name.to_string(),
        timestamp: Some(timestamp.to_string()),
        updated_at: Some(timestamp.to_string()),
    }
}

#[async_trait]
impl crate::services::IdentityApi for FakeApi {
    async fn check_session(&self) -> Result<shared::SessionResponse, ApiError> {
        Ok(shared::SessionResponse::anonymous())
    }

    async fn login(&self, _request: shared::LoginRequest) -> Result<shared::SessionResponse, ApiError> {
        Err(ApiError::Unauthorized)
    }

    async fn register(
        &self,
        _request: shared::RegisterRequest,
    ) -> Result<shared::SessionResponse, ApiError> {
        Err(ApiError::Unauthorized)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
