use super::AdPanelHost;
use crate::backend::AdsBackend;
use crate::models::{Ad, AdPayload};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{watch, Notify};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(AdPayload),
    Update(String, AdPayload),
}

/// In-memory backend that records every request
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    fail: bool,
    gate: Option<Notify>,
    loading: Mutex<Option<watch::Receiver<bool>>>,
    loading_seen: Mutex<Vec<bool>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Requests block until [`FakeBackend::release`] is called
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn watch_loading(&self, rx: watch::Receiver<bool>) {
        *self.loading.lock() = Some(rx);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().clone()
    }

    async fn handle(&self, call: Call) -> Result<Option<Ad>> {
        let seen = self.loading.lock().as_ref().map(|rx| *rx.borrow());
        if let Some(seen) = seen {
            self.loading_seen.lock().push(seen);
        }
        self.calls.lock().push(call.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            anyhow::bail!("connection refused");
        }

        let (id, payload) = match call {
            Call::Create(payload) => ("new-id".to_string(), payload),
            Call::Update(id, payload) => (id, payload),
        };
        Ok(Some(Ad {
            id,
            title: payload.title,
            description: payload.description,
            price: payload.price,
            availability: payload.availability,
            move_in_date: payload.move_in_date.map(|ts| ts.date_naive()),
            images: payload.images,
            owner_id: Some(payload.owner_id),
        }))
    }
}

#[async_trait]
impl AdsBackend for FakeBackend {
    async fn create_ad(&self, payload: &AdPayload) -> Result<Option<Ad>> {
        self.handle(Call::Create(payload.clone())).await
    }

    async fn update_ad(&self, id: &str, payload: &AdPayload) -> Result<Option<Ad>> {
        self.handle(Call::Update(id.to_string(), payload.clone())).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    RefreshAds,
    SetAddUnit(bool),
    Alert(String),
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }
}

impl AdPanelHost for RecordingHost {
    fn toggle_refresh_ads(&self) {
        self.events.lock().push(HostEvent::RefreshAds);
    }

    fn set_add_unit(&self, open: bool) {
        self.events.lock().push(HostEvent::SetAddUnit(open));
    }

    fn alert(&self, message: &str) {
        self.events.lock().push(HostEvent::Alert(message.to_string()));
    }
}
