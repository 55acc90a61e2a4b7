//! Event outbox and sinks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AggregateRoot, DomainEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A domain event ready for delivery, with its routing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxMessage {
    /// Unique identifier for this message.
    pub message_id: Uuid,

    /// The type of the event (e.g., "EquipmentCreated").
    pub event_type: String,

    /// The type of aggregate that raised it (e.g., "Equipment").
    pub aggregate_type: String,

    /// External ID of the aggregate.
    pub aggregate_id: String,

    pub occurred_at: DateTime<Utc>,

    /// The event as JSON.
    pub payload: serde_json::Value,
}

impl OutboxMessage {
    /// Wraps an event raised by an aggregate of type `A`.
    pub fn from_event<A, E>(event: &E) -> Result<Self>
    where
        A: AggregateRoot,
        E: DomainEvent,
    {
        Ok(Self {
            message_id: Uuid::new_v4(),
            event_type: event.event_type().to_string(),
            aggregate_type: A::aggregate_type().to_string(),
            aggregate_id: event.aggregate_id().to_string(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// Decodes the payload back into the event type.
    pub fn decode<E: DomainEvent>(&self) -> Result<E> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

/// Events collected during one unit of work.
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Vec<OutboxMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event raised by an aggregate of type `A`.
    pub fn record<A, E>(&mut self, event: &E) -> Result<()>
    where
        A: AggregateRoot,
        E: DomainEvent,
    {
        self.messages.push(OutboxMessage::from_event::<A, E>(event)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<OutboxMessage> {
        self.messages
    }
}

/// Destination for committed events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers the events of one committed unit of work, in order.
    async fn publish(&self, messages: Vec<OutboxMessage>) -> Result<()>;
}

/// Sink that writes each event to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn publish(&self, messages: Vec<OutboxMessage>) -> Result<()> {
        for message in &messages {
            tracing::info!(
                event_type = %message.event_type,
                aggregate_type = %message.aggregate_type,
                aggregate_id = %message.aggregate_id,
                message_id = %message.message_id,
                "domain event"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemorySinkState {
    messages: Vec<OutboxMessage>,
    fail_on_publish: bool,
}

/// In-memory sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    state: Arc<RwLock<InMemorySinkState>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sink to reject the next deliveries.
    pub async fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().await.fail_on_publish = fail;
    }

    /// Returns every message delivered so far.
    pub async fn messages(&self) -> Vec<OutboxMessage> {
        self.state.read().await.messages.clone()
    }

    /// Returns the event types delivered so far, in order.
    pub async fn event_types(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .messages
            .iter()
            .map(|m| m.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, messages: Vec<OutboxMessage>) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_publish {
            return Err(AppError::EventSink("sink unavailable".to_string()));
        }
        state.messages.extend(messages);
        Ok(())
    }
}
