//! Application layer for the equipment catalogue.
//!
//! Wraps the domain aggregates and the repository ports into use cases.
//! Every mutating use case runs in its own unit of work; the domain events
//! it raises are collected in an outbox and handed to an [`EventSink`] once
//! the unit of work has committed.

pub mod commands;
pub mod error;
pub mod outbox;
pub mod service;

pub use commands::{CreateEquipment, ImportFailure, ImportReport};
pub use error::{AppError, Result};
pub use outbox::{EventSink, InMemoryEventSink, Outbox, OutboxMessage, TracingEventSink};
pub use service::EquipmentService;
