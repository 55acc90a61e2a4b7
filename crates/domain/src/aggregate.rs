//! Core aggregate and domain event traits.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events record facts that have happened to an aggregate. They are
/// immutable and named in past tense. Aggregates hand them back to the caller
/// instead of publishing them; the application layer decides where they go.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the external identifier of the aggregate that raised the event.
    fn aggregate_id(&self) -> &str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Trait for aggregate roots addressed by an external identifier.
///
/// An aggregate is a consistency boundary: the root plus everything it owns
/// exclusively. Repositories store and look up aggregates through this trait.
pub trait AggregateRoot: Clone + Send + Sync {
    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the external (B2MML) identifier of this aggregate.
    fn external_id(&self) -> &str;
}
