use async_trait::async_trait;
use crate::error::Error;
use crate::models::ServerRecord;

/// Where the raw listing comes from. One call per cycle, no internal retry.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<String, Error>;
}

/// Turns raw listing content into records, in listing order.
///
/// Implementations skip rows they cannot read instead of failing the whole document,
/// so callers never see markup changes as anything worse than fewer records.
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, raw: &str) -> Vec<ServerRecord>;
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, subscriber_id: &str, message: &str) -> Result<(), Error>;
}
