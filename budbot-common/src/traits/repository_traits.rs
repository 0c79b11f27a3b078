use async_trait::async_trait;
use crate::error::Error;
use crate::models::RuleMap;

/// Durable backing for subscriber watch rules.
///
/// `save` must only return `Ok` once the whole mapping is durable.
/// `load` treats a missing or empty store as an empty mapping.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn load(&self) -> Result<RuleMap, Error>;
    async fn save(&self, rules: &RuleMap) -> Result<(), Error>;
}
