pub mod json_file;
pub mod rule_store;

pub use json_file::JsonFilePreferenceRepository;
pub use rule_store::RuleStore;
