pub mod device_tokens;
pub mod preferences;
pub mod subscriptions;
