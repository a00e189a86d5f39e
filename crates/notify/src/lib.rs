pub mod alarm;
pub mod dispatcher;
pub mod push;
pub mod store;
