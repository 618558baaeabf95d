pub mod complete;
pub mod definition;
pub mod outline;
pub mod tokenize;
pub mod validate;
pub mod watch;
