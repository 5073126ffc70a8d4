//! quizwheel: a spin wheel over quiz questions
//!
//! Questions are aggregated from any number of JSON endpoints, normalized into one canonical
//! shape, and kept in a durable local store. A wheel spin picks uniformly among the unread
//! questions and the pick is written back as read.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod liveness;
pub mod logging;
pub mod normalize;
pub mod session;
pub mod source;
pub mod store;
pub mod types;
pub mod wheel;
