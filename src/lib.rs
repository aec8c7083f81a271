// topicbridge: validated topic-model containers built from fitted models.
//
// This is the library root. `model` holds the container and everything it
// is built from; `output` renders containers in the terminal.

pub mod config;
pub mod model;
pub mod output;
