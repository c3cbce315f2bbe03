//! dsviz TUI - three data structure games behind tabs
//!
//! - Array Game: place the target dish at the right index before time runs out
//! - Hash Table: insert key/value pairs and watch collisions chain up
//! - Graphs: step a greedy navigator through a weighted maze
//!
//! Vim-style Normal/Edit modes; Edit is only used by the hash table inputs.

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::MainTab;
pub use terminal::run;
