pub mod api;
pub mod config;
pub mod consts;
pub mod datamuse;
pub mod display;
pub mod grouping;
pub mod repl;
pub mod session;
pub mod words;
