//! Integration tests for memoseq

mod fallible;
mod positional;
