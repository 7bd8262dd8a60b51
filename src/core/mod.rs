//! Core functionality: the document session, file commands, storage and
//! configuration

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;
