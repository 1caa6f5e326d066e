#![allow(dead_code)]

pub mod convert_server;
pub mod fixtures;
