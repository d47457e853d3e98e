#![allow(dead_code)]
pub mod orders;
pub mod prepare_env;
