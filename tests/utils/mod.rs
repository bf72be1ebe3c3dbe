// Each test binary uses a different slice of the factories
#![allow(dead_code)]

pub mod factories;
