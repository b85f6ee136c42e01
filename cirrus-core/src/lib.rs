//! Cirrus Core
//!
//! Core library for a CloudFormation synthesis tool that treats templates as values

pub mod duration;
pub mod expr;
pub mod resource;
pub mod template;
