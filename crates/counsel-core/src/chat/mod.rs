//! Chat sessions: persistence port, conversation assembly and the
//! orchestrating service.

pub mod assembler;
pub mod instructions;
pub mod locks;
pub mod quick_actions;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
