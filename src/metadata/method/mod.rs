//! Method bodies: decoded instruction streams and exception handling clauses.
//!
//! # Key Types
//! - [`MethodBody`] - Instructions, exception clauses and the local signature of one method
//! - [`Instruction`] / [`Operand`] - A decoded instruction and its operand
//! - [`ExceptionHandler`] / [`ExceptionHandlerFlags`] - try/catch/finally/fault clauses

mod body;
mod exceptions;

pub use body::{Immediate, Instruction, MethodBody, Operand};
pub use exceptions::{ExceptionHandler, ExceptionHandlerFlags};
