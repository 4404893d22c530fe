//! # Program IR
//!
//! The analysis input: signatures, typed locals and three-address statements
//! for every method, plus the class hierarchy. Produced by a front-end (or
//! [`ProgramBuilder`]) and consumed read-only by the pointer analysis.
//!
//! Methods without a body are opaque (platform/SDK) and are modeled by
//! plugins instead of being lowered.

pub mod builder;
pub mod program;
pub mod signature;
pub mod stmt;
pub mod types;

pub use builder::{BodyBuilder, ProgramBuilder};
pub use program::{Body, ClassDecl, FieldDecl, Local, Method, Param, Program, ProgramDecl};
pub use signature::{ClassSignature, FieldSignature, MethodSignature, DEFAULT_CLASS};
pub use stmt::{InvokeExpr, LValue, RValue, Stmt, StmtRef};
pub use types::Type;
