//! State-space search over a maze where a robot may step or jump.
//!
//! The search strategies only see the [`environment::Environment`]
//! contract; the maze is one implementation of it.

pub mod agent;
pub mod environment;
pub mod game;
pub mod maze;
pub mod solver;
pub mod state;
