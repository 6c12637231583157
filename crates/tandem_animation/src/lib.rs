//! Tandem Animation System
//!
//! Simulations that move the collapsing header after the pointer lets go.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Fling Decay**: exponential-friction deceleration with closed-form
//!   velocity at any travelled distance (used for exact hand-off)
//! - **Scheduler**: slotmap-keyed simulations, cancelled by removing their id
//! - **Interruptible**: springs can be seeded with the velocity they inherit

pub mod decay;
pub mod scheduler;
pub mod spring;

pub use decay::{Decay, DecayConfig};
pub use scheduler::{AnimationScheduler, DecayId, SharedScheduler, SpringId};
pub use spring::{Spring, SpringConfig};
