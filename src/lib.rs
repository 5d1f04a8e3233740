//! Formicary - ant colony economy simulation
//!
//! The colony gathers resources from nodes on a small map, builds and
//! upgrades its nest, and grows as the queen hatches new workers. The core
//! is deterministic given a seeded generator and holds no clock of its own.

pub mod campaign;
pub mod city;
pub mod core;
pub mod entity;
pub mod simulation;
