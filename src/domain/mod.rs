//! Domain layer - core types shared by the timeline engine and the planner

pub mod model;
