//! Contrib City - a year of daily contribution counts as a 3D city.
//!
//! The [`city`] module holds the pure generation pipeline; the plugins
//! around it load data, realize the model in Bevy, and drive the view.

pub mod app_state;
pub mod camera;
pub mod city;
pub mod data;
pub mod pipeline;
pub mod render;
pub mod ui;
