//! CPU ray tracer for scenes made of spheres: ambient, diffuse and specular
//! lighting with hard shadows and bounded mirror reflections.
//!
//! [`frame::render_frame`] drives a full frame through [`scene::Scene::trace_ray`]
//! into any [`frame::PixelSink`]. The windowed viewer lives in `application`,
//! `renderer` and `texture`.

pub mod application;
pub mod camera;
pub mod config;
pub mod controller;
pub mod frame;
pub mod intersection;
pub mod lighting;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod tracer;
pub mod util;
