mod accumulator;
mod animation;
mod builder;
mod camera;
mod component;
mod config;
mod render;
mod state;
mod timer;
mod types;

pub use accumulator::ActivationState;
pub use component::NeuralNetworkCanvas;
