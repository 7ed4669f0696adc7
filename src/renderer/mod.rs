//! Canvas 2D rendering module
//!
//! Paints a `Snapshot` each frame. Holds no game state of its own.

pub mod canvas;

pub use canvas::CanvasRenderer;
