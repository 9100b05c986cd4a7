// Library crate: exposes the editor core for the binary and for integration tests.
// Window, painter and egui panels stay in the binary crate.

pub mod assets;
pub mod editor;
pub mod fixtures;
pub mod harness;
pub mod interaction;
pub mod roof;
pub mod scene;
pub mod settings;

/// Camera, picking and outline geometry shared with the binary's viewport panel.
pub mod viewport {
    pub mod camera;
    pub mod orbit;
    pub mod picking;
    pub mod wireframe;
}

pub use editor::{Editor, PointerInput, Renderer};
