//! Scene collaborator types.
//!
//! The pipeline does not own a scene graph; it consumes a [`Scene`] that
//! supplies visible objects and matrices. Visibility determination itself is
//! host territory.

mod matrix;
mod object;

pub use matrix::{mat4_mul, perspective, translation, Mat4, MAT4_IDENTITY};
pub use object::{Mesh, SceneObject};

/// Host-provided scene interface consumed by scene-drawing passes.
pub trait Scene {
    /// Lets the host refresh its visible set for the given aspect ratio.
    ///
    /// Called once per frame by the first scene-drawing pass.
    fn update_visibility(&mut self, aspect: f32);

    /// Visible objects in draw order. Objects flagged `!visible` are skipped
    /// by passes without reordering the rest.
    fn visible_objects(&self) -> &[SceneObject];

    /// Combined view-projection matrix for the given aspect ratio.
    fn view_projection(&self, aspect: f32) -> Mat4;
}

/// Vec-backed scene for hosts and tests.
///
/// Visibility flags are managed by the caller; `update_visibility` is a
/// no-op since culling is out of scope here.
pub struct BasicScene {
    pub objects: Vec<SceneObject>,
    pub view_projection: Mat4,
}

impl BasicScene {
    pub fn new(view_projection: Mat4) -> Self {
        Self {
            objects: Vec::new(),
            view_projection,
        }
    }
}

impl Scene for BasicScene {
    fn update_visibility(&mut self, _aspect: f32) {}

    fn visible_objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn view_projection(&self, _aspect: f32) -> Mat4 {
        self.view_projection
    }
}
