use crate::CubeFace;
use lazy_static::lazy_static;
use nalgebra_glm as glm;

lazy_static! {
    /// The shared capture cameras for rendering into cube faces.
    pub static ref CAPTURE_VIEWS: ViewSet = ViewSet::new();
}

/// Six cameras at the origin, one per cube face, sharing a 90 degree
/// square projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSet {
    pub projection: glm::Mat4,
    pub views: [glm::Mat4; 6],
}

impl ViewSet {
    fn new() -> Self {
        let projection = glm::perspective(1.0, 90_f32.to_radians(), 0.1, 10.0);
        let eye = glm::vec3(0.0, 0.0, 0.0);
        let view = |center: glm::Vec3, up: glm::Vec3| glm::look_at(&eye, &center, &up);
        let views = [
            view(glm::vec3(1.0, 0.0, 0.0), glm::vec3(0.0, -1.0, 0.0)),
            view(glm::vec3(-1.0, 0.0, 0.0), glm::vec3(0.0, -1.0, 0.0)),
            view(glm::vec3(0.0, 1.0, 0.0), glm::vec3(0.0, 0.0, 1.0)),
            view(glm::vec3(0.0, -1.0, 0.0), glm::vec3(0.0, 0.0, -1.0)),
            view(glm::vec3(0.0, 0.0, 1.0), glm::vec3(0.0, -1.0, 0.0)),
            view(glm::vec3(0.0, 0.0, -1.0), glm::vec3(0.0, -1.0, 0.0)),
        ];
        Self { projection, views }
    }

    pub fn view(&self, face: CubeFace) -> &glm::Mat4 {
        &self.views[face.index()]
    }

    /// World direction seen through normalized device coordinates
    /// `(ndc_x, ndc_y)` of a face's camera.
    pub fn ndc_direction(&self, face: CubeFace, ndc_x: f32, ndc_y: f32) -> glm::Vec3 {
        let rotation = glm::mat4_to_mat3(self.view(face));
        glm::normalize(&(glm::transpose(&rotation) * glm::vec3(ndc_x, ndc_y, -1.0)))
    }
}
