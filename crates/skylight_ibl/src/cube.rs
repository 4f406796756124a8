use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// A cube face in the fixed storage order +X, -X, +Y, -Y, +Z, -Z.
///
/// Face coordinates follow the OpenGL cube map convention: `s` runs along
/// a texel row and `t` along a column, with `t = 0` stored first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "px",
            CubeFace::NegativeX => "nx",
            CubeFace::PositiveY => "py",
            CubeFace::NegativeY => "ny",
            CubeFace::PositiveZ => "pz",
            CubeFace::NegativeZ => "nz",
        }
    }

    /// The outward axis of the face.
    pub fn normal(self) -> glm::Vec3 {
        self.direction(0.5, 0.5)
    }

    /// Unit direction through face coordinates `s`, `t` in `[0, 1]`.
    pub fn direction(self, s: f32, t: f32) -> glm::Vec3 {
        let sc = 2.0 * s - 1.0;
        let tc = 2.0 * t - 1.0;
        let direction = match self {
            CubeFace::PositiveX => glm::vec3(1.0, -tc, -sc),
            CubeFace::NegativeX => glm::vec3(-1.0, -tc, sc),
            CubeFace::PositiveY => glm::vec3(sc, 1.0, tc),
            CubeFace::NegativeY => glm::vec3(sc, -1.0, -tc),
            CubeFace::PositiveZ => glm::vec3(sc, -tc, 1.0),
            CubeFace::NegativeZ => glm::vec3(-sc, -tc, -1.0),
        };
        glm::normalize(&direction)
    }

    /// Selects the face a direction hits and the face coordinates of the hit.
    pub fn from_direction(direction: &glm::Vec3) -> (CubeFace, f32, f32) {
        let (x, y, z) = (direction.x, direction.y, direction.z);
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

        let (face, sc, tc, major) = if ax >= ay && ax >= az {
            if x >= 0.0 {
                (CubeFace::PositiveX, -z, -y, ax)
            } else {
                (CubeFace::NegativeX, z, -y, ax)
            }
        } else if ay >= az {
            if y >= 0.0 {
                (CubeFace::PositiveY, x, z, ay)
            } else {
                (CubeFace::NegativeY, x, -z, ay)
            }
        } else if z >= 0.0 {
            (CubeFace::PositiveZ, x, -y, az)
        } else {
            (CubeFace::NegativeZ, -x, -y, az)
        };

        if major <= 0.0 {
            return (face, 0.5, 0.5);
        }
        let s = 0.5 * (sc / major + 1.0);
        let t = 0.5 * (tc / major + 1.0);
        (face, s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_storage_order() {
        for (index, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), index);
        }
    }

    #[test]
    fn normals_are_axes() {
        assert_eq!(CubeFace::PositiveX.normal(), glm::vec3(1.0, 0.0, 0.0));
        assert_eq!(CubeFace::NegativeX.normal(), glm::vec3(-1.0, 0.0, 0.0));
        assert_eq!(CubeFace::PositiveY.normal(), glm::vec3(0.0, 1.0, 0.0));
        assert_eq!(CubeFace::NegativeY.normal(), glm::vec3(0.0, -1.0, 0.0));
        assert_eq!(CubeFace::PositiveZ.normal(), glm::vec3(0.0, 0.0, 1.0));
        assert_eq!(CubeFace::NegativeZ.normal(), glm::vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn face_coordinates_round_trip() {
        let coordinates = [0.05_f32, 0.3, 0.5, 0.71, 0.95];
        for face in CubeFace::ALL.iter() {
            for s in coordinates.iter() {
                for t in coordinates.iter() {
                    let direction = face.direction(*s, *t);
                    let (hit, hit_s, hit_t) = CubeFace::from_direction(&direction);
                    assert_eq!(hit, *face);
                    assert!((hit_s - s).abs() < 1e-5, "{:?} s {} -> {}", face, s, hit_s);
                    assert!((hit_t - t).abs() < 1e-5, "{:?} t {} -> {}", face, t, hit_t);
                }
            }
        }
    }

    #[test]
    fn first_row_of_side_faces_points_up() {
        for face in [
            CubeFace::PositiveX,
            CubeFace::NegativeX,
            CubeFace::PositiveZ,
            CubeFace::NegativeZ,
        ]
        .iter()
        {
            assert!(face.direction(0.5, 0.0).y > 0.5);
            assert!(face.direction(0.5, 1.0).y < -0.5);
        }
    }
}
