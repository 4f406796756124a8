use skylight_opengl::{GeometryBuffer, Primitive};

#[rustfmt::skip]
pub const CUBE_VERTICES: &[f32; 108] =
    &[
       -1.0,  1.0, -1.0,
       -1.0, -1.0, -1.0,
        1.0, -1.0, -1.0,

        1.0, -1.0, -1.0,
        1.0,  1.0, -1.0,
       -1.0,  1.0, -1.0,

        1.0, -1.0, -1.0,
        1.0, -1.0,  1.0,
        1.0,  1.0, -1.0,

        1.0, -1.0,  1.0,
        1.0,  1.0,  1.0,
        1.0,  1.0, -1.0,

        1.0, -1.0,  1.0,
       -1.0, -1.0,  1.0,
        1.0,  1.0,  1.0,

       -1.0, -1.0,  1.0,
       -1.0,  1.0,  1.0,
        1.0,  1.0,  1.0,

       -1.0, -1.0,  1.0,
       -1.0, -1.0, -1.0,
       -1.0,  1.0,  1.0,

       -1.0, -1.0, -1.0,
       -1.0,  1.0, -1.0,
       -1.0,  1.0,  1.0,

       -1.0, -1.0,  1.0,
        1.0, -1.0,  1.0,
        1.0, -1.0, -1.0,

        1.0, -1.0, -1.0,
       -1.0, -1.0, -1.0,
       -1.0, -1.0,  1.0,

       -1.0,  1.0, -1.0,
        1.0,  1.0, -1.0,
        1.0,  1.0,  1.0,

        1.0,  1.0,  1.0,
       -1.0,  1.0,  1.0,
       -1.0,  1.0, -1.0
    ];

// Position followed by texture coordinate, drawn as a strip.
#[rustfmt::skip]
pub const QUAD_VERTICES: &[f32; 20] =
    &[
       -1.0,  1.0, 0.0, 0.0, 1.0,
       -1.0, -1.0, 0.0, 0.0, 0.0,
        1.0,  1.0, 0.0, 1.0, 1.0,
        1.0, -1.0, 0.0, 1.0, 0.0,
    ];

pub fn unit_cube() -> GeometryBuffer {
    GeometryBuffer::new(CUBE_VERTICES, None, &[3])
}

pub fn fullscreen_quad() -> GeometryBuffer {
    GeometryBuffer::new(QUAD_VERTICES, None, &[3, 2]).with_primitive(Primitive::TriangleStrip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn cube_has_two_triangles_per_face() {
        let mut triangles_per_face = HashMap::new();
        for triangle in CUBE_VERTICES.chunks_exact(9) {
            let corners = triangle.chunks_exact(3).collect::<Vec<_>>();
            let face = (0..3)
                .find(|axis| {
                    corners
                        .iter()
                        .all(|corner| corner[*axis] == corners[0][*axis])
                })
                .map(|axis| (axis, corners[0][axis] > 0.0));
            assert!(face.is_some(), "{:?} does not lie on a face", corners);
            *triangles_per_face.entry(face).or_insert(0) += 1;
        }
        assert_eq!(triangles_per_face.len(), 6);
        assert!(triangles_per_face.values().all(|count| *count == 2));
    }

    #[test]
    fn quad_covers_clip_space() {
        let corners = QUAD_VERTICES
            .chunks_exact(5)
            .map(|vertex| (vertex[0], vertex[1], vertex[3], vertex[4]))
            .collect::<Vec<_>>();
        assert_eq!(corners.len(), 4);
        for (x, y, u, v) in corners {
            assert_eq!(u, (x + 1.0) / 2.0);
            assert_eq!(v, (y + 1.0) / 2.0);
        }
    }
}
