use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// The demo cube: eight shared corners, each with its own color, and the
/// 36 indices of its six faces. The face windings are mixed, so the
/// pipeline draws it without back-face culling.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    #[rustfmt::skip]
    let vertices = vec![
        // front (z = 0)
        Vertex { position: [-0.5,  0.5,  0.0], color: [1.0, 0.0, 0.0] },
        Vertex { position: [ 0.5,  0.5,  0.0], color: [0.0, 1.0, 0.0] },
        Vertex { position: [ 0.5, -0.5,  0.0], color: [0.0, 0.0, 1.0] },
        Vertex { position: [-0.5, -0.5,  0.0], color: [1.0, 0.0, 1.0] },
        // back (z = -0.5)
        Vertex { position: [-0.5,  0.5, -0.5], color: [1.0, 1.0, 0.0] },
        Vertex { position: [ 0.5,  0.5, -0.5], color: [0.0, 1.0, 1.0] },
        Vertex { position: [ 0.5, -0.5, -0.5], color: [0.0, 0.0, 1.0] },
        Vertex { position: [-0.5, -0.5, -0.5], color: [1.0, 0.5, 0.5] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0, 2, 3,  0, 1, 2, // front
        4, 6, 7,  4, 5, 6, // back
        7, 2, 3,  7, 6, 2, // bottom
        0, 5, 4,  0, 1, 5, // top
        4, 0, 7,  0, 7, 3, // left
        5, 1, 2,  5, 6, 2, // right
    ];
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn every_corner_is_used() {
        let (vertices, indices) = cube_mesh();
        for v in 0..vertices.len() as u16 {
            assert!(indices.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let (vertices, _) = cube_mesh();
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&vertices).len(), 8 * 24);
    }
}
