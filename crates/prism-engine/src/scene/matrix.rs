//! Minimal column-major 4x4 matrix helpers.
//!
//! Just enough to compose model-view-projection matrices; anything richer
//! belongs to the host.

/// Column-major 4x4 matrix, matching WGSL `mat4x4<f32>` layout.
pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// `a * b` with column vectors (apply `b` first).
pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k][row] * b[col][k];
            }
            out[col][row] = sum;
        }
    }
    out
}

/// Right-handed perspective projection mapping depth to [0, 1].
pub fn perspective(fovy_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fovy_radians / 2.0).tan();
    let range = near - far;
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far / range, -1.0],
        [0.0, 0.0, near * far / range, 0.0],
    ]
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut out = MAT4_IDENTITY;
    out[3] = [x, y, z, 1.0];
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let t = translation(1.0, 2.0, 3.0);
        assert_eq!(mat4_mul(MAT4_IDENTITY, t), t);
        assert_eq!(mat4_mul(t, MAT4_IDENTITY), t);
    }

    #[test]
    fn translations_compose() {
        let a = translation(1.0, 0.0, 0.0);
        let b = translation(0.0, 2.0, 0.0);
        let ab = mat4_mul(a, b);
        assert_eq!(ab[3], [1.0, 2.0, 0.0, 1.0]);
    }
}
