use super::Vec3;

/// 4x4 matrix for transformations (column-major for WebGL)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Mat4 {
    /// Build from four columns
    pub const fn from_cols(c0: [f32; 4], c1: [f32; 4], c2: [f32; 4], c3: [f32; 4]) -> Self {
        Self {
            data: [
                c0[0], c0[1], c0[2], c0[3],
                c1[0], c1[1], c1[2], c1[3],
                c2[0], c2[1], c2[2], c2[3],
                c3[0], c3[1], c3[2], c3[3],
            ],
        }
    }

    pub const fn identity() -> Self {
        Self::from_cols(
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_cols(
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        )
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_cols(
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    /// Model matrix `T * Rx * Ry * Rz * S` from a position, XYZ Euler angles
    /// and a uniform scale
    pub fn from_trs(position: Vec3, rotation: Vec3, scale: f32) -> Self {
        Self::translation(position.x, position.y, position.z)
            .mul(&Self::rotation_x(rotation.x))
            .mul(&Self::rotation_y(rotation.y))
            .mul(&Self::rotation_z(rotation.z))
            .mul(&Self::scale(scale, scale, scale))
    }

    /// Right-handed perspective projection, clip depth in [-1, 1]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let depth = 1.0 / (near - far);

        Self::from_cols(
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) * depth, -1.0],
            [0.0, 0.0, 2.0 * far * near * depth, 0.0],
        )
    }

    /// View matrix looking from `eye` toward `target`
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let true_up = right.cross(&forward);

        Self::from_cols(
            [right.x, true_up.x, -forward.x, 0.0],
            [right.y, true_up.y, -forward.y, 0.0],
            [right.z, true_up.z, -forward.z, 0.0],
            [-right.dot(&eye), -true_up.dot(&eye), forward.dot(&eye), 1.0],
        )
    }

    /// `self * other`
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut data = [0.0f32; 16];

        for (i, out) in data.iter_mut().enumerate() {
            let (row, col) = (i % 4, i / 4);
            *out = (0..4).map(|k| self.data[row + k * 4] * other.data[k + col * 4]).sum();
        }

        Self { data }
    }

    /// Apply to a point (w = 1)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
        )
    }

    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(p: Vec3, x: f32, y: f32, z: f32) {
        assert!((p.x - x).abs() < 1e-4 && (p.y - y).abs() < 1e-4 && (p.z - z).abs() < 1e-4, "{:?}", p);
    }

    #[test]
    fn test_identity_diagonal() {
        let m = Mat4::identity();
        for i in 0..16 {
            let expected = if i % 5 == 0 { 1.0 } else { 0.0 };
            assert_eq!(m.data[i], expected);
        }
    }

    #[test]
    fn test_translation() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_point(m.transform_point(Vec3::ZERO), 1.0, 2.0, 3.0);
    }

    #[test]
    fn test_scale() {
        let m = Mat4::scale(2.0, 3.0, 4.0);
        assert_point(m.transform_point(Vec3::ONE), 2.0, 3.0, 4.0);
    }

    #[test]
    fn test_rotation_z() {
        let m = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        assert_point(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), 0.0, 1.0, 0.0);
        let m = Mat4::rotation_x(std::f32::consts::FRAC_PI_2);
        assert_point(m.transform_point(Vec3::UP), 0.0, 0.0, 1.0);
    }

    #[test]
    fn test_from_trs_order() {
        // Scale first, then rotate a quarter turn about Z, then translate
        let m = Mat4::from_trs(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            2.0,
        );
        assert_point(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), 0.0, 7.0, 0.0);
    }

    #[test]
    fn test_from_trs_identity() {
        let m = Mat4::from_trs(Vec3::ZERO, Vec3::ZERO, 1.0);
        for (a, b) in m.data.iter().zip(Mat4::identity().data.iter()) {
            assert!((a - b).abs() < 0.0001);
        }
    }

    #[test]
    fn test_matrix_mul() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let s = Mat4::scale(2.0, 2.0, 2.0);
        // Scale applies before translation
        assert_point(t.mul(&s).transform_point(Vec3::new(1.0, 0.0, 0.0)), 3.0, 0.0, 0.0);
        assert_point(s.mul(&t).transform_point(Vec3::new(1.0, 0.0, 0.0)), 4.0, 0.0, 0.0);
    }
}
