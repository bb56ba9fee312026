use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera matrices and the animation clock, uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PerFrameData {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub time: f32,
    pub _pad: [f32; 3],
}

impl PerFrameData {
    pub fn new(projection: Mat4, view: Mat4, time: f32) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        }
    }
}

impl Default for PerFrameData {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0)
    }
}

/// One slot of the dynamic per-draw buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PerDrawData {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub eye_position: [f32; 3],
    pub _pad: f32,
}

impl PerDrawData {
    pub fn new(mvp: Mat4, model: Mat4, eye: Vec3) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            eye_position: eye.to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ExtraData {
    pub uv_scale: f32,
    pub _pad: [f32; 3],
}

impl ExtraData {
    pub fn new(uv_scale: f32) -> Self {
        Self {
            uv_scale,
            _pad: [0.0; 3],
        }
    }
}

impl Default for ExtraData {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(size_of::<PerFrameData>(), 144);
        assert_eq!(size_of::<PerDrawData>(), 144);
        assert_eq!(size_of::<ExtraData>(), 16);
        for size in [
            size_of::<PerFrameData>(),
            size_of::<PerDrawData>(),
            size_of::<ExtraData>(),
        ] {
            assert_eq!(size % 16, 0);
        }
    }

    #[test]
    fn matrices_are_stored_column_major() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let draw = PerDrawData::new(Mat4::IDENTITY, model, Vec3::ZERO);
        assert_eq!(draw.model[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn per_frame_bytes_place_time_after_matrices() {
        let data = PerFrameData::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.5);
        let bytes = bytemuck::bytes_of(&data);
        let time: f32 = bytemuck::pod_read_unaligned(&bytes[128..132]);
        assert_eq!(time, 0.5);
    }
}
