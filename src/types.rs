/// Mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// xyz tangent, w handedness of the bitangent
    pub tangent: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], tangent: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent,
        }
    }
}

/// Per-frame uniform shared by every pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub fog_near: f32,
    pub camera_right: [f32; 3],
    pub fog_far: f32,
    pub camera_up: [f32; 3],
    pub rain_size: f32,
    pub fog_color: [f32; 4],
    pub rain_color: [f32; 4],
    /// Direction the directional light travels
    pub light_direction: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub ambient_intensity: f32,
    pub ambient_color: [f32; 3],
    pub hemisphere_intensity: f32,
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
}

/// Per-object uniform: model transform plus material switches
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub uv_scale: [f32; 2],
    /// 1.0 for lit materials
    pub lit: f32,
    /// 1.0 when the normal map should perturb the surface normal
    pub has_normal_map: f32,
}

/// One rain drop instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RainInstance {
    pub center: [f32; 3],
}
