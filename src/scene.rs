use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::PathBuf;

use glam::{EulerRot, Mat4, Vec3};

use crate::config::SceneConfig;
use crate::geometry::{self, MeshData};
use crate::math::rgb_from_hex;

/// Position plus XYZ Euler rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Add `delta` to the rotation, keeping each angle in [0, 2pi)
    pub fn rotate(&mut self, delta: Vec3) {
        let r = self.rotation + delta;
        self.rotation = Vec3::new(r.x.rem_euclid(TAU), r.y.rem_euclid(TAU), r.z.rem_euclid(TAU));
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wrap {
    Clamp,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinFilter {
    Nearest,
    Linear,
}

/// How a texture is sampled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub wrap: Wrap,
    pub min_filter: MinFilter,
    pub repeat: [f32; 2],
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            wrap: Wrap::Clamp,
            min_filter: MinFilter::Linear,
            repeat: [1.0, 1.0],
        }
    }
}

/// Reference to an image on disk plus its sampling
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub path: PathBuf,
    pub sampling: Sampling,
}

impl TextureRef {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            sampling: Sampling::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Unlit, texture color only
    Basic { map: TextureRef },
    /// Diffuse lit with an optional tangent-space normal map
    Standard {
        map: TextureRef,
        normal_map: Option<TextureRef>,
        double_sided: bool,
    },
}

impl Material {
    pub fn map(&self) -> &TextureRef {
        match self {
            Material::Basic { map } | Material::Standard { map, .. } => map,
        }
    }

    pub fn normal_map(&self) -> Option<&TextureRef> {
        match self {
            Material::Basic { .. } => None,
            Material::Standard { normal_map, .. } => normal_map.as_ref(),
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, Material::Standard { .. })
    }

    pub fn double_sided(&self) -> bool {
        matches!(self, Material::Standard { double_sided: true, .. })
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshData,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit direction the light travels in
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub intensity: f32,
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RainLook {
    pub color: [f32; 3],
    pub opacity: f32,
    pub point_size: f32,
}

/// Everything static about the scene. Per frame only the cube and sphere
/// rotations change.
#[derive(Debug, Clone)]
pub struct Scene {
    pub cube: SceneObject,
    pub sphere: SceneObject,
    pub ground: SceneObject,
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
    pub fog: Fog,
    pub background: TextureRef,
    pub rain_look: RainLook,
}

impl Scene {
    pub fn build(config: &SceneConfig) -> Self {
        let assets = &config.assets;

        let cube_size = config.cube.size;
        let cube = SceneObject {
            name: "cube",
            mesh: geometry::cube(cube_size),
            material: Material::Basic {
                map: TextureRef::new(assets.cube.clone()),
            },
            transform: Transform::at(Vec3::new(cube_size + 1.0, cube_size + 1.0, 0.0)),
            visible: true,
        };

        let radius = config.sphere.radius;
        let sphere = SceneObject {
            name: "sphere",
            mesh: geometry::sphere(
                radius,
                config.sphere.width_segments,
                config.sphere.height_segments,
            ),
            material: Material::Basic {
                map: TextureRef::new(assets.sphere.clone()),
            },
            transform: Transform::at(Vec3::new(-radius - 1.0, radius + 2.0, 0.0)),
            visible: true,
        };

        let ground_sampling = Sampling {
            wrap: Wrap::Repeat,
            min_filter: MinFilter::Nearest,
            repeat: config.ground.repeat,
        };
        let ground = SceneObject {
            name: "ground",
            mesh: geometry::plane(config.ground.width, config.ground.height),
            material: Material::Standard {
                map: TextureRef {
                    path: assets.ground_color.clone(),
                    sampling: ground_sampling,
                },
                normal_map: Some(TextureRef {
                    path: assets.ground_normal.clone(),
                    sampling: ground_sampling,
                }),
                double_sided: true,
            },
            transform: Transform {
                position: Vec3::ZERO,
                rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            },
            visible: config.ground.visible,
        };

        let lights = &config.lights;
        let directional = DirectionalLight {
            color: rgb_from_hex(lights.directional_color),
            intensity: lights.directional_intensity,
            position: Vec3::from_array(lights.directional_position),
            target: ground.transform.position,
        };

        Self {
            cube,
            sphere,
            ground,
            directional,
            ambient: AmbientLight {
                color: rgb_from_hex(lights.ambient_color),
                intensity: lights.ambient_intensity,
            },
            hemisphere: HemisphereLight {
                sky: rgb_from_hex(lights.hemisphere_sky),
                ground: rgb_from_hex(lights.hemisphere_ground),
                intensity: lights.hemisphere_intensity,
            },
            fog: Fog {
                color: rgb_from_hex(config.fog.color),
                near: config.fog.near,
                far: config.fog.far,
            },
            background: TextureRef::new(assets.sky.clone()),
            rain_look: RainLook {
                color: rgb_from_hex(config.rain.color),
                opacity: config.rain.opacity,
                point_size: config.rain.point_size,
            },
        }
    }

    /// Objects in draw order
    pub fn objects(&self) -> [&SceneObject; 3] {
        [&self.ground, &self.cube, &self.sphere]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_layout() {
        let scene = Scene::build(&SceneConfig::default());

        assert_eq!(scene.cube.transform.position, Vec3::new(5.0, 5.0, 0.0));
        assert_eq!(scene.sphere.transform.position, Vec3::new(-4.0, 5.0, 0.0));
        assert_eq!(scene.ground.transform.rotation.x, FRAC_PI_2);
        assert!(!scene.cube.material.is_lit());
        assert!(scene.ground.material.is_lit());
        assert!(scene.ground.material.double_sided());
        assert!(scene.ground.material.normal_map().is_some());
    }

    #[test]
    fn light_points_from_position_to_ground() {
        let scene = Scene::build(&SceneConfig::default());
        let dir = scene.directional.direction();
        let expected = Vec3::new(0.0, -1.0, -1.0).normalize();
        assert!((dir - expected).length() < 1e-5);
    }

    #[test]
    fn rotated_plane_normal_points_down() {
        let scene = Scene::build(&SceneConfig::default());
        let normal = scene.ground.transform.matrix().transform_vector3(Vec3::Z);
        assert!((normal - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn rotate_wraps_past_full_turn() {
        let mut t = Transform::at(Vec3::ZERO);
        t.rotation = Vec3::splat(TAU - 0.005);
        t.rotate(Vec3::splat(0.01));

        assert!((t.rotation.x - 0.005).abs() < 1e-4);
        assert!(t.rotation.max_element() < TAU);
    }
}
