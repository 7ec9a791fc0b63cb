//! Per-frame draw lists for the two render passes.
//!
//! Both passes walk the same [`SceneTable`]; the shadow pass keeps only the
//! instances flagged as casters and needs no normals.

use glam::{Mat3, Mat4, Vec3};

use crate::animation::SceneAnimator;
use crate::camera::{Camera, Projection};
use crate::light::Light;
use crate::scene::{MeshId, SceneTable};
use crate::transform::{light_direction_matrix, rotation_only, InstanceTransform};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthDraw {
    pub mesh: MeshId,
    pub model: Mat4,
}

#[derive(Clone, Debug)]
pub struct ShadowPassPlan {
    pub light_space: Mat4,
    pub draws: Vec<DepthDraw>,
}

impl ShadowPassPlan {
    pub fn build(scene: &SceneTable, animator: &SceneAnimator, light: &Light) -> Self {
        let draws = scene
            .shadow_casters()
            .map(|instance| DepthDraw {
                mesh: instance.mesh,
                model: instance.model_matrix(animator),
            })
            .collect();

        Self {
            light_space: light.space_matrix(),
            draws,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LitDraw {
    pub mesh: MeshId,
    pub transform: InstanceTransform,
}

/// Everything the color pass uploads, in the order it is consumed.
#[derive(Clone, Debug)]
pub struct ColorPassPlan {
    pub projection: Mat4,
    pub view: Mat4,
    pub light_space: Mat4,
    pub light_direction_matrix: Mat3,
    pub light_direction: Vec3,
    pub light_color: Vec3,
    pub point_light: Vec3,
    pub camera_position: Vec3,
    pub draws: Vec<LitDraw>,
    pub marker: DepthDraw,
    pub skybox_view: Mat4,
}

impl ColorPassPlan {
    pub fn build(
        scene: &SceneTable,
        animator: &SceneAnimator,
        camera: &Camera,
        projection: &Projection,
        light: &Light,
    ) -> Self {
        let view = camera.view_matrix();
        let draws = scene
            .instances()
            .iter()
            .map(|instance| LitDraw {
                mesh: instance.mesh,
                transform: InstanceTransform::new(view, instance.model_matrix(animator)),
            })
            .collect();

        Self {
            projection: projection.matrix(),
            view,
            light_space: light.space_matrix(),
            light_direction_matrix: light_direction_matrix(view),
            light_direction: light.direction,
            light_color: light.color,
            point_light: light.point_position,
            camera_position: camera.position(),
            draws,
            marker: DepthDraw {
                mesh: MeshId::LightCube,
                model: light.marker_matrix(),
            },
            skybox_view: rotation_only(view),
        }
    }
}
