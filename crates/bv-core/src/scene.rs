//! Declarative table of every instance drawn each frame.

use glam::{Mat4, Vec3};

use crate::animation::{Heading, PatrolId, SceneAnimator};
use crate::transform::{compose, TransformOp};

/// Meshes the scene references. The render backend resolves each to GPU
/// buffers once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshId {
    Ground,
    Tank1,
    Tank2,
    Tank3,
    Barracks,
    Dog,
    Soldier,
    Forest,
    M4,
    Barricade,
    Lamp,
    LightCube,
}

impl MeshId {
    pub const ALL: [MeshId; 12] = [
        MeshId::Ground,
        MeshId::Tank1,
        MeshId::Tank2,
        MeshId::Tank3,
        MeshId::Barracks,
        MeshId::Dog,
        MeshId::Soldier,
        MeshId::Forest,
        MeshId::M4,
        MeshId::Barricade,
        MeshId::Lamp,
        MeshId::LightCube,
    ];

    /// OBJ path relative to the asset root.
    pub fn asset_path(self) -> &'static str {
        match self {
            MeshId::Ground => "models/ground_highres/ground.obj",
            MeshId::Tank1 => "models/tanks/tank1.obj",
            MeshId::Tank2 => "models/tanks/tank2.obj",
            MeshId::Tank3 => "models/tanks/tank3.obj",
            MeshId::Barracks => "models/barrack/barrack.obj",
            MeshId::Dog => "models/dog/dog.obj",
            MeshId::Soldier => "models/soldier/soldier.obj",
            MeshId::Forest => "models/forest/trees.obj",
            MeshId::M4 => "models/gun_m4/m4.obj",
            MeshId::Barricade => "models/barricade/barricade.obj",
            MeshId::Lamp => "models/lamp/lamp.obj",
            MeshId::LightCube => "models/cube/cube.obj",
        }
    }

    /// Rough mesh-space bounds, used when a stand-in replaces a missing
    /// asset. Values are before the instance's scale is applied.
    pub fn placeholder_bounds(self) -> (Vec3, Vec3) {
        match self {
            MeshId::Ground => (Vec3::new(-60.0, -0.01, -60.0), Vec3::new(60.0, 0.0, 60.0)),
            MeshId::Tank1 => (Vec3::new(-2.2, 0.0, -7.2), Vec3::new(0.8, 2.2, -4.0)),
            MeshId::Tank2 => (Vec3::new(1.4, 0.0, -7.2), Vec3::new(4.4, 2.2, -4.0)),
            MeshId::Tank3 => (Vec3::new(-2.2, 0.0, -7.2), Vec3::new(0.8, 2.2, -4.0)),
            MeshId::Barracks => (Vec3::new(-16.5, 0.0, 1.3), Vec3::new(-6.1, 5.5, 6.8)),
            MeshId::Dog => (Vec3::new(-6.0, -18.0, 0.0), Vec3::new(6.0, 18.0, 22.0)),
            MeshId::Soldier => (Vec3::new(-0.25, 0.0, -0.2), Vec3::new(0.25, 1.8, 0.2)),
            MeshId::Forest => (Vec3::new(-3.0, 0.0, -12.0), Vec3::new(3.0, 6.0, 12.0)),
            MeshId::M4 => (Vec3::new(-0.05, 0.0, -0.45), Vec3::new(0.05, 0.12, 0.45)),
            MeshId::Barricade => (Vec3::new(-80.0, -30.0, 0.0), Vec3::new(80.0, 30.0, 60.0)),
            MeshId::Lamp => (Vec3::new(-0.06, 0.0, -0.06), Vec3::new(0.06, 0.2, 0.06)),
            MeshId::LightCube => (Vec3::splat(-1.0), Vec3::splat(1.0)),
        }
    }
}

/// How an instance's model matrix is produced each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Static(Vec<TransformOp>),
    /// Translation comes from the patrol; orientation switches with its heading.
    Patrol {
        patrol: PatrolId,
        advancing: Vec<TransformOp>,
        reversing: Vec<TransformOp>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneInstance {
    pub name: &'static str,
    pub mesh: MeshId,
    pub placement: Placement,
    pub casts_shadow: bool,
}

impl SceneInstance {
    pub fn model_matrix(&self, animator: &SceneAnimator) -> Mat4 {
        match &self.placement {
            Placement::Static(ops) => compose(ops),
            Placement::Patrol {
                patrol,
                advancing,
                reversing,
            } => match animator.patrol(*patrol) {
                Some(patrol) => {
                    let orientation = match patrol.heading() {
                        Heading::Advancing => advancing,
                        Heading::Reversing => reversing,
                    };
                    Mat4::from_translation(patrol.translation()) * compose(orientation)
                }
                None => compose(advancing),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneTable {
    instances: Vec<SceneInstance>,
}

impl Default for SceneTable {
    fn default() -> Self {
        use TransformOp as T;

        let fixed = |name, mesh, ops: Vec<TransformOp>, casts_shadow| SceneInstance {
            name,
            mesh,
            placement: Placement::Static(ops),
            casts_shadow,
        };

        Self::new(vec![
            fixed("tank1", MeshId::Tank1, vec![], true),
            fixed("tank2", MeshId::Tank2, vec![], true),
            fixed("tank3", MeshId::Tank3, vec![T::translate(-13.0, 0.0, -18.0)], true),
            fixed("barracks", MeshId::Barracks, vec![], true),
            fixed(
                "forest",
                MeshId::Forest,
                vec![T::translate(-21.0, 0.0, 0.0), T::rotate_y(180.0)],
                false,
            ),
            SceneInstance {
                name: "dog",
                mesh: MeshId::Dog,
                placement: Placement::Patrol {
                    patrol: PatrolId::Dog,
                    advancing: vec![T::rotate_x(-90.0), T::uniform_scale(0.028)],
                    reversing: vec![
                        T::rotate_y(180.0),
                        T::rotate_x(-90.0),
                        T::uniform_scale(0.028),
                    ],
                },
                casts_shadow: false,
            },
            SceneInstance {
                name: "soldier",
                mesh: MeshId::Soldier,
                placement: Placement::Patrol {
                    patrol: PatrolId::Soldier,
                    advancing: vec![T::rotate_y(85.0)],
                    reversing: vec![T::rotate_y(265.0)],
                },
                casts_shadow: false,
            },
            fixed(
                "m4",
                MeshId::M4,
                vec![T::translate(-5.33, 0.0, 2.0), T::rotate_y(-90.0)],
                true,
            ),
            fixed(
                "barricade",
                MeshId::Barricade,
                vec![
                    T::translate(4.0, 0.0, 4.0),
                    T::rotate_x(-90.0),
                    T::rotate_z(90.0),
                    T::rotate_z(15.0),
                    T::uniform_scale(0.015),
                ],
                true,
            ),
            fixed("lamp", MeshId::Lamp, vec![T::translate(1.93, 1.05, -2.2)], false),
            fixed("ground", MeshId::Ground, vec![], true),
        ])
    }
}

impl SceneTable {
    pub fn new(instances: Vec<SceneInstance>) -> Self {
        Self { instances }
    }

    pub fn instances(&self) -> &[SceneInstance] {
        &self.instances
    }

    pub fn shadow_casters(&self) -> impl Iterator<Item = &SceneInstance> {
        self.instances.iter().filter(|i| i.casts_shadow)
    }

    pub fn get(&self, name: &str) -> Option<&SceneInstance> {
        self.instances.iter().find(|i| i.name == name)
    }
}
