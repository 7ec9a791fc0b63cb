#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use approx::assert_relative_eq;
    use glam::Vec3;
    use image::RgbaImage;

    use bv_core::config::{AssetConfig, ViewerConfig};
    use bv_core::frame::{FrameState, RenderMode};
    use bv_core::scene::MeshId;
    use bv_core::transform::InstanceTransform;
    use bv_core::Error;

    use crate::assets::{load_obj, placeholder_skybox, validate_faces, AssetLoader};
    use crate::color::required_features;
    use crate::mesh::MeshData;
    use crate::skybox::skybox_vertices;
    use crate::uniforms::{align_to, pack_slots, Globals, ObjectUniforms, OBJECT_SIZE};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bivouac-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(OBJECT_SIZE, 128);
        assert_eq!(std::mem::size_of::<Globals>(), 304);
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
    }

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(128, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(128, 64), 128);
    }

    #[test]
    fn test_pack_slots_respects_stride() {
        let a = ObjectUniforms::depth_only(glam::Mat4::from_translation(Vec3::X));
        let b = ObjectUniforms::depth_only(glam::Mat4::from_translation(Vec3::Y));
        let mut out = vec![0xAA; 7];

        pack_slots(&mut out, &[a, b], 256);

        assert_eq!(out.len(), 512);
        assert_eq!(&out[..128], bytemuck::bytes_of(&a));
        assert_eq!(&out[256..384], bytemuck::bytes_of(&b));
        assert!(out[128..256].iter().all(|&byte| byte == 0));
        assert!(out[384..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_lit_uniforms_pad_normal_matrix() {
        let model = glam::Mat4::from_scale(Vec3::new(1.0, 2.0, 4.0));
        let transform = InstanceTransform::new(glam::Mat4::IDENTITY, model);
        let uniforms = ObjectUniforms::lit(&transform);

        assert_eq!(uniforms.model, model.to_cols_array_2d());
        assert_relative_eq!(uniforms.normal[1][1], 0.5);
        assert_relative_eq!(uniforms.normal[2][2], 0.25);
        assert_eq!(uniforms.normal[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.normal[0][3], 0.0);
    }

    #[test]
    fn test_globals_from_plan() {
        let state = FrameState::new(&ViewerConfig::default());
        let plan = state.color_plan();
        let globals = Globals::from_plan(&plan);

        assert_eq!(globals.light_dir, [1.0, 8.0, -15.0, 0.0]);
        assert_eq!(globals.point_light, [2.0, 1.2, -2.3, 1.0]);
        assert_eq!(globals.light_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(globals.view, plan.view.to_cols_array_2d());
        assert_eq!(globals.light_dir_matrix[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        let min = Vec3::new(-1.0, 0.0, -2.0);
        let max = Vec3::new(3.0, 1.0, 2.0);
        let mesh = MeshData::cuboid(min, max, [1.0; 4]);

        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.parts.len(), 1);
        assert_eq!(mesh.materials.len(), 1);

        let center = (min + max) * 0.5;
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| &mesh.vertices[i as usize]);
            let pa = Vec3::from_array(a.position);
            let pb = Vec3::from_array(b.position);
            let pc = Vec3::from_array(c.position);
            let winding = (pb - pa).cross(pc - pa);
            let normal = Vec3::from_array(a.normal);

            assert!(winding.dot(normal) > 0.0, "triangle wound inward");
            assert!((pa - center).dot(normal) > 0.0);
        }
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.cmpge(min).all() && p.cmple(max).all());
        }
    }

    #[test]
    fn test_skybox_cube() {
        let vertices = skybox_vertices();
        assert_eq!(vertices.len(), 36);
        assert!(vertices.iter().flatten().all(|c| c.abs() == 1.0));

        // every triangle lies on one face of the cube
        for tri in vertices.chunks_exact(3) {
            let shared = (0..3).any(|axis| tri.iter().all(|v| v[axis] == tri[0][axis]));
            assert!(shared);
        }
    }

    #[test]
    fn test_placeholder_skybox_is_valid() {
        let faces = placeholder_skybox();
        assert!(validate_faces(&faces).is_ok());
    }

    #[test]
    fn test_validate_faces_rejects_mismatch() {
        let square = || RgbaImage::new(4, 4);
        let mut faces = [square(), square(), square(), square(), square(), square()];
        assert!(validate_faces(&faces).is_ok());

        faces[3] = RgbaImage::new(8, 8);
        assert!(matches!(validate_faces(&faces), Err(Error::RenderError(_))));

        let wide = || RgbaImage::new(8, 4);
        let faces = [wide(), wide(), wide(), wide(), wide(), wide()];
        assert!(validate_faces(&faces).is_err());
    }

    #[test]
    fn test_missing_assets_fall_back_to_placeholders() {
        let config = AssetConfig {
            root: PathBuf::from("/nonexistent/bivouac"),
            placeholders: true,
        };
        let loader = AssetLoader::new(&config);

        let dog = loader.load_mesh(MeshId::Dog).unwrap();
        assert_eq!(dog.vertices.len(), 24);
        assert!(loader.load_skybox().is_ok());
    }

    #[test]
    fn test_missing_assets_are_errors_without_placeholders() {
        let config = AssetConfig {
            root: PathBuf::from("/nonexistent/bivouac"),
            placeholders: false,
        };
        let loader = AssetLoader::new(&config);

        assert!(matches!(
            loader.load_mesh(MeshId::Tank1),
            Err(Error::AssetNotFound(_))
        ));
        assert!(matches!(loader.load_skybox(), Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn test_load_obj_quad() {
        let dir = scratch_dir("quad");
        let path = dir.join("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             f 1/1 2/2 3/3 4/4\n",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.parts.len(), 1);
        assert_eq!(mesh.materials.len(), 1);
        assert_eq!(mesh.parts[0].indices, 0..6);
        // flipped for top-left texture origin
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal[2], 1.0, epsilon = 1e-5);
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_obj_missing_file() {
        let result = load_obj(std::path::Path::new("/nonexistent/bivouac/none.obj"));
        assert!(matches!(result, Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn test_fill_needs_no_features() {
        assert!(required_features(RenderMode::Fill).is_empty());
        assert!(required_features(RenderMode::Wireframe).contains(wgpu::Features::POLYGON_MODE_LINE));
        assert!(required_features(RenderMode::Points).contains(wgpu::Features::POLYGON_MODE_POINT));
    }
}
