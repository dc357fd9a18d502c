//! Entry point for Veles3D: logging, CLI flags, demo scene assembly.
//!
//! The demo shows the three materials side by side: a reflective cube, a
//! normal-mapped cube and a parallax-mapped cube, under a sky cubemap. An
//! OBJ mesh can be dropped in with `--mesh=PATH`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::vec3;

use asset::mesh::MeshData;
use asset::obj::load_obj_from_path;
use asset::tangent::generate_tangents;
use asset::texture::{CubemapData, TextureData};
use corelib::camera::{FlyCamera, Projection};
use corelib::scene::{Material, Scene, SceneObject};
use corelib::transform::Transform;
use platform::RunConfig;
use renderer::RendererConfig;

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    eprintln!("[warn] Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

fn parse_path_arg(prefix: &str) -> Option<PathBuf> {
    std::env::args()
        .find_map(|arg| arg.strip_prefix(prefix).map(PathBuf::from))
}

/// Load textures from `--assets=DIR`, or fall back to procedural placeholders.
/// A directory that was explicitly given but unreadable is a fatal error.
fn load_textures(assets: Option<PathBuf>) -> Result<(TextureData, TextureData, CubemapData)> {
    match assets {
        Some(dir) => {
            let diffuse = TextureData::load_png(dir.join("diffuse.png"))
                .with_context(|| format!("Loading diffuse map from {}", dir.display()))?;
            let normal_height = TextureData::load_png(dir.join("normal_height.png"))
                .with_context(|| format!("Loading normal/height map from {}", dir.display()))?;
            let sky = CubemapData::load_dir(dir.join("sky"))
                .with_context(|| format!("Loading sky cubemap from {}", dir.display()))?;
            Ok((diffuse, normal_height, sky))
        }
        None => {
            log::warn!("No --assets dir given; using procedural placeholder textures.");
            Ok((
                TextureData::checkerboard(256),
                TextureData::flat_normal_map(256),
                CubemapData::test_sky(256),
            ))
        }
    }
}

fn build_scene(aspect: f32, imported: Option<corelib::scene::MeshId>) -> Scene {
    let camera = FlyCamera::new(vec3(0.0, 1.5, 8.0));
    let projection = Projection::new(70f32.to_radians(), 0.1, 100.0, aspect);
    let mut scene = Scene::new(camera, projection);

    // One cube per demo material, side by side.
    scene.push_object(SceneObject {
        transform: Transform::from_translation(vec3(-3.0, 0.0, 0.0)),
        mesh: 0,
        material: Material::Reflective { reflectivity: 0.6 },
        spin_speed: 0.5,
    });
    scene.push_object(SceneObject {
        transform: Transform::from_translation(vec3(0.0, 0.0, 0.0)),
        mesh: 0,
        material: Material::NormalMapped,
        spin_speed: 0.5,
    });
    scene.push_object(SceneObject {
        transform: Transform::from_translation(vec3(3.0, 0.0, 0.0)),
        mesh: 0,
        material: Material::Parallax { height_scale: 0.2 },
        spin_speed: 0.5,
    });

    if let Some(mesh) = imported {
        scene.push_object(SceneObject {
            transform: Transform::from_translation(vec3(0.0, 0.0, -4.0)).with_uniform_scale(1.5),
            mesh,
            material: Material::NormalMapped,
            spin_speed: 0.0,
        });
    }
    scene
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let (width, height) = parse_size_args();
    let mesh_path = parse_path_arg("--mesh=");
    let assets_dir = parse_path_arg("--assets=");
    log::info!(
        "Starting Veles3D. Backend: {:?}, window_size={}x{}",
        backends,
        width,
        height
    );

    let (diffuse, normal_height, sky) = load_textures(assets_dir)?;

    let mut cube = MeshData::cube();
    generate_tangents(&mut cube).context("cube tangents")?;
    let mut meshes = vec![cube];

    let imported = match mesh_path {
        Some(path) => {
            let mut mesh = load_obj_from_path(&path)?;
            // Imported tangents (if any) are regenerated under our policy.
            generate_tangents(&mut mesh)
                .with_context(|| format!("Tangents for {}", path.display()))?;
            meshes.push(mesh);
            Some((meshes.len() - 1) as corelib::scene::MeshId)
        }
        None => None,
    };

    let scene = build_scene(width as f32 / height as f32, imported);

    platform::run(RunConfig {
        title: "Veles3D".to_string(),
        width,
        height,
        renderer: RendererConfig {
            backends,
            diffuse,
            normal_height,
            sky,
        },
        scene,
        meshes,
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
