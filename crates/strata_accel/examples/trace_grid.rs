//! Trace a grid of camera rays against a small scene and print it as ASCII.
//!
//! Usage: `cargo run --example trace_grid [config.json]`

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use strata_accel::{create_accel, AccelConfig};
use strata_core::{Mesh, Primitive, Scene};
use strata_math::{consts::PI, rotate, translate, Float, Interval, Mat4, Ray, Vec3};

const WIDTH: usize = 72;
const HEIGHT: usize = 32;
const SHADES: &[u8] = b".:-=+*#%@";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {path}"))?;
            AccelConfig::from_json(&json)?
        }
        None => AccelConfig::default(),
    };

    let scene = build_scene()?;
    let start = Instant::now();
    let mut accel = create_accel(&config);
    let stats = accel.build(&scene)?;
    log::info!(
        "Built {:?} over {} triangles in {:?}",
        accel.kind(),
        stats.triangles,
        start.elapsed()
    );

    let eye = Vec3::new(0.0, 1.5, 6.0);
    let light = Vec3::new(-1.0, 2.0, 1.5).normalize();

    let start = Instant::now();
    let rows: Vec<String> = (0..HEIGHT)
        .into_par_iter()
        .map(|y| {
            (0..WIDTH)
                .map(|x| {
                    // Character cells are about twice as tall as wide
                    let u = (x as Float + 0.5) / WIDTH as Float * 2.0 - 1.0;
                    let v = 1.0 - (y as Float + 0.5) / HEIGHT as Float * 2.0;
                    let dir = Vec3::new(u * 1.2, v * 0.55 - 0.15, -1.0);
                    let ray = Ray::new(eye, dir);

                    match accel.intersect(&scene, &ray, Interval::from_min(1e-4)) {
                        Some(its) => {
                            let n = its.shading_normal;
                            let n = if n.dot(dir) > 0.0 { -n } else { n };
                            let lambert = n.dot(light).max(0.0);
                            let index = (lambert * (SHADES.len() - 1) as Float).round() as usize;
                            SHADES[index.min(SHADES.len() - 1)] as char
                        }
                        None => ' ',
                    }
                })
                .collect()
        })
        .collect();
    log::info!("Traced {} rays in {:?}", WIDTH * HEIGHT, start.elapsed());

    for row in rows {
        println!("{row}");
    }
    Ok(())
}

fn build_scene() -> anyhow::Result<Scene> {
    let mut scene = Scene::new("trace_grid");

    // Ground quad
    let ground = Mesh::from_flat(
        &[
            -4.0, 0.0, -4.0, 4.0, 0.0, -4.0, 4.0, 0.0, 4.0, -4.0, 0.0, 4.0,
        ],
        &[0, 2, 1, 0, 3, 2],
    )?;
    scene.add_primitive(Primitive::new(Arc::new(ground), Mat4::IDENTITY).with_name("ground"));

    let sphere = Arc::new(uv_sphere(24, 12));
    for (i, x) in [-1.6, 1.6].into_iter().enumerate() {
        let transform = translate(Vec3::new(x, 1.0, 0.0)) * rotate(PI / 4.0, Vec3::Y);
        scene.add_primitive(Primitive::new(sphere.clone(), transform).with_name(format!("sphere{i}")));
    }

    // Placeholder with nothing loaded yet
    scene.add_primitive(Primitive::without_mesh(Mat4::IDENTITY).with_name("pending"));
    Ok(scene)
}

/// Unit sphere with smooth normals.
fn uv_sphere(segments: u32, rings: u32) -> Mesh {
    let mut positions = Vec::new();
    for r in 0..=rings {
        let theta = PI * r as Float / rings as Float;
        for s in 0..=segments {
            let phi = 2.0 * PI * s as Float / segments as Float;
            positions.push(Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()));
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::new();
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend([a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    let normals = positions.clone();
    Mesh::new(positions, indices, Some(normals))
}
