use std::fs;

use config::constants::EPSILON;
use glam::DVec3;
use los_mesh::{
    load_mesh, ray_triangle_intersection, Mesh, MeshError, OccluderQuery, OccluderScene,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("los-mesh-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const WALL_OBJ: &str = "o Wall
v -2 -2 -5
v 2 -2 -5
v 2 2 -5
v -2 2 -5
f 1 2 3 4
";

#[test]
fn loads_obj_from_disk_and_blocks_ray() {
    let path = temp_file("wall.obj", WALL_OBJ.as_bytes());
    let wall = load_mesh(&path).unwrap();
    assert_eq!(wall.triangle_count(), 2);

    let mut scene = OccluderScene::new();
    let id = scene.add_object("Wall", wall).unwrap();

    let hit = scene
        .cast_ray(DVec3::new(0.3, -0.7, 0.0), DVec3::NEG_Z, 9.99)
        .unwrap();
    assert_eq!(hit.object, id);
    assert!((hit.distance - 5.0).abs() < 1e-9);

    // Beside the wall
    assert!(scene
        .cast_ray(DVec3::new(3.0, 0.0, 0.0), DVec3::NEG_Z, 9.99)
        .is_none());
}

#[test]
fn uppercase_extension_is_accepted() {
    let path = temp_file("WALL.OBJ", WALL_OBJ.as_bytes());
    assert!(load_mesh(&path).is_ok());
}

#[test]
fn malformed_file_reports_line() {
    let path = temp_file("broken.obj", b"v 0 0 0\nv 1 0 0\nf 1 2 9\n");
    match load_mesh(&path).unwrap_err() {
        MeshError::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn dense_environment_agrees_with_brute_force() {
    // A 10x10 grid of small tiles at z = -4, with every other tile removed
    let mut source = String::new();
    let mut faces = 0;
    for i in 0..10 {
        for j in 0..10 {
            if (i + j) % 2 == 1 {
                continue;
            }
            let (x, y) = (i as f64 - 5.0, j as f64 - 5.0);
            source.push_str(&format!("v {} {} -4\n", x, y));
            source.push_str(&format!("v {} {} -4\n", x + 1.0, y));
            source.push_str(&format!("v {} {} -4\n", x + 1.0, y + 1.0));
            source.push_str(&format!("v {} {} -4\n", x, y + 1.0));
            let base = faces * 4 + 1;
            source.push_str(&format!("f {} {} {} {}\n", base, base + 1, base + 2, base + 3));
            faces += 1;
        }
    }
    let path = temp_file("tiles.obj", source.as_bytes());
    let mut scene = OccluderScene::new();
    scene.add_object("tiles", load_mesh(&path).unwrap()).unwrap();

    for i in 0..10 {
        for j in 0..10 {
            let origin = DVec3::new(i as f64 - 4.5, j as f64 - 4.5, 0.0);
            let hit = scene.cast_ray(origin, DVec3::NEG_Z, 10.0);
            assert_eq!(hit.is_some(), (i + j) % 2 == 0, "tile ({i}, {j})");
        }
    }
}

fn random_soup(rng: &mut StdRng, count: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for _ in 0..count {
        let center = DVec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let mut corner = || {
            center
                + DVec3::new(
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                )
        };
        let (a, b, c) = (corner(), corner(), corner());
        let base = mesh.add_vertex(a);
        mesh.add_vertex(b);
        mesh.add_vertex(c);
        mesh.add_triangle(base, base + 1, base + 2);
    }
    mesh
}

fn random_direction(rng: &mut StdRng) -> DVec3 {
    loop {
        let v = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let length = v.length();
        if length > 0.1 && length <= 1.0 {
            return v / length;
        }
    }
}

/// Nearest hit distance in `(EPSILON, max_distance]` by testing every face.
fn brute_force(mesh: &Mesh, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<f64> {
    mesh.faces()
        .filter_map(|face| {
            let [v0, v1, v2] = face.vertices;
            ray_triangle_intersection(origin, direction, v0, v1, v2)
        })
        .filter(|&t| t > EPSILON && t <= max_distance)
        .min_by(f64::total_cmp)
}

#[test]
fn oblique_rays_agree_with_brute_force_over_triangle_soup() {
    let mut rng = StdRng::seed_from_u64(2024);
    let near = random_soup(&mut rng, 200);
    let far = random_soup(&mut rng, 200);

    let mut scene = OccluderScene::new();
    let near_id = scene.add_object("near", near.clone()).unwrap();
    let far_id = scene.add_object("far", far.clone()).unwrap();

    let mut hits = 0;
    for i in 0..5000 {
        let origin = DVec3::new(
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
        );
        let direction = random_direction(&mut rng);
        let max_distance = rng.gen_range(0.5..40.0);

        let expected = [
            brute_force(&near, origin, direction, max_distance).map(|t| (t, near_id)),
            brute_force(&far, origin, direction, max_distance).map(|t| (t, far_id)),
        ]
        .into_iter()
        .flatten()
        .min_by(|a, b| a.0.total_cmp(&b.0));

        let actual = scene.cast_ray(origin, direction, max_distance);
        match (actual, expected) {
            (None, None) => {}
            (Some(hit), Some((t, object))) => {
                hits += 1;
                assert!((hit.distance - t).abs() < 1e-9, "ray {i}: {} vs {t}", hit.distance);
                assert_eq!(hit.object, object, "ray {i}");
            }
            (actual, expected) => panic!("ray {i}: grid {actual:?}, brute force {expected:?}"),
        }

        // Excluding one object leaves exactly the other one's nearest hit
        let without_far = scene
            .cast_ray_excluding(origin, direction, max_distance, far_id)
            .map(|hit| hit.distance);
        let near_only = brute_force(&near, origin, direction, max_distance);
        assert_eq!(without_far.is_some(), near_only.is_some(), "ray {i}");
        if let (Some(a), Some(b)) = (without_far, near_only) {
            assert!((a - b).abs() < 1e-9, "ray {i}");
        }
    }

    // The soup is dense enough that the comparison is not vacuous
    assert!(hits > 100, "only {hits} hits");
}
