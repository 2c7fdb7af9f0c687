//! Built-in demo scene.
//!
//! A room bounded by huge spheres (floor, flat-colored ceiling, fuzzy metal
//! walls) holding a mirror ball, a diffuse ball, a glass ball, three
//! image-textured planets and a scatter of small random spheres.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::palette::{ColorRef, Palette};
use crate::scene::{
    CameraDescription, MaterialDescription, RenderDescription, SceneDescription,
    TextureDescription,
};

/// Radius used for the planes of the room.
const WALL_RADIUS: f64 = 1e12;

/// Number of randomly placed small spheres.
const SCATTER_COUNT: usize = 50;

/// Build the showcase scene. `seed` drives both the layout of the small
/// spheres and the render sampling seed.
pub fn showcase(seed: u64) -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraDescription {
            eye: [50.0, 8.0, 25.0],
            look_at: [50.0, 8.0, -1.0],
            up: [0.0, 1.0, 0.0],
            vfov: 90.0,
            aperture: 0.1,
            focus_distance: 10.0,
        },
        render: RenderDescription {
            width: 1280,
            height: 640,
            samples_per_pixel: 3000,
            max_depth: 50,
            seed,
            ..Default::default()
        },
        palette: Palette::default(),
        ..Default::default()
    };

    scene.add_material(
        "floor",
        MaterialDescription::Lambertian {
            albedo: TextureDescription::solid(ColorRef::named(Palette::GRAY)),
        },
    );
    scene.add_material("wall", metal(0.8));
    scene.add_material("mirror", metal(0.05));
    scene.add_material(
        "blue_matte",
        MaterialDescription::Lambertian {
            albedo: TextureDescription::solid(ColorRef::named(Palette::BLUE)),
        },
    );
    scene.add_material("glass", glass());
    scene.add_material("rough_metal", metal(1.0));
    for planet in ["earth", "mars", "moon"] {
        scene.add_material(
            planet,
            MaterialDescription::Lambertian {
                albedo: TextureDescription::image(format!("{planet}.jpeg")),
            },
        );
    }

    let gray = ColorRef::named(Palette::GRAY);
    let purple = ColorRef::named(Palette::PURPLE);
    let white = ColorRef::named(Palette::WHITE);

    // Room
    scene.add_sphere([50.0, -WALL_RADIUS, 0.0], WALL_RADIUS, gray, Some("floor"));
    scene.add_sphere(
        [50.0, WALL_RADIUS + 25.0, 0.0],
        WALL_RADIUS,
        ColorRef::named(Palette::WHITE_GRAY),
        None,
    );
    for center in [
        [-WALL_RADIUS - 0.5, 0.0, 0.0],
        [WALL_RADIUS + 100.0, 0.0, 0.0],
        [0.0, 0.0, -WALL_RADIUS - 50.0],
        [0.0, 0.0, WALL_RADIUS + 50.0],
    ] {
        scene.add_sphere(center, WALL_RADIUS, purple.clone(), Some("wall"));
    }

    // Hero spheres
    scene.add_sphere(
        [-6.5 + 50.0, 6.0, -2.0],
        6.0,
        ColorRef::named(Palette::SILVER),
        Some("mirror"),
    );
    scene.add_sphere(
        [4.5 + 50.0, 4.0, -2.0],
        4.0,
        ColorRef::named(Palette::BLUE),
        Some("blue_matte"),
    );
    scene.add_sphere([50.0, 3.0, 5.0], 3.0, white.clone(), Some("glass"));
    scene.add_sphere([50.0, 2.0, 11.0], 2.0, white.clone(), Some("earth"));
    scene.add_sphere([-6.0 + 50.0, 2.0, 7.0], 2.0, white.clone(), Some("mars"));
    scene.add_sphere([6.0 + 50.0, 2.0, 7.0], 2.0, white, Some("moon"));

    scatter_small_spheres(&mut scene, seed);

    scene
}

/// Place small spheres resting on the floor, left/right of and in
/// front of/behind the hero spheres.
fn scatter_small_spheres(scene: &mut SceneDescription, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);

    for i in 0..SCATTER_COUNT {
        let x = if rng.gen::<f64>() < 0.5 {
            rng.gen_range(0.0..43.0)
        } else {
            rng.gen_range(56.0..100.0)
        };
        let z = if rng.gen::<f64>() < 0.5 {
            rng.gen_range(-20.0..-3.0)
        } else {
            rng.gen_range(12.0..20.0)
        };
        let radius = rng.gen_range(0.2..1.0);
        let color = [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()];

        let choice: f64 = rng.gen();
        let material = if choice < 0.6 {
            let name = format!("scatter_{i}");
            scene.add_material(
                name.clone(),
                MaterialDescription::Lambertian {
                    albedo: TextureDescription::solid(ColorRef::Rgb(color)),
                },
            );
            name
        } else if choice < 0.8 {
            "rough_metal".to_string()
        } else {
            "glass".to_string()
        };

        scene.add_sphere(
            [x, radius, z],
            radius,
            ColorRef::Rgb(color),
            Some(material.as_str()),
        );
    }
}

fn metal(fuzz: f64) -> MaterialDescription {
    MaterialDescription::Metal {
        albedo: ColorRef::Rgb([1.0, 1.0, 1.0]),
        fuzz,
    }
}

fn glass() -> MaterialDescription {
    MaterialDescription::Dielectric {
        refractive_index: 1.5,
    }
}
