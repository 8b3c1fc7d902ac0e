use image::Rgba;
use sphere_tracing_lib::{
    config::{parse_scene, RenderConfig},
    frame::{render_frame, CanvasSize, ImageSink},
    scene::{Axis, Light, Scene, SceneCommand, Sphere},
    util::{color::rgb, math::Vector3},
};

fn single_red_sphere() -> Scene {
    Scene::new(
        vec![Sphere::new(
            Vector3::new(0.0, 0.0, 4.0),
            1.0,
            rgb(255.0, 0.0, 0.0),
        )],
        vec![Light::Ambient { intensity: 1.0 }],
    )
}

#[test]
fn center_ray_hits_ambient_lit_sphere() {
    let scene = single_red_sphere();
    let direction = scene.camera.canvas_to_viewport(0, 0, 600, 600);
    assert_eq!(direction, Vector3::new(0.0, 0.0, 1.0));

    let color = scene.trace_ray(scene.camera.position, direction, 1.0, f64::INFINITY, 3);
    assert_eq!(color, rgb(255.0, 0.0, 0.0));
}

#[test]
fn image_shows_sphere_in_the_middle_and_background_at_the_corners() {
    let scene = single_red_sphere();
    let canvas = CanvasSize::new(16, 16);
    let mut sink = ImageSink::new(canvas);
    render_frame(&scene, &RenderConfig::default(), canvas, &mut sink);

    let image = sink.image();
    assert_eq!(image.get_pixel(8, 7), &Rgba([255, 0, 0, 255]));
    assert_eq!(image.get_pixel(0, 0), &Rgba([200, 200, 200, 255]));
    assert_eq!(image.get_pixel(15, 15), &Rgba([200, 200, 200, 255]));
}

#[test]
fn demo_scene_sky_is_background() {
    let scene = Scene::demo();
    let canvas = CanvasSize::new(20, 20);
    let mut sink = ImageSink::new(canvas);
    render_frame(&scene, &RenderConfig::new(3), canvas, &mut sink);

    // top row looks up, above every sphere
    assert_eq!(sink.image().get_pixel(10, 0), &Rgba([200, 200, 200, 255]));
    // bottom row sees the floor
    assert_ne!(sink.image().get_pixel(10, 19), &Rgba([200, 200, 200, 255]));
}

#[test]
fn moving_a_sphere_changes_the_next_frame() {
    let mut scene = single_red_sphere();
    let canvas = CanvasSize::new(16, 16);
    let config = RenderConfig::new(0);

    let mut before = ImageSink::new(canvas);
    render_frame(&scene, &config, canvas, &mut before);

    scene
        .apply_command(SceneCommand::MoveSphere {
            index: 0,
            axis: Axis::X,
            delta: 3.0,
        })
        .unwrap();

    let mut after = ImageSink::new(canvas);
    render_frame(&scene, &config, canvas, &mut after);

    assert_eq!(before.image().get_pixel(8, 7), &Rgba([255, 0, 0, 255]));
    assert_eq!(after.image().get_pixel(8, 7), &Rgba([200, 200, 200, 255]));
}

#[test]
fn frames_are_deterministic() {
    let scene = parse_scene(
        r#"
background_color = [0, 0, 0]

[[spheres]]
center = [0, 0, 5]
radius = 1.5
color = [40, 120, 240]
specular = 100
reflective = 0.5

[[spheres]]
center = [0, -1001, 0]
radius = 1000
color = [200, 200, 200]
reflective = 0.2

[[lights]]
type = "ambient"
intensity = 0.1

[[lights]]
type = "point"
intensity = 0.7
position = [3, 4, 0]
"#,
    )
    .unwrap();
    let canvas = CanvasSize::new(12, 12);
    let config = RenderConfig::new(5);

    let mut first = ImageSink::new(canvas);
    let mut second = ImageSink::new(canvas);
    render_frame(&scene, &config, canvas, &mut first);
    render_frame(&scene, &config, canvas, &mut second);

    assert_eq!(first.image(), second.image());
}
