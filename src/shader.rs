// SCENE SHADER (Directional Light + Sky Fog)
pub const SCENE_SHADER: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    fog_dist: vec2<f32>,
    _pad: vec2<f32>,
    camera_pos: vec4<f32>,
};
@group(0) @binding(0) var<uniform> camera: CameraUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) normal: vec3<f32>,
};

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.world_pos = model.position;
    out.clip_position = camera.view_proj * vec4<f32>(model.position, 1.0);
    out.normal = model.normal;
    out.color = model.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Sun sits high over (50, 100, -50)
    let sun_dir = normalize(vec3<f32>(0.5, 1.0, -0.5));
    let normal = normalize(in.normal);

    // Both sides of a face get light; quads are not culled.
    let diff = abs(dot(normal, sun_dir));
    let light = 0.25 + (diff * 0.75);
    let lit_color = in.color * light;

    let dist = distance(in.world_pos, camera.camera_pos.xyz);
    let fog_factor = smoothstep(camera.fog_dist.x, camera.fog_dist.y, dist);
    let fog_color = vec3<f32>(0.57, 0.77, 1.0);

    return vec4<f32>(mix(lit_color, fog_color, fog_factor), 1.0);
}
"#;
