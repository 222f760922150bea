/// WGSL shader for lit scene meshes.
///
/// Lights with `position.w == 0` are directional (xyz points toward the
/// light); otherwise xyz is a world position. `color.a` carries a point
/// light's range, 0 meaning unlimited.
pub const MESH_SHADER: &str = r#"
struct Light {
    position: vec4<f32>,
    color: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<Light, 8>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var lighting = uniforms.ambient.rgb;

    for (var i = 0u; i < uniforms.light_count.x; i = i + 1u) {
        let light = uniforms.lights[i];
        if (light.position.w == 0.0) {
            let dir = normalize(light.position.xyz);
            lighting += light.color.rgb * max(dot(n, dir), 0.0);
        } else {
            let to_light = light.position.xyz - in.world_position;
            let dist = max(length(to_light), 0.0001);
            var falloff = 1.0;
            if (light.color.a > 0.0) {
                let t = clamp(1.0 - dist / light.color.a, 0.0, 1.0);
                falloff = t * t;
            }
            lighting += light.color.rgb * max(dot(n, to_light / dist), 0.0) * falloff;
        }
    }

    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;

/// WGSL shader for the reference grid. Only reads the view-projection
/// matrix at the head of the shared uniform block.
pub const GRID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(vertex: GridVertex) -> GridOutput {
    var out: GridOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_grid(in: GridOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
