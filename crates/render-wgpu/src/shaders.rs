/// Camera block and the mesh vertex stage shared by every mesh pipeline.
pub const MESH_COMMON: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct MeshInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct MeshOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_mesh(vertex: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    out.clip_position = camera.projection * camera.view * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}
"#;

/// Baked lighting: the texture is the final color.
pub const BAKED_FRAGMENT: &str = r#"
@group(1) @binding(0)
var baked_texture: texture_2d<f32>;
@group(1) @binding(1)
var baked_sampler: sampler;

@fragment
fn fs_baked(in: MeshOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(baked_texture, baked_sampler, in.uv).rgb, 1.0);
}
"#;

/// Pole lamps: flat color, `POLE_LIGHT_COLOR` is prepended at build time.
pub const POLE_LIGHT_FRAGMENT: &str = r#"
@fragment
fn fs_pole_light(in: MeshOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(POLE_LIGHT_COLOR, 1.0);
}
"#;

/// Portal swirl: one Perlin sample offsets the UVs and a second sample at the
/// offset UVs gives the swirl. Both animate with time; the swirl is pushed
/// toward `color_end` near the rim.
pub const PORTAL_FRAGMENT: &str = r#"
struct Portal {
    color_start: vec3<f32>,
    time: f32,
    color_end: vec3<f32>,
    _pad: f32,
};

@group(1) @binding(0)
var<uniform> portal: Portal;

fn mod289(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x / 289.0) * 289.0;
}

fn permute(x: vec4<f32>) -> vec4<f32> {
    return mod289(((x * 34.0) + 1.0) * x);
}

fn taylor_inv_sqrt(r: vec4<f32>) -> vec4<f32> {
    return 1.79284291400159 - 0.85373472095314 * r;
}

fn fade(t: vec3<f32>) -> vec3<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

// Classic Perlin noise, range roughly [-1, 1].
fn cnoise(p: vec3<f32>) -> f32 {
    let pi0_raw = floor(p);
    let pi0 = mod289(vec4<f32>(pi0_raw, 0.0)).xyz;
    let pi1 = mod289(vec4<f32>(pi0_raw + vec3<f32>(1.0), 0.0)).xyz;
    let pf0 = fract(p);
    let pf1 = pf0 - vec3<f32>(1.0);
    let ix = vec4<f32>(pi0.x, pi1.x, pi0.x, pi1.x);
    let iy = vec4<f32>(pi0.y, pi0.y, pi1.y, pi1.y);
    let iz0 = vec4<f32>(pi0.z);
    let iz1 = vec4<f32>(pi1.z);

    let ixy = permute(permute(ix) + iy);
    let ixy0 = permute(ixy + iz0);
    let ixy1 = permute(ixy + iz1);

    var gx0 = ixy0 / 7.0;
    var gy0 = fract(floor(gx0) / 7.0) - 0.5;
    gx0 = fract(gx0);
    let gz0 = vec4<f32>(0.5) - abs(gx0) - abs(gy0);
    let sz0 = step(gz0, vec4<f32>(0.0));
    gx0 = gx0 - sz0 * (step(vec4<f32>(0.0), gx0) - 0.5);
    gy0 = gy0 - sz0 * (step(vec4<f32>(0.0), gy0) - 0.5);

    var gx1 = ixy1 / 7.0;
    var gy1 = fract(floor(gx1) / 7.0) - 0.5;
    gx1 = fract(gx1);
    let gz1 = vec4<f32>(0.5) - abs(gx1) - abs(gy1);
    let sz1 = step(gz1, vec4<f32>(0.0));
    gx1 = gx1 - sz1 * (step(vec4<f32>(0.0), gx1) - 0.5);
    gy1 = gy1 - sz1 * (step(vec4<f32>(0.0), gy1) - 0.5);

    var g000 = vec3<f32>(gx0.x, gy0.x, gz0.x);
    var g100 = vec3<f32>(gx0.y, gy0.y, gz0.y);
    var g010 = vec3<f32>(gx0.z, gy0.z, gz0.z);
    var g110 = vec3<f32>(gx0.w, gy0.w, gz0.w);
    var g001 = vec3<f32>(gx1.x, gy1.x, gz1.x);
    var g101 = vec3<f32>(gx1.y, gy1.y, gz1.y);
    var g011 = vec3<f32>(gx1.z, gy1.z, gz1.z);
    var g111 = vec3<f32>(gx1.w, gy1.w, gz1.w);

    let norm0 = taylor_inv_sqrt(vec4<f32>(dot(g000, g000), dot(g010, g010), dot(g100, g100), dot(g110, g110)));
    g000 = g000 * norm0.x;
    g010 = g010 * norm0.y;
    g100 = g100 * norm0.z;
    g110 = g110 * norm0.w;
    let norm1 = taylor_inv_sqrt(vec4<f32>(dot(g001, g001), dot(g011, g011), dot(g101, g101), dot(g111, g111)));
    g001 = g001 * norm1.x;
    g011 = g011 * norm1.y;
    g101 = g101 * norm1.z;
    g111 = g111 * norm1.w;

    let n000 = dot(g000, pf0);
    let n100 = dot(g100, vec3<f32>(pf1.x, pf0.y, pf0.z));
    let n010 = dot(g010, vec3<f32>(pf0.x, pf1.y, pf0.z));
    let n110 = dot(g110, vec3<f32>(pf1.x, pf1.y, pf0.z));
    let n001 = dot(g001, vec3<f32>(pf0.x, pf0.y, pf1.z));
    let n101 = dot(g101, vec3<f32>(pf1.x, pf0.y, pf1.z));
    let n011 = dot(g011, vec3<f32>(pf0.x, pf1.y, pf1.z));
    let n111 = dot(g111, pf1);

    let fade_xyz = fade(pf0);
    let n_z = mix(vec4<f32>(n000, n100, n010, n110), vec4<f32>(n001, n101, n011, n111), vec4<f32>(fade_xyz.z));
    let n_yz = mix(n_z.xy, n_z.zw, vec2<f32>(fade_xyz.y));
    let n_xyz = mix(n_yz.x, n_yz.y, fade_xyz.x);
    return 2.2 * n_xyz;
}

@fragment
fn fs_portal(in: MeshOutput) -> @location(0) vec4<f32> {
    let displaced_uv = in.uv + vec2<f32>(cnoise(vec3<f32>(in.uv * 5.0, portal.time * 0.1)));
    var strength = cnoise(vec3<f32>(displaced_uv * 5.0, portal.time * 0.2));

    let outer_glow = distance(in.uv, vec2<f32>(0.5)) * 5.0 - 1.4;
    strength = strength + outer_glow;
    strength = strength + step(-0.2, strength) * 0.8;
    strength = clamp(strength, 0.0, 1.0);

    return vec4<f32>(mix(portal.color_start, portal.color_end, vec3<f32>(strength)), 1.0);
}
"#;

/// Fireflies as camera-facing quads sized in drawing-buffer pixels.
pub const FIREFLIES_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct Fireflies {
    time: f32,
    pixel_ratio: f32,
    size: f32,
    _pad: f32,
    resolution: vec2<f32>,
    _pad2: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;
@group(1) @binding(0)
var<uniform> fireflies: Fireflies;

struct FireflyInput {
    @location(0) position: vec3<f32>,
    @location(1) scale: f32,
};

struct FireflyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) point_coord: vec2<f32>,
};

@vertex
fn vs_fireflies(@builtin(vertex_index) vertex_index: u32, instance: FireflyInput) -> FireflyOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[vertex_index];

    var model_position = vec4<f32>(instance.position, 1.0);
    model_position.y = model_position.y + sin(fireflies.time + model_position.x * 100.0) * instance.scale * 0.2;
    let view_position = camera.view * model_position;
    let clip = camera.projection * view_position;

    // Size attenuation: shrink with view depth.
    let point_size = fireflies.size * instance.scale * fireflies.pixel_ratio / -view_position.z;
    let offset = corner * point_size * 2.0 / fireflies.resolution;

    var out: FireflyOutput;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.zw);
    out.point_coord = corner + vec2<f32>(0.5);
    return out;
}

@fragment
fn fs_fireflies(in: FireflyOutput) -> @location(0) vec4<f32> {
    let distance_to_center = distance(in.point_coord, vec2<f32>(0.5));
    let strength = 0.05 / distance_to_center - 0.1;
    return vec4<f32>(1.0, 1.0, 1.0, clamp(strength, 0.0, 1.0));
}
"#;

/// Fullscreen triangle copying the offscreen target to the surface.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var source: texture_2d<f32>;
@group(0) @binding(1)
var source_sampler: sampler;

struct BlitOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@builtin(vertex_index) vertex_index: u32) -> BlitOutput {
    let uv = vec2<f32>(f32((vertex_index << 1u) & 2u), f32(vertex_index & 2u));
    var out: BlitOutput;
    out.clip_position = vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_blit(in: BlitOutput) -> @location(0) vec4<f32> {
    return textureSample(source, source_sampler, in.uv);
}

// For sRGB surfaces: decode so the hardware encode restores the stored value.
@fragment
fn fs_blit_srgb(in: BlitOutput) -> @location(0) vec4<f32> {
    let c = textureSample(source, source_sampler, in.uv);
    let low = c.rgb / 12.92;
    let high = pow((c.rgb + 0.055) / 1.055, vec3<f32>(2.4));
    return vec4<f32>(select(high, low, c.rgb <= vec3<f32>(0.04045)), c.a);
}
"#;

/// Full WGSL source for a mesh pipeline: shared vertex stage plus `fragment`.
pub fn mesh_shader(fragment: &str) -> String {
    format!("{MESH_COMMON}\n{fragment}")
}

/// Pole light source with the lamp color baked in as a constant.
pub fn pole_light_shader(color: [f32; 3]) -> String {
    let [r, g, b] = color;
    format!(
        "const POLE_LIGHT_COLOR = vec3<f32>({r:?}, {g:?}, {b:?});\n{}",
        mesh_shader(POLE_LIGHT_FRAGMENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_shaders_share_the_vertex_stage() {
        for src in [
            mesh_shader(BAKED_FRAGMENT),
            mesh_shader(PORTAL_FRAGMENT),
            pole_light_shader([1.0, 1.0, 0.9]),
        ] {
            assert!(src.contains("fn vs_mesh"));
            assert!(src.contains("var<uniform> camera"));
        }
    }

    #[test]
    fn pole_light_constant_is_float_literal() {
        let src = pole_light_shader([1.0, 1.0, 0.5]);
        assert!(src.starts_with("const POLE_LIGHT_COLOR = vec3<f32>(1.0, 1.0, 0.5);"));
    }

    #[test]
    fn entry_points_exist() {
        assert!(PORTAL_FRAGMENT.contains("fn fs_portal"));
        assert!(FIREFLIES_SHADER.contains("fn vs_fireflies"));
        assert!(FIREFLIES_SHADER.contains("fn fs_fireflies"));
        assert!(BLIT_SHADER.contains("fn fs_blit_srgb"));
    }

    #[test]
    fn portal_swirl_reads_noise_at_warped_uvs() {
        let body = &PORTAL_FRAGMENT[PORTAL_FRAGMENT.find("fn fs_portal").unwrap()..];
        assert_eq!(body.matches("cnoise(").count(), 2);
        assert!(body.contains("cnoise(vec3<f32>(displaced_uv * 5.0"));
    }
}
