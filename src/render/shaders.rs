/// Vertex shader for foliage needles
///
/// Endpoints are static attributes; the transition happens here from
/// `u_progress` so the CPU never re-uploads foliage positions.
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_tree_pos;
layout(location = 1) in vec3 a_scatter_pos;
layout(location = 2) in float a_random;

uniform mat4 u_group;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_progress;
uniform float u_point_scale;

out float v_random;

float ease_in_out_cubic(float x) {
    return x < 0.5 ? 4.0 * x * x * x : 1.0 - pow(-2.0 * x + 2.0, 3.0) / 2.0;
}

void main() {
    float t = ease_in_out_cubic(clamp(u_progress, 0.0, 1.0));
    vec3 pos = mix(a_tree_pos, a_scatter_pos, t);

    // Breathing while assembled
    float breathe = sin(u_time * 1.5 + pos.y * 3.0) * 0.02 * (1.0 - t);
    if (t < 0.1) {
        pos.x += pos.x * breathe;
        pos.z += pos.z * breathe;
    }

    // Drift while scattered
    pos.y += sin(u_time * 0.5 + a_random * 20.0) * 0.5 * t;

    if (t > 0.1) {
        float angle = sin(u_time * 0.2 + a_random * 10.0) * 0.1 * t;
        float c = cos(angle);
        float s = sin(angle);
        pos.xz = vec2(pos.x * c - pos.z * s, pos.x * s + pos.z * c);
    }

    v_random = a_random;

    vec4 view_pos = u_view * u_group * vec4(pos, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = 20.0 * (0.8 + a_random * 0.4) * (u_point_scale / -view_pos.z);
}
"#;

/// Fragment shader for foliage needles: emerald body, gold tips, hot core
pub const FOLIAGE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_random;

uniform vec3 u_color_green;
uniform vec3 u_color_gold;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float strength = 1.0 - dist * 2.0;
    strength = strength * strength;

    vec3 color = mix(u_color_green, u_color_gold, strength * 0.15 + v_random * 0.1);

    if (dist < 0.1) {
        color = mix(color, vec3(1.0, 0.95, 0.8), 0.5);
    }

    fragColor = vec4(color, 0.9 * strength);
}
"#;

/// Vertex shader for fairy lights
pub const LIGHTS_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_group;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_point_scale;

out float v_alpha;
out vec3 v_color;

void main() {
    v_alpha = a_alpha;
    v_color = a_color;

    vec4 view_pos = u_view * u_group * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    // World-space size with perspective attenuation
    gl_PointSize = a_size * (u_point_scale / -view_pos.z);
}
"#;

/// Fragment shader for fairy lights
pub const LIGHTS_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float falloff = 1.0 - dist * 2.0;
    float alpha = v_alpha * falloff;

    // Push over the bloom threshold
    vec3 glow = v_color * (1.0 + falloff);

    fragColor = vec4(glow, alpha);
}
"#;

/// Instanced vertex shader for baubles, gifts and the star
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_model_0;
layout(location = 3) in vec4 a_model_1;
layout(location = 4) in vec4 a_model_2;
layout(location = 5) in vec4 a_model_3;
layout(location = 6) in vec3 a_color;

uniform mat4 u_group;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;
out vec3 v_color;

void main() {
    mat4 model = u_group * mat4(a_model_0, a_model_1, a_model_2, a_model_3);
    vec4 world_pos = model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    // Uniform scale only, so the upper 3x3 is fine for normals
    v_normal = mat3(model) * a_normal;
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Metallic surface lit by ambient, key spot, fill and star lights
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec3 v_color;

uniform vec3 u_camera_pos;
uniform vec3 u_ambient;
uniform vec3 u_key_position;
uniform vec3 u_key_color;
uniform vec3 u_key_direction;
uniform float u_key_cone_cos;
uniform float u_key_penumbra_cos;
uniform vec3 u_fill_position;
uniform vec3 u_fill_color;
uniform vec3 u_star_position;
uniform vec3 u_star_color;
uniform float u_star_distance;
uniform vec3 u_env_low;
uniform vec3 u_env_high;
uniform float u_metalness;
uniform float u_roughness;
uniform float u_env_intensity;
uniform float u_unlit;
uniform float u_opacity;

out vec4 fragColor;

vec3 shade(vec3 light_dir, vec3 radiance, vec3 n, vec3 v, vec3 albedo, vec3 f0, float shininess) {
    float ndotl = max(dot(n, light_dir), 0.0);
    vec3 h = normalize(light_dir + v);
    float spec = pow(max(dot(n, h), 0.0), shininess) * (shininess + 8.0) / 25.0;
    vec3 diffuse = albedo * (1.0 - u_metalness);
    return (diffuse + f0 * spec) * radiance * ndotl;
}

void main() {
    if (u_unlit > 0.5) {
        fragColor = vec4(v_color, u_opacity);
        return;
    }

    vec3 n = normalize(v_normal);
    vec3 v = normalize(u_camera_pos - v_world_position);
    vec3 albedo = v_color;
    vec3 f0 = mix(vec3(0.04), albedo, u_metalness);
    float r = max(u_roughness, 0.05);
    float shininess = min(2.0 / (r * r * r * r) - 2.0, 2048.0);

    vec3 color = u_ambient * albedo;

    // Key spot light
    vec3 to_key = normalize(u_key_position - v_world_position);
    float spot = smoothstep(u_key_cone_cos, u_key_penumbra_cos, dot(-to_key, u_key_direction));
    color += shade(to_key, u_key_color * spot, n, v, albedo, f0, shininess);

    // Fill light
    vec3 to_fill = normalize(u_fill_position - v_world_position);
    color += shade(to_fill, u_fill_color, n, v, albedo, f0, shininess);

    // Star light with range cutoff
    vec3 star_vec = u_star_position - v_world_position;
    float d = length(star_vec);
    float range = clamp(1.0 - pow(d / u_star_distance, 4.0), 0.0, 1.0);
    float falloff = range * range / max(d * d, 0.01);
    color += shade(star_vec / max(d, 1e-4), u_star_color * falloff, n, v, albedo, f0, shininess);

    // Cheap environment reflection, dark floor to warm sky
    vec3 refl = reflect(-v, n);
    vec3 env = mix(u_env_low, u_env_high, refl.y * 0.5 + 0.5);
    float fresnel = pow(1.0 - max(dot(n, v), 0.0), 5.0);
    vec3 env_f = f0 + (vec3(1.0) - f0) * fresnel * (1.0 - r);
    color += env * env_f * u_env_intensity;

    fragColor = vec4(color, u_opacity);
}
"#;

/// Floor contact shadow quad built from `gl_VertexID`
pub const SHADOW_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_floor_y;
uniform float u_half_size;

out vec2 v_uv;

void main() {
    float x = float(gl_VertexID & 1);
    float z = float((gl_VertexID >> 1) & 1);
    v_uv = vec2(x, z);

    vec3 pos = vec3((x * 2.0 - 1.0) * u_half_size, u_floor_y, (z * 2.0 - 1.0) * u_half_size);
    gl_Position = u_projection * u_view * vec4(pos, 1.0);
}
"#;

pub const SHADOW_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform float u_opacity;
uniform float u_footprint;

out vec4 fragColor;

void main() {
    float d = length(v_uv - vec2(0.5)) * 2.0;
    float shadow = 1.0 - smoothstep(0.0, u_footprint, d);
    fragColor = vec4(0.0, 0.0, 0.0, shadow * u_opacity);
}
"#;

/// Fullscreen quad vertex shader for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    // Fullscreen triangle
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

/// Bloom extraction shader with a soft knee around the threshold
pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;
uniform float u_smoothing;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float brightness = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float weight = smoothstep(u_threshold, u_threshold + u_smoothing, brightness);
    fragColor = vec4(color * weight, 1.0);
}
"#;

/// Gaussian blur shader
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;

out vec4 fragColor;

void main() {
    vec2 tex_size = vec2(textureSize(u_texture, 0));
    vec2 texel = 1.0 / tex_size;

    // 9-tap Gaussian blur
    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];

    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * 2.0;
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

/// Bloom add, vignette, then ACES tone mapping
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_offset;
uniform float u_vignette_darkness;

out vec4 fragColor;

vec3 aces(vec3 x) {
    const float a = 2.51;
    const float b = 0.03;
    const float c = 2.43;
    const float d = 0.59;
    const float e = 0.14;
    return clamp((x * (a * x + b)) / (x * (c * x + d) + e), 0.0, 1.0);
}

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = scene + bloom * u_bloom_strength;

    float d = distance(v_uv, vec2(0.5));
    color *= smoothstep(0.8, u_vignette_offset * 0.799, d * (u_vignette_darkness + u_vignette_offset));

    fragColor = vec4(aces(color), 1.0);
}
"#;
