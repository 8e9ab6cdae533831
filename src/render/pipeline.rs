use log::{debug, info};
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};
use crate::config::Theme;
use crate::distribution::TREE_BASE_Y;
use crate::error::Result;
use crate::math::Vec3;
use crate::mesh::{self, Mesh, SPHERE_SEGMENTS, VERTEX_STRIDE};
use crate::particles::{pack_instances, InstanceData, FAIRY_LIGHT_STRIDE, FOLIAGE_ATTRIBUTE_STRIDE, INSTANCE_STRIDE};
use crate::scene::{FrameSnapshot, SceneRenderer, TREE_GROUP_OFFSET};
use crate::scene::topper::STAR_RADIUS;
use super::shaders::*;
use super::webgl::{AttribLayout, WebGLContext};

type Gl = WebGl2RenderingContext;

/// Raw point-size multiplier for foliage
const FOLIAGE_POINT_SCALE: f32 = 1.0;
/// Half extent of the floor shadow quad
const SHADOW_HALF_SIZE: f32 = 10.0;
/// Fraction of the quad the shadow fades over
const SHADOW_FOOTPRINT: f32 = 0.4;
const BLOOM_SMOOTHING: f32 = 0.9;

const VERTEX_ATTRIBS: [AttribLayout; 2] = [AttribLayout::new(0, 3, 0), AttribLayout::new(1, 3, 3)];

const INSTANCE_ATTRIBS: [AttribLayout; 5] = [
    AttribLayout::new(2, 4, 0),
    AttribLayout::new(3, 4, 4),
    AttribLayout::new(4, 4, 8),
    AttribLayout::new(5, 4, 12),
    AttribLayout::new(6, 3, 16),
];

const FOLIAGE_ATTRIBS: [AttribLayout; 3] = [
    AttribLayout::new(0, 3, 0),
    AttribLayout::new(1, 3, 3),
    AttribLayout::new(2, 1, 6),
];

const LIGHT_ATTRIBS: [AttribLayout; 4] = [
    AttribLayout::new(0, 3, 0),
    AttribLayout::new(1, 1, 3),
    AttribLayout::new(2, 1, 4),
    AttribLayout::new(3, 3, 5),
];

/// Framebuffer blend state for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blend {
    /// Depth-written, no blending
    Opaque,
    Alpha,
    Additive,
}

/// Scene pass layers in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Ornaments,
    Shadow,
    Halo,
    Foliage,
    FairyLights,
}

impl Layer {
    const ORDER: [Layer; 5] = [Layer::Ornaments, Layer::Shadow, Layer::Halo, Layer::Foliage, Layer::FairyLights];

    fn blend(self) -> Blend {
        match self {
            Layer::Ornaments => Blend::Opaque,
            Layer::Shadow | Layer::Halo => Blend::Alpha,
            Layer::Foliage | Layer::FairyLights => Blend::Additive,
        }
    }
}

/// Surface response for an instanced draw
#[derive(Debug, Clone, Copy)]
struct Material {
    metalness: f32,
    roughness: f32,
    env_intensity: f32,
    unlit: bool,
    opacity: f32,
}

impl Material {
    const BAUBLE: Material = Material { metalness: 0.9, roughness: 0.1, env_intensity: 1.5, unlit: false, opacity: 1.0 };
    const GIFT: Material = Material { metalness: 0.4, roughness: 0.3, env_intensity: 1.0, unlit: false, opacity: 1.0 };
    const STAR: Material = Material { metalness: 0.0, roughness: 1.0, env_intensity: 0.0, unlit: true, opacity: 1.0 };

    /// Unlit translucent shell
    const fn halo(opacity: f32) -> Material {
        Material { metalness: 0.0, roughness: 1.0, env_intensity: 0.0, unlit: true, opacity }
    }
}

/// Indexed mesh plus its per-instance buffer
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    instance_buffer: WebGlBuffer,
    index_count: i32,
}

impl GpuMesh {
    fn new(ctx: &WebGLContext, mesh: &Mesh) -> Result<Self> {
        let gl = &ctx.gl;

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), Gl::STATIC_DRAW)?;
        ctx.set_attributes(&vertex_buffer, VERTEX_STRIDE as i32, &VERTEX_ATTRIBS, 0);

        let index_buffer = ctx.create_index_buffer(mesh.index_data(), Gl::STATIC_DRAW)?;

        let instance_buffer = ctx.create_buffer_f32(&[], Gl::DYNAMIC_DRAW)?;
        ctx.set_attributes(&instance_buffer, INSTANCE_STRIDE as i32, &INSTANCE_ATTRIBS, 1);

        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            index_count: mesh.index_data().len() as i32,
        })
    }

    fn draw(&self, ctx: &WebGLContext, instances: &[InstanceData]) {
        if instances.is_empty() {
            return;
        }

        ctx.upload_f32(&self.instance_buffer, &pack_instances(instances), Gl::DYNAMIC_DRAW);

        let gl = &ctx.gl;
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_instanced_with_i32(
            Gl::TRIANGLES,
            self.index_count,
            Gl::UNSIGNED_INT,
            0,
            instances.len() as i32,
        );
        gl.bind_vertex_array(None);
    }

    fn delete(&self, gl: &Gl) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vertex_buffer));
        gl.delete_buffer(Some(&self.index_buffer));
        gl.delete_buffer(Some(&self.instance_buffer));
    }
}

/// Vertex array for a point cloud
struct PointBuffer {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    count: i32,
}

impl PointBuffer {
    fn new(ctx: &WebGLContext, data: &[f32], stride: usize, attribs: &[AttribLayout], usage: u32) -> Result<Self> {
        let vao = ctx.create_vao()?;
        ctx.gl.bind_vertex_array(Some(&vao));
        let buffer = ctx.create_buffer_f32(data, usage)?;
        ctx.set_attributes(&buffer, stride as i32, attribs, 0);
        ctx.gl.bind_vertex_array(None);

        Ok(Self { vao, buffer, count: (data.len() / stride) as i32 })
    }

    fn delete(&self, gl: &Gl) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.buffer));
    }
}

/// Cached uniform locations for the foliage shader
struct FoliageUniforms {
    group: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    point_scale: Option<WebGlUniformLocation>,
    color_green: Option<WebGlUniformLocation>,
    color_gold: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the fairy light shader
struct LightUniforms {
    group: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    point_scale: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the instanced ornament shader
struct OrnamentUniforms {
    group: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    key_position: Option<WebGlUniformLocation>,
    key_color: Option<WebGlUniformLocation>,
    key_direction: Option<WebGlUniformLocation>,
    key_cone_cos: Option<WebGlUniformLocation>,
    key_penumbra_cos: Option<WebGlUniformLocation>,
    fill_position: Option<WebGlUniformLocation>,
    fill_color: Option<WebGlUniformLocation>,
    star_position: Option<WebGlUniformLocation>,
    star_color: Option<WebGlUniformLocation>,
    star_distance: Option<WebGlUniformLocation>,
    env_low: Option<WebGlUniformLocation>,
    env_high: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    env_intensity: Option<WebGlUniformLocation>,
    unlit: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

struct ShadowUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    floor_y: Option<WebGlUniformLocation>,
    half_size: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    footprint: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for post-processing
struct PostUniforms {
    extract_texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    smoothing: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_offset: Option<WebGlUniformLocation>,
    vignette_darkness: Option<WebGlUniformLocation>,
}

/// Offscreen targets, rebuilt on resize
struct RenderTargets {
    scene_texture: WebGlTexture,
    scene_depth: WebGlRenderbuffer,
    scene_fbo: WebGlFramebuffer,
    bloom_textures: [WebGlTexture; 2],
    bloom_fbos: [WebGlFramebuffer; 2],
}

impl RenderTargets {
    fn new(ctx: &WebGLContext, width: i32, height: i32) -> Result<Self> {
        let scene_texture = ctx.create_texture(width, height, Gl::RGBA)?;
        let scene_depth = ctx.create_depth_buffer(width, height)?;
        let scene_fbo = ctx.create_framebuffer(&scene_texture, Some(&scene_depth))?;

        // Bloom at half resolution
        let bw = (width / 2).max(1);
        let bh = (height / 2).max(1);
        let tex_a = ctx.create_texture(bw, bh, Gl::RGBA)?;
        let tex_b = ctx.create_texture(bw, bh, Gl::RGBA)?;
        let fbo_a = ctx.create_framebuffer(&tex_a, None)?;
        let fbo_b = ctx.create_framebuffer(&tex_b, None)?;

        Ok(Self {
            scene_texture,
            scene_depth,
            scene_fbo,
            bloom_textures: [tex_a, tex_b],
            bloom_fbos: [fbo_a, fbo_b],
        })
    }

    fn delete(&self, gl: &Gl) {
        gl.delete_framebuffer(Some(&self.scene_fbo));
        gl.delete_renderbuffer(Some(&self.scene_depth));
        gl.delete_texture(Some(&self.scene_texture));
        for (tex, fbo) in self.bloom_textures.iter().zip(self.bloom_fbos.iter()) {
            gl.delete_framebuffer(Some(fbo));
            gl.delete_texture(Some(tex));
        }
    }
}

/// Complete render pipeline for the tree
pub struct RenderPipeline {
    ctx: WebGLContext,

    // Shaders
    foliage_program: WebGlProgram,
    lights_program: WebGlProgram,
    ornament_program: WebGlProgram,
    shadow_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    // Uniform locations
    foliage_uniforms: FoliageUniforms,
    light_uniforms: LightUniforms,
    ornament_uniforms: OrnamentUniforms,
    shadow_uniforms: ShadowUniforms,
    post_uniforms: PostUniforms,

    // Geometry
    bauble_mesh: GpuMesh,
    gift_mesh: GpuMesh,
    star_mesh: GpuMesh,
    halo_mesh: GpuMesh,
    foliage: Option<PointBuffer>,
    fairy_lights: Option<PointBuffer>,
    /// Empty VAO for attribute-less draws
    empty_vao: WebGlVertexArrayObject,

    targets: RenderTargets,

    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self> {
        let ctx = WebGLContext::new(gl);
        let width = width.max(1);
        let height = height.max(1);

        // Compile shaders
        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, FOLIAGE_FRAGMENT_SHADER)?;
        let lights_program = ctx.create_program(LIGHTS_VERTEX_SHADER, LIGHTS_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        let shadow_program = ctx.create_program(SHADOW_VERTEX_SHADER, SHADOW_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        // Get uniform locations
        let loc = |program: &WebGlProgram, name: &str| ctx.get_uniform_location(program, name);

        let foliage_uniforms = FoliageUniforms {
            group: loc(&foliage_program, "u_group"),
            view: loc(&foliage_program, "u_view"),
            projection: loc(&foliage_program, "u_projection"),
            time: loc(&foliage_program, "u_time"),
            progress: loc(&foliage_program, "u_progress"),
            point_scale: loc(&foliage_program, "u_point_scale"),
            color_green: loc(&foliage_program, "u_color_green"),
            color_gold: loc(&foliage_program, "u_color_gold"),
        };

        let light_uniforms = LightUniforms {
            group: loc(&lights_program, "u_group"),
            view: loc(&lights_program, "u_view"),
            projection: loc(&lights_program, "u_projection"),
            point_scale: loc(&lights_program, "u_point_scale"),
        };

        let p = &ornament_program;
        let ornament_uniforms = OrnamentUniforms {
            group: loc(p, "u_group"),
            view: loc(p, "u_view"),
            projection: loc(p, "u_projection"),
            camera_pos: loc(p, "u_camera_pos"),
            ambient: loc(p, "u_ambient"),
            key_position: loc(p, "u_key_position"),
            key_color: loc(p, "u_key_color"),
            key_direction: loc(p, "u_key_direction"),
            key_cone_cos: loc(p, "u_key_cone_cos"),
            key_penumbra_cos: loc(p, "u_key_penumbra_cos"),
            fill_position: loc(p, "u_fill_position"),
            fill_color: loc(p, "u_fill_color"),
            star_position: loc(p, "u_star_position"),
            star_color: loc(p, "u_star_color"),
            star_distance: loc(p, "u_star_distance"),
            env_low: loc(p, "u_env_low"),
            env_high: loc(p, "u_env_high"),
            metalness: loc(p, "u_metalness"),
            roughness: loc(p, "u_roughness"),
            env_intensity: loc(p, "u_env_intensity"),
            unlit: loc(p, "u_unlit"),
            opacity: loc(p, "u_opacity"),
        };

        let shadow_uniforms = ShadowUniforms {
            view: loc(&shadow_program, "u_view"),
            projection: loc(&shadow_program, "u_projection"),
            floor_y: loc(&shadow_program, "u_floor_y"),
            half_size: loc(&shadow_program, "u_half_size"),
            opacity: loc(&shadow_program, "u_opacity"),
            footprint: loc(&shadow_program, "u_footprint"),
        };

        let post_uniforms = PostUniforms {
            extract_texture: loc(&bloom_extract_program, "u_texture"),
            threshold: loc(&bloom_extract_program, "u_threshold"),
            smoothing: loc(&bloom_extract_program, "u_smoothing"),
            blur_texture: loc(&blur_program, "u_texture"),
            direction: loc(&blur_program, "u_direction"),
            scene: loc(&composite_program, "u_scene"),
            bloom: loc(&composite_program, "u_bloom"),
            bloom_strength: loc(&composite_program, "u_bloom_strength"),
            vignette_offset: loc(&composite_program, "u_vignette_offset"),
            vignette_darkness: loc(&composite_program, "u_vignette_darkness"),
        };

        let bauble_mesh = GpuMesh::new(&ctx, &mesh::sphere(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS))?;
        let gift_mesh = GpuMesh::new(&ctx, &mesh::cube(1.0))?;
        let star_mesh = GpuMesh::new(&ctx, &mesh::octahedron(STAR_RADIUS))?;
        let halo_mesh = GpuMesh::new(&ctx, &mesh::sphere(STAR_RADIUS, 16, 16))?;
        let empty_vao = ctx.create_vao()?;

        let targets = RenderTargets::new(&ctx, width, height)?;

        info!("Render pipeline ready at {}x{}", width, height);

        Ok(Self {
            ctx,
            foliage_program,
            lights_program,
            ornament_program,
            shadow_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            foliage_uniforms,
            light_uniforms,
            ornament_uniforms,
            shadow_uniforms,
            post_uniforms,
            bauble_mesh,
            gift_mesh,
            star_mesh,
            halo_mesh,
            foliage: None,
            fairy_lights: None,
            empty_vao,
            targets,
            width,
            height,
        })
    }

    /// Upload static foliage attributes
    /// Format: tree position(3) + scatter position(3) + random(1) = 7 floats per point
    pub fn upload_foliage(&mut self, attributes: &[f32]) -> Result<()> {
        if let Some(old) = self.foliage.take() {
            old.delete(&self.ctx.gl);
        }

        let buffer = PointBuffer::new(
            &self.ctx,
            attributes,
            FOLIAGE_ATTRIBUTE_STRIDE,
            &FOLIAGE_ATTRIBS,
            Gl::STATIC_DRAW,
        )?;
        debug!("Uploaded {} foliage points", buffer.count);
        self.foliage = Some(buffer);

        Ok(())
    }

    /// Update fairy light buffer data
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per particle
    pub fn update_fairy_lights(&mut self, data: &[f32]) -> Result<()> {
        match self.fairy_lights {
            Some(ref mut lights) => {
                self.ctx.upload_f32(&lights.buffer, data, Gl::DYNAMIC_DRAW);
                lights.count = (data.len() / FAIRY_LIGHT_STRIDE) as i32;
            }
            None => {
                self.fairy_lights = Some(PointBuffer::new(
                    &self.ctx,
                    data,
                    FAIRY_LIGHT_STRIDE,
                    &LIGHT_ATTRIBS,
                    Gl::DYNAMIC_DRAW,
                )?);
            }
        }
        Ok(())
    }

    /// Render a frame
    pub fn render(&mut self, frame: &FrameSnapshot) -> Result<()> {
        self.update_fairy_lights(&frame.fairy_lights)?;

        let gl = &self.ctx.gl;

        // === Pass 1: Render scene to framebuffer ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&self.targets.scene_fbo));
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.enable_depth_test();
        self.ctx.clear(frame.post.background);

        for layer in Layer::ORDER {
            self.set_blend(layer.blend());
            match layer {
                Layer::Ornaments => self.draw_ornaments(frame),
                Layer::Shadow => self.draw_shadow(frame),
                Layer::Halo => self.draw_instances(
                    frame,
                    &self.halo_mesh,
                    std::slice::from_ref(&frame.star_halo),
                    Material::halo(frame.star_halo_opacity),
                ),
                Layer::Foliage => self.draw_foliage(frame),
                Layer::FairyLights => self.draw_fairy_lights(frame),
            }
        }
        gl.depth_mask(true);

        // === Pass 2+: Bloom and composite ===
        self.post_process(frame);

        Ok(())
    }

    /// Translucent layers read depth but do not write it
    fn set_blend(&self, blend: Blend) {
        match blend {
            Blend::Opaque => {
                self.ctx.gl.disable(Gl::BLEND);
                self.ctx.gl.depth_mask(true);
            }
            Blend::Alpha => {
                self.ctx.enable_blending();
                self.ctx.gl.depth_mask(false);
            }
            Blend::Additive => {
                self.ctx.enable_additive_blending();
                self.ctx.gl.depth_mask(false);
            }
        }
    }

    fn draw_ornaments(&self, frame: &FrameSnapshot) {
        self.draw_instances(frame, &self.bauble_mesh, &frame.baubles, Material::BAUBLE);
        self.draw_instances(frame, &self.gift_mesh, &frame.gifts, Material::GIFT);
        self.draw_instances(frame, &self.star_mesh, std::slice::from_ref(&frame.star), Material::STAR);
    }

    fn draw_instances(&self, frame: &FrameSnapshot, mesh: &GpuMesh, instances: &[InstanceData], material: Material) {
        let ctx = &self.ctx;
        let u = &self.ornament_uniforms;
        let lighting = &frame.lighting;

        ctx.gl.use_program(Some(&self.ornament_program));

        ctx.uniform_matrix4fv(u.group.as_ref(), frame.group_transform.as_slice());
        ctx.uniform_matrix4fv(u.view.as_ref(), frame.camera.view.as_slice());
        ctx.uniform_matrix4fv(u.projection.as_ref(), frame.camera.projection.as_slice());
        ctx.uniform_vec3(u.camera_pos.as_ref(), frame.camera.position);

        ctx.uniform_color(u.ambient.as_ref(), lighting.ambient_color, lighting.ambient_intensity);

        let key = &lighting.key;
        ctx.uniform_vec3(u.key_position.as_ref(), key.position);
        ctx.uniform_color(u.key_color.as_ref(), key.color, key.intensity);
        ctx.uniform_vec3(u.key_direction.as_ref(), (Vec3::ZERO - key.position).normalize());
        ctx.uniform_1f(u.key_cone_cos.as_ref(), key.angle.cos());
        ctx.uniform_1f(u.key_penumbra_cos.as_ref(), (key.angle * (1.0 - key.penumbra)).cos());

        ctx.uniform_vec3(u.fill_position.as_ref(), lighting.fill.position);
        ctx.uniform_color(u.fill_color.as_ref(), lighting.fill.color, lighting.fill.intensity);

        let star = &lighting.star;
        ctx.uniform_vec3(u.star_position.as_ref(), star.position);
        ctx.uniform_color(u.star_color.as_ref(), star.color, star.intensity);
        ctx.uniform_1f(u.star_distance.as_ref(), star.distance);

        ctx.uniform_color(u.env_low.as_ref(), Theme::OBSIDIAN, 1.0);
        ctx.uniform_color(u.env_high.as_ref(), Theme::CHAMPAGNE, 0.6);

        ctx.uniform_1f(u.metalness.as_ref(), material.metalness);
        ctx.uniform_1f(u.roughness.as_ref(), material.roughness);
        ctx.uniform_1f(u.env_intensity.as_ref(), material.env_intensity);
        ctx.uniform_1f(u.unlit.as_ref(), if material.unlit { 1.0 } else { 0.0 });
        ctx.uniform_1f(u.opacity.as_ref(), material.opacity);

        mesh.draw(ctx, instances);
    }

    fn draw_shadow(&self, frame: &FrameSnapshot) {
        if frame.shadow_opacity <= 0.0 {
            return;
        }

        let ctx = &self.ctx;
        let u = &self.shadow_uniforms;

        ctx.gl.use_program(Some(&self.shadow_program));
        ctx.uniform_matrix4fv(u.view.as_ref(), frame.camera.view.as_slice());
        ctx.uniform_matrix4fv(u.projection.as_ref(), frame.camera.projection.as_slice());
        ctx.uniform_1f(u.floor_y.as_ref(), TREE_BASE_Y + TREE_GROUP_OFFSET.y);
        ctx.uniform_1f(u.half_size.as_ref(), SHADOW_HALF_SIZE);
        ctx.uniform_1f(u.opacity.as_ref(), frame.shadow_opacity);
        ctx.uniform_1f(u.footprint.as_ref(), SHADOW_FOOTPRINT);

        ctx.gl.bind_vertex_array(Some(&self.empty_vao));
        ctx.gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
        ctx.gl.bind_vertex_array(None);
    }

    fn draw_foliage(&self, frame: &FrameSnapshot) {
        let Some(foliage) = self.foliage.as_ref() else {
            return;
        };
        if foliage.count == 0 {
            return;
        }

        let ctx = &self.ctx;
        let u = &self.foliage_uniforms;

        ctx.gl.use_program(Some(&self.foliage_program));
        ctx.uniform_matrix4fv(u.group.as_ref(), frame.group_transform.as_slice());
        ctx.uniform_matrix4fv(u.view.as_ref(), frame.camera.view.as_slice());
        ctx.uniform_matrix4fv(u.projection.as_ref(), frame.camera.projection.as_slice());
        ctx.uniform_1f(u.time.as_ref(), frame.foliage.time);
        ctx.uniform_1f(u.progress.as_ref(), frame.foliage.progress);
        ctx.uniform_1f(u.point_scale.as_ref(), FOLIAGE_POINT_SCALE);
        ctx.uniform_color(u.color_green.as_ref(), Theme::EMERALD, 1.0);
        ctx.uniform_color(u.color_gold.as_ref(), Theme::GOLD, 1.0);

        ctx.gl.bind_vertex_array(Some(&foliage.vao));
        ctx.gl.draw_arrays(Gl::POINTS, 0, foliage.count);
        ctx.gl.bind_vertex_array(None);
    }

    fn draw_fairy_lights(&self, frame: &FrameSnapshot) {
        let Some(lights) = self.fairy_lights.as_ref() else {
            return;
        };
        if lights.count == 0 {
            return;
        }

        let ctx = &self.ctx;
        let u = &self.light_uniforms;

        ctx.gl.use_program(Some(&self.lights_program));
        ctx.uniform_matrix4fv(u.group.as_ref(), frame.group_transform.as_slice());
        ctx.uniform_matrix4fv(u.view.as_ref(), frame.camera.view.as_slice());
        ctx.uniform_matrix4fv(u.projection.as_ref(), frame.camera.projection.as_slice());
        // Matches a world-space point size under a perspective camera
        ctx.uniform_1f(u.point_scale.as_ref(), self.height as f32 * 0.5);

        ctx.gl.bind_vertex_array(Some(&lights.vao));
        ctx.gl.draw_arrays(Gl::POINTS, 0, lights.count);
        ctx.gl.bind_vertex_array(None);
    }

    fn post_process(&self, frame: &FrameSnapshot) {
        let gl = &self.ctx.gl;
        let u = &self.post_uniforms;
        let t = &self.targets;

        gl.disable(Gl::DEPTH_TEST);
        gl.disable(Gl::BLEND);
        gl.bind_vertex_array(Some(&self.empty_vao));

        // Extract bright areas
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&t.bloom_fbos[0]));
        self.ctx.viewport(0, 0, (self.width / 2).max(1), (self.height / 2).max(1));

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&t.scene_texture));
        self.ctx.uniform_1i(u.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(u.threshold.as_ref(), frame.post.bloom_threshold);
        self.ctx.uniform_1f(u.smoothing.as_ref(), BLOOM_SMOOTHING);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // Blur horizontally
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&t.bloom_fbos[1]));
        gl.use_program(Some(&self.blur_program));
        gl.bind_texture(Gl::TEXTURE_2D, Some(&t.bloom_textures[0]));
        self.ctx.uniform_1i(u.blur_texture.as_ref(), 0);
        self.ctx.uniform_2f(u.direction.as_ref(), 1.0, 0.0);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // Blur vertically
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&t.bloom_fbos[0]));
        gl.bind_texture(Gl::TEXTURE_2D, Some(&t.bloom_textures[1]));
        self.ctx.uniform_2f(u.direction.as_ref(), 0.0, 1.0);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // Composite to screen
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);
        gl.use_program(Some(&self.composite_program));

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&t.scene_texture));
        self.ctx.uniform_1i(u.scene.as_ref(), 0);

        gl.active_texture(Gl::TEXTURE1);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&t.bloom_textures[0]));
        self.ctx.uniform_1i(u.bloom.as_ref(), 1);

        self.ctx.uniform_1f(u.bloom_strength.as_ref(), frame.post.bloom_intensity);
        self.ctx.uniform_1f(u.vignette_offset.as_ref(), frame.post.vignette_offset);
        self.ctx.uniform_1f(u.vignette_darkness.as_ref(), frame.post.vignette_darkness);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_vertex_array(None);
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let width = width.max(1);
        let height = height.max(1);

        let targets = RenderTargets::new(&self.ctx, width, height)?;
        self.targets.delete(&self.ctx.gl);
        self.targets = targets;
        self.width = width;
        self.height = height;

        debug!("Render targets resized to {}x{}", width, height);
        Ok(())
    }
}

impl SceneRenderer for RenderPipeline {
    fn upload_foliage(&mut self, attributes: &[f32], _count: usize) -> Result<()> {
        RenderPipeline::upload_foliage(self, attributes)
    }

    fn draw(&mut self, frame: &FrameSnapshot) -> Result<()> {
        self.render(frame)
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        let gl = &self.ctx.gl;

        for gpu_mesh in [&self.bauble_mesh, &self.gift_mesh, &self.star_mesh, &self.halo_mesh] {
            gpu_mesh.delete(gl);
        }
        for points in [&self.foliage, &self.fairy_lights].into_iter().flatten() {
            points.delete(gl);
        }
        gl.delete_vertex_array(Some(&self.empty_vao));
        self.targets.delete(gl);

        for program in [
            &self.foliage_program,
            &self.lights_program,
            &self.ornament_program,
            &self.shadow_program,
            &self.bloom_extract_program,
            &self.blur_program,
            &self.composite_program,
        ] {
            gl.delete_program(Some(program));
        }
    }
}
