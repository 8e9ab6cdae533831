use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};
use crate::config::Rgb;
use crate::error::{Result, TreeError};
use crate::math::Vec3;

type Gl = WebGl2RenderingContext;

fn render_err(msg: impl Into<String>) -> TreeError {
    TreeError::Render(msg.into())
}

/// Float attribute within an interleaved buffer
#[derive(Debug, Clone, Copy)]
pub struct AttribLayout {
    pub location: u32,
    pub size: i32,
    /// Offset in floats
    pub offset: i32,
}

impl AttribLayout {
    pub const fn new(location: u32, size: i32, offset: i32) -> Self {
        Self { location, size, offset }
    }
}

/// Wrapper around WebGL2 context with helper methods
pub struct WebGLContext {
    pub gl: WebGl2RenderingContext,
}

impl WebGLContext {
    pub fn new(gl: WebGl2RenderingContext) -> Self {
        Self { gl }
    }

    /// Compile a shader from source
    pub fn compile_shader(&self, shader_type: u32, source: &str) -> Result<WebGlShader> {
        let gl = &self.gl;

        let shader = gl
            .create_shader(shader_type)
            .ok_or_else(|| render_err("Failed to create shader"))?;

        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        if gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(render_err(format!("Shader compilation failed: {}", log)))
        }
    }

    /// Create a shader program from vertex and fragment shaders
    pub fn create_program(&self, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
        let gl = &self.gl;

        let vert_shader = self.compile_shader(Gl::VERTEX_SHADER, vert_src)?;
        let frag_shader = self.compile_shader(Gl::FRAGMENT_SHADER, frag_src)?;

        let program = gl
            .create_program()
            .ok_or_else(|| render_err("Failed to create program"))?;

        gl.attach_shader(&program, &vert_shader);
        gl.attach_shader(&program, &frag_shader);
        gl.link_program(&program);

        // Linked into the program now
        gl.delete_shader(Some(&vert_shader));
        gl.delete_shader(Some(&frag_shader));

        if gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(render_err(format!("Program linking failed: {}", log)))
        }
    }

    /// Create a buffer and upload data
    pub fn create_buffer_f32(&self, data: &[f32], usage: u32) -> Result<WebGlBuffer> {
        let buffer = self
            .gl
            .create_buffer()
            .ok_or_else(|| render_err("Failed to create buffer"))?;
        self.upload_f32(&buffer, data, usage);
        Ok(buffer)
    }

    /// Replace the contents of an array buffer, resizing as needed
    pub fn upload_f32(&self, buffer: &WebGlBuffer, data: &[f32], usage: u32) {
        let gl = &self.gl;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));

        // Safety: the view is consumed before any allocation can move wasm memory
        unsafe {
            let array = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, usage);
        }

        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }

    /// Create an index buffer
    pub fn create_index_buffer(&self, data: &[u32], usage: u32) -> Result<WebGlBuffer> {
        let gl = &self.gl;

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| render_err("Failed to create index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));

        unsafe {
            let array = js_sys::Uint32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &array, usage);
        }

        // Index binding stays with the VAO; callers unbind the VAO first
        Ok(buffer)
    }

    /// Create a Vertex Array Object
    pub fn create_vao(&self) -> Result<WebGlVertexArrayObject> {
        self.gl
            .create_vertex_array()
            .ok_or_else(|| render_err("Failed to create VAO"))
    }

    /// Point interleaved float attributes of `buffer` into the bound VAO
    ///
    /// `divisor` 0 advances per vertex, 1 per instance.
    pub fn set_attributes(&self, buffer: &WebGlBuffer, stride: i32, attribs: &[AttribLayout], divisor: u32) {
        let gl = &self.gl;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));

        for a in attribs {
            gl.enable_vertex_attrib_array(a.location);
            gl.vertex_attrib_pointer_with_i32(a.location, a.size, Gl::FLOAT, false, stride * 4, a.offset * 4);
            gl.vertex_attrib_divisor(a.location, divisor);
        }

        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }

    /// Create a texture
    pub fn create_texture(&self, width: i32, height: i32, internal_format: u32) -> Result<WebGlTexture> {
        let gl = &self.gl;

        let texture = gl
            .create_texture()
            .ok_or_else(|| render_err("Failed to create texture"))?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));

        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_2D,
            0,
            internal_format as i32,
            width,
            height,
            0,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            None,
        )
        .map_err(|e| render_err(format!("Failed to create texture: {:?}", e)))?;

        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

        gl.bind_texture(Gl::TEXTURE_2D, None);
        Ok(texture)
    }

    /// Create a depth renderbuffer
    pub fn create_depth_buffer(&self, width: i32, height: i32) -> Result<WebGlRenderbuffer> {
        let gl = &self.gl;

        let rbo = gl
            .create_renderbuffer()
            .ok_or_else(|| render_err("Failed to create renderbuffer"))?;
        gl.bind_renderbuffer(Gl::RENDERBUFFER, Some(&rbo));
        gl.renderbuffer_storage(Gl::RENDERBUFFER, Gl::DEPTH_COMPONENT24, width, height);
        gl.bind_renderbuffer(Gl::RENDERBUFFER, None);

        Ok(rbo)
    }

    /// Create a framebuffer with a texture attachment and optional depth
    pub fn create_framebuffer(
        &self,
        texture: &WebGlTexture,
        depth: Option<&WebGlRenderbuffer>,
    ) -> Result<WebGlFramebuffer> {
        let gl = &self.gl;

        let fbo = gl
            .create_framebuffer()
            .ok_or_else(|| render_err("Failed to create framebuffer"))?;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&fbo));

        gl.framebuffer_texture_2d(Gl::FRAMEBUFFER, Gl::COLOR_ATTACHMENT0, Gl::TEXTURE_2D, Some(texture), 0);

        if let Some(rbo) = depth {
            gl.framebuffer_renderbuffer(Gl::FRAMEBUFFER, Gl::DEPTH_ATTACHMENT, Gl::RENDERBUFFER, Some(rbo));
        }

        let status = gl.check_framebuffer_status(Gl::FRAMEBUFFER);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);

        if status != Gl::FRAMEBUFFER_COMPLETE {
            return Err(render_err(format!("Framebuffer incomplete: {}", status)));
        }

        Ok(fbo)
    }

    /// Get uniform location
    pub fn get_uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    pub fn uniform_1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    pub fn uniform_2f(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32) {
        self.gl.uniform2f(location, x, y);
    }

    pub fn uniform_vec3(&self, location: Option<&WebGlUniformLocation>, v: Vec3) {
        self.gl.uniform3f(location, v.x, v.y, v.z);
    }

    /// Set a color uniform, optionally scaled by an intensity
    pub fn uniform_color(&self, location: Option<&WebGlUniformLocation>, color: Rgb, intensity: f32) {
        self.gl.uniform3f(location, color.r * intensity, color.g * intensity, color.b * intensity);
    }

    pub fn uniform_matrix4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32; 16]) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, data);
    }

    pub fn uniform_1i(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    /// Clear color and depth
    pub fn clear(&self, color: Rgb) {
        self.gl.clear_color(color.r, color.g, color.b, 1.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.depth_mask(true);
    }

    pub fn enable_blending(&self) {
        self.gl.enable(Gl::BLEND);
        self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
    }

    /// Enable additive blending (for particles/glow)
    pub fn enable_additive_blending(&self) {
        self.gl.enable(Gl::BLEND);
        self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }
}
