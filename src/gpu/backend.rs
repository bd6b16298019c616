//! The narrow slice of the GPU API the program guard and shaders need.

use eframe::glow::{self, HasContext};
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// A GPU context able to build and bind shader programs.
///
/// Errors are the driver's info log as plain text.
pub trait GpuBackend {
    type Program: Copy + PartialEq + Debug;
    type Shader: Copy + Debug;
    type UniformLocation: Clone + Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> Result<(), String>;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn link_program(&self, program: Self::Program, shaders: &[Self::Shader]) -> Result<(), String>;
    fn delete_program(&self, program: Self::Program);

    /// Makes `program` the one used by subsequent draw calls.
    fn bind_program(&self, program: Self::Program);

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    fn set_uniform_1f(&self, location: &Self::UniformLocation, v0: f32);
    fn set_uniform_2f(&self, location: &Self::UniformLocation, v0: f32, v1: f32);
    fn set_uniform_mat4(&self, location: &Self::UniformLocation, transpose: bool, matrix: &[f32; 16]);
}

impl GpuBackend for glow::Context {
    type Program = <glow::Context as HasContext>::Program;
    type Shader = <glow::Context as HasContext>::Shader;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { HasContext::create_shader(self, kind) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) -> Result<(), String> {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            if self.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn link_program(&self, program: Self::Program, shaders: &[Self::Shader]) -> Result<(), String> {
        unsafe {
            for shader in shaders {
                self.attach_shader(program, *shader);
            }
            HasContext::link_program(self, program);
            for shader in shaders {
                self.detach_shader(program, *shader);
            }
            if self.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.get_program_info_log(program))
            }
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn bind_program(&self, program: Self::Program) {
        unsafe { self.use_program(Some(program)) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn set_uniform_1f(&self, location: &Self::UniformLocation, v0: f32) {
        unsafe { self.uniform_1_f32(Some(location), v0) }
    }

    fn set_uniform_2f(&self, location: &Self::UniformLocation, v0: f32, v1: f32) {
        unsafe { self.uniform_2_f32(Some(location), v0, v1) }
    }

    fn set_uniform_mat4(&self, location: &Self::UniformLocation, transpose: bool, matrix: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(location), transpose, matrix) }
    }
}

macro_rules! forward_backend {
    ($pointer:ident) => {
        impl<G: GpuBackend + ?Sized> GpuBackend for $pointer<G> {
            type Program = G::Program;
            type Shader = G::Shader;
            type UniformLocation = G::UniformLocation;

            fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
                (**self).create_shader(stage)
            }

            fn compile_shader(&self, shader: Self::Shader, source: &str) -> Result<(), String> {
                (**self).compile_shader(shader, source)
            }

            fn delete_shader(&self, shader: Self::Shader) {
                (**self).delete_shader(shader)
            }

            fn create_program(&self) -> Result<Self::Program, String> {
                (**self).create_program()
            }

            fn link_program(
                &self,
                program: Self::Program,
                shaders: &[Self::Shader],
            ) -> Result<(), String> {
                (**self).link_program(program, shaders)
            }

            fn delete_program(&self, program: Self::Program) {
                (**self).delete_program(program)
            }

            fn bind_program(&self, program: Self::Program) {
                (**self).bind_program(program)
            }

            fn uniform_location(
                &self,
                program: Self::Program,
                name: &str,
            ) -> Option<Self::UniformLocation> {
                (**self).uniform_location(program, name)
            }

            fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
                (**self).attrib_location(program, name)
            }

            fn set_uniform_1f(&self, location: &Self::UniformLocation, v0: f32) {
                (**self).set_uniform_1f(location, v0)
            }

            fn set_uniform_2f(&self, location: &Self::UniformLocation, v0: f32, v1: f32) {
                (**self).set_uniform_2f(location, v0, v1)
            }

            fn set_uniform_mat4(
                &self,
                location: &Self::UniformLocation,
                transpose: bool,
                matrix: &[f32; 16],
            ) {
                (**self).set_uniform_mat4(location, transpose, matrix)
            }
        }
    };
}

forward_backend!(Rc);
forward_backend!(Arc);
