use super::backend::{GpuBackend, ShaderStage};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessProgram(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessShader(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessUniform {
    pub program: HeadlessProgram,
    pub name: String,
}

/// A GPU context without a GPU.
///
/// Keeps just enough bookkeeping to run the engine without a window and to
/// check binding behavior: which program is bound, how often binding happened,
/// which objects are still alive and what was written to uniforms. A shader
/// source containing `#error` fails to compile, mirroring a driver rejection.
#[derive(Debug, Default)]
pub struct HeadlessGpu {
    next_id: Cell<u32>,
    bound: Cell<Option<HeadlessProgram>>,
    bind_count: Cell<usize>,
    live_shaders: RefCell<HashMap<HeadlessShader, ShaderStage>>,
    live_programs: RefCell<Vec<HeadlessProgram>>,
    uniform_writes: RefCell<Vec<(HeadlessUniform, Vec<f32>)>>,
}

impl HeadlessGpu {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn bound_program(&self) -> Option<HeadlessProgram> {
        self.bound.get()
    }

    /// How many times a program was actually bound.
    pub fn bind_count(&self) -> usize {
        self.bind_count.get()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn uniform_writes(&self) -> Vec<(HeadlessUniform, Vec<f32>)> {
        self.uniform_writes.borrow().clone()
    }

    fn write_uniform(&self, location: &HeadlessUniform, values: &[f32]) {
        self.uniform_writes
            .borrow_mut()
            .push((location.clone(), values.to_vec()));
    }
}

impl GpuBackend for HeadlessGpu {
    type Program = HeadlessProgram;
    type Shader = HeadlessShader;
    type UniformLocation = HeadlessUniform;

    fn create_shader(&self, stage: ShaderStage) -> Result<HeadlessShader, String> {
        let shader = HeadlessShader(self.allocate());
        self.live_shaders.borrow_mut().insert(shader, stage);
        Ok(shader)
    }

    fn compile_shader(&self, shader: HeadlessShader, source: &str) -> Result<(), String> {
        if !self.live_shaders.borrow().contains_key(&shader) {
            return Err(format!("shader {} does not exist", shader.0));
        }
        if source.trim().is_empty() {
            return Err("ERROR: 0:1: empty shader source".to_owned());
        }
        match source.lines().position(|line| line.trim_start().starts_with("#error")) {
            Some(line) => Err(format!("ERROR: 0:{}: #error directive", line + 1)),
            None => Ok(()),
        }
    }

    fn delete_shader(&self, shader: HeadlessShader) {
        self.live_shaders.borrow_mut().remove(&shader);
    }

    fn create_program(&self) -> Result<HeadlessProgram, String> {
        let program = HeadlessProgram(self.allocate());
        self.live_programs.borrow_mut().push(program);
        Ok(program)
    }

    fn link_program(&self, program: HeadlessProgram, shaders: &[HeadlessShader]) -> Result<(), String> {
        let live = self.live_shaders.borrow();
        let has_stage = |wanted: ShaderStage| {
            shaders
                .iter()
                .any(|shader| live.get(shader) == Some(&wanted))
        };
        if !has_stage(ShaderStage::Vertex) || !has_stage(ShaderStage::Fragment) {
            return Err(format!(
                "program {} needs a vertex and a fragment shader",
                program.0
            ));
        }
        Ok(())
    }

    fn delete_program(&self, program: HeadlessProgram) {
        self.live_programs.borrow_mut().retain(|live| *live != program);
        if self.bound.get() == Some(program) {
            self.bound.set(None);
        }
    }

    fn bind_program(&self, program: HeadlessProgram) {
        self.bound.set(Some(program));
        self.bind_count.set(self.bind_count.get() + 1);
    }

    fn uniform_location(&self, program: HeadlessProgram, name: &str) -> Option<HeadlessUniform> {
        if name.is_empty() {
            return None;
        }
        Some(HeadlessUniform {
            program,
            name: name.to_owned(),
        })
    }

    fn attrib_location(&self, _program: HeadlessProgram, name: &str) -> Option<u32> {
        match name {
            "position" => Some(0),
            "texCoord" => Some(1),
            _ => None,
        }
    }

    fn set_uniform_1f(&self, location: &HeadlessUniform, v0: f32) {
        self.write_uniform(location, &[v0]);
    }

    fn set_uniform_2f(&self, location: &HeadlessUniform, v0: f32, v1: f32) {
        self.write_uniform(location, &[v0, v1]);
    }

    fn set_uniform_mat4(&self, location: &HeadlessUniform, _transpose: bool, matrix: &[f32; 16]) {
        self.write_uniform(location, matrix);
    }
}
