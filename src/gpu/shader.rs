use super::backend::{GpuBackend, ShaderStage};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info};

/// Failure to open an asset, split by whether retrying with another file could help.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(PathBuf),

    #[error("Asset {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to read asset {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("Failed to create GPU object: {0}")]
    Create(String),

    #[error("Failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("Failed to link shader program: {0}")]
    Link(String),

    #[error(transparent)]
    Source(#[from] AssetError),
}

/// Reads GLSL source text from disk.
pub fn load_shader_source(path: &Path) -> Result<String, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
        _ => AssetError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    String::from_utf8(bytes).map_err(|e| AssetError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// A compiled shader stage. Deleted from the GPU when dropped.
#[derive(Debug)]
pub struct Shader<G: GpuBackend> {
    gpu: G,
    id: G::Shader,
    stage: ShaderStage,
}

impl<G: GpuBackend + Clone> Shader<G> {
    pub fn compile(gpu: &G, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let id = gpu.create_shader(stage).map_err(ShaderError::Create)?;
        // Wrap first so a failed compile still deletes the object
        let shader = Self {
            gpu: gpu.clone(),
            id,
            stage,
        };
        if let Err(log) = gpu.compile_shader(id, source) {
            error!("Failed to compile {} shader: {}", stage, log);
            return Err(ShaderError::Compile { stage, log });
        }
        debug!("Compiled {} shader {:?}", stage, id);
        Ok(shader)
    }

    pub fn from_file(gpu: &G, stage: ShaderStage, path: &Path) -> Result<Self, ShaderError> {
        let source = load_shader_source(path)?;
        Self::compile(gpu, stage, &source)
    }
}

impl<G: GpuBackend> Shader<G> {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<G: GpuBackend> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gpu.delete_shader(self.id);
    }
}

/// GPU side of a linked program; deleting happens when the last holder lets go.
#[derive(Debug)]
pub(crate) struct ProgramObject<G: GpuBackend> {
    gpu: G,
    pub(crate) id: G::Program,
}

impl<G: GpuBackend> Drop for ProgramObject<G> {
    fn drop(&mut self) {
        debug!("Deleting shader program {:?}", self.id);
        self.gpu.delete_program(self.id);
    }
}

/// A linked vertex + fragment program with shared ownership.
///
/// Clones refer to the same GPU program. Binding it goes through
/// [`crate::gpu::ProgramGuard::use_program`].
#[derive(Debug)]
pub struct ShaderProgram<G: GpuBackend> {
    pub(crate) object: Rc<ProgramObject<G>>,
}

impl<G: GpuBackend> Clone for ShaderProgram<G> {
    fn clone(&self) -> Self {
        Self {
            object: Rc::clone(&self.object),
        }
    }
}

impl<G: GpuBackend + Clone> ShaderProgram<G> {
    pub fn link(gpu: &G, vertex: &Shader<G>, fragment: &Shader<G>) -> Result<Self, ShaderError> {
        let id = gpu.create_program().map_err(ShaderError::Create)?;
        let object = Rc::new(ProgramObject {
            gpu: gpu.clone(),
            id,
        });
        if let Err(log) = gpu.link_program(id, &[vertex.id, fragment.id]) {
            error!("Failed to link shader program {:?}: {}", id, log);
            return Err(ShaderError::Link(log));
        }
        info!("Linked shader program {:?}", id);
        Ok(Self { object })
    }

    /// Compiles both stages from source and links them.
    pub fn from_sources(gpu: &G, vertex: &str, fragment: &str) -> Result<Self, ShaderError> {
        let vertex = Shader::compile(gpu, ShaderStage::Vertex, vertex)?;
        let fragment = Shader::compile(gpu, ShaderStage::Fragment, fragment)?;
        Self::link(gpu, &vertex, &fragment)
    }
}

impl<G: GpuBackend> ShaderProgram<G> {
    pub fn id(&self) -> G::Program {
        self.object.id
    }

    pub fn uniform_location(&self, name: &str) -> Option<G::UniformLocation> {
        let location = self.object.gpu.uniform_location(self.object.id, name);
        if location.is_none() {
            debug!("Uniform {} not found in program {:?}", name, self.object.id);
        }
        location
    }

    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.object.gpu.attrib_location(self.object.id, name)
    }

    /// Number of live handles to this program.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.object)
    }
}
