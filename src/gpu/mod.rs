//! GPU program handling
//!
//! 1. [`backend`] - the slice of the GL API we use, for glow and headless contexts
//! 2. [`shader`] - compiling and linking programs, shader sources from disk
//! 3. [`guard`] - exclusive, scoped program binding
//!
//! ```text
//! ShaderProgram ──► ProgramGuard::use_program ──► UseScope ──► uniforms / draw calls
//!                        (binds if idle)           (drop = leave)
//! ```

pub mod backend;
pub mod guard;
pub mod headless;
pub mod shader;

pub use backend::{GpuBackend, ShaderStage};
pub use guard::{GuardError, ProgramGuard, UseScope};
pub use headless::{HeadlessGpu, HeadlessProgram};
pub use shader::{load_shader_source, AssetError, Shader, ShaderError, ShaderProgram};
