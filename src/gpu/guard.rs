//! Exclusive binding of shader programs
//!
//! The GPU context has exactly one bound program. Code that sets uniforms or
//! draws must know which one that is, so binding only happens through a
//! [`UseScope`]:
//!
//! ```text
//!              use_program(P), count == 0: bind P
//!   ┌──────┐ ─────────────────────────────────────► ┌────────────────┐
//!   │ IDLE │                                        │ ACTIVE (P, n)  │ ◄─┐ use_program(P)
//!   └──────┘ ◄───────────────────────────────────── └────────────────┘ ──┘ n + 1
//!              last scope dropped, n == 0                  │
//!                                                          │ use_program(Q), Q != P
//!                                                          ▼
//!                                                  GuardError::ProgramConflict
//! ```
//!
//! Leaving the last scope does not unbind; the next scope binds whatever it
//! needs, which saves a state change when the same program is used again.

use super::backend::GpuBackend;
use super::shader::{ProgramObject, ShaderProgram};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("A different shader program is already in use (active {active}, requested {requested})")]
    ProgramConflict { active: String, requested: String },
}

/// Owner of the "which program is bound" state for one GPU context.
///
/// Single threaded by construction (`Cell`/`RefCell`), so it cannot be shared
/// across threads by accident.
#[derive(Debug)]
pub struct ProgramGuard<G: GpuBackend> {
    gpu: G,
    reference_count: Cell<usize>,
    active: RefCell<Weak<ProgramObject<G>>>,
    binds: Cell<u64>,
}

impl<G: GpuBackend> ProgramGuard<G> {
    pub fn new(gpu: G) -> Self {
        Self {
            gpu,
            reference_count: Cell::new(0),
            active: RefCell::new(Weak::new()),
            binds: Cell::new(0),
        }
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    /// Enters a use-scope for `program`, binding it if nothing is in use.
    ///
    /// Nesting scopes of the same program is fine. Asking for a different
    /// program while any scope is open is a bug in the caller and fails
    /// without touching GPU state.
    pub fn use_program<'a>(
        &'a self,
        program: &'a ShaderProgram<G>,
    ) -> Result<UseScope<'a, G>, GuardError> {
        let count = self.reference_count.get();
        if count > 0 {
            let active = self.active.borrow();
            if !active.ptr_eq(&Rc::downgrade(&program.object)) {
                let active_id = active.upgrade().map(|object| object.id);
                error!(
                    "Shader program {:?} requested while {:?} is in use ({} open scope(s))",
                    program.id(),
                    active_id,
                    count
                );
                return Err(GuardError::ProgramConflict {
                    active: format!("{:?}", active_id),
                    requested: format!("{:?}", program.id()),
                });
            }
        } else {
            self.gpu.bind_program(program.id());
            self.binds.set(self.binds.get() + 1);
            *self.active.borrow_mut() = Rc::downgrade(&program.object);
            debug!("Bound shader program {:?}", program.id());
        }
        self.reference_count.set(count + 1);
        Ok(UseScope {
            guard: self,
            program,
        })
    }

    /// Number of open use-scopes.
    pub fn reference_count(&self) -> usize {
        self.reference_count.get()
    }

    /// The program held by the open scopes, `None` when idle.
    pub fn active_program(&self) -> Option<G::Program> {
        if self.reference_count.get() == 0 {
            return None;
        }
        self.active.borrow().upgrade().map(|object| object.id)
    }

    /// How often a program was actually bound on the GPU.
    pub fn bind_count(&self) -> u64 {
        self.binds.get()
    }

    fn retain(&self) {
        self.reference_count.set(self.reference_count.get() + 1);
    }

    fn release(&self) {
        let count = self.reference_count.get();
        let Some(count) = count.checked_sub(1) else {
            panic!("shader program use-scope released more often than entered");
        };
        self.reference_count.set(count);
    }
}

/// Proof that a program is bound. Dropping it leaves the scope.
///
/// Moving a scope hands it over without any bookkeeping. Cloning enters the
/// same program once more without rebinding; every clone leaves on its own.
#[derive(Debug)]
pub struct UseScope<'a, G: GpuBackend> {
    guard: &'a ProgramGuard<G>,
    program: &'a ShaderProgram<G>,
}

impl<'a, G: GpuBackend> UseScope<'a, G> {
    pub fn program(&self) -> &'a ShaderProgram<G> {
        self.program
    }

    pub fn set_uniform_1f(&self, location: &G::UniformLocation, v0: f32) {
        self.guard.gpu.set_uniform_1f(location, v0);
    }

    pub fn set_uniform_2f(&self, location: &G::UniformLocation, v0: f32, v1: f32) {
        self.guard.gpu.set_uniform_2f(location, v0, v1);
    }

    pub fn set_uniform_mat4(&self, location: &G::UniformLocation, transpose: bool, matrix: &[f32; 16]) {
        self.guard.gpu.set_uniform_mat4(location, transpose, matrix);
    }

    /// Looks up a uniform by name and sets it, ignoring names the program lacks.
    pub fn set_named_2f(&self, name: &str, v0: f32, v1: f32) -> bool {
        match self.program.uniform_location(name) {
            Some(location) => {
                self.set_uniform_2f(&location, v0, v1);
                true
            }
            None => false,
        }
    }
}

impl<G: GpuBackend> Clone for UseScope<'_, G> {
    fn clone(&self) -> Self {
        self.guard.retain();
        Self {
            guard: self.guard,
            program: self.program,
        }
    }
}

impl<G: GpuBackend> Drop for UseScope<'_, G> {
    fn drop(&mut self) {
        self.guard.release();
    }
}
