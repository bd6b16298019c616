use super::controller::Controller;
use super::joystick::RawJoystick;
use tracing::{info, warn};

/// Owning collection of attached controllers.
///
/// Hardware hot-plug is handled here: a disconnect event carries a handle and
/// the matching controller is removed (and thereby released).
#[derive(Debug)]
pub struct ControllerRegistry<J: RawJoystick> {
    controllers: Vec<Controller<J>>,
}

impl<J: RawJoystick> Default for ControllerRegistry<J> {
    fn default() -> Self {
        Self {
            controllers: Vec::new(),
        }
    }
}

impl<J: RawJoystick> ControllerRegistry<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a joystick and returns its slot.
    ///
    /// A joystick whose handle is already registered replaces the old binding.
    pub fn attach(&mut self, joystick: J) -> usize {
        let handle = joystick.handle();
        if let Some(index) = self.position(handle) {
            warn!("Controller {:?} attached twice, replacing old binding", handle);
            self.controllers[index] = Controller::attach(joystick);
            return index;
        }
        self.controllers.push(Controller::attach(joystick));
        info!("{} controller(s) connected", self.controllers.len());
        self.controllers.len() - 1
    }

    /// Removes the controller bound to `handle`, if any.
    pub fn detach(&mut self, handle: J::Handle) -> Option<Controller<J>> {
        let index = self.position(handle)?;
        let controller = self.controllers.remove(index);
        info!(
            "Controller {:?} detached, {} remaining",
            handle,
            self.controllers.len()
        );
        Some(controller)
    }

    pub fn find(&self, handle: J::Handle) -> Option<&Controller<J>> {
        self.controllers.iter().find(|controller| controller.is(handle))
    }

    pub fn find_mut(&mut self, handle: J::Handle) -> Option<&mut Controller<J>> {
        self.controllers
            .iter_mut()
            .find(|controller| controller.is(handle))
    }

    fn position(&self, handle: J::Handle) -> Option<usize> {
        self.controllers
            .iter()
            .position(|controller| controller.is(handle))
    }

    pub fn get(&self, index: usize) -> Option<&Controller<J>> {
        self.controllers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Controller<J>> {
        self.controllers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Controller<J>> {
        self.controllers.iter_mut()
    }

    /// Latches every controller's buttons for the coming frame.
    pub fn poll(&mut self) {
        for controller in &mut self.controllers {
            controller.poll();
        }
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Releases every controller.
    pub fn clear(&mut self) {
        if !self.controllers.is_empty() {
            info!("Releasing {} controller(s)", self.controllers.len());
        }
        self.controllers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerModel, SampledJoystick};

    #[test]
    fn attach_and_detach_by_handle() {
        let mut registry = ControllerRegistry::new();
        assert_eq!(registry.attach(SampledJoystick::new(10u32, 15)), 0);
        assert_eq!(registry.attach(SampledJoystick::new(20u32, 16)), 1);
        assert_eq!(registry.len(), 2);

        let removed = registry.detach(10).expect("controller 10 is attached");
        assert_eq!(removed.model(), ControllerModel::Xbox);
        assert_eq!(registry.len(), 1);
        assert!(registry.find(20).is_some());
        assert!(registry.detach(10).is_none());
    }

    #[test]
    fn reattaching_a_handle_replaces_it() {
        let mut registry = ControllerRegistry::new();
        registry.attach(SampledJoystick::new(1u32, 15));
        let slot = registry.attach(SampledJoystick::new(1u32, 13));
        assert_eq!(slot, 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find(1).map(|c| c.model()), Some(ControllerModel::Ds4));
    }

    #[test]
    fn poll_reaches_every_controller() {
        let mut registry = ControllerRegistry::new();
        registry.attach(SampledJoystick::new(1u32, 15));
        registry.attach(SampledJoystick::new(2u32, 15));
        for controller in registry.iter_mut() {
            controller.joystick_mut().sample.set_button(1, true);
        }
        registry.poll();
        assert!(registry
            .iter()
            .all(|controller| controller.pressed(crate::controller::LogicalButton::B)));
        registry.clear();
        assert!(registry.is_empty());
    }
}
