//! In-process command dispatch table.

use super::{CommandHandler, CommandHost, HostError};
use crate::extension::lifecycle::{Disposable, DisposeFn};
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct Binding {
    token: u64,
    id: String,
    handler: CommandHandler,
}

#[derive(Default)]
struct DispatchState {
    next_token: Cell<u64>,
    bindings: RefCell<Vec<Binding>>,
}

/// Command table with one binding per id.
///
/// Clones share the same table.
#[derive(Clone, Default)]
pub struct DispatchTable {
    state: Rc<DispatchState>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.state
            .bindings
            .borrow()
            .iter()
            .any(|binding| binding.id == id)
    }
}

impl CommandHost for DispatchTable {
    fn bind_command(
        &self,
        id: &str,
        handler: CommandHandler,
    ) -> Result<Rc<dyn Disposable>, HostError> {
        if self.is_bound(id) {
            return Err(HostError::CommandAlreadyBound(id.to_string()));
        }

        let token = self.state.next_token.get();
        self.state.next_token.set(token + 1);
        self.state.bindings.borrow_mut().push(Binding {
            token,
            id: id.to_string(),
            handler,
        });
        debug!("event=command_bind module=host status=ok command_id={id}");

        let state = Rc::downgrade(&self.state);
        let unbind_id = id.to_string();
        Ok(Rc::new(DisposeFn::new(move || {
            if let Some(state) = state.upgrade() {
                state
                    .bindings
                    .borrow_mut()
                    .retain(|binding| binding.token != token);
                debug!("event=command_unbind module=host status=ok command_id={unbind_id}");
            }
        })))
    }

    fn execute_command(&self, id: &str) -> Result<(), HostError> {
        // Clone out of the table so the handler may bind or unbind re-entrantly.
        let handler = self
            .state
            .bindings
            .borrow()
            .iter()
            .find(|binding| binding.id == id)
            .map(|binding| Rc::clone(&binding.handler));

        match handler {
            Some(handler) => {
                handler();
                Ok(())
            }
            None => Err(HostError::CommandNotFound(id.to_string())),
        }
    }

    fn bound_commands(&self) -> Vec<String> {
        self.state
            .bindings
            .borrow()
            .iter()
            .map(|binding| binding.id.clone())
            .collect()
    }
}
