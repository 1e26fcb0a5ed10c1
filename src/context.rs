//! The `Context` holds all of the state of a single generation run.
//!
//! Modules never keep global state. Instead each module registers a data plugin with
//! [`define_data_plugin!`] and stores its data in the `Context`, where it is created lazily the
//! first time it is requested. Functionality is exposed to the rest of the crate through
//! extension traits implemented on `Context` (`ContextRandomExt`, `ContextPeopleExt`, ...).
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A type that owns a data container stored in the `Context`.
pub trait DataPlugin: Any {
    type DataContainer: 'static;

    fn create_data_container() -> Self::DataContainer;
}

/// Defines a new type implementing [`DataPlugin`] with the given container type and
/// initial value.
#[macro_export]
macro_rules! define_data_plugin {
    ($plugin:ident, $data_container:ty, $default: expr) => {
        #[derive(Copy, Clone)]
        struct $plugin;

        impl $crate::context::DataPlugin for $plugin {
            type DataContainer = $data_container;

            fn create_data_container() -> Self::DataContainer {
                $default
            }
        }
    };
}
pub use define_data_plugin;

#[derive(Debug)]
pub struct Context {
    data_plugins: HashMap<TypeId, Box<dyn Any>>,
}

impl Context {
    #[must_use]
    pub fn new() -> Context {
        Context {
            data_plugins: HashMap::new(),
        }
    }

    /// Returns a mutable reference to the data container of `plugin`, creating it with the
    /// plugin's initial value if it doesn't exist yet.
    #[allow(clippy::needless_pass_by_value)]
    pub fn get_data_mut<T: DataPlugin>(&mut self, _plugin: T) -> &mut T::DataContainer {
        self.data_plugins
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::create_data_container()))
            .downcast_mut::<T::DataContainer>()
            .expect("data plugin container has the wrong type")
    }

    /// Returns the data container of `plugin`, or `None` if nothing has created it yet.
    #[allow(clippy::needless_pass_by_value)]
    #[must_use]
    pub fn get_data<T: DataPlugin>(&self, _plugin: T) -> Option<&T::DataContainer> {
        self.data_plugins
            .get(&TypeId::of::<T>())
            .and_then(|container| container.downcast_ref::<T::DataContainer>())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
