//! Externally registered per-type encode/decode overrides.
//!
//! An [`Override<T>`] replaces the default representation of exactly `T`.
//! Overrides are keyed by [`TypeId`]; there is no matching through wrapper
//! types, so an override for `Point` is not consulted for `Vec<Point>`
//! itself, only for each `Point` element inside it.
//!
//! A registry belongs to a [`Codec`](crate::Codec). Mutating it requires
//! `&mut`, so registration cannot race with an encode or decode that borrows
//! the same codec.
//!
//! # Example
//!
//! ```ignore
//! use binform_serialize::{Decoder, Encoder, Override, OverrideRegistry, Result};
//!
//! struct Celsius(f32);
//!
//! struct AsTenths;
//!
//! impl Override<Celsius> for AsTenths {
//!     fn encode(&self, value: &Celsius, encoder: &mut dyn Encoder) -> Result<()> {
//!         encoder.emit_i16((value.0 * 10.0) as i16)
//!     }
//!
//!     fn decode(&self, decoder: &mut dyn Decoder) -> Result<Celsius> {
//!         Ok(Celsius(f32::from(decoder.read_i16()?) / 10.0))
//!     }
//! }
//!
//! let mut registry = OverrideRegistry::new();
//! registry.insert::<Celsius, _>(AsTenths);
//! assert!(registry.contains::<Celsius>());
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use crate::{decode::Decoder, encode::Encoder, error::Result};

/// A caller-supplied encode/decode pair for one type.
///
/// `decode` must consume exactly the bytes `encode` produces. Failures of the
/// override's own making should be reported with
/// [`Error::override_failed`](crate::Error::override_failed); codec errors
/// raised by the encoder or decoder pass through unchanged.
pub trait Override<T>: Send + Sync + 'static {
    /// Writes `value`.
    ///
    /// # Errors
    ///
    /// Whatever the override or the sink reports.
    fn encode(&self, value: &T, encoder: &mut dyn Encoder) -> Result<()>;

    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Whatever the override or the source reports.
    fn decode(&self, decoder: &mut dyn Decoder) -> Result<T>;
}

struct Entry {
    type_name: &'static str,

    /// Always an `Arc<dyn Override<T>>` for the keyed `T`.
    handler: Box<dyn Any + Send + Sync>,
}

/// Mapping from a type to at most one [`Override`] for it.
#[derive(Default)]
pub struct OverrideRegistry {
    overrides: HashMap<TypeId, Entry>,
}

impl OverrideRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self { Self { overrides: HashMap::new() } }

    /// Replaces the override for `T`, or removes it when `handler` is
    /// `None`.
    ///
    /// # Returns
    ///
    /// The previously registered override, if any.
    pub fn register<T: 'static>(
        &mut self,
        handler: Option<Arc<dyn Override<T>>>,
    ) -> Option<Arc<dyn Override<T>>> {
        let previous = match handler {
            Some(handler) => self.overrides.insert(TypeId::of::<T>(), Entry {
                type_name: std::any::type_name::<T>(),
                handler: Box::new(handler),
            }),
            None => self.overrides.remove(&TypeId::of::<T>()),
        };

        previous.and_then(|entry| {
            entry
                .handler
                .downcast::<Arc<dyn Override<T>>>()
                .ok()
                .map(|boxed| *boxed)
        })
    }

    /// Registers `handler` for `T`, replacing any existing override.
    pub fn insert<T: 'static, O: Override<T>>(
        &mut self,
        handler: O,
    ) -> Option<Arc<dyn Override<T>>> {
        self.register::<T>(Some(Arc::new(handler)))
    }

    /// Registers a default-constructed `O` for `T`.
    pub fn insert_default<T: 'static, O: Override<T> + Default>(
        &mut self,
    ) -> Option<Arc<dyn Override<T>>> {
        self.insert::<T, O>(O::default())
    }

    /// Removes the override for `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<Arc<dyn Override<T>>> {
        self.register::<T>(None)
    }

    /// Returns the override registered for exactly `T`.
    #[must_use]
    pub fn resolve<T: 'static>(&self) -> Option<&dyn Override<T>> {
        self.overrides
            .get(&TypeId::of::<T>())
            .and_then(|entry| {
                entry.handler.downcast_ref::<Arc<dyn Override<T>>>()
            })
            .map(|handler| &**handler)
    }

    /// Returns `true` if an override is registered for `T`.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.overrides.contains_key(&TypeId::of::<T>())
    }

    /// Names of every type that currently has an override.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.overrides.values().map(|entry| entry.type_name)
    }

    /// Returns the number of registered overrides.
    #[must_use]
    pub fn len(&self) -> usize { self.overrides.len() }

    /// Returns `true` if no override is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.overrides.is_empty() }

    /// Removes every override.
    pub fn clear(&mut self) { self.overrides.clear(); }
}

impl std::fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.type_names().collect();
        names.sort_unstable();

        f.debug_struct("OverrideRegistry").field("types", &names).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    struct Fixed(u8);

    impl Override<u32> for Fixed {
        fn encode(&self, _value: &u32, encoder: &mut dyn Encoder) -> Result<()> {
            encoder.emit_u8(self.0)
        }

        fn decode(&self, decoder: &mut dyn Decoder) -> Result<u32> {
            Ok(u32::from(decoder.read_u8()?))
        }
    }

    #[derive(Default)]
    struct Failing;

    impl Override<String> for Failing {
        fn encode(&self, _value: &String, _: &mut dyn Encoder) -> Result<()> {
            Err(Error::override_failed::<String>("refused"))
        }

        fn decode(&self, _: &mut dyn Decoder) -> Result<String> {
            Err(Error::override_failed::<String>("refused"))
        }
    }

    #[test]
    fn register_replaces_and_returns_previous() {
        let mut registry = OverrideRegistry::new();
        assert!(registry.insert::<u32, _>(Fixed(1)).is_none());
        assert!(registry.insert::<u32, _>(Fixed(2)).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registering_none_removes() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<u32, _>(Fixed(1));

        assert!(registry.register::<u32>(None).is_some());
        assert!(!registry.contains::<u32>());
        assert!(registry.resolve::<u32>().is_none());
        assert!(registry.register::<u32>(None).is_none());
    }

    #[test]
    fn keyed_by_exact_type() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<u32, _>(Fixed(1));

        assert!(registry.resolve::<u32>().is_some());
        assert!(registry.resolve::<Vec<u32>>().is_none());
        assert!(registry.resolve::<Option<u32>>().is_none());
        assert!(registry.resolve::<i32>().is_none());
    }

    #[test]
    fn insert_default_and_names() {
        let mut registry = OverrideRegistry::new();
        registry.insert_default::<String, Failing>();
        registry.insert::<u32, _>(Fixed(7));

        let mut names: Vec<_> = registry.type_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["alloc::string::String", "u32"]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn debug_lists_types() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<u32, _>(Fixed(7));

        assert_eq!(format!("{registry:?}"), "OverrideRegistry { types: [\"u32\"] }");
    }
}
