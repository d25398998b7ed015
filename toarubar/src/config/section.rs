//! Configuration sections.

use std::any::Any;

/// An object that can act as a section in the plugin configuration.
///
/// Values in a section are normally written through whatever typed setter
/// the section provides, but they can be read back generically by name,
/// which is how tooling and diagnostics inspect the configuration without
/// knowing every type up front.
///
/// # Retrieving Arbitrary Values
///
/// One of `ConfigSection`'s required methods is `get_key`, which
/// returns a dynamically typed trait object (i.e. `&dyn Any`).
///
/// It is then up to the caller to see if this object is of the
/// needed type, by calling [`downcast_ref`][1] on it:
///
/// ```rust
/// use toarubar::config::{BarConfig, ConfigSection};
///
/// let config = BarConfig::default();
///
/// let Some(val) = config.get_key("bar_height") else {
///     panic!("no bar_height");
/// };
/// assert_eq!(val.downcast_ref::<i64>(), Some(&15));
/// ```
///
/// A provided method, `get_key_static`, does this call for you,
/// but the trade-off is that it cannot be called on a trait object.
///
/// [1]: https://doc.rust-lang.org/std/any/trait.Any.html#method.downcast_ref
pub trait ConfigSection {
    /// Retrieve arbitrary key value pairs from storage.
    ///
    /// Should return None if the key does not exist in storage.
    fn get_key(&self, key: &str) -> Option<&dyn Any>;

    /// Retrieve a subsection for this section.
    ///
    /// Should return None if the subsection does not exist.
    fn subsection(&self, name: &str) -> Option<&dyn ConfigSection>;

    /// The names of every key exposed by this section, in declaration order.
    fn keys(&self) -> &'static [&'static str];

    /// A monomorphizable, easier-to-use version of `get_key`.
    ///
    /// This method cannot be called on a trait object.
    fn get_key_static<V: Any>(&self, key: &str) -> Option<&V>
    where
        Self: Sized,
    {
        self.get_key(key).and_then(|v| v.downcast_ref::<V>())
    }
}
