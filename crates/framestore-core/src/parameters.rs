//! Generic key/value parameters attached to every entry.
//!
//! Each entry of a category carries a parameter block next to its
//! collections: named vectors of `i32`, `f32`, `f64`, or `String` values.
//! Access is typed through the sealed [`ParameterValue`] trait, so
//! `params.get::<f64>("beam_energy")` only ever looks at double parameters.

use std::collections::BTreeMap;

mod sealed {
    pub trait Sealed {}
}

/// Value types that can be stored in [`GenericParameters`].
///
/// Implemented for `i32`, `f32`, `f64`, and `String`; sealed.
pub trait ParameterValue: sealed::Sealed + Clone + 'static {
    /// Name of the value kind as used in storage column names.
    const KIND: &'static str;

    #[doc(hidden)]
    fn values(params: &GenericParameters) -> &BTreeMap<String, Vec<Self>>;

    #[doc(hidden)]
    fn values_mut(params: &mut GenericParameters) -> &mut BTreeMap<String, Vec<Self>>;
}

macro_rules! impl_parameter_value {
    ($ty:ty, $kind:literal, $field:ident) => {
        impl sealed::Sealed for $ty {}

        impl ParameterValue for $ty {
            const KIND: &'static str = $kind;

            fn values(params: &GenericParameters) -> &BTreeMap<String, Vec<Self>> {
                &params.$field
            }

            fn values_mut(params: &mut GenericParameters) -> &mut BTreeMap<String, Vec<Self>> {
                &mut params.$field
            }
        }
    };
}

impl_parameter_value!(i32, "int", ints);
impl_parameter_value!(f32, "float", floats);
impl_parameter_value!(f64, "double", doubles);
impl_parameter_value!(String, "string", strings);

/// The parameter block of one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericParameters {
    ints: BTreeMap<String, Vec<i32>>,
    floats: BTreeMap<String, Vec<f32>>,
    doubles: BTreeMap<String, Vec<f64>>,
    strings: BTreeMap<String, Vec<String>>,
}

impl GenericParameters {
    /// Create an empty parameter block.
    pub fn new() -> Self {
        Self::default()
    }

    /// All values stored under `key` for value type `T`.
    pub fn get<T: ParameterValue>(&self, key: &str) -> Option<&[T]> {
        T::values(self).get(key).map(Vec::as_slice)
    }

    /// The first value stored under `key` for value type `T`.
    pub fn first<T: ParameterValue>(&self, key: &str) -> Option<&T> {
        self.get::<T>(key).and_then(<[T]>::first)
    }

    /// Store `values` under `key`, replacing previous values of the same type.
    pub fn set<T: ParameterValue>(&mut self, key: impl Into<String>, values: impl Into<Vec<T>>) {
        T::values_mut(self).insert(key.into(), values.into());
    }

    /// Keys that hold values of type `T`, sorted.
    pub fn keys<T: ParameterValue>(&self) -> Vec<&str> {
        T::values(self).keys().map(String::as_str).collect()
    }

    /// Total number of keys across all value types.
    pub fn len(&self) -> usize {
        self.ints.len() + self.floats.len() + self.doubles.len() + self.strings.len()
    }

    /// Whether no parameter of any type is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
