//! # Render Mode Options
//!
//! Typed extraction of primitive configuration from an [`OptionBag`].
//!
//! A bag maps option names to a value or a fixed-size tuple of values. A
//! primitive asks for an option by name together with the Rust type it expects,
//! and gets back one of three outcomes:
//!
//! * `Ok(Some(value))` - the option was set and has the requested shape
//! * `Ok(None)` - the option was not provided; the primitive keeps its default
//! * `Err(OptionTypeError)` - the option was set but has the wrong shape
//!
//! Single values are treated as one-element tuples, so asking for `i64`
//! accepts both `5` and `[5]`, and every format is matched against a slice of
//! values the same way.
//!
//! ```
//! use voxel_rendermodes::rendermodes::options::{parse_option, OptionBag};
//!
//! let mut bag = OptionBag::new();
//! bag.insert("color", (1, 2, 3));
//!
//! let color: Option<(i64, i64, i64)> = parse_option(Some(&bag), "color").unwrap();
//! assert_eq!(color, Some((1, 2, 3)));
//!
//! let missing: Option<f64> = parse_option(Some(&bag), "alpha").unwrap();
//! assert_eq!(missing, None);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single configuration value.
///
/// Deserializes from JSON without tags: booleans, integers, floats, strings,
/// and arrays (which become tuples).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered, fixed-size group of values.
    Tuple(Vec<OptionValue>),
}

impl OptionValue {
    /// Short name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::Tuple(_) => "tuple",
        }
    }

    /// Describes the shape of this value, recursing into tuples.
    pub fn describe(&self) -> String {
        match self {
            OptionValue::Tuple(values) => {
                let slots: Vec<String> = values.iter().map(OptionValue::describe).collect();
                format!("({})", slots.join(", "))
            }
            other => other.type_name().to_owned(),
        }
    }
}

macro_rules! impl_from_for_option_value {
    ($($source:ty => $variant:ident as $target:ty),+ $(,)?) => {
        $(
            impl From<$source> for OptionValue {
                fn from(value: $source) -> Self {
                    OptionValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_for_option_value! {
    bool => Bool as bool,
    i64 => Int as i64,
    i32 => Int as i64,
    u32 => Int as i64,
    u8 => Int as i64,
    f64 => Float as f64,
    f32 => Float as f64,
    String => Str as String,
    &str => Str as String,
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(values: Vec<OptionValue>) -> Self {
        OptionValue::Tuple(values)
    }
}

macro_rules! impl_from_tuple_for_option_value {
    ($($slot:ident $value:ident),+) => {
        impl<$($slot: Into<OptionValue>),+> From<($($slot,)+)> for OptionValue {
            fn from(($($value,)+): ($($slot,)+)) -> Self {
                OptionValue::Tuple(vec![$($value.into()),+])
            }
        }
    };
}

impl_from_tuple_for_option_value!(A a, B b);
impl_from_tuple_for_option_value!(A a, B b, C c);
impl_from_tuple_for_option_value!(A a, B b, C c, D d);

/// Option values supplied for one primitive, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionBag {
    values: BTreeMap<String, OptionValue>,
}

impl OptionBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Returns the raw value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Number of options in the bag.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bag holds no options.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Typed lookup, see [`parse_option`].
    pub fn parse<T: OptionFormat>(&self, name: &str) -> Result<Option<T>, OptionTypeError> {
        parse_option(Some(self), name)
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// An option was present but did not match the requested format.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("rendermode option \"{option}\" has incorrect type (expected {expected}, found {found})")]
pub struct OptionTypeError {
    /// Name of the offending option.
    pub option: String,
    /// The format that was requested.
    pub expected: String,
    /// The shape that was actually stored.
    pub found: String,
}

/// A type that can fill one slot of an option tuple.
pub trait OptionSlot: Sized {
    /// Name of the slot type in error messages.
    const TYPE_NAME: &'static str;

    /// Converts `value`, or returns `None` if it is not of this type.
    fn from_value(value: &OptionValue) -> Option<Self>;
}

/// A complete option format: an arity plus one [`OptionSlot`] type per position.
///
/// Implemented for the scalar slot types (arity 1), tuples of two to four
/// slots, and arrays `[S; N]`.
pub trait OptionFormat: Sized {
    /// Human readable description of the format.
    fn expected() -> String;

    /// Unpacks `values`, or returns `None` if arity or a slot type disagrees.
    fn from_tuple(values: &[OptionValue]) -> Option<Self>;
}

macro_rules! impl_integer_slot {
    ($($int:ty => $name:literal),+ $(,)?) => {
        $(
            impl OptionSlot for $int {
                const TYPE_NAME: &'static str = $name;

                fn from_value(value: &OptionValue) -> Option<Self> {
                    match value {
                        OptionValue::Int(int) => <$int>::try_from(*int).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_integer_slot! {
    i64 => "integer",
    i32 => "32-bit integer",
    u32 => "unsigned 32-bit integer",
    u16 => "unsigned 16-bit integer",
    u8 => "integer in 0..=255",
}

impl OptionSlot for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Float(float) => Some(*float),
            OptionValue::Int(int) => Some(*int as f64),
            _ => None,
        }
    }
}

impl OptionSlot for f32 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &OptionValue) -> Option<Self> {
        f64::from_value(value).map(|float| float as f32)
    }
}

impl OptionSlot for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl OptionSlot for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Str(string) => Some(string.clone()),
            _ => None,
        }
    }
}

macro_rules! impl_scalar_format {
    ($($scalar:ty),+ $(,)?) => {
        $(
            impl OptionFormat for $scalar {
                fn expected() -> String {
                    <$scalar as OptionSlot>::TYPE_NAME.to_owned()
                }

                fn from_tuple(values: &[OptionValue]) -> Option<Self> {
                    match values {
                        [value] => <$scalar as OptionSlot>::from_value(value),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_scalar_format!(i64, i32, u32, u16, u8, f64, f32, bool, String);

macro_rules! impl_tuple_format {
    ($($slot:ident $value:ident),+) => {
        impl<$($slot: OptionSlot),+> OptionFormat for ($($slot,)+) {
            fn expected() -> String {
                let slots = [$($slot::TYPE_NAME),+];
                format!("({})", slots.join(", "))
            }

            fn from_tuple(values: &[OptionValue]) -> Option<Self> {
                let [$($value),+] = values else {
                    return None;
                };
                Some(($($slot::from_value($value)?,)+))
            }
        }
    };
}

impl_tuple_format!(A a, B b);
impl_tuple_format!(A a, B b, C c);
impl_tuple_format!(A a, B b, C c, D d);

impl<S: OptionSlot, const N: usize> OptionFormat for [S; N] {
    fn expected() -> String {
        format!("[{}; {}]", S::TYPE_NAME, N)
    }

    fn from_tuple(values: &[OptionValue]) -> Option<Self> {
        if values.len() != N {
            return None;
        }
        let slots = values
            .iter()
            .map(S::from_value)
            .collect::<Option<Vec<S>>>()?;
        slots.try_into().ok()
    }
}

/// Reads option `name` from `bag` as a `T`.
///
/// Returns `Ok(None)` when there is no bag or the bag has no such option. Every
/// name, `""` included, is an ordinary key. A value that is not a tuple is
/// matched as a one-element tuple.
///
/// # Errors
/// [`OptionTypeError`] naming the option, the requested format and the stored
/// shape when they disagree.
pub fn parse_option<T: OptionFormat>(
    bag: Option<&OptionBag>,
    name: &str,
) -> Result<Option<T>, OptionTypeError> {
    let Some(bag) = bag else {
        return Ok(None);
    };
    let Some(value) = bag.get(name) else {
        return Ok(None);
    };

    let slots = match value {
        OptionValue::Tuple(values) => values.as_slice(),
        single => std::slice::from_ref(single),
    };

    T::from_tuple(slots).map(Some).ok_or_else(|| OptionTypeError {
        option: name.to_owned(),
        expected: T::expected(),
        found: value.describe(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_bag(value: impl Into<OptionValue>) -> OptionBag {
        let mut bag = OptionBag::new();
        bag.insert("color", value);
        bag
    }

    #[test]
    fn three_integers_are_extracted_in_order() {
        let bag = color_bag((1, 2, 3));
        let color = parse_option::<(i64, i64, i64)>(Some(&bag), "color").unwrap();
        assert_eq!(color, Some((1, 2, 3)));

        let array = parse_option::<[u8; 3]>(Some(&bag), "color").unwrap();
        assert_eq!(array, Some([1, 2, 3]));
    }

    #[test]
    fn missing_option_is_not_provided() {
        let bag = OptionBag::new();
        assert_eq!(parse_option::<(i64, i64, i64)>(Some(&bag), "color"), Ok(None));
        assert_eq!(parse_option::<i64>(None, "color"), Ok(None));
        assert_eq!(parse_option::<i64>(Some(&color_bag(1)), ""), Ok(None));
    }

    #[test]
    fn empty_name_is_looked_up_like_any_other() {
        let mut bag = color_bag(1);
        bag.insert("", 5);
        assert_eq!(parse_option::<i64>(Some(&bag), ""), Ok(Some(5)));
        assert_eq!(parse_option::<i64>(Some(&bag), "color"), Ok(Some(1)));
    }

    #[test]
    fn string_for_integer_tuple_is_a_type_mismatch() {
        let bag = color_bag("red");
        let err = parse_option::<(i64, i64, i64)>(Some(&bag), "color").unwrap_err();
        assert_eq!(err.option, "color");
        assert_eq!(err.found, "string");
        assert_eq!(err.expected, "(integer, integer, integer)");
        assert!(err.to_string().contains("\"color\""));
    }

    #[test]
    fn scalars_are_wrapped_into_single_element_tuples() {
        let bag = color_bag(7);
        assert_eq!(parse_option::<i64>(Some(&bag), "color"), Ok(Some(7)));

        let explicit = color_bag(vec![OptionValue::Int(7)]);
        assert_eq!(parse_option::<i64>(Some(&explicit), "color"), Ok(Some(7)));
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let bag = color_bag((1, 2));
        let err = parse_option::<i64>(Some(&bag), "color").unwrap_err();
        assert_eq!(err.found, "(integer, integer)");

        let err = parse_option::<[i64; 3]>(Some(&bag), "color").unwrap_err();
        assert_eq!(err.expected, "[integer; 3]");
    }

    #[test]
    fn integers_widen_to_floats_but_do_not_overflow_narrow_slots() {
        let bag = color_bag(2);
        assert_eq!(parse_option::<f32>(Some(&bag), "color"), Ok(Some(2.0)));

        let too_big = color_bag(300);
        assert!(parse_option::<u8>(Some(&too_big), "color").is_err());
    }

    #[test]
    fn bag_deserializes_from_json() {
        let bag: OptionBag =
            serde_json::from_str(r#"{"min": 0, "scale": 0.5, "color": [1, 2, 3], "name": "x", "on": true}"#)
                .unwrap();
        assert_eq!(bag.len(), 5);
        assert_eq!(bag.get("min"), Some(&OptionValue::Int(0)));
        assert_eq!(bag.get("scale"), Some(&OptionValue::Float(0.5)));
        assert_eq!(bag.get("on"), Some(&OptionValue::Bool(true)));
        assert_eq!(bag.parse::<(u8, u8, u8)>("color"), Ok(Some((1, 2, 3))));
        assert_eq!(bag.parse::<String>("name"), Ok(Some("x".to_owned())));
    }
}
