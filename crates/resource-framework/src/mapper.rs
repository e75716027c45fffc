//! # Property Mapper
//!
//! Converts an untyped [`PropertyBag`] into a statically declared target shape.
//!
//! Mapping is driven by the *source* value's runtime type and recurses through
//! the target:
//!
//! | Source    | Target                  | Effect                                          |
//! |-----------|-------------------------|-------------------------------------------------|
//! | any       | `Option<T>`             | allocate `T::default()` if absent, then recurse |
//! | boolean   | `bool`                  | assign                                          |
//! | integer   | `i8`..`i64`, `isize`    | assign                                          |
//! | string    | `bool`                  | `"true"` / `"false"`, anything else is an error |
//! | string    | `String`                | assign                                          |
//! | string    | integer                 | parse base 10, left unset when unparseable      |
//! | list      | `Vec<T>`                | fresh vector of the same length, element-wise   |
//! | keyed map | target shape            | every key must name a field, or mapping fails   |
//!
//! Every other combination is a no-op. The keyed-map rule is the one strict
//! guard: a misspelled or obsolete property name fails the whole mapping with
//! [`MapError::UnsupportedProperty`] instead of being dropped silently.
//!
//! ## Declaring target shapes
//!
//! ```rust
//! use resource_framework::mapper::reshape_props;
//! use resource_framework::target_shape;
//! use serde_json::json;
//!
//! target_shape! {
//!     pub struct Widget {
//!         pub name: Option<String>,
//!         pub count: i64,
//!     }
//! }
//!
//! let props = json!({ "Name": "widget", "Count": "5", "ServiceToken": "arn:token" });
//! let mut widget = Widget::default();
//! reshape_props(props.as_object().unwrap(), &mut widget).unwrap();
//!
//! assert_eq!(widget.name.as_deref(), Some("widget"));
//! assert_eq!(widget.count, 5);
//! ```
//!
//! Wire keys are the UpperCamelCase form of the field name. A field whose key
//! cannot be spelled that way takes an explicit override: `input_type = "Type": Option<String>`.

use crate::error::MapError;
use crate::message::{PropertyBag, SERVICE_TOKEN_KEY};
use serde_json::Value;

/// A value that can be populated in place from dynamic data.
pub trait Reshape {
    /// Populate `self` from `value`. `path` is the dotted location of `value`
    /// from the root (`""` at the root, `.A[0].B` below it).
    fn reshape(&mut self, value: &Value, path: &str) -> Result<(), MapError>;
}

/// A structure whose fields can be looked up by wire key.
///
/// Implemented by [`target_shape!`](crate::target_shape); there is rarely a
/// reason to implement it by hand.
pub trait Shape {
    fn field_mut(&mut self, key: &str) -> Option<&mut dyn Reshape>;
}

/// Map a top-level property bag into `out`.
///
/// The reserved `ServiceToken` key is skipped at this level only.
pub fn reshape_props<S: Shape + ?Sized>(props: &PropertyBag, out: &mut S) -> Result<(), MapError> {
    reshape_fields(
        out,
        props.iter().filter(|(key, _)| key.as_str() != SERVICE_TOKEN_KEY),
        "",
    )
}

/// The [`Reshape`] body shared by every target shape.
pub fn reshape_shape<S: Shape + ?Sized>(
    out: &mut S,
    value: &Value,
    path: &str,
) -> Result<(), MapError> {
    match value {
        Value::Object(map) => reshape_fields(out, map, path),
        _ => Ok(()),
    }
}

fn reshape_fields<'a, S: Shape + ?Sized>(
    out: &mut S,
    entries: impl IntoIterator<Item = (&'a String, &'a Value)>,
    path: &str,
) -> Result<(), MapError> {
    for (key, value) in entries {
        match out.field_mut(key) {
            Some(field) => field.reshape(value, &format!("{path}.{key}"))?,
            None => {
                return Err(MapError::UnsupportedProperty {
                    key: key.clone(),
                    path: path.to_string(),
                })
            }
        }
    }
    Ok(())
}

impl Reshape for bool {
    fn reshape(&mut self, value: &Value, path: &str) -> Result<(), MapError> {
        match value {
            Value::Bool(b) => *self = *b,
            Value::String(s) => match s.as_str() {
                "true" => *self = true,
                "false" => *self = false,
                _ => {
                    return Err(MapError::InvalidBoolean {
                        value: s.clone(),
                        path: path.to_string(),
                    })
                }
            },
            _ => {}
        }
        Ok(())
    }
}

macro_rules! reshape_integer {
    ($($ty:ty),*) => {
        $(
            impl Reshape for $ty {
                fn reshape(&mut self, value: &Value, _path: &str) -> Result<(), MapError> {
                    match value {
                        Value::Number(n) => {
                            if let Some(n) = n.as_i64() {
                                *self = n as $ty;
                            }
                        }
                        // Unparseable strings leave the field untouched.
                        Value::String(s) => {
                            if let Ok(n) = s.parse::<i64>() {
                                *self = n as $ty;
                            }
                        }
                        _ => {}
                    }
                    Ok(())
                }
            }
        )*
    };
}

reshape_integer!(i8, i16, i32, i64, isize);

impl Reshape for String {
    fn reshape(&mut self, value: &Value, _path: &str) -> Result<(), MapError> {
        if let Value::String(s) = value {
            self.clone_from(s);
        }
        Ok(())
    }
}

impl<T: Reshape + Default> Reshape for Option<T> {
    fn reshape(&mut self, value: &Value, path: &str) -> Result<(), MapError> {
        self.get_or_insert_with(T::default).reshape(value, path)
    }
}

impl<T: Reshape + Default> Reshape for Vec<T> {
    fn reshape(&mut self, value: &Value, path: &str) -> Result<(), MapError> {
        if let Value::Array(items) = value {
            let mut elements = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let mut element = T::default();
                element.reshape(item, &format!("{path}[{i}]"))?;
                elements.push(element);
            }
            *self = elements;
        }
        Ok(())
    }
}

/// Opaque pass-through: the source subtree is copied verbatim and not validated.
impl Reshape for Value {
    fn reshape(&mut self, value: &Value, _path: &str) -> Result<(), MapError> {
        self.clone_from(value);
        Ok(())
    }
}

/// Declare a target shape.
///
/// Generates the struct (deriving `Debug`, `Default`, `Clone` and `PartialEq`
/// on top of any attributes given) together with its [`Shape`] and
/// [`Reshape`] impls.
#[macro_export]
macro_rules! target_shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident $(= $key:literal)? : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::mapper::Shape for $name {
            #[allow(unused_variables)]
            fn field_mut(
                &mut self,
                key: &str,
            ) -> ::std::option::Option<&mut dyn $crate::mapper::Reshape> {
                $(
                    if key == $crate::__shape_key!($field $(= $key)?) {
                        return ::std::option::Option::Some(&mut self.$field);
                    }
                )*
                ::std::option::Option::None
            }
        }

        impl $crate::mapper::Reshape for $name {
            fn reshape(
                &mut self,
                value: &$crate::serde_json::Value,
                path: &str,
            ) -> ::std::result::Result<(), $crate::error::MapError> {
                $crate::mapper::reshape_shape(self, value, path)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shape_key {
    ($field:ident = $key:literal) => {
        $key
    };
    ($field:ident) => {
        $crate::paste::paste! { stringify!([<$field:camel>]) }
    };
}
