//! Compile-time accessor generation
//!
//! [`simple_struct!`](crate::simple_struct) declares a newtype over a shared
//! [`Instance`](crate::Instance) with one accessor method per attribute:
//!
//! ```
//! use attrkit_core::{simple_struct, DefaultProvider, Value};
//!
//! simple_struct! {
//!     /// A resource type with a lifecycle hook
//!     pub struct ResourceType {
//!         attribute identity = DefaultProvider::nil();
//!         boolean_attribute enabled = true;
//!         block_attribute on_load;
//!     }
//! }
//!
//! let base = ResourceType::new();
//! base.identity().set("file").unwrap();
//!
//! let derived = ResourceType::subtype_of(&base);
//! assert_eq!(derived.identity().get().unwrap(), Value::from("file"));
//! assert!(derived.enabled().predicate().unwrap());
//! ```

#[macro_export]
macro_rules! simple_struct {
    (@define $schema:ident attribute $field:ident = $default:expr) => {
        $schema.define_attribute(stringify!($field), $default);
    };
    (@define $schema:ident attribute $field:ident) => {
        $schema.define_attribute(stringify!($field), $crate::DefaultProvider::nil());
    };
    (@define $schema:ident boolean_attribute $field:ident = $default:expr) => {
        $schema.define_boolean_attribute(stringify!($field), $default);
    };
    (@define $schema:ident boolean_attribute $field:ident) => {
        $schema.define_boolean_attribute(stringify!($field), $crate::DefaultProvider::nil());
    };
    (@define $schema:ident block_attribute $field:ident) => {
        $schema.define_block_attribute(stringify!($field));
    };

    (@handle attribute $field:ident) => {
        $crate::Attribute::named(stringify!($field))
    };
    (@handle boolean_attribute $field:ident) => {
        $crate::BooleanAttribute::named(stringify!($field))
    };
    (@handle block_attribute $field:ident) => {
        $crate::BlockAttribute::named(stringify!($field))
    };

    (@bound attribute) => { $crate::Bound<'_, $crate::Attribute> };
    (@bound boolean_attribute) => { $crate::Bound<'_, $crate::BooleanAttribute> };
    (@bound block_attribute) => { $crate::Bound<'_, $crate::BlockAttribute> };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $flavor:ident $field:ident $(= $default:expr)?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            instance: ::std::rc::Rc<$crate::Instance>,
        }

        impl $name {
            /// Schema declaring this struct's attributes
            pub fn schema() -> ::std::rc::Rc<$crate::Schema> {
                let mut schema = $crate::Schema::new(stringify!($name));
                $( $crate::simple_struct!(@define schema $flavor $field $(= $default)?); )*
                ::std::rc::Rc::new(schema)
            }

            pub fn new() -> Self {
                Self {
                    instance: ::std::rc::Rc::new($crate::Instance::new(Self::schema())),
                }
            }

            /// A new value whose unset attributes fall back to `supertype`
            pub fn subtype_of(supertype: &Self) -> Self {
                Self {
                    instance: ::std::rc::Rc::new($crate::Instance::with_supertype(
                        Self::schema(),
                        supertype.instance.clone(),
                    )),
                }
            }

            pub fn instance(&self) -> &::std::rc::Rc<$crate::Instance> {
                &self.instance
            }

            $(
                $(#[$field_meta])*
                pub fn $field(&self) -> $crate::simple_struct!(@bound $flavor) {
                    $crate::simple_struct!(@handle $flavor $field).bind(&self.instance)
                }
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
