//! Helper macro for declaring port error enums.
//!
//! Each variant gets a snake_case constructor whose parameters accept
//! anything convertible into the field type, so adapters can write
//! `UserPersistenceError::query("...")` instead of building the struct.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    /// Construct this variant from convertible field values.
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unavailable { message: String } => "unavailable: {message}",
            Rejected { attempts: u32 } => "rejected after {attempts} attempts",
            Partial { message: String, attempts: u32 } => "{message} ({attempts})",
        }
    }

    #[test]
    fn constructors_accept_borrowed_strings() {
        assert_eq!(
            SamplePortError::unavailable("pool drained").to_string(),
            "unavailable: pool drained"
        );
    }

    #[test]
    fn constructors_keep_non_string_fields() {
        assert_eq!(
            SamplePortError::rejected(3_u32),
            SamplePortError::Rejected { attempts: 3 }
        );
    }

    #[test]
    fn constructors_take_fields_in_declaration_order() {
        assert_eq!(SamplePortError::partial("halfway", 2_u32).to_string(), "halfway (2)");
    }
}
