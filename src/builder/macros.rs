//! Macros for ergonomic state definitions.

/// Generate a `State` implementation for enums of unit variants.
///
/// The generated enum derives `Clone`, `PartialEq`, `Eq` and `Debug`, names
/// each state after its variant, and keeps the default no-op hooks. States
/// that own resources or need hooks implement `State` by hand instead.
///
/// # Example
///
/// ```
/// use statehouse::state_enum;
/// use statehouse::core::State;
///
/// state_enum! {
///     pub enum PermissionStatus {
///         NotDetermined,
///         Allowed,
///         Denied,
///     }
/// }
///
/// assert_eq!(PermissionStatus::Denied.name(), "Denied");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn state_enum_supports_visibility() {
        // The macro should work with pub visibility
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        let _state = PublicState::A;
        assert_ne!(PublicState::A, PublicState::B);
    }

    #[tokio::test]
    async fn generated_states_keep_noop_hooks() {
        state_enum! {
            enum MinimalState {
                One,
            }
        }

        assert!(MinimalState::One.before_creating_new_state().await.is_ok());
        assert!(MinimalState::One.after_new_state_is_set().await.is_ok());
    }
}
