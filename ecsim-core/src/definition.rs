//! Named parameter definitions
//!
//! Parameters are referenced by their full name, including the unit, e.g.
//! `"Electrode height [m]"`. [`define_parameter!`] declares such a name once as a
//! static [`ParameterDefinition`] so that templates and parameter tables agree on
//! the spelling. Every definition declared this way is collected at program start
//! and can be listed with [`registered_parameters`].
//!
//! ```rust
//! use ecsim_core::define_parameter;
//! use ecsim_core::definition::find_definition;
//!
//! define_parameter!(
//!     PARAM_SEPARATOR_THICKNESS,
//!     name = "Separator thickness [m]",
//!     unit = "m",
//!     description = "Thickness of the separator between the electrodes",
//! );
//!
//! let symbol = PARAM_SEPARATOR_THICKNESS.symbol();
//! assert_eq!(symbol.to_string(), "Separator thickness [m]");
//! assert_eq!(find_definition("Separator thickness [m]").unwrap().unit, "m");
//! ```

use crate::symbol::Symbol;
use std::fmt;

/// Static metadata for a named parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    /// Name used as the key in a parameter table
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

impl ParameterDefinition {
    pub const fn new(name: &'static str, unit: &'static str, description: &'static str) -> Self {
        Self {
            name,
            unit,
            description,
        }
    }

    /// Reference to this parameter
    pub fn symbol(&self) -> Symbol {
        Symbol::parameter(self.name)
    }

    /// Call of this parameter as a function of `input`
    pub fn call(&self, input: Symbol) -> Symbol {
        Symbol::function_parameter(self.name, vec![input])
    }
}

impl fmt::Display for ParameterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

inventory::collect!(ParameterDefinition);

/// Every definition declared with [`define_parameter!`], in no particular order
pub fn registered_parameters() -> impl Iterator<Item = &'static ParameterDefinition> {
    inventory::iter::<ParameterDefinition>.into_iter()
}

pub fn find_definition(name: &str) -> Option<&'static ParameterDefinition> {
    registered_parameters().find(|definition| definition.name == name)
}

/// Declare a static [`ParameterDefinition`] and register it.
///
/// The crate using the macro must depend on `inventory`.
#[macro_export]
macro_rules! define_parameter {
    (
        $param_name:ident,
        name = $name:expr,
        unit = $unit:expr,
        description = $desc:expr $(,)?
    ) => {
        #[doc = concat!("Parameter definition for ", $name)]
        pub static $param_name: $crate::definition::ParameterDefinition =
            $crate::definition::ParameterDefinition::new($name, $unit, $desc);

        ::inventory::submit! { $param_name }
    };
}

pub use crate::define_parameter;
