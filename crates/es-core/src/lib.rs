#![deny(missing_docs)]
#![doc = "Common parameters and the defaulting/report machinery shared by the ES fit (Synapps) and synthesis (Synpp) configuration schemas."]

/// Struct-of-arrays column validation.
pub mod columns;
/// Grid, opacity, source and spectrum parameters.
pub mod common;
pub mod errors;
/// Species identifiers.
pub mod ion;
pub mod report;
/// YAML/JSON document helpers.
pub mod serde;

pub use columns::{export_column, take_column};
pub use common::{
    Grid, GridParams, Opacity, OpacityForm, OpacityParams, Source, SourceParams, Spectrum,
    SpectrumParams, DEFAULT_DATA_DIR,
};
pub use errors::{ErrorInfo, EsError};
pub use ion::IonId;
pub use report::{Field, Scalar};

/// A configuration component built from an optional partial document.
///
/// `create(None)` and `create(Some(Params::default()))` both yield
/// [`Default::default`]; any field left out of a partial document takes the
/// default at that position, recursively for nested components.
pub trait Component: Sized + Default {
    /// Key under which the component appears in documents and reports.
    const NAME: &'static str;

    /// Partial document accepted by [`Component::create`].
    type Params: Default + ::serde::Serialize + ::serde::de::DeserializeOwned;

    /// Builds the component from a partial document, filling defaults.
    fn from_params(params: Self::Params) -> Result<Self, EsError>;

    /// Fully specified document that rebuilds an equal component.
    fn to_params(&self) -> Self::Params;

    /// Fixed-column report text.
    fn render(&self) -> String;

    /// Builds the component, falling back to the canonical default when no
    /// document is supplied.
    fn create(params: Option<Self::Params>) -> Result<Self, EsError> {
        match params {
            Some(params) => Self::from_params(params),
            None => {
                tracing::debug!(component = Self::NAME, "no parameters supplied, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Implements [`std::fmt::Display`] through [`Component::render`].
#[macro_export]
macro_rules! impl_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str(&<$ty as $crate::Component>::render(self))
                }
            }
        )+
    };
}
