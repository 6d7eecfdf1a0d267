use super::LayerInfoDesk;
use nalgebra::RealField;

#[derive(Debug, serde::Deserialize)]
#[non_exhaustive]
/// Enum with all implemented material types
///
/// As materials may be added in future this is labelled as `non_exhaustive`
pub(crate) enum Material {
    HexagonalBoronNitride,
    Graphene,
    IndiumSelenide,
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Material::HexagonalBoronNitride => {
                write!(f, "hBN")
            }
            Material::Graphene => {
                write!(f, "graphene")
            }
            Material::IndiumSelenide => {
                write!(f, "InSe")
            }
        }
    }
}

impl Material {
    /// Builds an instance of `LayerInfoDesk` for the given `Material` variant
    pub(crate) fn get_info<T: RealField>(&self) -> LayerInfoDesk<T> {
        match self {
            Material::HexagonalBoronNitride => LayerInfoDesk::hexagonal_boron_nitride(),
            Material::Graphene => LayerInfoDesk::graphene(),
            Material::IndiumSelenide => LayerInfoDesk::indium_selenide(),
        }
    }
}

impl<T: RealField> LayerInfoDesk<T> {
    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    fn hexagonal_boron_nitride() -> Self {
        Self {
            dielectric_constant: 3.76,
            electron_affinity: 2.0,
            band_gap: 5.955,
            effective_mass_ratio: 2.21,
        }
    }

    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    fn graphene() -> Self {
        // epsilon out-of-plane is 2.5 for SL, 2.6 BL, estimate 3 for multilayer.
        // The affinity entry holds the Dirac point.
        Self {
            dielectric_constant: 3.0,
            electron_affinity: 4.5,
            band_gap: 0.0,
            effective_mass_ratio: 0.012,
        }
    }

    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    fn indium_selenide() -> Self {
        // see Politano et al, 2016
        Self {
            dielectric_constant: 8.0,
            electron_affinity: 4.55,
            band_gap: 1.4,
            effective_mass_ratio: 0.143,
        }
    }
}
