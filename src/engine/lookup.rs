use crate::error::VolumeError;

/// FIA species codes for the species this crate ships equations for.
/// (code, abbreviation, common name)
const FIA_SPECIES: &[(u16, &str, &str)] = &[
    (11, "PSF", "Pacific silver fir"),
    (17, "GF", "Grand fir"),
    (22, "NF", "Noble fir"),
    (98, "SS", "Sitka spruce"),
    (108, "LP", "Lodgepole pine"),
    (122, "PP", "Ponderosa pine"),
    (202, "DF", "Douglas-fir"),
    (242, "WRC", "Western redcedar"),
    (263, "WH", "Western hemlock"),
    (351, "RA", "Red alder"),
];

/// Resolve a species abbreviation (e.g. "DF") to its FIA code.
pub fn species_code(abbrev: &str) -> Result<u16, VolumeError> {
    let upper = abbrev.to_uppercase();
    FIA_SPECIES
        .iter()
        .find(|(_, abbv, _)| *abbv == upper)
        .map(|(code, _, _)| *code)
        .ok_or_else(|| VolumeError::UnknownSpecies(abbrev.to_string()))
}

/// Resolve an FIA code to its abbreviation.
pub fn species_abbrev(code: u16) -> Option<&'static str> {
    FIA_SPECIES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, abbv, _)| *abbv)
}

/// Default-equation lookup contract: species plus geographic identifiers
/// yield a fixed-width ten-character equation identifier.
pub trait EquationLookup {
    fn default_equation(
        &self,
        species: u16,
        region: u8,
        forest: &str,
        district: &str,
        fia: bool,
    ) -> Result<String, VolumeError>;
}

/// Built-in lookup table for common Pacific Northwest defaults. A native
/// engine installation would supply its own [`EquationLookup`] backed by
/// the full regional tables.
#[derive(Debug, Default, Clone)]
pub struct StaticEquationTable;

/// (region, fia species code, equation id)
const DEFAULT_EQUATIONS: &[(u8, u16, &str)] = &[
    (6, 11, "F01FW2W011"),
    (6, 17, "F01FW2W017"),
    (6, 22, "F01FW2W022"),
    (6, 98, "F01FW2W098"),
    (6, 108, "F01FW2W108"),
    (6, 122, "F01FW2W122"),
    (6, 202, "F01FW2W202"),
    (6, 242, "F01FW2W242"),
    (6, 263, "F01FW2W263"),
    (6, 351, "F01FW2W351"),
];

/// (fia species code, FIA-mode equation id)
const FIA_EQUATIONS: &[(u16, &str)] = &[
    (202, "NVBM240202"),
    (263, "NVBM240263"),
];

impl EquationLookup for StaticEquationTable {
    fn default_equation(
        &self,
        species: u16,
        region: u8,
        _forest: &str,
        _district: &str,
        fia: bool,
    ) -> Result<String, VolumeError> {
        if fia {
            return FIA_EQUATIONS
                .iter()
                .find(|(code, _)| *code == species)
                .map(|(_, eq)| (*eq).to_string())
                .ok_or(VolumeError::NoEquation { species, region });
        }
        DEFAULT_EQUATIONS
            .iter()
            .find(|(r, code, _)| *r == region && *code == species)
            .map(|(_, _, eq)| (*eq).to_string())
            .ok_or(VolumeError::NoEquation { species, region })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_code_lookup() {
        assert_eq!(species_code("DF").unwrap(), 202);
        assert_eq!(species_code("WH").unwrap(), 263);
        assert_eq!(species_code("df").unwrap(), 202);
    }

    #[test]
    fn test_species_code_unknown() {
        let err = species_code("ZZ").unwrap_err();
        assert!(matches!(err, VolumeError::UnknownSpecies(_)));
    }

    #[test]
    fn test_species_abbrev_lookup() {
        assert_eq!(species_abbrev(202), Some("DF"));
        assert_eq!(species_abbrev(242), Some("WRC"));
        assert_eq!(species_abbrev(1), None);
    }

    #[test]
    fn test_default_equation_df_region6() {
        let table = StaticEquationTable;
        let eq = table.default_equation(202, 6, "12", "01", false).unwrap();
        assert_eq!(eq, "F01FW2W202");
        assert_eq!(eq.len(), 10);
    }

    #[test]
    fn test_equation_ids_are_fixed_width() {
        let table = StaticEquationTable;
        for (region, species, _) in DEFAULT_EQUATIONS {
            let eq = table
                .default_equation(*species, *region, "12", "01", false)
                .unwrap();
            assert_eq!(eq.len(), 10, "equation for species {species}");
        }
    }

    #[test]
    fn test_fia_mode_equation() {
        let table = StaticEquationTable;
        let eq = table.default_equation(202, 6, "12", "01", true).unwrap();
        assert_eq!(eq, "NVBM240202");
    }

    #[test]
    fn test_no_equation_for_unknown_region() {
        let table = StaticEquationTable;
        let err = table.default_equation(202, 3, "12", "01", false).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::NoEquation {
                species: 202,
                region: 3
            }
        ));
    }
}
