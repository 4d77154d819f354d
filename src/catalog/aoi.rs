//! Registry of the IRIDE Lot-2 areas of interest.
//!
//! Each AOI is addressed either by its extended name (as used for index file
//! names, e.g. `sicilia`) or by its short tag (`SIC`). The registry is fixed;
//! there is no dynamic AOI registration.
use crate::error::{Error, Result};

/// Short tag and display name of a registered area of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AoiInfo {
    pub tag: &'static str,
    pub name: &'static str,
}

/// Look up a registered AOI by extended name or tag, case-insensitively.
///
/// The two site tags `mti` and `coa` are lowercase in the delivery naming
/// convention and are returned as such.
pub fn get_aoi_info(aoi: &str) -> Result<AoiInfo> {
    let key = aoi.to_lowercase();
    let (tag, name) = match key.as_str() {
        // Specific sites
        "nocera_terinese" | "nocera terinese" | "ntr" => ("NTR", "A2 - Nocera Terinese"),
        "palermo" | "pal" => ("PAL", "Palermo"),
        "brennero" | "brn" => ("BRN", "Brennero Area"),
        "cortina" | "crt" => ("CRT", "Cortina"),
        "norcia" | "nri" => ("NRI", "Norcia"),
        "pistoia" | "pst" => ("PST", "Pistoia"),
        "mattinata" | "mti" => ("mti", "Mattinata"),
        "colli_albani" | "coa" => ("coa", "Colli ALbani Area"),
        "vulcano" | "vla" => ("VLA", "Vulcano Island"),
        // Italian regions
        "calabria" | "cal" => ("CAL", "Calabria"),
        "sicilia" | "sic" => ("SIC", "Sicilia"),
        "basilicata" | "bas" => ("BAS", "Basilicata"),
        "puglia" | "pug" => ("PUG", "Puglia"),
        "campania" | "cam" => ("CAM", "Campania"),
        "molise" | "mol" => ("MOL", "Molise"),
        "abruzzo" | "abr" => ("ABR", "Abruzzo"),
        "lazio" | "laz" => ("LAZ", "Lazio"),
        "umbria" | "umb" => ("UMB", "Umbria"),
        "marche" | "mar" => ("MAR", "Marche"),
        "emilia_romagna" | "era" => ("ERA", "Emilia Romagna"),
        "toscana" | "tos" => ("TOS", "Toscana"),
        "lombardia" | "lom" => ("LOM", "Lombardia"),
        "piemonte" | "pie" => ("PIE", "Piemonte"),
        "sardegna" | "sar" => ("SAR", "Sardegna"),
        "trentino" | "taa" => ("TAA", "Trentino Alto Adige"),
        "veneto" | "ven" => ("VEN", "Veneto"),
        "friuli_venezia_giulia" | "fvg" => ("FVG", "Friuli Venezia Giulia"),
        "liguria" | "lig" => ("LIG", "Liguria"),
        "valle_d_aosta" | "vda" => ("VDA", "Valle d'Aosta"),
        _ => return Err(Error::UnknownAoi(aoi.to_string())),
    };
    Ok(AoiInfo { tag, name })
}
