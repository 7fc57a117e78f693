//! Nations and the global vehicle identifier
//!
//! Vehicle definitions number their items per nation. The exported id packs
//! the nation code and a fixed tag bit below the local id:
//!
//! ```text
//! global = (local << 8) | (code << 4) | 1
//! ```

/// Code used for any nation outside the fixed table
pub const FALLBACK_CODE: u8 = 8;

/// A nation directory under the vehicle definitions tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nation {
    pub name: &'static str,
    pub code: u8,
}

/// All nation directories recognized by the vehicle extractor
pub const NATIONS: &[Nation] = &[
    Nation { name: "ussr", code: 0 },
    Nation { name: "germany", code: 1 },
    Nation { name: "usa", code: 2 },
    Nation { name: "china", code: 3 },
    Nation { name: "france", code: 4 },
    Nation { name: "uk", code: 5 },
    Nation { name: "japan", code: 6 },
    Nation { name: "other", code: 7 },
    // Recognized, but shares the fallback code
    Nation { name: "european", code: FALLBACK_CODE },
];

/// Get nation by directory name
pub fn nation_by_name(name: &str) -> Option<&'static Nation> {
    NATIONS.iter().find(|n| n.name == name)
}

/// Get nation code by directory name, falling back to [`FALLBACK_CODE`]
pub fn nation_code(name: &str) -> u8 {
    nation_by_name(name).map_or(FALLBACK_CODE, |n| n.code)
}

/// Encode a nation-local id into the global vehicle id
///
/// Total: unknown nations encode under [`FALLBACK_CODE`].
pub fn global_id(nation: &str, local_id: u32) -> u64 {
    (u64::from(local_id) << 8) | (u64::from(nation_code(nation)) << 4) | 1
}
