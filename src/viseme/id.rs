//! Viseme identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LipsyncError, Result};

/// Number of visemes driven by the host lipsync system
pub const VISEME_COUNT: usize = 15;

/// Mouth-shape categories, in the order the host's `Viseme` parameter uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Viseme {
    Sil = 0,
    Pp = 1,
    Ff = 2,
    Th = 3,
    Dd = 4,
    Kk = 5,
    Ch = 6,
    Ss = 7,
    Nn = 8,
    Rr = 9,
    Aa = 10,
    E = 11,
    Ih = 12,
    Oh = 13,
    Ou = 14,
}

impl Viseme {
    /// All visemes, indexed by their parameter value
    pub const ALL: [Viseme; VISEME_COUNT] = [
        Viseme::Sil,
        Viseme::Pp,
        Viseme::Ff,
        Viseme::Th,
        Viseme::Dd,
        Viseme::Kk,
        Viseme::Ch,
        Viseme::Ss,
        Viseme::Nn,
        Viseme::Rr,
        Viseme::Aa,
        Viseme::E,
        Viseme::Ih,
        Viseme::Oh,
        Viseme::Ou,
    ];

    /// Look up a viseme by parameter value.
    ///
    /// # Errors
    /// `VisemeOutOfRange` for anything outside `0..=14`, negatives included.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(LipsyncError::VisemeOutOfRange { index })
    }

    /// Parameter value of this viseme
    pub fn index(self) -> usize {
        self as usize
    }

    /// Conventional short name (`sil`, `PP`, `aa`, ...)
    pub fn label(self) -> &'static str {
        match self {
            Viseme::Sil => "sil",
            Viseme::Pp => "PP",
            Viseme::Ff => "FF",
            Viseme::Th => "TH",
            Viseme::Dd => "DD",
            Viseme::Kk => "kk",
            Viseme::Ch => "CH",
            Viseme::Ss => "SS",
            Viseme::Nn => "nn",
            Viseme::Rr => "RR",
            Viseme::Aa => "aa",
            Viseme::E => "E",
            Viseme::Ih => "ih",
            Viseme::Oh => "oh",
            Viseme::Ou => "ou",
        }
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
