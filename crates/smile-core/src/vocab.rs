/// Controlled vocabularies for sample metadata.
///
/// Each vocabulary is a closed set of display strings. Lookup is exact and
/// case-sensitive: `"Primary"` is a [`CmoSampleClass`], `"primary"` is not.
/// All enums serialize to and from their display strings.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Failure to map a string onto a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    /// The input was empty.
    Empty {
        /// Human-readable vocabulary name, e.g. `"Sample Origin"`.
        vocabulary: &'static str,
    },
    /// The input is not one of the vocabulary's values.
    Unsupported {
        /// Human-readable vocabulary name.
        vocabulary: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The vocabulary selector itself is unknown.
    UnknownVocabulary(String),
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { vocabulary } => write!(f, "{vocabulary} is empty"),
            Self::Unsupported { vocabulary, value } => {
                write!(f, "unsupported {vocabulary}: {value:?}")
            }
            Self::UnknownVocabulary(name) => write!(
                f,
                "unknown vocabulary {name:?} (expected one of: {})",
                Vocabulary::ALL
                    .iter()
                    .map(Vocabulary::token)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl std::error::Error for VocabularyError {}

/// Declares a vocabulary enum with its display strings.
///
/// Generates `ALL`, `as_str`, `Display`, `FromStr` and serde support keyed on
/// the display string.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Human-readable name of this vocabulary.
            pub const LABEL: &'static str = $label;

            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the display string of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = VocabularyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(VocabularyError::Empty { vocabulary: $label });
                }
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(VocabularyError::Unsupported {
                        vocabulary: $label,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

vocabulary! {
    /// Physical form the sample was received in.
    SampleOrigin, "Sample Origin" {
        Block => "Block",
        BoneMarrowAspirate => "Bone Marrow Aspirate",
        BuccalSwab => "Buccal Swab",
        BuffyCoat => "Buffy Coat",
        Cells => "Cells",
        CellPellet => "Cell Pellet",
        CerebrospinalFluid => "Cerebrospinal Fluid",
        CoreBiopsy => "Core Biopsy",
        Curls => "Curls",
        Cytospin => "Cytospin",
        Ffpe => "FFPE",
        FineNeedleAspirate => "Fine Needle Aspirate",
        Fingernails => "Fingernails",
        FreshFrozen => "Fresh or Frozen",
        Organoid => "Organoid",
        Other => "Other",
        Plasma => "Plasma",
        Punch => "Punch",
        RapidAutopsyTissue => "Rapid Autopsy Tissue",
        Saliva => "Saliva",
        Slides => "Slides",
        SortedCells => "Sorted Cells",
        Tissue => "Tissue",
        Urine => "Urine",
        ViablyFrozenCells => "Viably Frozen Cells",
        WholeBlood => "Whole Blood",
        Stool => "Stool",
    }
}

vocabulary! {
    /// Material type submitted to the laboratory.
    SampleType, "Sample Type" {
        Blocks => "Blocks",
        BlocksSlides => "Blocks/Slides",
        Blood => "Blood",
        BoneMarrowBiopsy => "Bone Marrow Biopsy",
        BuccalSwab => "Buccal Swab",
        BuffyCoat => "Buffy Coat",
        Cdna => "cDNA",
        CdnaLibrary => "cDNA Library",
        Cells => "Cells",
        CfDna => "cfDNA",
        Csf => "CSF",
        CurlsPunches => "Curls/Punches",
        Dna => "DNA",
        DnaCdnaLibrary => "DNA/cDNA Library",
        DnaLibrary => "DNA Library",
        Fingernails => "Fingernails",
        /// Stored under its historical spelling.
        HmwDna => "hnwDNA",
        Nuclei => "Nuclei",
        Other => "other",
        Plasma => "Plasma",
        PooledLibrary => "Pooled Library",
        Rna => "RNA",
        Saliva => "Saliva",
        Slides => "Slides",
        Tissue => "Tissue",
        UhmwDna => "uhmwDNA",
        WholeBlood => "Whole Blood",
    }
}

vocabulary! {
    /// How the specimen was preserved.
    Preservation, "Preservation type" {
        DmsoViablyFrozen => "DMSO-ViablyFrozen",
        Edta => "EDTA",
        EdtaStreck => "EDTA-Streck",
        Ffpe => "FFPE",
        FixedFrozen => "Fixed Frozen",
        Fresh => "Fresh",
        Frozen => "Frozen",
        Oct => "OCT",
        Paxgene => "PAXgene",
        RltBuffer => "RLT Buffer",
        RnaLater => "RNALater",
        Streck => "Streck",
        Trizol => "Trizol",
        TrizolLs => "Trizol LS",
        ViablyFrozen => "Viably Frozen",
    }
}

vocabulary! {
    /// Kind of specimen the sample was derived from.
    SpecimenType, "Specimen Type" {
        Biopsy => "Biopsy",
        Blood => "Blood",
        CellLine => "CellLine",
        CfDna => "cfDNA",
        Exosome => "Exosome",
        Fingernails => "Fingernails",
        NonPdx => "Non-PDX",
        Organoid => "Organoid",
        Other => "other",
        Pdx => "PDX",
        RapidAutopsy => "RapidAutopsy",
        Resection => "Resection",
        Saliva => "Saliva",
        Xenograft => "Xenograft",
        XenograftDerivedCellLine => "XenograftDerivedCellLine",
    }
}

vocabulary! {
    /// Clinical class of a sample.
    CmoSampleClass, "CMO Sample Class" {
        AdjacentNormal => "Adjacent Normal",
        AdjacentTissue => "Adjacent Tissue",
        CellFree => "Cell free",
        LocalRecurrence => "Local Recurrence",
        Metastasis => "Metastasis",
        Normal => "Normal",
        Other => "Other",
        Primary => "Primary",
        Recurrence => "Recurrence",
        Tumor => "Tumor",
        UnknownTumor => "Unknown Tumor",
    }
}

vocabulary! {
    /// Nucleic acid extracted from a sample.
    NucleicAcid, "Nucleic Acid" {
        CfDna => "cfDNA",
        Dna => "DNA",
        Rna => "RNA",
        DnaAndRna => "DNA and RNA",
    }
}

vocabulary! {
    TumorNormalType, "Tumor/Normal type" {
        Tumor => "Tumor",
        Normal => "Normal",
    }
}

/// Selects one of the vocabularies by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// [`SampleOrigin`].
    SampleOrigin,
    /// [`SampleType`].
    SampleType,
    /// [`Preservation`].
    Preservation,
    /// [`SpecimenType`].
    SpecimenType,
    /// [`CmoSampleClass`].
    CmoSampleClass,
    /// [`NucleicAcid`].
    NucleicAcid,
    /// [`TumorNormalType`].
    TumorNormal,
}

impl Vocabulary {
    /// Every vocabulary, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::SampleOrigin,
        Self::SampleType,
        Self::Preservation,
        Self::SpecimenType,
        Self::CmoSampleClass,
        Self::NucleicAcid,
        Self::TumorNormal,
    ];

    /// Kebab-case selector token, e.g. `"sample-origin"`.
    pub fn token(&self) -> &'static str {
        match self {
            Self::SampleOrigin => "sample-origin",
            Self::SampleType => "sample-type",
            Self::Preservation => "preservation",
            Self::SpecimenType => "specimen-type",
            Self::CmoSampleClass => "cmo-sample-class",
            Self::NucleicAcid => "nucleic-acid",
            Self::TumorNormal => "tumor-normal",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SampleOrigin => SampleOrigin::LABEL,
            Self::SampleType => SampleType::LABEL,
            Self::Preservation => Preservation::LABEL,
            Self::SpecimenType => SpecimenType::LABEL,
            Self::CmoSampleClass => CmoSampleClass::LABEL,
            Self::NucleicAcid => NucleicAcid::LABEL,
            Self::TumorNormal => TumorNormalType::LABEL,
        }
    }

    /// Every display string of the vocabulary.
    pub fn values(&self) -> Vec<&'static str> {
        fn strings<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> Vec<&'static str> {
            all.iter().map(as_str).collect()
        }
        match self {
            Self::SampleOrigin => strings(SampleOrigin::ALL, SampleOrigin::as_str),
            Self::SampleType => strings(SampleType::ALL, SampleType::as_str),
            Self::Preservation => strings(Preservation::ALL, Preservation::as_str),
            Self::SpecimenType => strings(SpecimenType::ALL, SpecimenType::as_str),
            Self::CmoSampleClass => strings(CmoSampleClass::ALL, CmoSampleClass::as_str),
            Self::NucleicAcid => strings(NucleicAcid::ALL, NucleicAcid::as_str),
            Self::TumorNormal => strings(TumorNormalType::ALL, TumorNormalType::as_str),
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Vocabulary {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.token() == s)
            .ok_or_else(|| VocabularyError::UnknownVocabulary(s.to_owned()))
    }
}

/// Checks `value` against `vocabulary` and returns its canonical display
/// string.
///
/// # Errors
///
/// [`VocabularyError::Empty`] for an empty value,
/// [`VocabularyError::Unsupported`] for a value outside the vocabulary.
pub fn validate(vocabulary: Vocabulary, value: &str) -> Result<&'static str, VocabularyError> {
    match vocabulary {
        Vocabulary::SampleOrigin => value.parse::<SampleOrigin>().map(|v| v.as_str()),
        Vocabulary::SampleType => value.parse::<SampleType>().map(|v| v.as_str()),
        Vocabulary::Preservation => value.parse::<Preservation>().map(|v| v.as_str()),
        Vocabulary::SpecimenType => value.parse::<SpecimenType>().map(|v| v.as_str()),
        Vocabulary::CmoSampleClass => value.parse::<CmoSampleClass>().map(|v| v.as_str()),
        Vocabulary::NucleicAcid => value.parse::<NucleicAcid>().map(|v| v.as_str()),
        Vocabulary::TumorNormal => value.parse::<TumorNormalType>().map(|v| v.as_str()),
    }
}
