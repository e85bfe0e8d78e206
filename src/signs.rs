//! Typed descriptors for IPA signs.
//!
//! A sign is built from its kind tag and a free text properties string such
//! as `"Voiceless Bilabial Plosive consonant"`. Each kind understands its own
//! closed vocabulary of words and derives a canonical representation from
//! what it parsed, so that two spellings of the same sign share one key.

use crate::{IpaError, IpaResult};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

pub use consonants::*;
pub use others::*;
pub use vowels::*;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, StrumDisplay, EnumIter,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SignKind {
    Consonant,
    Vowel,
    Diacritic,
    Suprasegmental,
    Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Descriptor {
    Consonant(Consonant),
    Vowel(Vowel),
    Diacritic(Diacritic),
    Suprasegmental(Suprasegmental),
    Tone(Tone),
}

impl Descriptor {
    pub fn kind(&self) -> SignKind {
        match self {
            Descriptor::Consonant(_) => SignKind::Consonant,
            Descriptor::Vowel(_) => SignKind::Vowel,
            Descriptor::Diacritic(_) => SignKind::Diacritic,
            Descriptor::Suprasegmental(_) => SignKind::Suprasegmental,
            Descriptor::Tone(_) => SignKind::Tone,
        }
    }

    pub fn canonical_representation(&self) -> String {
        format!("{} {}", self, self.kind())
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Descriptor::Consonant(c) => write!(f, "{}", c),
            Descriptor::Vowel(v) => write!(f, "{}", v),
            Descriptor::Diacritic(d) => write!(f, "{}", d),
            Descriptor::Suprasegmental(s) => write!(f, "{}", s),
            Descriptor::Tone(t) => write!(f, "{}", t),
        }
    }
}

/// Builds the descriptor of one kind from the lower-cased property words.
pub type Constructor = fn(&[&str]) -> Result<Descriptor, String>;

const REGISTRY: [(SignKind, Constructor); 5] = [
    (SignKind::Consonant, build_consonant as Constructor),
    (SignKind::Vowel, build_vowel as Constructor),
    (SignKind::Diacritic, build_diacritic as Constructor),
    (SignKind::Suprasegmental, build_suprasegmental as Constructor),
    (SignKind::Tone, build_tone as Constructor),
];

pub fn constructor(kind: SignKind) -> Option<Constructor> {
    REGISTRY
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, build)| *build)
}

fn build_consonant(words: &[&str]) -> Result<Descriptor, String> {
    Consonant::try_from_words(words).map(Descriptor::Consonant)
}

fn build_vowel(words: &[&str]) -> Result<Descriptor, String> {
    Vowel::try_from_words(words).map(Descriptor::Vowel)
}

fn build_diacritic(words: &[&str]) -> Result<Descriptor, String> {
    parse_joined(words, "diacritic").map(Descriptor::Diacritic)
}

fn build_suprasegmental(words: &[&str]) -> Result<Descriptor, String> {
    parse_joined(words, "suprasegmental").map(Descriptor::Suprasegmental)
}

fn build_tone(words: &[&str]) -> Result<Descriptor, String> {
    parse_joined(words, "tone").map(Descriptor::Tone)
}

/// Kinds with a flat vocabulary name their value with all words joined by `-`.
fn parse_joined<T: FromStr>(words: &[&str], what: &str) -> Result<T, String> {
    if words.is_empty() {
        return Err(format!("no {} given", what));
    }
    let joined = words.join("-");
    T::from_str(&joined).map_err(|_| format!("unknown {} '{}'", what, joined))
}

fn set_once<T: Display>(slot: &mut Option<T>, value: T, what: &str) -> Result<(), String> {
    if let Some(previous) = slot.as_ref() {
        return Err(format!("{} given twice ('{}' and '{}')", what, previous, value));
    }
    *slot = Some(value);
    Ok(())
}

/// `"<description> <type>"` with every run of whitespace collapsed to one space.
pub fn normalize_name(description: &str, kind: &str) -> String {
    format!("{} {}", description, kind)
        .split_whitespace()
        .join(" ")
}

/// One IPA sign and, once loaded, its preferred Unicode spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpaSign {
    pub(crate) name: String,
    pub(crate) properties: String,
    pub(crate) descriptor: Descriptor,
    #[serde(rename = "canonical_representation")]
    pub(crate) canonical: String,
    pub(crate) unicode_repr: Option<String>,
}

impl IpaSign {
    pub fn new(kind: SignKind, name: &str, properties: &str) -> IpaResult<Self> {
        let invalid = |reason: String| IpaError::InvalidProperties {
            kind,
            properties: properties.to_string(),
            reason,
        };
        let lowered = properties.to_lowercase();
        let mut words = lowered.split_whitespace().collect::<Vec<_>>();
        let tag = kind.to_string();
        if words.last() == Some(&tag.as_str()) {
            words.pop();
        }
        let build = constructor(kind)
            .ok_or_else(|| invalid(format!("no constructor registered for {}", kind)))?;
        let descriptor = build(&words).map_err(invalid)?;
        Ok(Self {
            name: name.to_string(),
            properties: properties.to_string(),
            canonical: descriptor.canonical_representation(),
            descriptor,
            unicode_repr: None,
        })
    }

    /// Builds a sign straight from the `type` and `description` columns.
    pub fn from_description(kind: SignKind, description: &str) -> IpaResult<Self> {
        let name = normalize_name(description, &kind.to_string());
        Self::new(kind, &name, &name)
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn properties(&self) -> &str {
        self.properties.as_str()
    }

    pub fn kind(&self) -> SignKind {
        self.descriptor.kind()
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn canonical_representation(&self) -> &str {
        self.canonical.as_str()
    }

    pub fn unicode_repr(&self) -> Option<&str> {
        self.unicode_repr.as_deref()
    }

    pub fn is_consonant(&self) -> bool {
        matches!(self.descriptor, Descriptor::Consonant(_))
    }

    pub fn is_vowel(&self) -> bool {
        matches!(self.descriptor, Descriptor::Vowel(_))
    }

    pub fn is_diacritic(&self) -> bool {
        matches!(self.descriptor, Descriptor::Diacritic(_))
    }

    pub fn is_suprasegmental(&self) -> bool {
        matches!(self.descriptor, Descriptor::Suprasegmental(_))
    }

    pub fn is_tone(&self) -> bool {
        matches!(self.descriptor, Descriptor::Tone(_))
    }

    pub fn as_consonant(&self) -> Option<&Consonant> {
        match &self.descriptor {
            Descriptor::Consonant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_vowel(&self) -> Option<&Vowel> {
        match &self.descriptor {
            Descriptor::Vowel(v) => Some(v),
            _ => None,
        }
    }
}

impl Display for IpaSign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.unicode_repr {
            Some(u) => write!(f, "{} ({})", u, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

mod vowels {
    use super::set_once;
    use serde::Serialize;
    use std::fmt::{Display, Formatter};
    use std::str::FromStr;
    use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

    pub const RHOTACIZED: &str = "rhotacized";

    #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Serialize)]
    pub struct Vowel {
        pub(crate) height: Height,
        pub(crate) backness: Backness,
        pub(crate) roundness: Roundness,
        pub(crate) rhotacized: bool,
    }

    impl Vowel {
        pub(crate) fn try_from_words(words: &[&str]) -> Result<Self, String> {
            let mut height = None;
            let mut backness = None;
            let mut roundness = None;
            let mut rhotacized = false;
            for word in words {
                if let Ok(h) = Height::from_str(word) {
                    set_once(&mut height, h, "height")?;
                } else if let Ok(b) = Backness::from_str(word) {
                    set_once(&mut backness, b, "backness")?;
                } else if let Ok(r) = Roundness::from_str(word) {
                    set_once(&mut roundness, r, "roundness")?;
                } else if *word == RHOTACIZED {
                    rhotacized = true;
                } else {
                    return Err(format!("unknown vowel descriptor '{}'", word));
                }
            }
            Ok(Self {
                height: height.ok_or_else(|| "no height defined".to_string())?,
                backness: backness.ok_or_else(|| "no backness defined".to_string())?,
                roundness: roundness.ok_or_else(|| "no roundness defined".to_string())?,
                rhotacized,
            })
        }

        pub fn height(&self) -> Height {
            self.height
        }

        pub fn backness(&self) -> Backness {
            self.backness
        }

        pub fn roundness(&self) -> Roundness {
            self.roundness
        }

        pub fn is_rhotacized(&self) -> bool {
            self.rhotacized
        }
    }

    impl Display for Vowel {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{} {} {}", self.height, self.backness, self.roundness)?;
            if self.rhotacized {
                write!(f, " {}", RHOTACIZED)?;
            }
            Ok(())
        }
    }

    #[derive(
        Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Height {
        Close,
        NearClose,
        CloseMid,
        Mid,
        OpenMid,
        NearOpen,
        Open,
    }

    #[derive(
        Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Backness {
        Front,
        NearFront,
        Central,
        NearBack,
        Back,
    }

    #[derive(
        Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Roundness {
        Unrounded,
        Rounded,
    }
}

mod consonants {
    use super::set_once;
    use itertools::Itertools;
    use serde::Serialize;
    use smallvec::SmallVec;
    use std::fmt::{Display, Formatter};
    use std::str::FromStr;
    use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

    #[derive(Debug, Clone, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
    pub struct Consonant {
        pub(crate) voicing: Option<Voicing>,
        pub(crate) place: Place,
        pub(crate) manners: Manners,
    }

    impl Consonant {
        pub(crate) fn try_from_words(words: &[&str]) -> Result<Self, String> {
            let mut voicing = None;
            let mut place = None;
            let mut manners = SmallVec::<[Manner; 4]>::new();
            for word in words {
                if let Ok(v) = Voicing::from_str(word) {
                    set_once(&mut voicing, v, "voicing")?;
                } else if let Ok(p) = Place::from_str(word) {
                    set_once(&mut place, p, "place")?;
                } else if let Ok(m) = Manner::from_str(word) {
                    manners.push(m);
                } else {
                    return Err(format!("unknown consonant descriptor '{}'", word));
                }
            }
            let place = place.ok_or_else(|| "no place defined".to_string())?;
            if manners.is_empty() {
                return Err("no manners defined".to_string());
            }
            manners.sort();
            manners.dedup();
            Ok(Self {
                voicing,
                place,
                manners: Manners { inner: manners },
            })
        }

        pub fn voicing(&self) -> Option<Voicing> {
            self.voicing
        }

        pub fn place(&self) -> Place {
            self.place
        }

        pub fn manners(&self) -> &[Manner] {
            &self.manners.inner
        }

        pub fn has_manner(&self, manner: Manner) -> bool {
            self.manners.inner.contains(&manner)
        }

        pub fn is_voiced(&self) -> bool {
            self.voicing == Some(Voicing::Voiced)
        }
    }

    impl Display for Consonant {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            if let Some(v) = self.voicing {
                write!(f, "{} ", v)?;
            }
            write!(f, "{} {}", self.place, self.manners)
        }
    }

    /// Manners of articulation, kept sorted so equal sets compare equal.
    #[derive(Debug, Clone, Eq, Hash, PartialEq, Ord, PartialOrd, Default, Serialize)]
    #[serde(transparent)]
    pub struct Manners {
        pub(crate) inner: SmallVec<[Manner; 4]>,
    }

    impl Display for Manners {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.inner.iter().join(" "))
        }
    }

    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Voicing {
        Voiceless,
        Voiced,
    }

    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Place {
        Bilabial,
        #[strum(to_string = "labio-dental", serialize = "labiodental")]
        LabioDental,
        Dental,
        Alveolar,
        #[strum(to_string = "palato-alveolar", serialize = "postalveolar")]
        PalatoAlveolar,
        Retroflex,
        AlveoloPalatal,
        Palatal,
        Velar,
        Uvular,
        Pharyngeal,
        Epiglottal,
        Glottal,
        LabioVelar,
        LabioPalatal,
    }

    /// The order of the variants is the order in which manners are rendered.
    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Manner {
        Sibilant,
        NonSibilant,
        Lateral,
        Ejective,
        Nasal,
        #[strum(to_string = "plosive", serialize = "stop")]
        Plosive,
        Implosive,
        Click,
        Affricate,
        Fricative,
        Approximant,
        Tap,
        Flap,
        Trill,
    }
}

mod others {
    use serde::Serialize;
    use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Diacritic {
        Voiceless,
        Voiced,
        Aspirated,
        MoreRounded,
        LessRounded,
        Advanced,
        Retracted,
        Centralized,
        MidCentralized,
        Syllabic,
        NonSyllabic,
        Rhoticity,
        BreathyVoiced,
        CreakyVoiced,
        Linguolabial,
        Labialized,
        Palatalized,
        Velarized,
        Pharyngealized,
        VelarizedOrPharyngealized,
        Raised,
        Lowered,
        AdvancedTongueRoot,
        RetractedTongueRoot,
        Dental,
        Apical,
        Laminal,
        Nasalized,
        NasalRelease,
        LateralRelease,
        NoAudibleRelease,
        Ejective,
        TieBarAbove,
        TieBarBelow,
    }

    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Suprasegmental {
        PrimaryStress,
        SecondaryStress,
        Long,
        HalfLong,
        ExtraShort,
        MinorGroup,
        MajorGroup,
        SyllableBreak,
        Linking,
        Upstep,
        Downstep,
        GlobalRise,
        GlobalFall,
    }

    #[derive(
        Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, EnumString, StrumDisplay,
        EnumIter, Serialize,
    )]
    #[strum(serialize_all = "kebab-case")]
    #[serde(rename_all = "kebab-case")]
    pub enum Tone {
        ExtraHighLevel,
        HighLevel,
        MidLevel,
        LowLevel,
        ExtraLowLevel,
        Rising,
        Falling,
        HighRising,
        LowRising,
        RisingFalling,
    }
}
